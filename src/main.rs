use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tp03_feed::{DecodedRecord, DecoderConfig, RecordDecoder, SkipCondition};
use tracing::info;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

#[derive(Debug, Parser)]
#[command(version, about = "Decode Format 6 (TP03) quote capture files to JSON")]
struct Args {
    /// Capture file to decode
    #[arg(long, short = 'i', env = "TP03_INPUT")]
    input: PathBuf,

    /// Output JSON file; stdout when omitted
    #[arg(long, short = 'o', env = "TP03_OUTPUT")]
    output: Option<PathBuf>,

    /// Skip condition: a preset (trade, no-trade, trade-only, trial, no-trial)
    /// or MODE:POSITION:VALUE:MASK. Repeatable.
    #[arg(long = "skip", short = 's', value_delimiter = ',')]
    skip: Vec<SkipCondition>,

    /// Bytes read from the input per chunk
    #[arg(long, default_value_t = DecoderConfig::DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Discard a partial record once this many bytes pile up without a terminal code
    #[arg(long)]
    max_buffer: Option<usize>,

    /// Reject records whose packed BCD fields hold nibbles 10-15
    #[arg(long, default_value_t = false)]
    strict_bcd: bool,

    /// Write compact JSON instead of pretty-printed
    #[arg(long, default_value_t = false)]
    compact: bool,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();
}

fn write_json<W: Write, T: Serialize>(mut w: W, value: &T, compact: bool) -> Result<()> {
    if compact {
        serde_json::to_writer(&mut w, value)?;
    } else {
        serde_json::to_writer_pretty(&mut w, value)?;
    }
    writeln!(w)?;
    w.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = DecoderConfig::new()
        .with_skip_conditions(args.skip.iter().copied())
        .with_chunk_size(args.chunk_size)
        .with_strict_bcd(args.strict_bcd);
    if let Some(max) = args.max_buffer {
        config = config.with_max_buffer_size(max);
    }

    let file = File::open(&args.input).with_context(|| format!("open {:?}", args.input))?;
    let mut decoder = RecordDecoder::new(config);
    let mut records: Vec<DecodedRecord> = Vec::new();
    decoder
        .decode_stream(BufReader::new(file), |record| records.push(record))
        .with_context(|| format!("decode {:?}", args.input))?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("create {:?}", parent))?;
                }
            }
            let out = File::create(path).with_context(|| format!("create {:?}", path))?;
            write_json(BufWriter::new(out), &records, args.compact)?;
            info!(records = records.len(), path = ?path, "wrote decoded records");
        }
        None => {
            write_json(BufWriter::new(io::stdout().lock()), &records, args.compact)?;
        }
    }

    decoder.stats().log_summary();
    Ok(())
}
