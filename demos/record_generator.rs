/// Synthetic Format 6 (TP03) capture generator
///
/// Writes back-to-back records with random trades and best bid/ask depth
/// to stdout or a file. Useful for testing and benchmarking the decoder.
///
/// Usage: record_generator [OUTPUT|stdout] [COUNT]

use rand::Rng;
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use tp03_feed::protocol::{ESC_CODE, TERMINAL_CODE};
use tp03_feed::xor_checksum;

const STOCK_CODES: [&str; 6] = ["2330", "2317", "1101", "0050", "A01234", "C05678"];

fn bcd(n: u64, width: usize) -> Vec<u8> {
    let digits = format!("{:0w$}", n, w = width * 2);
    let digits = &digits[digits.len() - width * 2..];
    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| ((pair[0] - b'0') << 4) | (pair[1] - b'0'))
        .collect()
}

fn matching_time(i: usize) -> Vec<u8> {
    let micros = 9 * 3_600_000_000u64 + i as u64 * 1_250;
    let (h, rem) = (micros / 3_600_000_000, micros % 3_600_000_000);
    let (m, rem) = (rem / 60_000_000, rem % 60_000_000);
    let (s, us) = (rem / 1_000_000, rem % 1_000_000);
    bcd(((h * 100 + m) * 100 + s) * 1_000_000 + us, 6)
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let output_path = if args.len() > 1 {
        args[1].clone()
    } else {
        "/tmp/f6_tp03.bin".to_string()
    };

    let record_count: usize = if args.len() > 2 {
        args[2].parse().unwrap_or(10000)
    } else {
        10000
    };

    let to_stdout = output_path == "stdout";
    let mut output: Box<dyn Write> = if to_stdout {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        Box::new(BufWriter::new(File::create(&output_path)?))
    };

    let mut rng = rand::thread_rng();
    let mut volume = 0u64;
    let mut bytes_written = 0usize;

    eprintln!("Generating {} records to {}", record_count, output_path);

    for i in 0..record_count {
        let stock_code = STOCK_CODES[rng.gen_range(0..STOCK_CODES.len())];
        let with_trade = rng.gen_bool(0.6);
        let bids = rng.gen_range(0u8..=5);
        let asks = rng.gen_range(0u8..=5);
        let trial = rng.gen_bool(0.05);

        let mut reveal = (bids << 4) | (asks << 1);
        if with_trade {
            reveal |= 0x80;
        }
        let limit = if rng.gen_bool(0.02) { 0x01 } else { 0x00 };
        let mut status = 0x18;
        if trial {
            status |= 0xC0;
        }

        // prices in ten-thousandths around 580.00, tick 0.5
        let mid = 5_800_000u64 + rng.gen_range(0u64..40) * 5_000;
        let mut groups: Vec<(u64, u64)> = Vec::new();
        if with_trade {
            let qty = rng.gen_range(1u64..500);
            volume += qty;
            groups.push((mid, qty));
        }
        for level in 0..bids as u64 {
            groups.push((mid - (level + 1) * 5_000, rng.gen_range(1u64..2000)));
        }
        for level in 0..asks as u64 {
            groups.push((mid + (level + 1) * 5_000, rng.gen_range(1u64..2000)));
        }

        let mut msg = vec![ESC_CODE];
        msg.extend(bcd((29 + groups.len() * 9 + 3) as u64, 2));
        msg.extend_from_slice(&[0x01, 0x06, 0x04]);
        msg.extend(bcd(i as u64 + 1, 4));
        msg.extend(format!("{:<6}", stock_code).bytes());
        msg.extend(matching_time(i));
        msg.extend_from_slice(&[reveal, limit, status]);
        msg.extend(bcd(volume, 4));
        for (price, qty) in groups {
            msg.extend(bcd(price, 5));
            msg.extend(bcd(qty, 4));
        }
        let check = xor_checksum(&msg[1..]);
        msg.push(check);
        msg.extend_from_slice(&TERMINAL_CODE);

        output.write_all(&msg)?;
        bytes_written += msg.len();

        if i % 1000 == 0 && i > 0 {
            eprintln!("Generated {} records", i);
        }
    }
    output.flush()?;

    eprintln!("Capture generation complete: {} records", record_count);
    eprintln!("File size: {} bytes", bytes_written);

    Ok(())
}
