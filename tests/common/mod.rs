//! Builders for synthetic TP03 records

#![allow(dead_code)]

use tp03_feed::protocol::{ESC_CODE, TERMINAL_CODE};
use tp03_feed::xor_checksum;

/// Encode `n` as packed BCD over `width` bytes
pub fn bcd(n: u64, width: usize) -> Vec<u8> {
    let digits = format!("{:0w$}", n, w = width * 2);
    let digits = &digits[digits.len() - width * 2..];
    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| ((pair[0] - b'0') << 4) | (pair[1] - b'0'))
        .collect()
}

/// Price in ten-thousandths, e.g. 12.34 -> 123400
pub fn price(ten_thousandths: u64) -> [u8; 5] {
    let mut out = [0u8; 5];
    out.copy_from_slice(&bcd(ten_thousandths, 5));
    out
}

pub fn qty(n: u64) -> [u8; 4] {
    let mut out = [0u8; 4];
    out.copy_from_slice(&bcd(n, 4));
    out
}

#[derive(Debug, Clone)]
pub struct RecordBuilder {
    pub transmission: u32,
    pub stock_code: String,
    pub time: [u8; 6],
    pub reveal: u8,
    pub limit: u8,
    pub status: u8,
    pub volume: u64,
    pub groups: Vec<([u8; 5], [u8; 4])>,
}

impl RecordBuilder {
    pub fn new(stock_code: &str) -> Self {
        RecordBuilder {
            transmission: 1,
            stock_code: stock_code.to_string(),
            time: [0x09, 0x00, 0x00, 0x00, 0x00, 0x00],
            reveal: 0,
            limit: 0,
            status: 0,
            volume: 0,
            groups: Vec::new(),
        }
    }

    pub fn transmission(mut self, n: u32) -> Self {
        self.transmission = n;
        self
    }

    pub fn time(mut self, time: [u8; 6]) -> Self {
        self.time = time;
        self
    }

    pub fn flags(mut self, reveal: u8, limit: u8, status: u8) -> Self {
        self.reveal = reveal;
        self.limit = limit;
        self.status = status;
        self
    }

    pub fn volume(mut self, volume: u64) -> Self {
        self.volume = volume;
        self
    }

    pub fn group(mut self, p: [u8; 5], q: [u8; 4]) -> Self {
        self.groups.push((p, q));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let body_len = 29 + self.groups.len() * 9 + 1 + TERMINAL_CODE.len();
        let mut r = vec![ESC_CODE];
        r.extend_from_slice(&bcd(body_len as u64, 2));
        r.extend_from_slice(&[0x01, 0x06, 0x04]);
        r.extend_from_slice(&bcd(self.transmission as u64, 4));
        r.extend_from_slice(format!("{:<6}", self.stock_code).as_bytes());
        r.extend_from_slice(&self.time);
        r.extend_from_slice(&[self.reveal, self.limit, self.status]);
        r.extend_from_slice(&bcd(self.volume, 4));
        for (p, q) in &self.groups {
            r.extend_from_slice(p);
            r.extend_from_slice(q);
        }
        let check = xor_checksum(&r[1..]);
        r.push(check);
        r.extend_from_slice(&TERMINAL_CODE);
        r
    }
}
