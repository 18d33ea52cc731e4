//! Walks a program image word by word and produces listing records.

use std::fmt;

use thiserror::Error;

use crate::decoder::{DecodeContext, Decoded, Decoder};
use crate::opcodes::{classify, DecodedOpcode, Op};

pub const MEM_SIZE: usize = 4096;
pub const DEFAULT_BASE: u16 = 0x200;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ListingError {
    #[error("program image is {size} bytes, at most {max} fit above {base:#05x}")]
    TooLarge { size: usize, max: usize, base: u16 },
    #[error("load address {0:#x} is outside the 4 KiB address space")]
    BadBase(u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub address: u16,
    pub opcode: u16,
    pub decoded: Decoded,
    pub bytes: [u8; 2],
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04X}: {:04X} | {} <{:02X} {:02X}>",
            self.address, self.opcode, self.decoded, self.bytes[0], self.bytes[1]
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub base: u16,
    pub sprites: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE,
            sprites: true,
        }
    }
}

/// Decodes every whole word of `image`, including suppressed ones.
pub fn disassemble(
    image: &[u8],
    decoder: &Decoder,
    options: Options,
) -> Result<Vec<Record>, ListingError> {
    if options.base as usize >= MEM_SIZE {
        return Err(ListingError::BadBase(options.base));
    }
    if image.is_empty() {
        log::warn!("Program image is empty, nothing to list");
        return Ok(Vec::new());
    }
    let max = MEM_SIZE - options.base as usize;
    if image.len() > max {
        return Err(ListingError::TooLarge {
            size: image.len(),
            max,
            base: options.base,
        });
    }

    let words = image.chunks_exact(2);
    if !words.remainder().is_empty() {
        log::warn!(
            "Ignoring trailing byte {:02X} at {:04X}",
            words.remainder()[0],
            options.base as usize + image.len() - 1
        );
    }

    let mut index = 0u16;
    let mut records = Vec::with_capacity(image.len() / 2);

    for (i, word) in words.enumerate() {
        let bytes = [word[0], word[1]];
        let opcode = u16::from_be_bytes(bytes);
        let address = options.base + (i * 2) as u16;

        // I is updated before decoding, so a draw sees the value set right before it.
        if classify(opcode) == Some(Op::LdIndex) {
            index = DecodedOpcode::from(opcode).nnn;
        }

        let ctx = DecodeContext {
            image,
            base: options.base,
            index,
        };
        let decoded = decoder.decode(opcode, options.sprites.then_some(&ctx));
        log::debug!("{:04X}: {:04X} -> {:?}", address, opcode, decoded);

        records.push(Record {
            address,
            opcode,
            decoded,
            bytes,
        });
    }

    Ok(records)
}

/// The printable listing, one line per record that produced output.
pub fn render(records: &[Record]) -> String {
    records
        .iter()
        .filter(|record| !record.decoded.is_suppressed())
        .map(|record| format!("{}\n", record))
        .collect()
}
