//! The encoded medium: a sequence of bits and the ways it can be laid out
//! in bytes.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Bits packed most significant first into bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitStream {
    bytes: Vec<u8>,
    bit_count: usize,
}

impl BitStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bits: usize) -> Self {
        BitStream {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            bit_count: 0,
        }
    }

    /// Reinterprets packed bytes holding exactly `bit_count` bits.
    pub fn from_packed(bytes: Vec<u8>, bit_count: usize) -> Result<Self> {
        let needed = bit_count.div_ceil(8);
        if bytes.len() < needed {
            return Err(Error::Truncated { what: "packed bits" });
        }
        if bytes.len() > needed {
            return Err(Error::TrailingBytes {
                extra: bytes.len() - needed,
            });
        }
        Ok(BitStream { bytes, bit_count })
    }

    pub fn push(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8;
        let bit_offset = self.bit_count % 8;

        if byte_index >= self.bytes.len() {
            self.bytes.push(0);
        }
        if bit {
            self.bytes[byte_index] |= 1 << (7 - bit_offset);
        }

        self.bit_count += 1;
    }

    pub fn extend_from_bits(&mut self, bits: &[bool]) {
        for &bit in bits {
            self.push(bit);
        }
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.bit_count {
            return None;
        }
        Some((self.bytes[index / 8] >> (7 - index % 8)) & 1 == 1)
    }

    pub fn len(&self) -> usize {
        self.bit_count
    }

    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    /// Packed bytes; the unused tail of the last byte is zero.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bit_count).map(move |index| (self.bytes[index / 8] >> (7 - index % 8)) & 1 == 1)
    }

    /// Lays the bits out according to `framing`.
    pub fn frame(&self, framing: Framing) -> Vec<u8> {
        match framing {
            Framing::Packed => self.bytes.clone(),
            Framing::Cells => {
                let mut out = Vec::with_capacity(self.bit_count * CELL_SIZE);
                for bit in self.iter() {
                    let cell = if bit { ONE as u32 } else { ZERO as u32 };
                    out.extend_from_slice(&cell.to_le_bytes());
                }
                out
            }
            Framing::Text => self.iter().map(|bit| if bit { ONE } else { ZERO }).collect(),
        }
    }

    /// Inverse of [`BitStream::frame`]. `bit_count` is only consulted for
    /// packed input, the other framings carry one bit per token.
    pub fn unframe(data: &[u8], framing: Framing, bit_count: usize) -> Result<Self> {
        match framing {
            Framing::Packed => Self::from_packed(data.to_vec(), bit_count),
            Framing::Cells => {
                if data.len() % CELL_SIZE != 0 {
                    return Err(Error::Truncated { what: "bit cell" });
                }
                let mut bits = Self::with_capacity(data.len() / CELL_SIZE);
                for (offset, cell) in data.chunks_exact(CELL_SIZE).enumerate() {
                    let token = u32::from_le_bytes([cell[0], cell[1], cell[2], cell[3]]);
                    bits.push(token_to_bit(token, offset)?);
                }
                Ok(bits)
            }
            Framing::Text => {
                let mut bits = Self::with_capacity(data.len());
                for (offset, &token) in data.iter().enumerate() {
                    bits.push(token_to_bit(token as u32, offset)?);
                }
                Ok(bits)
            }
        }
    }
}

const ZERO: u8 = b'0';
const ONE: u8 = b'1';
const CELL_SIZE: usize = 4;

fn token_to_bit(token: u32, offset: usize) -> Result<bool> {
    match token {
        t if t == ZERO as u32 => Ok(false),
        t if t == ONE as u32 => Ok(true),
        token => Err(Error::MalformedBitStream { offset, token }),
    }
}

/// How each bit is stored on disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Framing {
    /// Eight bits per byte.
    #[default]
    Packed,
    /// One little-endian 32-bit cell per bit holding the character `'0'` or `'1'`.
    Cells,
    /// One ASCII `'0'` or `'1'` per bit.
    Text,
}

impl Framing {
    pub fn tag(self) -> u8 {
        match self {
            Framing::Packed => 0,
            Framing::Cells => 1,
            Framing::Text => 2,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(Framing::Packed),
            1 => Ok(Framing::Cells),
            2 => Ok(Framing::Text),
            other => Err(Error::UnknownFraming(other)),
        }
    }
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Framing::Packed => "packed",
            Framing::Cells => "cells",
            Framing::Text => "text",
        })
    }
}

impl FromStr for Framing {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "packed" => Ok(Framing::Packed),
            "cells" => Ok(Framing::Cells),
            "text" => Ok(Framing::Text),
            other => Err(format!("unknown framing '{}' (expected packed, cells or text)", other)),
        }
    }
}
