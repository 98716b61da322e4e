//! On-disk layout written by `encode` and read by `decode`.
//!
//! All integers are big-endian:
//!
//! ```text
//! original_len: u64 | framing: u8 | bit_count: u64 | entries: u16
//! entries x (symbol: u8, count: u64)
//! payload
//! ```
//!
//! Only symbols with a non-zero count are listed. The decoder restores the
//! full table from them and so rebuilds exactly the tree the encoder used.

use log::{debug, info};

use crate::bits::{BitStream, Framing};
use crate::code_table::CodeTable;
use crate::codec::{self, EncodeStats};
use crate::error::{Error, Result};
use crate::huffman::{FrequencyTable, HuffmanTree};

/// Everything the encoder produced, kept apart so callers can report on it.
#[derive(Debug)]
pub struct Compressed {
    pub header: Vec<u8>,
    pub payload: Vec<u8>,
    pub frequencies: FrequencyTable,
    pub table: CodeTable,
    pub stats: EncodeStats,
}

impl Compressed {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.header.len() + self.payload.len());
        bytes.extend_from_slice(&self.header);
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    pub fn len(&self) -> usize {
        self.header.len() + self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn compress(data: &[u8], framing: Framing) -> Result<Compressed> {
    let frequencies = FrequencyTable::from_bytes(data);
    let tree = HuffmanTree::build(&frequencies)?;
    let table = CodeTable::derive(&tree);

    let (bits, stats) = codec::encode(data, &table)?;
    let header = encode_header(&frequencies, framing, data.len() as u64, bits.len() as u64);
    let payload = bits.frame(framing);

    info!(
        "Encoded {} bytes into {} bits ({} framing, {} payload bytes)",
        data.len(),
        stats.total_bits,
        framing,
        payload.len()
    );

    Ok(Compressed {
        header,
        payload,
        frequencies,
        table,
        stats,
    })
}

/// Decoded message together with the statistics read from the header.
#[derive(Debug)]
pub struct Decompressed {
    pub data: Vec<u8>,
    pub frequencies: FrequencyTable,
    pub framing: Framing,
    pub bit_count: u64,
}

pub fn decompress(bytes: &[u8]) -> Result<Decompressed> {
    let mut reader = Reader { bytes, position: 0 };

    let original_len = reader.u64("original length")?;
    let framing = Framing::from_tag(reader.u8("framing")?)?;
    let bit_count = reader.u64("bit count")?;
    let entries = reader.u16("entry count")?;
    debug!("Frequency entries to process: {}", entries);

    let mut frequencies = FrequencyTable::new();
    for _ in 0..entries {
        let symbol = reader.u8("frequency entry")?;
        let count = reader.u64("frequency entry")?;
        frequencies.set(symbol, count);
    }
    debug!("Header size: {} bytes", reader.position);

    // the counts describe the message, so they must add up to its length;
    // this also keeps every merge weight in range while building the tree
    let total = frequencies.checked_total().ok_or(Error::CorruptHeader {
        reason: "frequency counts overflow",
    })?;
    if total != original_len {
        return Err(Error::CorruptHeader {
            reason: "frequency counts do not add up to the message length",
        });
    }

    let bit_count_usize =
        usize::try_from(bit_count).map_err(|_| Error::Truncated { what: "payload" })?;
    let bits = BitStream::unframe(reader.rest(), framing, bit_count_usize)?;
    if bits.len() as u64 != bit_count {
        return Err(Error::Truncated { what: "payload" });
    }

    let tree = HuffmanTree::build(&frequencies)?;
    let data = codec::decode(&bits, &tree)?;

    if data.len() as u64 != original_len {
        return Err(Error::LengthMismatch {
            expected: original_len,
            actual: data.len() as u64,
        });
    }

    Ok(Decompressed {
        data,
        frequencies,
        framing,
        bit_count,
    })
}

fn encode_header(
    frequencies: &FrequencyTable,
    framing: Framing,
    original_len: u64,
    bit_count: u64,
) -> Vec<u8> {
    let mut bytes = Vec::new();

    bytes.extend_from_slice(&original_len.to_be_bytes());
    bytes.push(framing.tag());
    bytes.extend_from_slice(&bit_count.to_be_bytes());

    let present: Vec<_> = frequencies.iter().filter(|&(_, count)| count > 0).collect();
    debug!("Unique symbols to store: {}", present.len());

    // at most 256 entries, always fits
    bytes.extend_from_slice(&(present.len() as u16).to_be_bytes());
    for (symbol, count) in present {
        bytes.push(symbol);
        bytes.extend_from_slice(&count.to_be_bytes());
    }

    debug!("Header generated. Total header size: {} bytes", bytes.len());
    bytes
}

struct Reader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    fn take<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N]> {
        let end = self.position + N;
        let slice = self.bytes.get(self.position..end).ok_or(Error::Truncated { what })?;
        self.position = end;

        let mut array = [0; N];
        array.copy_from_slice(slice);
        Ok(array)
    }

    fn u8(&mut self, what: &'static str) -> Result<u8> {
        Ok(self.take::<1>(what)?[0])
    }

    fn u16(&mut self, what: &'static str) -> Result<u16> {
        self.take(what).map(u16::from_be_bytes)
    }

    fn u64(&mut self, what: &'static str) -> Result<u64> {
        self.take(what).map(u64::from_be_bytes)
    }

    fn rest(&self) -> &'a [u8] {
        &self.bytes[self.position..]
    }
}
