use log::{debug, warn};

use crate::bits::BitStream;
use crate::code_table::CodeTable;
use crate::error::{Error, Result};
use crate::huffman::{HuffmanTree, Node};

/// Size figures collected while encoding. Purely informational.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncodeStats {
    pub input_bytes: u64,
    pub total_bits: u64,
}

impl EncodeStats {
    /// Encoded size as whole bytes, a trailing partial byte not counted.
    pub fn reported_bytes(&self) -> u64 {
        self.total_bits / 8
    }

    /// Bytes actually occupied once the bits are packed.
    pub fn packed_bytes(&self) -> u64 {
        self.total_bits.div_ceil(8)
    }

    /// Percentage saved relative to the input, using `reported_bytes`.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        (self.input_bytes as f64 - self.reported_bytes() as f64) / self.input_bytes as f64 * 100.0
    }
}

/// Concatenates the code of every input byte.
pub fn encode(data: &[u8], table: &CodeTable) -> Result<(BitStream, EncodeStats)> {
    debug!("Starting data encoding of {} bytes...", data.len());

    let mut bits = BitStream::with_capacity(data.len() * 8);
    for &byte in data {
        let code = table.get(byte).ok_or(Error::MissingCode { symbol: byte })?;
        bits.extend_from_bits(code.bits());
    }

    let stats = EncodeStats {
        input_bytes: data.len() as u64,
        total_bits: bits.len() as u64,
    };
    debug!("total bits = {}", stats.total_bits);
    Ok((bits, stats))
}

/// Walks the tree bit by bit. A leaf is emitted when the walk stands on it
/// before the next bit is taken, and once more after the input runs out.
pub fn decode(bits: &BitStream, tree: &HuffmanTree) -> Result<Vec<u8>> {
    debug!("Starting bitstream decoding of {} bits...", bits.len());
    let root = tree.root();

    if let Node::Leaf { symbol, .. } = root {
        // every bit of a single-leaf tree is one whole code
        return Ok(vec![*symbol; bits.len()]);
    }

    let mut result = Vec::new();
    let mut cursor = root;

    for bit in bits.iter() {
        if let Node::Leaf { symbol, .. } = cursor {
            result.push(*symbol);
            cursor = root;
        }

        if let Node::Internal { left, right, .. } = cursor {
            cursor = if bit { &**right } else { &**left };
        }
    }

    match cursor {
        Node::Leaf { symbol, .. } => result.push(*symbol),
        _ if std::ptr::eq(cursor, root) => {}
        _ => {
            let trailing_bits = dangling_bits(bits, root);
            warn!("Bit stream ends {} bits into an unfinished code", trailing_bits);
            return Err(Error::IncompleteCode { trailing_bits });
        }
    }

    debug!("Final decoded data size: {} bytes.", result.len());
    Ok(result)
}

/// Replays the walk to count the bits consumed since the last emitted leaf.
fn dangling_bits(bits: &BitStream, root: &Node) -> usize {
    let mut cursor = root;
    let mut depth = 0;

    for bit in bits.iter() {
        if let Node::Internal { left, right, .. } = cursor {
            cursor = if bit { &**right } else { &**left };
            depth += 1;
        }
        if cursor.is_leaf() {
            cursor = root;
            depth = 0;
        }
    }
    depth
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::huffman::FrequencyTable;

    fn round_trip(data: &[u8]) -> Vec<u8> {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(data)).unwrap();
        let table = CodeTable::derive(&tree);
        let (bits, _) = encode(data, &table).unwrap();
        decode(&bits, &tree).unwrap()
    }

    #[test]
    fn abracadabra_round_trips() {
        assert_eq!(round_trip(b"abracadabra"), b"abracadabra".to_vec());
    }

    #[test]
    fn single_symbol_round_trips() {
        let data = vec![b'a'; 1000];
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(&data)).unwrap();
        let table = CodeTable::derive(&tree);

        assert!(!table.get(b'a').unwrap().is_empty());
        let (bits, _) = encode(&data, &table).unwrap();
        assert_eq!(decode(&bits, &tree).unwrap(), data);
    }

    #[test]
    fn empty_input_yields_nothing() {
        let tree = HuffmanTree::build(&FrequencyTable::new()).unwrap();
        let table = CodeTable::derive(&tree);

        let (bits, stats) = encode(&[], &table).unwrap();
        assert!(bits.is_empty());
        assert_eq!(stats.total_bits, 0);
        assert_eq!(stats.compression_ratio(), 0.0);
        assert!(decode(&bits, &tree).unwrap().is_empty());
    }

    #[test]
    fn every_byte_value_round_trips() {
        let data: Vec<u8> = (0..=255u8).chain((0..=255u8).rev()).chain([0, 0, 0, 255]).collect();
        assert_eq!(round_trip(&data), data);
    }

    #[test]
    fn foreign_table_still_encodes() {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(b"aaaa")).unwrap();
        let table = CodeTable::derive(&tree);

        let (bits, _) = encode(b"zebra", &table).unwrap();
        assert_eq!(decode(&bits, &tree).unwrap(), b"zebra".to_vec());
    }

    #[test]
    fn stats_truncate_partial_bytes() {
        let stats = EncodeStats {
            input_bytes: 4,
            total_bits: 23,
        };

        assert_eq!(stats.reported_bytes(), 2);
        assert_eq!(stats.packed_bytes(), 3);
        assert_eq!(stats.compression_ratio(), 50.0);
    }

    #[test]
    fn unfinished_code_is_reported() {
        let data = b"abracadabra";
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(data)).unwrap();
        let table = CodeTable::derive(&tree);

        let (full, _) = encode(data, &table).unwrap();
        let c_code = table.get(b'c').unwrap();
        assert!(c_code.len() > 1);

        // the whole message followed by the first bit of a 'c'
        let mut bits = BitStream::new();
        let message: Vec<bool> = full.iter().collect();
        bits.extend_from_bits(&message);
        bits.extend_from_bits(&c_code.bits()[..1]);

        let err = decode(&bits, &tree).unwrap_err();
        assert!(matches!(err, Error::IncompleteCode { trailing_bits: 1 }));
    }
}
