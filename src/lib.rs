//! Static Huffman coding over bytes.
//!
//! Byte frequencies feed a min-heap, the heap is merged into a prefix-code
//! tree, the tree yields one code per byte value, and the codec turns a
//! message into bits and back.
//!
//! ```
//! use huffman_codec::{CodeTable, FrequencyTable, HuffmanTree, codec};
//!
//! let message = b"abracadabra";
//! let tree = HuffmanTree::build(&FrequencyTable::from_bytes(message))?;
//! let table = CodeTable::derive(&tree);
//!
//! let (bits, stats) = codec::encode(message, &table)?;
//! assert_eq!(stats.total_bits, bits.len() as u64);
//! assert_eq!(codec::decode(&bits, &tree)?, message.to_vec());
//! # Ok::<(), huffman_codec::Error>(())
//! ```

pub mod bits;
pub mod code_table;
pub mod codec;
pub mod container;
pub mod error;
pub mod heap;
pub mod huffman;

pub use bits::{BitStream, Framing};
pub use code_table::{Code, CodeTable};
pub use codec::EncodeStats;
pub use container::{compress, decompress};
pub use error::{Error, HeapError, Result};
pub use heap::{MinPriorityQueue, Weighted};
pub use huffman::{ALPHABET_SIZE, FrequencyTable, HuffmanTree, Node, Symbol};
