use log::{debug, trace};

use crate::error::Result;
use crate::heap::{MinPriorityQueue, Weighted};

/// One byte value. Bytes are indexed as unsigned 0..=255 everywhere.
pub type Symbol = u8;

pub const ALPHABET_SIZE: usize = 256;

/// Occurrence count for every byte value. All 256 entries always exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable {
            counts: [0; ALPHABET_SIZE],
        }
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        for &byte in data {
            table.count(byte);
        }
        table
    }

    pub fn count(&mut self, symbol: Symbol) {
        self.counts[symbol as usize] += 1;
    }

    pub fn set(&mut self, symbol: Symbol, count: u64) {
        self.counts[symbol as usize] = count;
    }

    pub fn get(&self, symbol: Symbol) -> u64 {
        self.counts[symbol as usize]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Like [`FrequencyTable::total`], but `None` if the counts overflow.
    pub fn checked_total(&self) -> Option<u64> {
        self.counts.iter().try_fold(0u64, |sum, &count| sum.checked_add(count))
    }

    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    /// Every `(symbol, count)` pair in symbol order, zero counts included.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(symbol, &count)| (symbol as Symbol, count))
    }

    /// Shannon entropy of the distribution in bits per symbol.
    pub fn entropy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }

        let total_f = total as f64;
        let entropy: f64 = self
            .counts
            .iter()
            .filter(|&&count| count > 0)
            .map(|&count| {
                let p = count as f64 / total_f;
                -p * p.log2()
            })
            .sum();

        debug!(
            "Calculated entropy: {:.4} bits/symbol (Total samples: {})",
            entropy, total
        );
        entropy
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum Node {
    Leaf {
        symbol: Symbol,
        freq: u64,
    },
    Internal {
        freq: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn freq(&self) -> u64 {
        match self {
            Node::Leaf { freq, .. } => *freq,
            Node::Internal { freq, .. } => *freq,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    fn merge(left: Node, right: Node) -> Node {
        Node::Internal {
            freq: left.freq() + right.freq(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl Weighted for Node {
    fn weight(&self) -> u64 {
        self.freq()
    }
}

/// A static prefix-code tree. The root owns every node; dropping the tree
/// releases children before their parent.
#[derive(Debug, Eq, PartialEq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Builds the tree over all 256 symbols, zero-frequency ones included, so
    /// there are always at least two leaves to merge.
    pub fn build(frequencies: &FrequencyTable) -> Result<Self> {
        debug!(
            "Building Huffman Tree from {} distinct symbols",
            frequencies.distinct_symbols()
        );

        // each merge removes two nodes and adds one, so the queue never
        // holds more than the initial leaves
        let mut heap = MinPriorityQueue::with_capacity(ALPHABET_SIZE)?;
        for (symbol, freq) in frequencies.iter() {
            heap.insert(Node::Leaf { symbol, freq })?;
        }
        debug!("Initial heap size: {}", heap.len());

        while heap.len() > 1 {
            let left = heap.extract_min()?;
            let right = heap.extract_min()?;
            trace!("Merging subtrees of weight {} and {}", left.freq(), right.freq());
            heap.insert(Node::merge(left, right))?;
        }

        let root = heap.extract_min()?;
        debug!("Tree construction complete, root weight {}", root.freq());
        Ok(HuffmanTree { root })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Length of the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        fn height(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Internal { left, right, .. } => 1 + height(left).max(height(right)),
            }
        }
        height(&self.root)
    }

    pub fn leaf_count(&self) -> usize {
        fn leaves(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 1,
                Node::Internal { left, right, .. } => leaves(left) + leaves(right),
            }
        }
        leaves(&self.root)
    }

    /// Sum over all leaves of depth times frequency, i.e. the encoded size
    /// in bits of the message the tree was built from.
    pub fn weighted_path_length(&self) -> u64 {
        fn walk(node: &Node, depth: u64) -> u64 {
            match node {
                Node::Leaf { freq, .. } => depth * freq,
                Node::Internal { left, right, .. } => {
                    walk(left, depth + 1) + walk(right, depth + 1)
                }
            }
        }
        walk(&self.root, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_depth(node: &Node, target: Symbol, depth: usize) -> Option<usize> {
        match node {
            Node::Leaf { symbol, .. } => (*symbol == target).then_some(depth),
            Node::Internal { left, right, .. } => leaf_depth(left, target, depth + 1)
                .or_else(|| leaf_depth(right, target, depth + 1)),
        }
    }

    #[test]
    fn counts_every_byte() {
        let table = FrequencyTable::from_bytes(b"abracadabra");

        assert_eq!(table.get(b'a'), 5);
        assert_eq!(table.get(b'b'), 2);
        assert_eq!(table.get(b'r'), 2);
        assert_eq!(table.get(b'c'), 1);
        assert_eq!(table.get(b'd'), 1);
        assert_eq!(table.get(b'z'), 0);
        assert_eq!(table.total(), 11);
        assert_eq!(table.distinct_symbols(), 5);
        assert_eq!(table.iter().count(), ALPHABET_SIZE);
    }

    #[test]
    fn entropy_of_uniform_pair_is_one_bit() {
        let table = FrequencyTable::from_bytes(b"abababab");
        assert!((table.entropy() - 1.0).abs() < 1e-12);
        assert_eq!(FrequencyTable::new().entropy(), 0.0);
    }

    #[test]
    fn tree_holds_every_symbol() {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(b"abracadabra")).unwrap();

        assert_eq!(tree.leaf_count(), ALPHABET_SIZE);
        assert_eq!(tree.root().freq(), 11);
        assert!(!tree.root().is_leaf());
    }

    #[test]
    fn internal_weight_is_sum_of_children() {
        fn check(node: &Node) {
            if let Node::Internal { freq, left, right } = node {
                assert_eq!(*freq, left.freq() + right.freq());
                check(left);
                check(right);
            }
        }

        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(b"mississippi river")).unwrap();
        check(tree.root());
    }

    #[test]
    fn frequent_symbols_sit_higher() {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(b"abracadabra")).unwrap();
        let depth = |symbol| leaf_depth(tree.root(), symbol, 0).unwrap();

        assert!(depth(b'a') <= depth(b'b'));
        assert!(depth(b'a') <= depth(b'r'));
        assert!(depth(b'b') <= depth(b'c'));
        assert!(depth(b'r') <= depth(b'd'));
    }

    #[test]
    fn empty_table_still_builds() {
        let tree = HuffmanTree::build(&FrequencyTable::new()).unwrap();

        assert_eq!(tree.root().freq(), 0);
        assert_eq!(tree.leaf_count(), ALPHABET_SIZE);
        assert_eq!(tree.weighted_path_length(), 0);
    }

    #[test]
    fn same_table_builds_same_tree() {
        let table = FrequencyTable::from_bytes(b"the quick brown fox jumps over the lazy dog");
        assert_eq!(HuffmanTree::build(&table).unwrap(), HuffmanTree::build(&table).unwrap());
    }
}
