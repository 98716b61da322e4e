use std::fmt;

use log::{debug, trace};

use crate::huffman::{ALPHABET_SIZE, FrequencyTable, HuffmanTree, Node, Symbol};

/// Path from the root to a leaf: `false` for left, `true` for right.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Code for each symbol that appears as a leaf of the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    pub fn derive(tree: &HuffmanTree) -> Self {
        let mut table = CodeTable {
            codes: vec![None; ALPHABET_SIZE],
        };

        match tree.root() {
            // a lone leaf still needs a non-empty code to be written at all
            Node::Leaf { symbol, .. } => table.assign(*symbol, vec![false]),
            root => {
                let mut path = Vec::new();
                table.walk(root, &mut path);
            }
        }

        debug!("Code table derived for {} symbols", table.len());
        table
    }

    fn walk(&mut self, node: &Node, path: &mut Vec<bool>) {
        match node {
            Node::Leaf { symbol, .. } => self.assign(*symbol, path.clone()),
            Node::Internal { left, right, .. } => {
                path.push(false);
                self.walk(left, path);
                path.pop();

                path.push(true);
                self.walk(right, path);
                path.pop();
            }
        }
    }

    fn assign(&mut self, symbol: Symbol, bits: Vec<bool>) {
        let code = Code { bits };
        trace!(
            "Assigning code to byte {:#04x} ('{}') : '{}'",
            symbol,
            (symbol as char).escape_default(),
            code
        );
        self.codes[symbol as usize] = Some(code);
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes[symbol as usize].as_ref()
    }

    /// Symbols with a code, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|code| (symbol as Symbol, code)))
    }

    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of bits needed to encode a message with these statistics.
    pub fn encoded_bit_len(&self, frequencies: &FrequencyTable) -> u64 {
        self.iter()
            .map(|(symbol, code)| code.len() as u64 * frequencies.get(symbol))
            .sum()
    }
}
