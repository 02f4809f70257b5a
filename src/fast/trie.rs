//! Byte tries for anchored literal groups.

use ahash::AHashMap;

/// Trie node stored in an arena.
#[derive(Debug, Default)]
struct Node {
    children: AHashMap<u8, usize>,
    /// Ordinals of rules whose literal ends here, whatever follows
    open: Vec<usize>,
    /// Ordinals of rules whose literal ends here and must end the URL too
    terminal: Vec<usize>,
}

/// Direction a trie consumes its input in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// From the first byte (prefix rules)
    Forward,
    /// From the last byte (suffix rules)
    Backward,
}

/// ByteTrie indexes anchored literals by their leading (or trailing) bytes.
///
/// Walking a URL through the trie visits every stored literal that is a
/// prefix (or suffix) of it in one pass, so the cost depends on the URL
/// length, not on the number of literals.
#[derive(Debug)]
pub(crate) struct ByteTrie {
    nodes: Vec<Node>,
    direction: Direction,
    case_insensitive: bool,
    len: usize,
}

impl ByteTrie {
    pub(crate) fn new(direction: Direction, case_insensitive: bool) -> Self {
        Self {
            nodes: vec![Node::default()],
            direction,
            case_insensitive,
            len: 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a literal for a rule ordinal.
    ///
    /// Ordinals must be inserted in ascending order so every node list stays sorted.
    /// A `terminal` literal only matches when it spans the whole input.
    pub(crate) fn insert(&mut self, literal: &[u8], ordinal: usize, terminal: bool) {
        let mut node = 0;
        for i in 0..literal.len() {
            let byte = self.fold(self.byte_at(literal, i));
            let existing = self.nodes[node].children.get(&byte).copied();
            node = match existing {
                Some(next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[node].children.insert(byte, next);
                    next
                }
            };
        }

        let list = if terminal {
            &mut self.nodes[node].terminal
        } else {
            &mut self.nodes[node].open
        };
        debug_assert!(list.last().map_or(true, |&last| last < ordinal));
        list.push(ordinal);
        self.len += 1;
    }

    /// Walk `input` and hand every matching ordinal list to `visit`.
    ///
    /// Lists are visited shortest literal first. `visit` returns `false` to stop early.
    pub(crate) fn walk(&self, input: &[u8], mut visit: impl FnMut(&[usize]) -> bool) {
        let mut node = &self.nodes[0];
        if !node.open.is_empty() && !visit(&node.open) {
            return;
        }

        for i in 0..input.len() {
            let byte = self.fold(self.byte_at(input, i));
            match node.children.get(&byte) {
                Some(&next) => node = &self.nodes[next],
                None => return,
            }
            if !node.open.is_empty() && !visit(&node.open) {
                return;
            }
        }

        if !node.terminal.is_empty() {
            visit(&node.terminal);
        }
    }

    #[inline]
    fn byte_at(&self, bytes: &[u8], i: usize) -> u8 {
        match self.direction {
            Direction::Forward => bytes[i],
            Direction::Backward => bytes[bytes.len() - 1 - i],
        }
    }

    #[inline]
    fn fold(&self, byte: u8) -> u8 {
        if self.case_insensitive {
            byte.to_ascii_lowercase()
        } else {
            byte
        }
    }
}
