//! Compressed trie holding every active command word.
//!
//! Nodes live in a single arena and refer to each other by [`NodeId`]. Each
//! node carries an edge label; the concatenated labels along a path spell a
//! command word. A node reached at the end of a word may carry a [`Leaf`]
//! (the word completes a command) and/or a word-root, the entry point of a
//! sub-trie holding the next word of longer commands.
//!
//! # Key Features
//!
//! - **Edge splitting**: inserting a word that diverges inside an edge splits
//!   the edge with [`Dictionary::split_at`]
//! - **Mask union**: each node's mask is the union of the masks of every
//!   command beneath it, so a search can prune whole subtrees
//! - **Hidden propagation**: a node is hidden only when every command beneath
//!   it is hidden
//! - **Fallible growth**: arena growth uses `try_reserve`, so allocation
//!   failure is reported instead of aborting

use log::{debug, log_enabled, trace, Level};

use crate::command::CommandKey;
use crate::error::{Error, Result};

/// Index of a node in the dictionary arena.
pub type NodeId = usize;

/// Access mask. A command is visible to a caller whose mask shares at least
/// one bit with it.
pub type Mask = u64;

/// Caller mask that sees every command.
pub const UNLOCK_ALL: Mask = Mask::MAX;

/// Mask given to commands that do not specify one.
pub const DEFAULT_MASK: Mask = 1;

/// The dictionary root. It always exists and has an empty label.
pub const ROOT: NodeId = 0;

/// Reference from a trie node to the command it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaf {
    pub command: CommandKey,
    pub mask: Mask,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrieNode {
    pub(crate) label: String,
    pub(crate) mask: Mask,
    pub(crate) hidden: bool,
    pub(crate) leaf: Option<Leaf>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) word_root: Option<NodeId>,
}

impl TrieNode {
    fn new(label: &str, mask: Mask, hidden: bool) -> Self {
        Self {
            label: label.to_string(),
            mask,
            hidden,
            leaf: None,
            children: Vec::new(),
            word_root: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn mask(&self) -> Mask {
        self.mask
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    pub fn leaf(&self) -> Option<&Leaf> {
        self.leaf.as_ref()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn word_root(&self) -> Option<NodeId> {
        self.word_root
    }

    /// Whether a search with `mask` may pass through this node.
    pub fn visible(&self, mask: Mask, ignore_hidden: bool) -> bool {
        (self.mask & mask) != 0 && (ignore_hidden || !self.hidden)
    }
}

/// Byte length of the longest common prefix of `a` and `b`, always on a
/// character boundary of both.
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum()
}

#[derive(Debug, Clone)]
pub struct Dictionary {
    nodes: Vec<TrieNode>,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::new("", 0, true)],
        }
    }

    pub fn node(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id]
    }

    /// Number of nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when nothing has been inserted since the last clear.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Discards every node except a fresh root.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(TrieNode::new("", 0, true));
    }

    fn alloc(&mut self, node: TrieNode) -> Result<NodeId> {
        self.nodes.try_reserve(1)?;
        self.nodes.push(node);
        Ok(self.nodes.len() - 1)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let children = &mut self.nodes[parent].children;
        children.try_reserve(1)?;
        children.push(child);
        Ok(())
    }

    fn touch(&mut self, id: NodeId, mask: Mask, hidden: bool) {
        let node = &mut self.nodes[id];
        node.mask |= mask;
        node.hidden &= hidden;
    }

    fn append_child(&mut self, parent: NodeId, label: &str, mask: Mask, hidden: bool) -> Result<NodeId> {
        trace!("+node[{}] under {}", label, parent);
        let child = self.alloc(TrieNode::new(label, mask, hidden))?;
        self.attach(parent, child)?;
        Ok(child)
    }

    /// Splits the label of `node` at byte `offset`.
    ///
    /// `node` keeps the first part of the label. A new node takes the rest of
    /// the label together with the leaf, word-root and children of `node`,
    /// and becomes the only child of `node`. Mask and hidden flag are copied
    /// to both halves, since the set of commands beneath them is unchanged.
    ///
    /// `offset` must lie strictly inside the label, on a character boundary.
    ///
    /// # Returns
    ///
    /// `(prefix, suffix)` node ids.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DictionaryAllocation`] if the arena cannot grow.
    pub fn split_at(&mut self, node: NodeId, offset: usize) -> Result<(NodeId, NodeId)> {
        debug_assert!(offset > 0 && offset < self.nodes[node].label.len());
        self.nodes.try_reserve(1)?;

        let prefix = &mut self.nodes[node];
        trace!("split[{}] at {}", prefix.label, offset);
        let suffix = TrieNode {
            label: prefix.label.split_off(offset),
            mask: prefix.mask,
            hidden: prefix.hidden,
            leaf: prefix.leaf.take(),
            children: std::mem::take(&mut prefix.children),
            word_root: prefix.word_root.take(),
        };

        let suffix = self.alloc(suffix)?;
        self.attach(node, suffix)?;
        Ok((node, suffix))
    }

    /// Inserts `word` below `root` and returns the node where it ends.
    ///
    /// Every node on the path gets `mask` OR'd into its mask and `hidden`
    /// AND'ed into its hidden flag. Inserting a word that is already present
    /// returns the existing node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DictionaryAllocation`] if the arena cannot grow.
    pub fn insert(&mut self, root: NodeId, word: &str, mask: Mask, hidden: bool) -> Result<NodeId> {
        trace!("+word[{}] mask[{:#x}] hidden[{}]", word, mask, hidden);
        self.touch(root, mask, hidden);

        let mut parent = root;
        let mut rest = word;
        while let Some(first) = rest.chars().next() {
            let matching = self.nodes[parent]
                .children
                .iter()
                .copied()
                .find(|&child| self.nodes[child].label.starts_with(first));

            let Some(child) = matching else {
                return self.append_child(parent, rest, mask, hidden);
            };

            let common = common_prefix_len(&self.nodes[child].label, rest);
            if common < self.nodes[child].label.len() {
                self.split_at(child, common)?;
            }
            self.touch(child, mask, hidden);
            rest = &rest[common..];
            parent = child;
        }

        Ok(parent)
    }

    /// Returns the word-root of `node`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DictionaryAllocation`] if the arena cannot grow.
    pub fn add_word_root(&mut self, node: NodeId, mask: Mask, hidden: bool) -> Result<NodeId> {
        if let Some(word_root) = self.nodes[node].word_root {
            self.touch(word_root, mask, hidden);
            return Ok(word_root);
        }

        let word_root = self.alloc(TrieNode::new("", mask, hidden))?;
        self.nodes[node].word_root = Some(word_root);
        Ok(word_root)
    }

    /// Binds `leaf` to `node`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateCommand`] naming `words` if the node already
    /// completes another command.
    pub fn associate(&mut self, node: NodeId, leaf: Leaf, words: &str) -> Result<()> {
        let target = &mut self.nodes[node];
        if target.leaf.is_some() {
            return Err(Error::DuplicateCommand(words.to_string()));
        }
        target.leaf = Some(leaf);
        Ok(())
    }

    /// Writes the tree to the debug log.
    pub fn dump(&self) {
        if log_enabled!(Level::Debug) {
            self.dump_node(ROOT, 0);
        }
    }

    fn dump_node(&self, id: NodeId, level: usize) {
        let node = &self.nodes[id];
        debug!(
            "{:indent$}[{}] mask[{:#x}]{}{}",
            "",
            node.label,
            node.mask,
            if node.hidden { " hidden" } else { "" },
            if node.leaf.is_some() { " *" } else { "" },
            indent = level * 2
        );
        if let Some(word_root) = node.word_root {
            self.dump_node(word_root, level + 2);
        }
        for &child in &node.children {
            self.dump_node(child, level + 1);
        }
    }

    /// Follows `word` exactly from `root`, ignoring masks. Used by tests and
    /// diagnostics.
    pub fn lookup(&self, root: NodeId, word: &str) -> Option<NodeId> {
        let mut parent = root;
        let mut rest = word;
        while !rest.is_empty() {
            let child = self.nodes[parent]
                .children
                .iter()
                .copied()
                .find(|&child| rest.starts_with(self.nodes[child].label.as_str()))?;
            rest = &rest[self.nodes[child].label.len()..];
            parent = child;
        }
        Some(parent)
    }
}
