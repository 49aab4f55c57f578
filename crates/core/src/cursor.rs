//! Traversal over a [`Dictionary`].
//!
//! A [`CommandCursor`] walks the trie one character at a time. It keeps a
//! stack of the nodes it descended into below its root, the byte offset
//! reached in the label of the current node, and the text matched so far.
//! The cursor only borrows the dictionary, so it can never outlive a
//! rebuild.
//!
//! # Key Features
//!
//! - **Search**: [`CommandCursor::find`] consumes a word, honoring masks and
//!   hidden nodes
//! - **Enumeration**: [`CommandCursor::next`] performs a depth-first walk of
//!   every path below the cursor
//! - **Multi-word commands**: [`CommandCursor::next_root`] hops from the end
//!   of one word into the sub-trie of the next
//! - **Branching**: [`CommandCursor::branch`] starts an independent cursor at
//!   the current position

use crate::dictionary::{Dictionary, Leaf, Mask, NodeId, ROOT};

#[derive(Debug, Clone)]
pub struct CommandCursor<'a> {
    dictionary: &'a Dictionary,
    root: NodeId,
    /// Offset in the root label where this cursor starts.
    root_offset: usize,
    stack: Vec<NodeId>,
    /// Offset in the label of the current node.
    offset: usize,
    word: String,
}

impl<'a> CommandCursor<'a> {
    /// Creates a cursor at the dictionary root.
    pub fn new(dictionary: &'a Dictionary) -> Self {
        Self::at(dictionary, ROOT, 0)
    }

    fn at(dictionary: &'a Dictionary, root: NodeId, root_offset: usize) -> Self {
        Self {
            dictionary,
            root,
            root_offset,
            stack: Vec::new(),
            offset: root_offset,
            word: String::new(),
        }
    }

    /// Creates a cursor rooted at the current position with no matched
    /// text. Enumerating it yields only the continuations of this cursor.
    pub fn branch(&self) -> Self {
        Self::at(self.dictionary, self.current(), self.offset)
    }

    /// The node the cursor is on.
    pub fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(self.root)
    }

    fn label(&self, node: NodeId) -> &'a str {
        self.dictionary.node(node).label()
    }

    /// Bytes of the current label that were matched by this cursor.
    fn contributed(&self) -> usize {
        if self.stack.is_empty() {
            self.offset - self.root_offset
        } else {
            self.offset
        }
    }

    fn parent(&self) -> NodeId {
        match self.stack.len() {
            0 | 1 => self.root,
            len => self.stack[len - 2],
        }
    }

    /// Sibling following the top of the stack.
    fn next_sibling(&self) -> Option<NodeId> {
        let top = *self.stack.last()?;
        let siblings = self.dictionary.node(self.parent()).children();
        let position = siblings.iter().position(|&n| n == top)?;
        siblings.get(position + 1).copied()
    }

    /// Text matched since the cursor was created or last rewound.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Unmatched rest of the current label.
    pub fn remainder(&self) -> &'a str {
        let label = self.label(self.current());
        label.get(self.offset..).unwrap_or("")
    }

    /// True when the current label is fully matched.
    pub fn end(&self) -> bool {
        self.remainder().is_empty()
    }

    pub fn leaf(&self) -> Option<&'a Leaf> {
        self.dictionary.node(self.current()).leaf()
    }

    /// Moves back to the cursor's root and forgets the matched text.
    pub fn rewind(&mut self) {
        self.stack.clear();
        self.word.clear();
        self.offset = self.root_offset;
    }

    fn visible(&self, node: NodeId, mask: Mask, ignore_hidden: bool) -> bool {
        self.dictionary.node(node).visible(mask, ignore_hidden)
    }

    /// Consumes `search` from the current position.
    ///
    /// Nodes whose mask does not intersect `mask`, or that are hidden unless
    /// `ignore_hidden` is set, cannot be entered. A mismatch on the first
    /// character of an edge tries the next sibling; a mismatch inside an
    /// edge fails.
    ///
    /// # Returns
    ///
    /// `true` if all of `search` was consumed and the cursor rests on a
    /// visible node. An empty `search` never matches.
    pub fn find(&mut self, search: &str, mask: Mask, ignore_hidden: bool) -> bool {
        if search.is_empty() {
            return false;
        }

        for c in search.chars() {
            loop {
                let node = self.current();
                let Some(next) = self.remainder().chars().next() else {
                    let first_child = self.dictionary.node(node).children().first().copied();
                    match first_child {
                        Some(child) if self.visible(node, mask, ignore_hidden) => {
                            self.stack.push(child);
                            self.offset = 0;
                            continue;
                        }
                        _ => return false,
                    }
                };

                if next == c && self.visible(node, mask, ignore_hidden) {
                    self.offset += c.len_utf8();
                    self.word.push(c);
                    break;
                }

                if self.offset > 0 || self.stack.is_empty() {
                    return false;
                }
                let Some(sibling) = self.next_sibling() else {
                    return false;
                };
                self.stack.pop();
                self.stack.push(sibling);
            }
        }

        self.visible(self.current(), mask, ignore_hidden)
    }

    /// Advances one step of a depth-first walk below the cursor's root.
    ///
    /// A step either consumes the rest of the current label, descends into
    /// the first child, or backtracks to the next unvisited sibling. When the
    /// walk is exhausted the matched text is cleared.
    ///
    /// # Returns
    ///
    /// `false` once every path has been visited.
    pub fn next(&mut self) -> bool {
        let remainder = self.remainder();
        if !remainder.is_empty() {
            self.word.push_str(remainder);
            self.offset += remainder.len();
            return true;
        }

        let node = self.current();
        if let Some(&child) = self.dictionary.node(node).children().first() {
            self.stack.push(child);
            self.offset = 0;
            return true;
        }

        loop {
            let trimmed = self.word.len().saturating_sub(self.contributed());
            self.word.truncate(trimmed);

            if self.stack.is_empty() {
                self.word.clear();
                self.offset = self.root_offset;
                return false;
            }

            if let Some(sibling) = self.next_sibling() {
                self.stack.pop();
                self.stack.push(sibling);
                self.offset = 0;
                return true;
            }

            self.stack.pop();
            self.offset = self.label(self.current()).len();
        }
    }

    /// Hops into the word-root of the current node.
    ///
    /// Only succeeds when the current label is fully matched. The cursor is
    /// re-rooted at the word-root with no matched text.
    pub fn next_root(&mut self) -> bool {
        if !self.end() {
            return false;
        }
        match self.dictionary.node(self.current()).word_root() {
            Some(word_root) => {
                self.root = word_root;
                self.root_offset = 0;
                self.rewind();
                true
            }
            None => false,
        }
    }

    /// Whether the current node completes a command visible with `mask`.
    pub fn command(&self, mask: Mask, ignore_hidden: bool) -> bool {
        let node = self.current();
        self.visible(node, mask, ignore_hidden)
            && self
                .leaf()
                .is_some_and(|leaf| (leaf.mask & mask) != 0 && (ignore_hidden || !leaf.hidden))
    }

    /// Whether the current node continues into another word.
    pub fn subword(&self, mask: Mask, ignore_hidden: bool) -> bool {
        let node = self.current();
        self.visible(node, mask, ignore_hidden)
            && self
                .dictionary
                .node(node)
                .word_root()
                .is_some_and(|root| self.visible(root, mask, ignore_hidden))
    }
}
