// crates/postcode-core/src/trie.rs

//! # Trie Index
//!
//! Exact and prefix lookups over normalized codes.
//!
//! Nodes live in one contiguous arena and refer to their children by `u32`
//! id; ownership is strictly parent → child, there are no back-pointers
//! because every traversal starts at the root. Children are kept in a
//! `BTreeMap` so prefix enumeration is lexicographic and deterministic.

use crate::model::SearchCandidate;
use crate::normalize::NormalizedCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

type NodeId = u32;

const ROOT: NodeId = 0;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct TrieNode {
    children: BTreeMap<char, NodeId>,
    /// Display text of the code ending here; `Some` marks a terminal node.
    original: Option<String>,
}

/// Outcome of [`Trie::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrieInsert {
    /// New code.
    Inserted,
    /// Same code, same display text: nothing changed.
    Duplicate,
    /// Same code, different display text. The stored text is kept.
    Conflict { existing: String },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Trie {
    nodes: Vec<TrieNode>,
    len: usize,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            len: 0,
        }
    }

    /// Number of distinct codes stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of arena nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn insert(&mut self, code: &NormalizedCode, original: &str) -> TrieInsert {
        let mut node = ROOT;
        for ch in code.as_str().chars() {
            let next = self.nodes[node as usize].children.get(&ch).copied();
            node = match next {
                Some(child) => child,
                None => {
                    let child = self.nodes.len() as NodeId;
                    self.nodes.push(TrieNode::default());
                    self.nodes[node as usize].children.insert(ch, child);
                    child
                }
            };
        }

        let terminal = &mut self.nodes[node as usize];
        if let Some(existing) = &terminal.original {
            return if existing == original {
                TrieInsert::Duplicate
            } else {
                TrieInsert::Conflict {
                    existing: existing.clone(),
                }
            };
        }
        terminal.original = Some(original.to_owned());
        self.len += 1;
        TrieInsert::Inserted
    }

    /// O(len) lookup; a hit is a zero-distance candidate.
    pub fn exact_lookup(&self, code: &NormalizedCode) -> Option<SearchCandidate> {
        let original = self.original_text(code)?;
        Some(SearchCandidate::with_distance(code, code.clone(), original, 0))
    }

    /// Display text stored for `code`, if it was inserted.
    pub fn original_text(&self, code: &NormalizedCode) -> Option<&str> {
        let node = self.descend(code.as_str())?;
        self.nodes[node as usize].original.as_deref()
    }

    /// Up to `limit` codes starting with `prefix`, in lexicographic order,
    /// each measured against `prefix`.
    ///
    /// The walk stops as soon as `limit` codes are collected, so a very short
    /// prefix over millions of codes stays cheap.
    pub fn prefix_lookup(&self, prefix: &NormalizedCode, limit: usize) -> Vec<SearchCandidate> {
        let mut out = Vec::new();
        if limit == 0 {
            return out;
        }
        let Some(start) = self.descend(prefix.as_str()) else {
            return out;
        };

        // Explicit DFS; children are pushed in reverse so they pop in order.
        let mut key = prefix.as_str().to_owned();
        let mut stack: Vec<(NodeId, usize, Option<char>)> = vec![(start, key.len(), None)];

        while let Some((node, depth, edge)) = stack.pop() {
            key.truncate(depth);
            if let Some(ch) = edge {
                key.push(ch);
            }

            let n = &self.nodes[node as usize];
            if let Some(original) = &n.original {
                let code = NormalizedCode::from_normalized(key.clone());
                out.push(SearchCandidate::against(prefix, code, original));
                if out.len() >= limit {
                    break;
                }
            }

            let child_depth = key.len();
            for (&ch, &child) in n.children.iter().rev() {
                stack.push((child, child_depth, Some(ch)));
            }
        }

        out
    }

    /// Every stored `(code, original)` pair in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (NormalizedCode, &str)> + '_ {
        let mut stack: Vec<(NodeId, String)> = vec![(ROOT, String::new())];
        std::iter::from_fn(move || {
            while let Some((node, key)) = stack.pop() {
                let n = &self.nodes[node as usize];
                for (&ch, &child) in n.children.iter().rev() {
                    let mut next = key.clone();
                    next.push(ch);
                    stack.push((child, next));
                }
                if let Some(original) = &n.original {
                    return Some((NormalizedCode::from_normalized(key), original.as_str()));
                }
            }
            None
        })
    }

    /// The root exists, every child id points into the arena, every node
    /// has exactly one parent and the terminal count matches `len`.
    pub fn is_well_formed(&self) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        let mut seen = vec![false; self.nodes.len()];
        seen[ROOT as usize] = true;
        let mut stack = vec![ROOT];
        let mut reached = 1;
        let mut terminals = 0;

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id as usize];
            terminals += usize::from(node.original.is_some());
            for &child in node.children.values() {
                match seen.get_mut(child as usize) {
                    Some(s) if !*s => {
                        *s = true;
                        reached += 1;
                        stack.push(child);
                    }
                    _ => return false,
                }
            }
        }
        reached == self.nodes.len() && terminals == self.len
    }

    fn descend(&self, key: &str) -> Option<NodeId> {
        let mut node = ROOT;
        for ch in key.chars() {
            node = *self.nodes[node as usize].children.get(&ch)?;
        }
        Some(node)
    }
}
