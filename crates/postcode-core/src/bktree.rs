// crates/postcode-core/src/bktree.rs

//! # BK-Tree Index
//!
//! A Burkhard-Keller tree over normalized codes, keyed by Levenshtein
//! distance.
//!
//! **Invariant:** a child recorded under distance `d` of node `N` is at edit
//! distance exactly `d` from *N's* code (not from the root). Insertion keeps
//! this at every level by re-measuring against each node it walks through.
//!
//! Radius search uses the triangle inequality: if the query is at distance
//! `d` from `N`, only children under distances `d - r ..= d + r` can hold a
//! code within `r` of the query. Everything else is pruned without being
//! measured.
//!
//! Storage is an arena of nodes with `u32` ids. Each node's children are a
//! small `Vec` sorted by distance (fan-out is bounded by the maximum code
//! length), so the pruning window is found with two binary searches.

use crate::distance::levenshtein;
use crate::normalize::NormalizedCode;
use serde::{Deserialize, Serialize};

type NodeId = u32;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct BkNode {
    code: NormalizedCode,
    /// `(distance, child)` sorted by distance, distances unique.
    children: Vec<(u32, NodeId)>,
}

impl BkNode {
    fn child_at(&self, distance: u32) -> Result<NodeId, usize> {
        self.children
            .binary_search_by_key(&distance, |&(d, _)| d)
            .map(|pos| self.children[pos].1)
    }
}

/// A code found by [`BkTree::search`], borrowed from the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BkMatch<'a> {
    pub code: &'a NormalizedCode,
    pub distance: usize,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BkTree {
    /// `nodes[0]` is the root when non-empty.
    nodes: Vec<BkNode>,
}

impl BkTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Inserts `code`; returns `false` if it was already present.
    pub fn insert(&mut self, code: NormalizedCode) -> bool {
        if self.nodes.is_empty() {
            self.nodes.push(BkNode {
                code,
                children: Vec::new(),
            });
            return true;
        }

        let mut current: NodeId = 0;
        loop {
            let node = &self.nodes[current as usize];
            let d = levenshtein(node.code.as_str(), code.as_str()) as u32;
            if d == 0 {
                return false;
            }
            match node.child_at(d) {
                Ok(child) => current = child,
                Err(pos) => {
                    let id = self.nodes.len() as NodeId;
                    self.nodes[current as usize].children.insert(pos, (d, id));
                    self.nodes.push(BkNode {
                        code,
                        children: Vec::new(),
                    });
                    return true;
                }
            }
        }
    }

    /// All codes within `radius` of `query`, in no particular order.
    pub fn search(&self, query: &NormalizedCode, radius: usize) -> Vec<BkMatch<'_>> {
        let mut out = Vec::new();
        self.search_with(query, radius, |m| out.push(m));
        out
    }

    /// Radius search feeding each hit to `emit`. Returns the number of
    /// nodes whose distance was computed (the search cost).
    pub fn search_with<'a>(
        &'a self,
        query: &NormalizedCode,
        radius: usize,
        mut emit: impl FnMut(BkMatch<'a>),
    ) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }

        let mut visited = 0usize;
        let mut stack: Vec<NodeId> = vec![0];

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id as usize];
            let d = levenshtein(node.code.as_str(), query.as_str());
            visited += 1;

            if d <= radius {
                emit(BkMatch {
                    code: &node.code,
                    distance: d,
                });
            }

            let lo = d.saturating_sub(radius) as u32;
            let hi = (d + radius).min(u32::MAX as usize) as u32;
            let start = node.children.partition_point(|&(cd, _)| cd < lo);
            let end = node.children.partition_point(|&(cd, _)| cd <= hi);
            stack.extend(node.children[start..end].iter().map(|&(_, child)| child));
        }

        visited
    }

    /// Every stored code, in insertion order.
    pub fn codes(&self) -> impl Iterator<Item = &NormalizedCode> + '_ {
        self.nodes.iter().map(|n| &n.code)
    }

    /// Height of the tree (0 when empty, 1 for a lone root).
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let mut max = 0;
        let mut stack = vec![(0 as NodeId, 1usize)];
        while let Some((id, level)) = stack.pop() {
            max = max.max(level);
            for &(_, child) in &self.nodes[id as usize].children {
                stack.push((child, level + 1));
            }
        }
        max
    }

    /// Every child id points into the arena and every node is reached from
    /// the root exactly once. Searches index the arena unchecked, so a tree
    /// from outside the process must pass this first.
    pub fn is_well_formed(&self) -> bool {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack: Vec<NodeId> = Vec::new();
        if let Some(root) = seen.first_mut() {
            *root = true;
            stack.push(0);
        }
        let mut reached = stack.len();

        while let Some(id) = stack.pop() {
            for &(_, child) in &self.nodes[id as usize].children {
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
        reached == self.nodes.len()
    }

    #[cfg(test)]
    pub(crate) fn push_edge(&mut self, parent: NodeId, distance: u32, child: NodeId) {
        self.nodes[parent as usize].children.push((distance, child));
    }

    /// Re-measures every parent/child edge. O(n · L²); meant for tests and
    /// for validating a snapshot of unknown provenance.
    pub fn check_invariant(&self) -> bool {
        self.nodes.iter().all(|node| {
            node.children.windows(2).all(|w| w[0].0 < w[1].0)
                && node.children.iter().all(|&(d, child)| {
                    self.nodes.get(child as usize).is_some_and(|c| {
                        levenshtein(node.code.as_str(), c.code.as_str()) as u32 == d
                    })
                })
        })
    }
}
