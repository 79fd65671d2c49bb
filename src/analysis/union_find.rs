// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Disjoint-set forest over triangle indices

/// Union-find with path compression.
///
/// `union` always hangs the larger root under the smaller one, so the root of
/// a set is its smallest member. Owned by a single analysis call.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root of `x`, compressing the path on the way
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }

        root
    }

    /// Merge the sets of `a` and `b`; returns false if already joined
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        let (keep, hang) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent[hang] = keep;
        true
    }

    /// Resolved root of every element
    pub fn roots(&mut self) -> Vec<usize> {
        (0..self.len()).map(|i| self.find(i)).collect()
    }
}
