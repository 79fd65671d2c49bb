// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! BFS spanning forest over the dual graph
//!
//! Edges picked by the forest are hinges; every other dual edge is a cut.

use super::dual::DualGraph;
use super::merge::{FaceId, PolyFace};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One face in the spanning forest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HingeNode {
    pub face: FaceId,
    /// Position of `face` in the face list
    pub slot: usize,
    /// `None` for a root
    pub parent: Option<FaceId>,
    /// Dual edge connecting to the parent, `None` for a root
    pub hinge: Option<usize>,
    /// Child node indices
    pub children: Vec<usize>,
    pub depth: usize,
}

impl HingeNode {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// One BFS tree per connected component of the dual graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpanningForest {
    nodes: Vec<HingeNode>,
    roots: Vec<usize>,
    /// Face slot to node index
    node_of: Vec<usize>,
    /// Per dual edge: selected as a hinge
    hinges: Vec<bool>,
}

impl SpanningForest {
    /// Root a tree at every unvisited face in face order and grow it
    /// breadth-first, visiting neighbours in dual edge insertion order
    pub fn build(faces: &[PolyFace], dual: &DualGraph) -> Self {
        let mut forest = Self {
            nodes: Vec::with_capacity(faces.len()),
            roots: Vec::new(),
            node_of: vec![usize::MAX; faces.len()],
            hinges: vec![false; dual.edge_count()],
        };
        let mut queue = VecDeque::new();

        for start in 0..faces.len() {
            if forest.node_of[start] != usize::MAX {
                continue;
            }
            let root = forest.push_node(faces, start, None, None, 0);
            forest.roots.push(root);
            queue.push_back(root);

            while let Some(node) = queue.pop_front() {
                let slot = forest.nodes[node].slot;
                let depth = forest.nodes[node].depth;
                for adjacent in dual.neighbors(slot) {
                    if forest.node_of[adjacent.slot] != usize::MAX {
                        continue;
                    }
                    let child = forest.push_node(
                        faces,
                        adjacent.slot,
                        Some(faces[slot].id),
                        Some(adjacent.edge),
                        depth + 1,
                    );
                    forest.hinges[adjacent.edge] = true;
                    forest.nodes[node].children.push(child);
                    queue.push_back(child);
                }
            }
        }

        forest
    }

    fn push_node(
        &mut self,
        faces: &[PolyFace],
        slot: usize,
        parent: Option<FaceId>,
        hinge: Option<usize>,
        depth: usize,
    ) -> usize {
        let index = self.nodes.len();
        self.nodes.push(HingeNode {
            face: faces[slot].id,
            slot,
            parent,
            hinge,
            children: Vec::new(),
            depth,
        });
        self.node_of[slot] = index;
        index
    }

    pub fn nodes(&self) -> &[HingeNode] {
        &self.nodes
    }

    #[cfg(test)]
    pub(crate) fn nodes_mut(&mut self) -> &mut [HingeNode] {
        &mut self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&HingeNode> {
        self.nodes.get(index)
    }

    /// Node holding the face at `slot`
    pub fn node_for_slot(&self, slot: usize) -> Option<&HingeNode> {
        self.node_of.get(slot).and_then(|&i| self.nodes.get(i))
    }

    /// Root node indices, one per component
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn component_count(&self) -> usize {
        self.roots.len()
    }

    pub fn is_hinge(&self, edge: usize) -> bool {
        self.hinges.get(edge).copied().unwrap_or(false)
    }

    pub fn hinge_count(&self) -> usize {
        self.hinges.iter().filter(|&&h| h).count()
    }

    /// Dual edge indices selected as hinges
    pub fn hinge_edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.hinges
            .iter()
            .enumerate()
            .filter(|(_, &h)| h)
            .map(|(i, _)| i)
    }

    /// Dual edge indices the net is cut along
    pub fn cut_edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.hinges
            .iter()
            .enumerate()
            .filter(|(_, &h)| !h)
            .map(|(i, _)| i)
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Pre-order walk of the tree under `root`, parents before children
    pub fn preorder_from(&self, root: usize) -> Vec<usize> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            let Some(entry) = self.nodes.get(node) else {
                continue;
            };
            order.push(node);
            // Reversed so the first child is visited first
            stack.extend(entry.children.iter().rev());
        }
        order
    }

    /// Pre-order walk of the whole forest, tree by tree
    pub fn preorder(&self) -> Vec<usize> {
        self.roots
            .iter()
            .flat_map(|&root| self.preorder_from(root))
            .collect()
    }
}
