//! Directory Cost Tree
//!
//! Arena-backed directory tree annotated with rendered line costs. Nodes
//! own their children by id; there are no parent links. Cost updates walk
//! the root-to-node chain that the caller already holds.

use std::collections::BTreeMap;

use crate::constants::map::PLACEHOLDER_LINES;

pub type NodeId = usize;

pub const ROOT: NodeId = 0;

/// A file placed in the tree. `index` points back into the planner input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFile {
    pub index: usize,
    pub path: String,
    pub cost: usize,
    pub dropped: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DirNode {
    pub name: String,
    /// Root-relative directory path; empty for the root
    pub path: String,
    pub files: Vec<TreeFile>,
    pub children: BTreeMap<String, NodeId>,
    pub aggregate_cost: usize,
    pub truncated: bool,
}

impl DirNode {
    /// Cost of this directory's own files, ignoring subdirectories
    pub fn own_cost(&self) -> usize {
        if self.truncated {
            self.placeholder_cost()
        } else {
            self.files.iter().filter(|f| !f.dropped).map(|f| f.cost).sum()
        }
    }

    /// Cost if this directory were rendered as placeholders
    pub fn placeholder_cost(&self) -> usize {
        self.files.len() * PLACEHOLDER_LINES
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct DirTree {
    nodes: Vec<DirNode>,
}

impl Default for DirTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DirTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![DirNode::default()],
        }
    }

    pub fn node(&self, id: NodeId) -> &DirNode {
        &self.nodes[id]
    }

    pub fn root(&self) -> &DirNode {
        &self.nodes[ROOT]
    }

    pub fn total_cost(&self) -> usize {
        self.root().aggregate_cost
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Insert a file under its directory chain, creating nodes as needed.
    /// Costs are not updated until [`DirTree::recompute`].
    pub fn insert(&mut self, index: usize, path: &str, cost: usize) {
        let mut current = ROOT;
        let dir = path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");

        for part in dir.split('/').filter(|p| !p.is_empty() && *p != ".") {
            current = match self.nodes[current].children.get(part) {
                Some(&child) => child,
                None => {
                    let parent_path = &self.nodes[current].path;
                    let child_path = if parent_path.is_empty() {
                        part.to_string()
                    } else {
                        format!("{}/{}", parent_path, part)
                    };
                    let id = self.nodes.len();
                    self.nodes.push(DirNode {
                        name: part.to_string(),
                        path: child_path,
                        ..DirNode::default()
                    });
                    self.nodes[current].children.insert(part.to_string(), id);
                    id
                }
            };
        }

        self.nodes[current].files.push(TreeFile {
            index,
            path: path.to_string(),
            cost,
            dropped: false,
        });
    }

    /// Recompute every aggregate cost bottom-up.
    pub fn recompute(&mut self) -> usize {
        self.recompute_from(ROOT)
    }

    fn recompute_from(&mut self, id: NodeId) -> usize {
        let children: Vec<NodeId> = self.nodes[id].children.values().copied().collect();
        let nested: usize = children.into_iter().map(|c| self.recompute_from(c)).sum();
        let total = self.nodes[id].own_cost() + nested;
        self.nodes[id].aggregate_cost = total;
        total
    }

    /// Mark a leaf truncated. `chain` runs from the root to the leaf and
    /// receives the cost change, which is usually a reduction.
    pub fn truncate(&mut self, chain: &[NodeId]) {
        let Some(&leaf) = chain.last() else {
            return;
        };
        if self.nodes[leaf].truncated {
            return;
        }
        let before = self.nodes[leaf].own_cost();
        self.nodes[leaf].truncated = true;
        let after = self.nodes[leaf].own_cost();
        for &id in chain {
            let node = &mut self.nodes[id];
            node.aggregate_cost = node.aggregate_cost + after - before;
        }
    }

    /// Drop one file from a non-truncated directory.
    pub fn drop_file(&mut self, chain: &[NodeId], file: usize) {
        let Some(&dir) = chain.last() else {
            return;
        };
        if self.nodes[dir].truncated {
            return;
        }
        let entry = &mut self.nodes[dir].files[file];
        if entry.dropped {
            return;
        }
        entry.dropped = true;
        let saved = entry.cost;
        for &id in chain {
            self.nodes[id].aggregate_cost -= saved;
        }
    }

    /// Visit every node depth-first in path order with its root chain.
    pub fn walk<F: FnMut(&[NodeId], &DirNode)>(&self, mut visit: F) {
        let mut chain = vec![ROOT];
        self.walk_from(&mut chain, &mut visit);
    }

    fn walk_from<F: FnMut(&[NodeId], &DirNode)>(&self, chain: &mut Vec<NodeId>, visit: &mut F) {
        let Some(&id) = chain.last() else {
            return;
        };
        let node = &self.nodes[id];
        visit(chain, node);
        for &child in node.children.values() {
            chain.push(child);
            self.walk_from(chain, visit);
            chain.pop();
        }
    }
}
