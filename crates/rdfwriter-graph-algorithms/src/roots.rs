//! Root detection
//!
//! A root is a node that is never the object of an edge coming from some
//! other node. Roots become the top-level elements of a serialized document.

use super::common::GraphView;

/// Result of root detection
#[derive(Debug, Clone)]
pub struct RootSet {
    /// Dense indices of root nodes, ascending
    pub roots: Vec<usize>,
    /// First recorded parent of every node (None for roots)
    pub parent: Vec<Option<usize>>,
    /// Weakly connected component representative of every node
    pub component: Vec<usize>,
}

impl RootSet {
    /// Whether the dense node `idx` is a root
    pub fn is_root(&self, idx: usize) -> bool {
        self.parent[idx].is_none()
    }

    /// Number of distinct weakly connected components
    pub fn component_count(&self) -> usize {
        let mut seen: Vec<usize> = self.component.clone();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }
}

/// Disjoint set that remembers, next to the usual union-find forest, the
/// first subject that ever claimed each node as its object.
struct ParentForest {
    set: Vec<usize>,
    rank: Vec<usize>,
    parent: Vec<Option<usize>>,
}

impl ParentForest {
    fn new(size: usize) -> Self {
        ParentForest {
            set: (0..size).collect(),
            rank: vec![0; size],
            parent: vec![None; size],
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.set[root] != root {
            root = self.set[root];
        }
        // Path compression
        let mut curr = i;
        while self.set[curr] != root {
            let next = self.set[curr];
            self.set[curr] = root;
            curr = next;
        }
        root
    }

    /// Record the edge `subject -> object`.
    fn union(&mut self, subject: usize, object: usize) {
        if subject != object && self.parent[object].is_none() {
            self.parent[object] = Some(subject);
        }

        let root_s = self.find(subject);
        let root_o = self.find(object);
        if root_s == root_o {
            return;
        }
        if self.rank[root_s] < self.rank[root_o] {
            self.set[root_s] = root_o;
        } else if self.rank[root_s] > self.rank[root_o] {
            self.set[root_o] = root_s;
        } else {
            self.set[root_o] = root_s;
            self.rank[root_s] += 1;
        }
    }
}

/// Find every node with no incoming edge from another node.
///
/// Self-loops do not count as a parent. Nodes on a cycle always have a parent,
/// so a component that is one big cycle has no root at all.
pub fn find_roots(view: &GraphView) -> RootSet {
    let n = view.node_count;
    let mut forest = ParentForest::new(n);

    for subject in 0..n {
        for &object in view.successors(subject) {
            forest.union(subject, object);
        }
    }

    let component = (0..n).map(|i| forest.find(i)).collect();
    let roots = (0..n).filter(|&i| forest.parent[i].is_none()).collect();

    RootSet {
        roots,
        parent: forest.parent,
        component,
    }
}
