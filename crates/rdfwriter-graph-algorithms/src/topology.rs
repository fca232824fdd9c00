//! Graph topology: linearization and cycle membership
//!
//! Both traversals run on an explicit stack so that very deep chains cannot
//! exhaust the call stack.

use super::common::GraphView;

/// Depth-first post-order over every node of the view.
///
/// DFS starts from each unvisited node in ascending index order and follows
/// successors in edge order. A node is emitted only after all of its
/// first-visited descendants, so the result is "deepest first". Already
/// visited nodes are skipped, which makes the traversal terminate on cycles
/// without reporting them.
pub fn linearize(view: &GraphView) -> Vec<usize> {
    let n = view.node_count;
    let mut order = Vec::with_capacity(n);
    let mut visited = vec![false; n];
    // (node, index of the next successor to look at)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        stack.push((start, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            let successors = view.successors(node);
            if next < successors.len() {
                frame.1 += 1;
                let child = successors[next];
                if !visited[child] {
                    visited[child] = true;
                    stack.push((child, 0));
                }
            } else {
                order.push(node);
                stack.pop();
            }
        }
    }

    order
}

/// Whether `start` can reach itself through one or more edges.
pub fn on_cycle(view: &GraphView, start: usize) -> bool {
    let mut visited = vec![false; view.node_count];
    let mut stack: Vec<usize> = view.successors(start).to_vec();

    while let Some(node) = stack.pop() {
        if node == start {
            return true;
        }
        if visited[node] {
            continue;
        }
        visited[node] = true;
        stack.extend_from_slice(view.successors(node));
    }

    false
}
