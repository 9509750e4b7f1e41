//! Bounded enumeration of connected vertex subsets.
//!
//! Uses the ESU scheme: every subset is grown only from its smallest vertex
//! and only through the exclusive neighborhood of the vertex just added, so
//! each connected subset of size `1..=limit` is produced exactly once.

use std::collections::BTreeSet;

/// Undirected graph over local indices `0..n`.
#[derive(Clone, Debug, Default)]
pub(crate) struct Adjacency {
    edges: Vec<BTreeSet<usize>>,
}

impl Adjacency {
    pub(crate) fn new(size: usize) -> Self {
        Self {
            edges: vec![BTreeSet::new(); size],
        }
    }

    pub(crate) fn connect(&mut self, a: usize, b: usize) {
        if a != b {
            self.edges[a].insert(b);
            self.edges[b].insert(a);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.edges.len()
    }

    fn neighbors(&self, vertex: usize) -> &BTreeSet<usize> {
        &self.edges[vertex]
    }
}

/// Calls `visit` once per connected subset with at most `limit` vertices.
///
/// `visit` returns whether supersets of the given subset are worth
/// exploring; returning `false` prunes that branch.
pub(crate) fn for_each_connected_subset<F>(graph: &Adjacency, limit: usize, mut visit: F)
where
    F: FnMut(&[usize]) -> bool,
{
    if limit == 0 {
        return;
    }
    for root in 0..graph.len() {
        let mut subset = vec![root];
        if !visit(&subset) {
            continue;
        }
        let extension: Vec<usize> = graph
            .neighbors(root)
            .iter()
            .copied()
            .filter(|&n| n > root)
            .collect();
        extend(graph, limit, root, &mut subset, extension, &mut visit);
    }
}

fn extend<F>(
    graph: &Adjacency,
    limit: usize,
    root: usize,
    subset: &mut Vec<usize>,
    mut extension: Vec<usize>,
    visit: &mut F,
) where
    F: FnMut(&[usize]) -> bool,
{
    if subset.len() == limit {
        return;
    }
    while let Some(next) = extension.pop() {
        let mut grown = extension.clone();
        for &candidate in graph.neighbors(next) {
            if candidate > root
                && !subset.contains(&candidate)
                && !grown.contains(&candidate)
                && !subset.iter().any(|&v| graph.neighbors(v).contains(&candidate))
            {
                grown.push(candidate);
            }
        }

        subset.push(next);
        if visit(subset) {
            extend(graph, limit, root, subset, grown, visit);
        }
        subset.pop();
    }
}
