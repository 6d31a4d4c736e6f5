//! Connected components over duplicate edges

use crate::candidates::SimilarityEdge;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// One connected component of the duplicate graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cluster {
    /// 1-based, in order of each cluster's smallest member index
    pub group_id: usize,
    /// Member record indices, ascending; always at least two
    pub members: Vec<usize>,
}

impl Cluster {
    /// Number of member records
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for clusters built from edges
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether record `index` belongs to this cluster
    pub fn contains(&self, index: usize) -> bool {
        self.members.binary_search(&index).is_ok()
    }
}

/// Extract connected components from the edge set
///
/// Nodes are exactly the indices touched by an edge, so records without a
/// match never appear. Traversal starts from the smallest unvisited index,
/// which makes group numbering reproducible.
pub fn build_clusters(edges: &[SimilarityEdge]) -> Vec<Cluster> {
    let mut adjacency: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for edge in edges {
        adjacency.entry(edge.index_a).or_default().push(edge.index_b);
        adjacency.entry(edge.index_b).or_default().push(edge.index_a);
    }

    let mut visited: HashSet<usize> = HashSet::with_capacity(adjacency.len());
    let mut clusters = Vec::new();

    for &start in adjacency.keys() {
        if visited.contains(&start) {
            continue;
        }

        let mut members = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            members.push(current);
            if let Some(neighbors) = adjacency.get(&current) {
                stack.extend(neighbors.iter().filter(|&n| !visited.contains(n)));
            }
        }

        members.sort_unstable();
        clusters.push(Cluster {
            group_id: clusters.len() + 1,
            members,
        });
    }

    clusters
}
