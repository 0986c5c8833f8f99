use serde::{Deserialize, Serialize};

use crate::shared::rect::Rect;

/// The two independent vertex sets of the bipartite graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphSet {
    GroundTruth,
    Hypothesis,
}

impl GraphSet {
    pub fn opposite(&self) -> GraphSet {
        match self {
            GraphSet::GroundTruth => GraphSet::Hypothesis,
            GraphSet::Hypothesis => GraphSet::GroundTruth,
        }
    }
}

impl std::fmt::Display for GraphSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphSet::GroundTruth => write!(f, "ground truth"),
            GraphSet::Hypothesis => write!(f, "hypothesis"),
        }
    }
}

/// Handle to a vertex: its set plus its position in that set's array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexId {
    pub set: GraphSet,
    pub index: usize,
}

impl VertexId {
    pub fn new(set: GraphSet, index: usize) -> Self {
        Self { set, index }
    }
}

/// One endpoint's record of an overlap with a vertex of the other set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub opposite: VertexId,
    pub overlap_area: u64,
    /// Matching foreground pixels inside the overlap counted for this edge.
    pub intersecting_foreground_pixels: u64,
    /// Matching pixels inside the overlap already claimed by another edge.
    pub intersecting_foreground_duplicate: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    pub rect: Rect,
    pub area: u64,
    pub foreground_pixels: u64,
    /// Foreground pixels of this rectangle already attributed to an
    /// earlier rectangle of the same set.
    pub foreground_pixels_duplicate: u64,
    /// Matching pixels of the duplicate part that also lie inside an
    /// overlap with the other set. Set by the edge builder.
    pub matched_duplicate_pixels: u64,
    pub set: GraphSet,
    pub index: usize,
    pub edges: Vec<Edge>,
}

impl Vertex {
    pub fn id(&self) -> VertexId {
        VertexId::new(self.set, self.index)
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    pub fn matched_pixels(&self) -> u64 {
        self.edges.iter().map(|e| e.intersecting_foreground_pixels).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex_with_edges(edges: Vec<Edge>) -> Vertex {
        Vertex {
            rect: Rect::new(0, 0, 10, 10),
            area: 100,
            foreground_pixels: 60,
            foreground_pixels_duplicate: 0,
            matched_duplicate_pixels: 0,
            set: GraphSet::Hypothesis,
            index: 3,
            edges,
        }
    }

    fn edge(gt_index: usize, pixels: u64, dup: u64) -> Edge {
        Edge {
            opposite: VertexId::new(GraphSet::GroundTruth, gt_index),
            overlap_area: 50,
            intersecting_foreground_pixels: pixels,
            intersecting_foreground_duplicate: dup,
        }
    }

    #[test]
    fn test_opposite_set() {
        assert_eq!(GraphSet::GroundTruth.opposite(), GraphSet::Hypothesis);
        assert_eq!(GraphSet::Hypothesis.opposite(), GraphSet::GroundTruth);
    }

    #[test]
    fn test_id_and_degree() {
        let v = vertex_with_edges(vec![edge(0, 10, 0), edge(1, 5, 2)]);
        assert_eq!(v.id(), VertexId::new(GraphSet::Hypothesis, 3));
        assert_eq!(v.degree(), 2);
    }

    #[test]
    fn test_matched_pixels_ignore_edge_duplicates() {
        let v = vertex_with_edges(vec![edge(0, 10, 1), edge(1, 5, 2)]);
        assert_eq!(v.matched_pixels(), 15);
    }

    #[test]
    fn test_isolated_vertex() {
        let v = vertex_with_edges(vec![]);
        assert_eq!(v.degree(), 0);
        assert_eq!(v.matched_pixels(), 0);
    }
}
