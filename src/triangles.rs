use smallvec::SmallVec;

use crate::{shape::Triangle, PointId};

#[derive(Debug, Hash, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TriangleId(usize);

impl TriangleId {
    /// The enclosing triangle every query starts from.
    pub const ROOT: TriangleId = TriangleId(0);

    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl From<TriangleId> for usize {
    fn from(id: TriangleId) -> Self {
        id.0
    }
}

/// Children lists stay short: a new triangle overlaps at most the star it
/// replaced, and stars are bounded by the degree threshold.
pub type Children = SmallVec<[TriangleId; 4]>;

/// Search DAG of the refinement hierarchy.
///
/// Triangles are appended and never removed; ids are creation order and
/// [`TriangleId::ROOT`] is always the enclosing triangle. An edge points from a
/// coarser triangle to an older, finer triangle it overlaps, so a triangle
/// without children belongs to the finest triangulation.
// Note: For n polygon vertices the graph holds O(n) triangles, since every
//       removal adds a constant number of them.
#[derive(Debug, Clone)]
pub struct SearchGraph {
    triangles: Vec<Triangle<PointId>>,
    edges: Vec<Children>,
}

impl SearchGraph {
    pub(crate) fn with_root(root: Triangle<PointId>) -> Self {
        Self {
            triangles: vec![root],
            edges: vec![Children::new()],
        }
    }

    /// append a new triangle
    pub(crate) fn insert(&mut self, triangle: Triangle<PointId>) -> TriangleId {
        let id = TriangleId(self.triangles.len());
        self.triangles.push(triangle);
        self.edges.push(Children::new());
        id
    }

    pub(crate) fn add_edge(&mut self, from: TriangleId, to: TriangleId) {
        self.edges[from.0].push(to);
    }

    pub fn root(&self) -> &Triangle<PointId> {
        &self.triangles[TriangleId::ROOT.0]
    }

    pub fn get(&self, id: TriangleId) -> Option<&Triangle<PointId>> {
        self.triangles.get(id.0)
    }

    /// outgoing edges in the order queries try them; empty for unknown ids
    pub fn children(&self, id: TriangleId) -> &[TriangleId] {
        self.edges.get(id.0).map_or(&[], |e| e.as_slice())
    }

    /// whether `id` is a triangle of the finest triangulation
    pub fn is_leaf(&self, id: TriangleId) -> bool {
        self.edges.get(id.0).is_some_and(|e| e.is_empty())
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TriangleId, &Triangle<PointId>)> {
        self.triangles
            .iter()
            .enumerate()
            .map(|(idx, t)| (TriangleId(idx), t))
    }

    pub fn leaves(&self) -> impl Iterator<Item = (TriangleId, &Triangle<PointId>)> {
        self.iter().filter(|(id, _)| self.is_leaf(*id))
    }

    /// Number of triangles on the longest root-to-leaf path.
    ///
    /// Every edge except the root's points to a smaller id, so one ascending
    /// pass settles all non-root depths before the root is evaluated.
    pub fn depth(&self) -> usize {
        let mut depth = vec![1usize; self.len()];
        let deepest = |depth: &[usize], children: &[TriangleId]| {
            children.iter().map(|c| depth[c.0]).max().unwrap_or(0)
        };

        for idx in 1..self.len() {
            let below = deepest(&depth, &self.edges[idx]);
            depth[idx] += below;
        }

        1 + deepest(&depth, &self.edges[0])
    }
}
