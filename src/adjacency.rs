use rustc_hash::FxHashSet;

use crate::{shape::Triangle, triangles::TriangleId, KirkpatrickError, PointId};

/// Live stars: for every point, the ids of the triangles currently incident
/// to it. A triangle is live iff it still appears in its vertices' stars.
///
/// Only used while the hierarchy is being built.
#[derive(Debug, Clone)]
pub struct Adjacency {
    stars: Vec<FxHashSet<TriangleId>>,
}

impl Adjacency {
    pub fn new(point_size: usize) -> Self {
        Self {
            stars: vec![FxHashSet::default(); point_size],
        }
    }

    /// register a live triangle with its three vertices
    pub fn insert(&mut self, triangle: &Triangle<PointId>, id: TriangleId) {
        for p in triangle.vertices() {
            self.stars[p.as_usize()].insert(id);
        }
    }

    /// number of live triangles around `point`
    pub fn degree(&self, point: PointId) -> usize {
        self.stars[point.as_usize()].len()
    }

    /// star of `point`, sorted by id so removal order is reproducible
    pub fn star(&self, point: PointId) -> Vec<TriangleId> {
        let mut star: Vec<TriangleId> = self.stars[point.as_usize()].iter().copied().collect();
        star.sort_unstable();
        star
    }

    /// drop a dying triangle from the star of `point`
    pub fn detach(&mut self, point: PointId, id: TriangleId) -> Result<(), KirkpatrickError> {
        if self.stars[point.as_usize()].remove(&id) {
            Ok(())
        } else {
            Err(KirkpatrickError::MissingAdjacency {
                vertex: point.as_usize(),
                triangle: id.as_usize(),
            })
        }
    }

    /// forget the whole star of a removed point
    pub fn clear(&mut self, point: PointId) {
        self.stars[point.as_usize()].clear();
    }
}
