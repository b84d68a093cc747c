use rand::rngs::StdRng;

use crate::{
    adjacency::Adjacency,
    points::Points,
    shape::{Point, Triangle},
    triangles::{SearchGraph, TriangleId},
    PointId,
};

/// Mutable state threaded through one construction.
pub struct Context<'a> {
    pub points: &'a Points,
    pub graph: &'a mut SearchGraph,
    pub adjacency: &'a mut Adjacency,
    pub rng: StdRng,
    pub degree_threshold: usize,
}

impl<'a> Context<'a> {
    pub fn new(
        points: &'a Points,
        graph: &'a mut SearchGraph,
        adjacency: &'a mut Adjacency,
        rng: StdRng,
        degree_threshold: usize,
    ) -> Self {
        Self {
            points,
            graph,
            adjacency,
            rng,
            degree_threshold,
        }
    }

    pub fn resolve(&self, triangle: &Triangle<PointId>) -> Triangle<Point> {
        triangle.map(|id| self.points.point(*id))
    }

    /// Add a live triangle to the graph and to its vertices' stars.
    ///
    /// The last removal closes the hole down to the enclosure itself; that
    /// triangle is the root and is reused instead of stored twice.
    pub fn add_triangle(&mut self, triangle: Triangle<PointId>) -> TriangleId {
        let id = if triangle == *self.graph.root() {
            TriangleId::ROOT
        } else {
            self.graph.insert(triangle)
        };
        self.adjacency.insert(&triangle, id);
        id
    }

    /// Point `id` at every triangle of `replaced` it overlaps.
    pub fn link(&mut self, id: TriangleId, replaced: &[TriangleId]) {
        let Some(new) = self.graph.get(id).map(|t| self.resolve(t)) else {
            return;
        };
        for &old in replaced {
            let overlaps = self
                .graph
                .get(old)
                .is_some_and(|t| self.resolve(t).intersects(&new));
            if overlaps {
                self.graph.add_edge(id, old);
            }
        }
    }

    pub fn is_low_degree(&self, point: PointId) -> bool {
        let degree = self.adjacency.degree(point);
        degree > 0 && degree < self.degree_threshold
    }
}
