//! Point location in a simple polygon with Kirkpatrick's hierarchical
//! triangulation refinement.
//!
//! The polygon (plus an enclosing triangle) is triangulated, then low degree
//! vertices are peeled off in independent batches and their holes
//! re-triangulated until only the enclosing triangle is left. Every new
//! triangle points at the old triangles it overlaps, and a query walks that
//! DAG from the enclosing triangle down to a triangle of the initial
//! triangulation in `O(log n)` steps.
//!
//! ```
//! use kirkpatrick_rs::{Kirkpatrick, Point};
//!
//! let square = vec![
//!     Point::new(0, 0),
//!     Point::new(10, 0),
//!     Point::new(10, 10),
//!     Point::new(0, 10),
//! ];
//! let locator = Kirkpatrick::new(square).unwrap();
//!
//! let id = locator.find_query(Point::new(2, 7));
//! assert!(locator.is_leaf(id));
//! assert!(locator.triangle_by_id(id).unwrap().contains(&Point::new(2, 7)));
//! ```

mod adjacency;
mod context;
mod earcut;
mod error;
mod points;
mod refinement;
mod shape;
mod triangles;
mod utils;

pub use error::KirkpatrickError;
pub use shape::{HomogeneousPoint, Point, Triangle};
pub use triangles::{SearchGraph, TriangleId};
pub use utils::{is_left_turn, orient_2d, turn, Homogeneous, Orientation};

use points::Points;

/// Largest degree a vertex may have and still be picked for removal.
pub const DEGREE_THRESHOLD: usize = 12;

/// Smallest accepted degree threshold. A triangulated triangle with interior
/// vertices always has one of degree 7 or less, so any threshold of at least
/// 8 keeps the refinement moving.
pub const MIN_DEGREE_THRESHOLD: usize = 8;

pub const DEFAULT_MARGIN: i64 = 10;

pub const DEFAULT_SEED: u64 = 0;

/// Largest accepted coordinate magnitude.
pub const COORDINATE_LIMIT: i64 = 1 << 40;

/// new type for point id, currently is the index in the point list
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PointId(usize);

impl PointId {
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

/// Construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// vertices with at least this many incident triangles are never removed
    pub degree_threshold: usize,
    /// gap between the polygon's extent and the enclosing triangle
    pub margin: i64,
    /// seed for the random ear clipping start
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            degree_threshold: DEGREE_THRESHOLD,
            margin: DEFAULT_MARGIN,
            seed: DEFAULT_SEED,
        }
    }
}

/// Figures about one construction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefinementStats {
    /// independent sets removed
    pub rounds: usize,
    /// polygon vertices removed
    pub removed: usize,
    /// triangles in the search graph
    pub triangles: usize,
    /// triangles on the longest root-to-leaf path
    pub depth: usize,
}

/// Builder for [`Kirkpatrick`]
#[derive(Debug, Clone)]
pub struct KirkpatrickBuilder {
    polygon: Vec<Point>,
    config: Config,
}

impl KirkpatrickBuilder {
    /// `polygon` must be simple and counter-clockwise.
    pub fn new(polygon: Vec<Point>) -> Self {
        Self {
            polygon,
            config: Config::default(),
        }
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn degree_threshold(mut self, degree_threshold: usize) -> Self {
        self.config.degree_threshold = degree_threshold;
        self
    }

    pub fn margin(mut self, margin: i64) -> Self {
        self.config.margin = margin;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn build(self) -> Result<Kirkpatrick, KirkpatrickError> {
        refinement::validate(&self.polygon, &self.config)?;

        let mut points = Points::new(self.polygon);
        let enclosure = refinement::enclose(&mut points, self.config.margin)
            .ok_or(KirkpatrickError::TooFewVertices(0))?;
        let refinement = refinement::refine(&points, enclosure, &self.config)?;

        Ok(Kirkpatrick {
            points,
            graph: refinement.graph,
            polygon_triangles: refinement.polygon_triangles,
            stats: refinement.stats,
        })
    }
}

/// Point locator over a fixed simple polygon.
///
/// Immutable once built, so it can be shared between threads and queried
/// concurrently.
#[derive(Debug, Clone)]
pub struct Kirkpatrick {
    points: Points,
    graph: SearchGraph,
    polygon_triangles: usize,
    stats: RefinementStats,
}

impl Kirkpatrick {
    /// Build with the default [`Config`].
    pub fn new(polygon: Vec<Point>) -> Result<Self, KirkpatrickError> {
        KirkpatrickBuilder::new(polygon).build()
    }

    pub fn builder(polygon: Vec<Point>) -> KirkpatrickBuilder {
        KirkpatrickBuilder::new(polygon)
    }

    /// Walk from the root to the leaf holding `point`.
    ///
    /// For a point outside the root this stops at the last triangle that made
    /// progress, which is the root itself.
    pub fn find_query(&self, point: Point) -> TriangleId {
        let mut id = TriangleId::ROOT;
        while !self.is_leaf(id) {
            let next = self.find_step(point, id);
            if next == id {
                break;
            }
            id = next;
        }
        id
    }

    /// first child of `from` that contains `point`, or `from` when none does
    pub fn find_step(&self, point: Point, from: TriangleId) -> TriangleId {
        self.graph
            .children(from)
            .iter()
            .copied()
            .find(|child| {
                self.triangle_by_id(*child)
                    .is_some_and(|t| t.contains(&point))
            })
            .unwrap_or(from)
    }

    /// Strict lookup: the polygon triangle holding `point`, or `None` when the
    /// point lies outside the polygon.
    pub fn locate(&self, point: Point) -> Option<TriangleId> {
        if !self.root().contains(&point) {
            return None;
        }
        let id = self.find_query(point);
        self.is_polygon_triangle(id).then_some(id)
    }

    pub fn is_leaf(&self, id: TriangleId) -> bool {
        self.graph.is_leaf(id)
    }

    /// whether `id` is one of the triangles tiling the polygon itself
    pub fn is_polygon_triangle(&self, id: TriangleId) -> bool {
        (1..=self.polygon_triangles).contains(&id.as_usize())
    }

    pub fn triangle_by_id(&self, id: TriangleId) -> Option<Triangle<Point>> {
        self.graph
            .get(id)
            .map(|t| t.map(|p| self.points.point(*p)))
    }

    pub fn triangles_num(&self) -> usize {
        self.graph.len()
    }

    pub fn root(&self) -> Triangle<Point> {
        self.graph.root().map(|p| self.points.point(*p))
    }

    /// polygon vertices in input order, followed by the three enclosure points
    pub fn points(&self) -> &[Point] {
        self.points.as_slice()
    }

    pub fn search_graph(&self) -> &SearchGraph {
        &self.graph
    }

    /// the triangulation of the polygon interior
    pub fn polygon_triangles(&self) -> impl Iterator<Item = (TriangleId, Triangle<Point>)> + '_ {
        (1..=self.polygon_triangles).filter_map(|idx| {
            let id = TriangleId::new(idx);
            self.triangle_by_id(id).map(|t| (id, t))
        })
    }

    /// the finest triangulation, polygon and collar triangles alike
    pub fn leaves(&self) -> impl Iterator<Item = (TriangleId, Triangle<Point>)> + '_ {
        self.graph
            .leaves()
            .map(|(id, t)| (id, t.map(|p| self.points.point(*p))))
    }

    pub fn stats(&self) -> &RefinementStats {
        &self.stats
    }
}
