use crate::{shape::Point, PointId};

/// Point store, provide a unique [`PointId`]
///
/// Polygon vertices come first, in input order, so their ids are `0..n`.
/// The enclosure points are appended afterwards and are the only ids `>= n`.
#[derive(Debug, Clone)]
pub struct Points {
    points: Vec<Point>,
    polygon_len: usize,
}

impl Points {
    pub fn new(polygon: Vec<Point>) -> Self {
        let polygon_len = polygon.len();
        Self {
            points: polygon,
            polygon_len,
        }
    }

    /// append a synthetic point
    pub fn add_point(&mut self, point: Point) -> PointId {
        let point_id = PointId(self.points.len());
        self.points.push(point);
        point_id
    }

    pub fn get_point(&self, id: PointId) -> Option<Point> {
        self.points.get(id.0).copied()
    }

    /// Point for an id handed out by this store.
    ///
    /// Panics on foreign ids, the same way indexing a `Vec` would.
    pub fn point(&self, id: PointId) -> Point {
        self.points[id.0]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn polygon_len(&self) -> usize {
        self.polygon_len
    }

    pub fn is_synthetic(&self, id: PointId) -> bool {
        id.0 >= self.polygon_len
    }

    pub fn polygon_ids(&self) -> impl Iterator<Item = PointId> {
        (0..self.polygon_len).map(PointId)
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    /// `(min, max)` corners of the polygon's axis aligned extent
    pub fn polygon_extent(&self) -> Option<(Point, Point)> {
        let polygon = &self.points[..self.polygon_len];
        let first = *polygon.first()?;
        Some(polygon.iter().fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        }))
    }
}
