use crate::{
    utils::{segments_intersect, turn, Homogeneous},
    KirkpatrickError,
};

/// Point with integer coordinates.
///
/// The derived ordering is lexicographic `(x, y)`; construction steps that want
/// `(y, x)` order compare on the swapped key explicitly.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

/// Point in homogeneous coordinates. `omega == 0` is a point at infinity, i.e.
/// the direction `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HomogeneousPoint {
    pub x: i64,
    pub y: i64,
    pub omega: i64,
}

impl HomogeneousPoint {
    pub const fn new(x: i64, y: i64, omega: i64) -> Self {
        Self { x, y, omega }
    }

    /// The point at infinity in direction `(dx, dy)`.
    pub const fn at_infinity(dx: i64, dy: i64) -> Self {
        Self::new(dx, dy, 0)
    }

    pub fn is_finite(&self) -> bool {
        self.omega != 0
    }
}

impl From<Point> for HomogeneousPoint {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y, 1)
    }
}

impl TryFrom<HomogeneousPoint> for Point {
    type Error = KirkpatrickError;

    /// Only `omega == 1` (or `-1`) has integral affine coordinates in this
    /// crate; any other non-zero weight is rejected with the same error.
    fn try_from(p: HomogeneousPoint) -> Result<Self, Self::Error> {
        match p.omega {
            1 => Ok(Point::new(p.x, p.y)),
            -1 => Ok(Point::new(-p.x, -p.y)),
            _ => Err(KirkpatrickError::PointAtInfinity),
        }
    }
}

/// Triangle over some vertex type: coordinates for drawing, or a
/// [`crate::PointId`] inside the search graph.
///
/// Equality is cyclic: `(a, b, c) == (b, c, a)`, but the mirrored `(a, c, b)`
/// is a different triangle.
#[derive(Debug, Clone, Copy)]
pub struct Triangle<V> {
    pub a: V,
    pub b: V,
    pub c: V,
}

impl<V> Triangle<V> {
    pub fn new(a: V, b: V, c: V) -> Self {
        Self { a, b, c }
    }

    pub fn map<U>(&self, mut f: impl FnMut(&V) -> U) -> Triangle<U> {
        Triangle::new(f(&self.a), f(&self.b), f(&self.c))
    }
}

impl<V: Copy> Triangle<V> {
    pub fn vertices(&self) -> [V; 3] {
        [self.a, self.b, self.c]
    }

    /// directed edges `ab`, `bc`, `ca`
    pub fn edges(&self) -> [(V, V); 3] {
        [(self.a, self.b), (self.b, self.c), (self.c, self.a)]
    }
}

impl<V: PartialEq + Copy> Triangle<V> {
    /// whether `other` names the same vertices in the same cyclic order
    pub fn is_rotation_of(&self, other: &Self) -> bool {
        let [a, b, c] = self.vertices();
        [
            [other.a, other.b, other.c],
            [other.b, other.c, other.a],
            [other.c, other.a, other.b],
        ]
        .iter()
        .any(|r| r[0] == a && r[1] == b && r[2] == c)
    }

    pub fn has_vertex(&self, v: V) -> bool {
        self.a == v || self.b == v || self.c == v
    }

    /// The vertex counter-clockwise to given vertex
    pub fn point_ccw(&self, v: V) -> Option<V> {
        if v == self.a {
            Some(self.b)
        } else if v == self.b {
            Some(self.c)
        } else if v == self.c {
            Some(self.a)
        } else {
            None
        }
    }
}

impl<V: PartialEq + Copy> PartialEq for Triangle<V> {
    fn eq(&self, other: &Self) -> bool {
        self.is_rotation_of(other)
    }
}

impl<V: Eq + Copy> Eq for Triangle<V> {}

impl<V: Homogeneous> Triangle<V> {
    /// Closed containment for a counter-clockwise triangle: `point` must be on
    /// the non-negative side of all three directed edges.
    ///
    /// A vertex at infinity turns its two incident edges into rays along its
    /// direction; the zero direction leaves only the finite edge as a half
    /// plane.
    pub fn contains(&self, point: &Point) -> bool {
        turn(&self.a, &self.b, point) >= 0
            && turn(&self.b, &self.c, point) >= 0
            && turn(&self.c, &self.a, point) >= 0
    }
}

impl Triangle<Point> {
    /// twice the signed area, positive when counter-clockwise
    pub fn signed_area2(&self) -> i128 {
        turn(&self.a, &self.b, &self.c)
    }

    /// Closed triangles intersection: some pair of edges touch or cross, or
    /// one triangle holds the other entirely.
    pub fn intersects(&self, other: &Triangle<Point>) -> bool {
        for (p0, p1) in self.edges() {
            for (q0, q1) in other.edges() {
                if segments_intersect(p0, p1, q0, q1) {
                    return true;
                }
            }
        }

        self.vertices().iter().all(|v| other.contains(v))
            || other.vertices().iter().all(|v| self.contains(v))
    }
}
