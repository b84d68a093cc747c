use std::cmp::Ordering;

use crate::shape::{HomogeneousPoint, Point};

/// Anything that can be written as a homogeneous row `(x, y, ω)`.
pub trait Homogeneous {
    fn homogeneous(&self) -> [i128; 3];
}

impl Homogeneous for Point {
    fn homogeneous(&self) -> [i128; 3] {
        [self.x as i128, self.y as i128, 1]
    }
}

impl Homogeneous for HomogeneousPoint {
    fn homogeneous(&self) -> [i128; 3] {
        [self.x as i128, self.y as i128, self.omega as i128]
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Clock Wise
    ///
    ///  a     b
    ///             c
    ///
    CW,
    /// Counter Clock Wise
    ///             c
    ///  a     b
    CCW,
    /// Collinear
    ///  a     b    c
    Collinear,
}

impl Orientation {
    pub fn is_cw(&self) -> bool {
        matches!(self, Self::CW)
    }

    pub fn is_ccw(&self) -> bool {
        matches!(self, Self::CCW)
    }

    pub fn is_collinear(&self) -> bool {
        matches!(self, Self::Collinear)
    }
}

#[inline]
pub fn det2(a: i128, b: i128, c: i128, d: i128) -> i128 {
    a * d - b * c
}

#[inline]
pub fn det3(rows: [[i128; 3]; 3]) -> i128 {
    let [[x11, x12, x13], [x21, x22, x23], [x31, x32, x33]] = rows;
    x11 * det2(x22, x23, x32, x33) - x12 * det2(x21, x23, x31, x33)
        + x13 * det2(x21, x22, x31, x32)
}

/// Twice the signed area of `pqr`: positive for a left turn, negative for a
/// right turn, zero when collinear.
///
/// Inputs are bounded by [`crate::COORDINATE_LIMIT`] (plus the enclosure), so
/// every product fits comfortably in `i128`.
pub fn turn(p: &impl Homogeneous, q: &impl Homogeneous, r: &impl Homogeneous) -> i128 {
    det3([p.homogeneous(), q.homogeneous(), r.homogeneous()])
}

pub fn is_left_turn(p: &impl Homogeneous, q: &impl Homogeneous, r: &impl Homogeneous) -> bool {
    turn(p, q, r) > 0
}

pub fn orient_2d(a: Point, b: Point, c: Point) -> Orientation {
    match turn(&a, &b, &c).cmp(&0) {
        Ordering::Equal => Orientation::Collinear,
        Ordering::Greater => Orientation::CCW,
        Ordering::Less => Orientation::CW,
    }
}

/// whether `p` lies inside the bounding box of segment `ab`. Only meaningful
/// once `p` is known to be collinear with it.
fn in_span(a: Point, b: Point, p: Point) -> bool {
    a.x.min(b.x) <= p.x && p.x <= a.x.max(b.x) && a.y.min(b.y) <= p.y && p.y <= a.y.max(b.y)
}

/// Closed segment intersection: proper crossings count, and so does any
/// endpoint touching the other segment (collinear overlaps included).
pub fn segments_intersect(p0: Point, p1: Point, q0: Point, q1: Point) -> bool {
    let o1 = orient_2d(p0, p1, q0);
    let o2 = orient_2d(p0, p1, q1);
    let o3 = orient_2d(q0, q1, p0);
    let o4 = orient_2d(q0, q1, p1);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1.is_collinear() && in_span(p0, p1, q0))
        || (o2.is_collinear() && in_span(p0, p1, q1))
        || (o3.is_collinear() && in_span(q0, q1, p0))
        || (o4.is_collinear() && in_span(q0, q1, p1))
}

/// Orders `a` and `b` by the direction they have from `center`, ascending in
/// `atan2` order, i.e. starting just past the negative x axis and sweeping
/// counter clockwise. Exact, no floating point.
pub fn cmp_by_angle(center: Point, a: Point, b: Point) -> Ordering {
    // (-pi, 0] is half 0, (0, pi] is half 1
    fn half(dx: i128, dy: i128) -> u8 {
        if dy < 0 || (dy == 0 && dx > 0) {
            0
        } else {
            1
        }
    }

    let (ax, ay) = (a.x as i128 - center.x as i128, a.y as i128 - center.y as i128);
    let (bx, by) = (b.x as i128 - center.x as i128, b.y as i128 - center.y as i128);

    half(ax, ay)
        .cmp(&half(bx, by))
        .then_with(|| 0.cmp(&det2(ax, ay, bx, by)))
}
