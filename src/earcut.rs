//! Ear clipping over a ring of point ids.
//!
//! The ring is kept as a circular doubly linked list over indices. Starting
//! from a random vertex, a vertex whose triangle with its two current
//! neighbours turns left and holds no other remaining vertex is clipped;
//! otherwise the walk moves on. A full lap without a clip means the ring was
//! not a simple counter-clockwise polygon.

use rand::Rng;

use crate::{
    points::Points,
    shape::Triangle,
    utils::orient_2d,
    KirkpatrickError, PointId,
};

/// Triangulates the simple counter-clockwise polygon `ring`.
///
/// Returns `ring.len() - 2` counter-clockwise triangles. Which diagonals are
/// used depends on the random start, the covered region does not.
pub fn triangulate<R: Rng>(
    ring: &[PointId],
    points: &Points,
    rng: &mut R,
) -> Result<Vec<Triangle<PointId>>, KirkpatrickError> {
    let n = ring.len();
    if n < 3 {
        return Err(KirkpatrickError::NotSimple(n));
    }

    let mut prev: Vec<usize> = (0..n).map(|i| (i + n - 1) % n).collect();
    let mut next: Vec<usize> = (0..n).map(|i| (i + 1) % n).collect();
    let mut remaining = n;
    let mut result = Vec::with_capacity(n - 2);

    let mut v = rng.gen_range(0..n);
    let mut misses = 0;
    while remaining > 3 {
        let (p, q) = (prev[v], next[v]);
        if is_ear(p, v, q, ring, &next, points) {
            result.push(Triangle::new(ring[p], ring[v], ring[q]));
            next[p] = q;
            prev[q] = p;
            remaining -= 1;
            misses = 0;
        } else {
            misses += 1;
            if misses > remaining {
                return Err(KirkpatrickError::NotSimple(remaining));
            }
        }
        v = q;
    }

    let last = Triangle::new(ring[v], ring[next[v]], ring[next[next[v]]]);
    if !orient_2d(
        points.point(last.a),
        points.point(last.b),
        points.point(last.c),
    )
    .is_ccw()
    {
        return Err(KirkpatrickError::NotSimple(remaining));
    }
    result.push(last);

    Ok(result)
}

/// `prev, v, next` is an ear when it turns left and no other vertex still in
/// the ring lies in the closed triangle.
fn is_ear(
    prev: usize,
    v: usize,
    next: usize,
    ring: &[PointId],
    links: &[usize],
    points: &Points,
) -> bool {
    let ear = Triangle::new(ring[prev], ring[v], ring[next]).map(|id| points.point(*id));
    if !orient_2d(ear.a, ear.b, ear.c).is_ccw() {
        return false;
    }

    let mut other = links[next];
    while other != prev {
        if ear.contains(&points.point(ring[other])) {
            return false;
        }
        other = links[other];
    }

    true
}
