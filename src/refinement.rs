use std::collections::VecDeque;

use rand::{rngs::StdRng, SeedableRng};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::{
    adjacency::Adjacency,
    context::Context,
    earcut,
    points::Points,
    shape::{Point, Triangle},
    triangles::SearchGraph,
    utils::cmp_by_angle,
    Config, KirkpatrickError, PointId, RefinementStats, COORDINATE_LIMIT,
    MIN_DEGREE_THRESHOLD,
};

/// Finished hierarchy, ready to be queried.
#[derive(Debug)]
pub struct Refinement {
    pub graph: SearchGraph,
    /// the polygon's own triangles are ids `1..=polygon_triangles`
    pub polygon_triangles: usize,
    pub stats: RefinementStats,
}

/// Reject anything the construction cannot handle.
pub fn validate(polygon: &[Point], config: &Config) -> Result<(), KirkpatrickError> {
    if config.degree_threshold < MIN_DEGREE_THRESHOLD {
        return Err(KirkpatrickError::InvalidDegreeThreshold(
            config.degree_threshold,
        ));
    }
    if config.margin < 1 || config.margin > COORDINATE_LIMIT {
        return Err(KirkpatrickError::InvalidMargin(config.margin));
    }
    if polygon.len() < 3 {
        return Err(KirkpatrickError::TooFewVertices(polygon.len()));
    }

    let mut seen = FxHashSet::default();
    for p in polygon {
        if p.x.abs() > COORDINATE_LIMIT || p.y.abs() > COORDINATE_LIMIT {
            return Err(KirkpatrickError::CoordinateOutOfRange(*p));
        }
        if !seen.insert(*p) {
            return Err(KirkpatrickError::DuplicateVertex(*p));
        }
    }

    let area2: i128 = polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .map(|(p, q)| p.x as i128 * q.y as i128 - q.x as i128 * p.y as i128)
        .sum();
    match area2 {
        0 => Err(KirkpatrickError::ZeroArea),
        a if a < 0 => Err(KirkpatrickError::Clockwise),
        _ => Ok(()),
    }
}

/// Append three points forming a counter-clockwise triangle that holds every
/// polygon vertex strictly inside.
///
/// `A` is the lower left corner of the margin-expanded extent, `B` lies right
/// of it and `C` above it, both at distance `2 (w + h)`, which puts the far
/// corner of the extent well below the hypotenuse.
pub fn enclose(points: &mut Points, margin: i64) -> Option<Triangle<PointId>> {
    let (min, max) = points.polygon_extent()?;
    let (x0, y0) = (min.x - margin, min.y - margin);
    let w = max.x - min.x + 2 * margin;
    let h = max.y - min.y + 2 * margin;
    let side = 2 * (w + h);

    let a = points.add_point(Point::new(x0, y0));
    let b = points.add_point(Point::new(x0 + side, y0));
    let c = points.add_point(Point::new(x0, y0 + side));
    Some(Triangle::new(a, b, c))
}

/// The region between the polygon and the enclosure, cut into two simple
/// counter-clockwise rings by the bridges `low - A` and `high - C`.
///
/// `low` is the lowest vertex and `A` lies strictly below every vertex, so the
/// first bridge crosses nothing; symmetrically for `high` and `C`.
fn collar_rings(points: &Points, enclosure: &Triangle<PointId>) -> Option<[Vec<PointId>; 2]> {
    let n = points.polygon_len();
    let key = |id: &PointId| {
        let p = points.point(*id);
        (p.y, p.x)
    };
    let low = points.polygon_ids().min_by_key(key)?;
    let high = points.polygon_ids().max_by_key(key)?;
    let prev = |id: PointId| PointId((id.0 + n - 1) % n);
    let [a, b, c] = enclosure.vertices();

    // low, A, B, C, high, then down the right chain
    let mut right = vec![low, a, b, c, high];
    let mut i = prev(high);
    while i != low {
        right.push(i);
        i = prev(i);
    }

    // A, then up the left chain from low to high, then C
    let mut left = vec![a, low];
    let mut i = low;
    while i != high {
        i = prev(i);
        left.push(i);
    }
    left.push(c);

    Some([right, left])
}

/// Builds the whole hierarchy over `points`, whose last three entries are the
/// enclosure.
pub fn refine(
    points: &Points,
    enclosure: Triangle<PointId>,
    config: &Config,
) -> Result<Refinement, KirkpatrickError> {
    let mut graph = SearchGraph::with_root(enclosure);
    let mut adjacency = Adjacency::new(points.len());
    let mut ctx = Context::new(
        points,
        &mut graph,
        &mut adjacency,
        StdRng::seed_from_u64(config.seed),
        config.degree_threshold,
    );

    // finest level: polygon interior first, so its ids are 1..=n-2
    let polygon: Vec<PointId> = points.polygon_ids().collect();
    let interior = earcut::triangulate(&polygon, points, &mut ctx.rng)?;
    let polygon_triangles = interior.len();
    for triangle in interior {
        ctx.add_triangle(triangle);
    }

    let rings = collar_rings(points, &enclosure)
        .ok_or(KirkpatrickError::TooFewVertices(points.polygon_len()))?;
    for ring in rings {
        for triangle in earcut::triangulate(&ring, points, &mut ctx.rng)? {
            ctx.add_triangle(triangle);
        }
    }

    let mut queued = vec![false; points.len()];
    let mut queue = VecDeque::new();
    for p in points.polygon_ids() {
        if ctx.is_low_degree(p) {
            queued[p.0] = true;
            queue.push_back(p);
        }
    }

    let mut stats = RefinementStats::default();
    while !queue.is_empty() {
        let selected = independent_set(&mut queue, &ctx);
        if selected.is_empty() {
            break;
        }

        let mut touched = Vec::new();
        for &j in &selected {
            queued[j.0] = false;
            touched.extend(remove_vertex(&mut ctx, j)?);
        }

        // degrees moved only around the removed stars
        queue.retain(|p| {
            let keep = ctx.is_low_degree(*p);
            if !keep {
                queued[p.0] = false;
            }
            keep
        });
        for p in touched {
            if !points.is_synthetic(p) && !queued[p.0] && ctx.is_low_degree(p) {
                queued[p.0] = true;
                queue.push_back(p);
            }
        }

        stats.rounds += 1;
        stats.removed += selected.len();
        debug!(
            round = stats.rounds,
            selected = selected.len(),
            queue = queue.len(),
            triangles = ctx.graph.len(),
            "refinement round"
        );
    }

    let remaining = points
        .polygon_ids()
        .filter(|p| ctx.adjacency.degree(*p) > 0)
        .count();
    if remaining > 0 {
        return Err(KirkpatrickError::Unfinished(remaining));
    }

    stats.triangles = graph.len();
    stats.depth = graph.depth();
    debug!(
        triangles = stats.triangles,
        rounds = stats.rounds,
        depth = stats.depth,
        "search graph built"
    );

    Ok(Refinement {
        graph,
        polygon_triangles,
        stats,
    })
}

/// Points sharing a live triangle with `point`.
fn neighbours(ctx: &Context, point: PointId) -> Vec<PointId> {
    ctx.adjacency
        .star(point)
        .into_iter()
        .filter_map(|t| ctx.graph.get(t))
        .flat_map(|t| t.vertices())
        .filter(|p| *p != point)
        .collect()
}

/// Pick queued vertices whose removals cannot interfere.
///
/// Each pick forbids its neighbours, and the neighbours of those neighbours
/// that are themselves below the degree threshold, so one pick forbids at
/// most `(T - 1) * T` vertices. Forbidden candidates rotate to the back of the
/// queue for a later round. The queue is scanned once.
fn independent_set(queue: &mut VecDeque<PointId>, ctx: &Context) -> Vec<PointId> {
    let enclosure = ctx.graph.root().vertices();
    let mut forbidden: FxHashSet<PointId> = enclosure.into_iter().collect();
    let mut selected = Vec::new();

    for _ in 0..queue.len() {
        let Some(j) = queue.pop_front() else {
            break;
        };
        if forbidden.contains(&j) {
            queue.push_back(j);
            continue;
        }

        selected.push(j);
        forbidden.insert(j);
        for u in neighbours(ctx, j) {
            if ctx.is_low_degree(u) {
                forbidden.extend(neighbours(ctx, u));
            }
            forbidden.insert(u);
        }
    }

    selected
}

/// Remove `j`, fill its hole and link the new triangles to the star they
/// replace. Returns the ring of former neighbours.
fn remove_vertex(ctx: &mut Context, j: PointId) -> Result<Vec<PointId>, KirkpatrickError> {
    let star = ctx.adjacency.star(j);
    trace!(vertex = j.0, degree = star.len(), "remove vertex");
    if star.len() < 3 {
        return Err(KirkpatrickError::DegenerateStar {
            vertex: j.0,
            size: star.len(),
        });
    }

    let mut ring = Vec::with_capacity(star.len());
    for &t in &star {
        let missing = KirkpatrickError::MissingAdjacency {
            vertex: j.0,
            triangle: t.as_usize(),
        };
        let triangle = *ctx.graph.get(t).ok_or(missing.clone())?;
        let u = triangle.point_ccw(j).ok_or(missing.clone())?;
        let w = triangle.point_ccw(u).ok_or(missing)?;
        ctx.adjacency.detach(u, t)?;
        ctx.adjacency.detach(w, t)?;
        ring.push(u);
    }
    ctx.adjacency.clear(j);

    let center = ctx.points.point(j);
    let points = ctx.points;
    ring.sort_by(|l, r| cmp_by_angle(center, points.point(*l), points.point(*r)));

    for triangle in earcut::triangulate(&ring, points, &mut ctx.rng)? {
        let id = ctx.add_triangle(triangle);
        ctx.link(id, &star);
    }

    Ok(ring)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 10),
            Point::new(0, 10),
        ]
    }

    #[test]
    fn test_validate() {
        let config = Config::default();
        assert_eq!(validate(&square(), &config), Ok(()));
        assert_eq!(
            validate(&square()[..2], &config),
            Err(KirkpatrickError::TooFewVertices(2))
        );

        let mut clockwise = square();
        clockwise.reverse();
        assert_eq!(
            validate(&clockwise, &config),
            Err(KirkpatrickError::Clockwise)
        );

        let collinear = vec![Point::new(0, 0), Point::new(1, 1), Point::new(2, 2)];
        assert_eq!(
            validate(&collinear, &config),
            Err(KirkpatrickError::ZeroArea)
        );

        let mut repeated = square();
        repeated.push(Point::new(10, 0));
        assert_eq!(
            validate(&repeated, &config),
            Err(KirkpatrickError::DuplicateVertex(Point::new(10, 0)))
        );

        let far = vec![
            Point::new(0, 0),
            Point::new(COORDINATE_LIMIT + 1, 0),
            Point::new(0, 1),
        ];
        assert_eq!(
            validate(&far, &config),
            Err(KirkpatrickError::CoordinateOutOfRange(Point::new(
                COORDINATE_LIMIT + 1,
                0
            )))
        );

        let low_threshold = Config {
            degree_threshold: 5,
            ..Config::default()
        };
        assert_eq!(
            validate(&square(), &low_threshold),
            Err(KirkpatrickError::InvalidDegreeThreshold(5))
        );

        let no_margin = Config {
            margin: 0,
            ..Config::default()
        };
        assert_eq!(
            validate(&square(), &no_margin),
            Err(KirkpatrickError::InvalidMargin(0))
        );
    }

    #[test]
    fn test_enclosure_holds_polygon() {
        let mut points = Points::new(square());
        let enclosure = enclose(&mut points, 1).unwrap();
        let outer = enclosure.map(|id| points.point(*id));
        assert!(outer.signed_area2() > 0);
        for id in points.polygon_ids() {
            let p = points.point(id);
            for (a, b) in outer.edges() {
                assert!(crate::utils::turn(&a, &b, &p) > 0);
            }
        }
    }

    #[test]
    fn test_collars_tile_the_enclosure() {
        let mut points = Points::new(vec![
            Point::new(0, 0),
            Point::new(20, 0),
            Point::new(20, 10),
            Point::new(10, 10),
            Point::new(10, 20),
            Point::new(0, 20),
        ]);
        let enclosure = enclose(&mut points, 3).unwrap();
        let [right, left] = collar_rings(&points, &enclosure).unwrap();
        assert_eq!(right.len() + left.len(), points.polygon_len() + 2 + 3 + 2);

        let area2 = |ring: &[PointId]| -> i128 {
            ring.iter()
                .zip(ring.iter().cycle().skip(1))
                .map(|(p, q)| {
                    let (p, q) = (points.point(*p), points.point(*q));
                    p.x as i128 * q.y as i128 - q.x as i128 * p.y as i128
                })
                .sum()
        };
        let outer = enclosure.map(|id| points.point(*id)).signed_area2();
        assert!(area2(&right) > 0);
        assert!(area2(&left) > 0);
        assert_eq!(area2(&right) + area2(&left) + 2 * 300, outer);
    }

    #[test]
    fn test_every_vertex_is_removed() {
        let mut points = Points::new(square());
        let enclosure = enclose(&mut points, 10).unwrap();
        let refinement = refine(&points, enclosure, &Config::default()).unwrap();

        assert_eq!(refinement.polygon_triangles, 2);
        assert_eq!(refinement.stats.removed, 4);
        assert!(refinement.stats.rounds >= 1);
        assert_eq!(refinement.stats.triangles, refinement.graph.len());
        // the root ends up over the last star
        assert!(!refinement.graph.children(crate::TriangleId::ROOT).is_empty());
    }

    #[test]
    fn test_independent_set_is_spread_out() {
        let polygon: Vec<Point> = (0..24)
            .map(|i| {
                let angle = i as f64 * std::f64::consts::TAU / 24.;
                Point::new(
                    (1000. * angle.cos()).round() as i64,
                    (1000. * angle.sin()).round() as i64,
                )
            })
            .collect();
        let mut points = Points::new(polygon);
        let enclosure = enclose(&mut points, 10).unwrap();
        let mut graph = SearchGraph::with_root(enclosure);
        let mut adjacency = Adjacency::new(points.len());
        let mut ctx = Context::new(
            &points,
            &mut graph,
            &mut adjacency,
            StdRng::seed_from_u64(0),
            crate::DEGREE_THRESHOLD,
        );
        let ring: Vec<PointId> = points.polygon_ids().collect();
        for t in earcut::triangulate(&ring, &points, &mut ctx.rng).unwrap() {
            ctx.add_triangle(t);
        }
        for ring in collar_rings(&points, &enclosure).unwrap() {
            for t in earcut::triangulate(&ring, &points, &mut ctx.rng).unwrap() {
                ctx.add_triangle(t);
            }
        }

        let mut queue: VecDeque<PointId> = points
            .polygon_ids()
            .filter(|p| ctx.is_low_degree(*p))
            .collect();
        let before = queue.len();
        let selected = independent_set(&mut queue, &ctx);

        assert!(!selected.is_empty());
        assert_eq!(selected.len() + queue.len(), before);
        for &j in &selected {
            let near: FxHashSet<PointId> = neighbours(&ctx, j)
                .into_iter()
                .flat_map(|u| {
                    let mut near = if ctx.is_low_degree(u) {
                        neighbours(&ctx, u)
                    } else {
                        Vec::new()
                    };
                    near.push(u);
                    near
                })
                .collect();
            for &other in &selected {
                if other != j {
                    assert!(!near.contains(&other));
                }
            }
        }
    }
}
