use kirkpatrick_rs::{Kirkpatrick, Point, TriangleId, COORDINATE_LIMIT};
use proptest::prelude::*;

/// Vertex `i` sits on a ray at angle `2π (i + jitter_i) / n`; consecutive rays
/// are less than π apart, so the polygon is simple and counter-clockwise.
fn star_polygon(radii: &[i64], jitter: &[f64]) -> Vec<Point> {
    let n = radii.len();
    (0..n)
        .map(|i| {
            let angle = std::f64::consts::TAU * (i as f64 + jitter[i]) / n as f64;
            let r = radii[i] as f64;
            Point::new(
                (r * angle.cos()).round() as i64,
                (r * angle.sin()).round() as i64,
            )
        })
        .collect()
}

fn polygon_strategy() -> impl Strategy<Value = Vec<Point>> {
    (3usize..40)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(100i64..5000, n),
                prop::collection::vec(0.0f64..0.4, n),
            )
        })
        .prop_map(|(radii, jitter)| star_polygon(&radii, &jitter))
}

/// comb with `teeth` teeth standing on a bar, listed counter-clockwise
fn comb(teeth: i64) -> Vec<Point> {
    let mut pts = vec![Point::new(0, 0), Point::new(8 * teeth - 4, 0)];
    for i in (0..teeth).rev() {
        let x = 8 * i;
        if i < teeth - 1 {
            pts.push(Point::new(x + 4, 10));
        }
        pts.push(Point::new(x + 4, 30));
        pts.push(Point::new(x, 30));
        if i > 0 {
            pts.push(Point::new(x, 10));
        }
    }
    pts
}

fn polygon_area2(polygon: &[Point]) -> i128 {
    polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .map(|(p, q)| p.x as i128 * q.y as i128 - q.x as i128 * p.y as i128)
        .sum()
}

fn check_partition(locator: &Kirkpatrick, polygon: &[Point]) {
    let polygon_area: i128 = locator
        .polygon_triangles()
        .map(|(_, t)| t.signed_area2())
        .sum();
    assert_eq!(polygon_area, polygon_area2(polygon));

    let leaves_area: i128 = locator.leaves().map(|(_, t)| t.signed_area2()).sum();
    assert_eq!(leaves_area, locator.root().signed_area2());

    for (_, t) in locator.leaves() {
        assert!(t.signed_area2() > 0);
    }
}

fn check_graph(locator: &Kirkpatrick) {
    let graph = locator.search_graph();

    for (id, triangle) in locator.search_graph().iter() {
        let children = graph.children(id);
        // edges only go back in creation order, apart from the root's
        if id != TriangleId::ROOT {
            assert!(children.iter().all(|c| c.as_usize() < id.as_usize()));
        }
        assert!(children.iter().all(|c| *c != TriangleId::ROOT));

        let triangle = triangle.map(|p| locator.points()[p.as_usize()]);
        for child in children {
            assert!(triangle.intersects(&locator.triangle_by_id(*child).unwrap()));
        }
    }

    let mut stack = vec![TriangleId::ROOT];
    let mut seen = vec![false; graph.len()];
    while let Some(id) = stack.pop() {
        if std::mem::replace(&mut seen[id.as_usize()], true) {
            continue;
        }
        stack.extend(graph.children(id).iter().copied());
    }
    assert!(seen.iter().all(|s| *s), "every triangle is reachable from the root");
}

fn check_vertices(locator: &Kirkpatrick, polygon: &[Point]) {
    for v in polygon {
        let id = locator.find_query(*v);
        assert!(locator.is_leaf(id));
        assert!(locator.triangle_by_id(id).unwrap().contains(v));
        assert_eq!(locator.find_query(*v), id);
    }
}

#[test]
fn test_comb() {
    let polygon = comb(20);
    let locator = Kirkpatrick::new(polygon.clone()).unwrap();

    assert_eq!(locator.stats().removed, polygon.len());
    check_partition(&locator, &polygon);
    check_graph(&locator);
    check_vertices(&locator, &polygon);

    // middle of every tooth and of every gap between teeth
    for i in 0..20 {
        let tooth = Point::new(8 * i + 2, 25);
        assert!(locator.locate(tooth).is_some());
        if i < 19 {
            let gap = Point::new(8 * i + 6, 25);
            assert_eq!(locator.locate(gap), None);
            let id = locator.find_query(gap);
            assert!(locator.triangle_by_id(id).unwrap().contains(&gap));
        }
    }
}

#[test]
fn test_large_coordinates() {
    let l = COORDINATE_LIMIT;
    let polygon = vec![
        Point::new(-l, -l),
        Point::new(l, -l),
        Point::new(l, l),
        Point::new(0, 1),
        Point::new(-l, l),
    ];
    let locator = Kirkpatrick::builder(polygon.clone())
        .margin(COORDINATE_LIMIT)
        .build()
        .unwrap();
    check_partition(&locator, &polygon);
    check_vertices(&locator, &polygon);

    let id = locator.locate(Point::new(0, -l / 2)).unwrap();
    assert!(locator.is_polygon_triangle(id));
    assert_eq!(locator.locate(Point::new(0, l / 2)), None);
}

#[test]
fn test_depth_is_logarithmic_in_practice() {
    let polygon = star_polygon(&vec![1000; 512], &vec![0.0; 512]);
    let locator = Kirkpatrick::new(polygon).unwrap();
    let stats = locator.stats();
    assert_eq!(stats.removed, 512);
    // every round peels a constant fraction of the live vertices
    assert!(stats.rounds < 512 / 4, "rounds = {}", stats.rounds);
    assert_eq!(stats.depth, locator.search_graph().depth());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_star_polygons(polygon in polygon_strategy(), seed in any::<u64>()) {
        let locator = Kirkpatrick::builder(polygon.clone()).seed(seed).build().unwrap();

        prop_assert_eq!(locator.stats().removed, polygon.len());
        prop_assert_eq!(locator.polygon_triangles().count(), polygon.len() - 2);
        check_partition(&locator, &polygon);
        check_graph(&locator);
        check_vertices(&locator, &polygon);
    }

    #[test]
    fn test_queries_agree_with_brute_force(
        polygon in polygon_strategy(),
        queries in prop::collection::vec((-6000i64..6000, -6000i64..6000), 32),
    ) {
        let locator = Kirkpatrick::new(polygon).unwrap();
        let root = locator.root();

        for (x, y) in queries {
            let q = Point::new(x, y);
            if !root.contains(&q) {
                prop_assert_eq!(locator.find_query(q), TriangleId::ROOT);
                prop_assert_eq!(locator.locate(q), None);
                continue;
            }

            let id = locator.find_query(q);
            prop_assert!(locator.is_leaf(id));
            prop_assert!(locator.triangle_by_id(id).unwrap().contains(&q));

            let in_polygon = locator.polygon_triangles().any(|(_, t)| t.contains(&q));
            let in_collar = locator
                .leaves()
                .any(|(id, t)| !locator.is_polygon_triangle(id) && t.contains(&q));
            match locator.locate(q) {
                Some(id) => {
                    prop_assert!(in_polygon);
                    prop_assert!(locator.is_polygon_triangle(id));
                }
                None => prop_assert!(!in_polygon || in_collar),
            }
        }
    }
}
