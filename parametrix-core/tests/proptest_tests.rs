//! Property-based tests for the geometry engine using the `proptest` crate.

use proptest::prelude::*;

use nalgebra::{Point3, Vector3};
use parametrix_core::tessellate::tessellate;
use parametrix_core::{
    extrude, outline, AxonometricProjector, CanvasSize, EngineError, Plane, ShapeDescriptor,
    ShapeKind, DEFAULT_EXTRUSION,
};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_point() -> impl Strategy<Value = (f64, f64, f64)> {
    (-1000.0f64..1000.0, -1000.0f64..1000.0, -1000.0f64..1000.0)
}

fn arb_plane() -> impl Strategy<Value = Plane> {
    prop::sample::select(Plane::ALL.to_vec())
}

fn arb_positive_dim() -> impl Strategy<Value = f64> {
    0.1f64..100.0
}

const TOL: f64 = 1e-9;

/// Radius-style descriptor centered on `origin`.
fn round_shape(kind: ShapeKind, plane: Plane, origin: [f64; 3], radius: f64) -> ShapeDescriptor {
    let d = ShapeDescriptor::new(kind, plane, origin);
    match kind {
        ShapeKind::Ellipse => d
            .with_parameter("major_radius", radius)
            .with_parameter("minor_radius", radius / 2.0),
        ShapeKind::Polygon => d
            .with_parameter("radius", radius)
            .with_parameter("sides", 7.0),
        _ => d.with_parameter("radius", radius),
    }
}

// ---------------------------------------------------------------------------
// Scaling radius-style parameters scales every outline point's distance
// from the center by the same factor.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn outline_scales_with_radius(
        kind in prop::sample::select(vec![ShapeKind::Circle, ShapeKind::Ellipse, ShapeKind::Polygon]),
        plane in arb_plane(),
        (x, y, z) in arb_point(),
        radius in arb_positive_dim(),
        k in 0.1f64..10.0,
    ) {
        let origin = Point3::new(x, y, z);
        let small = outline(&round_shape(kind, plane, [x, y, z], radius)).unwrap().polyline();
        let large = outline(&round_shape(kind, plane, [x, y, z], radius * k)).unwrap().polyline();
        prop_assert_eq!(small.len(), large.len());
        for (p, q) in small.iter().zip(&large) {
            let ds = (p - origin).norm();
            let dl = (q - origin).norm();
            prop_assert!((dl - k * ds).abs() < 1e-6 * (1.0 + dl),
                "distance {} is not {} * {}", dl, k, ds);
        }
    }
}

// ---------------------------------------------------------------------------
// Projection of the origin is the canvas center, whatever the unit.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn origin_projects_to_center(
        width in 1.0f64..4000.0,
        height in 1.0f64..4000.0,
        unit in 0.1f64..200.0,
    ) {
        let projector = AxonometricProjector::new(CanvasSize::new(width, height), unit);
        let p = projector.project(0.0, 0.0, 0.0);
        prop_assert_eq!(p.x, width / 2.0);
        prop_assert_eq!(p.y, height / 2.0);
    }
}

// ---------------------------------------------------------------------------
// Projection is linear: translating in world space translates on screen.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn projection_is_linear(
        (ax, ay, az) in arb_point(),
        (bx, by, bz) in arb_point(),
        unit in 1.0f64..50.0,
    ) {
        let projector = AxonometricProjector::new(CanvasSize::new(600.0, 400.0), unit);
        let origin = projector.project(0.0, 0.0, 0.0);
        let a = projector.project(ax, ay, az) - origin;
        let b = projector.project(bx, by, bz) - origin;
        let sum = projector.project(ax + bx, ay + by, az + bz) - origin;
        prop_assert!((sum - (a + b)).norm() < 1e-6 * (1.0 + sum.norm()));
    }
}

// ---------------------------------------------------------------------------
// Identical input gives bit-identical screen output.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn projection_is_deterministic(
        plane in arb_plane(),
        (x, y, z) in arb_point(),
        radius in arb_positive_dim(),
    ) {
        let projector = AxonometricProjector::new(CanvasSize::new(800.0, 700.0), 16.0);
        let shape = round_shape(ShapeKind::Circle, plane, [x, y, z], radius);
        let first: Vec<_> = outline(&shape).unwrap().polyline().iter()
            .map(|p| projector.project_point(p)).collect();
        let second: Vec<_> = outline(&shape).unwrap().polyline().iter()
            .map(|p| projector.project_point(p)).collect();
        for (p, q) in first.iter().zip(&second) {
            prop_assert_eq!(p.x.to_bits(), q.x.to_bits());
            prop_assert_eq!(p.y.to_bits(), q.y.to_bits());
        }
    }
}

// ---------------------------------------------------------------------------
// Triangles: valid triples give finite, non-collinear vertices; invalid
// triples are rejected.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn triangle_validity(
        s1 in arb_positive_dim(),
        s2 in arb_positive_dim(),
        s3 in arb_positive_dim(),
        plane in arb_plane(),
    ) {
        let triangle = ShapeDescriptor::new(ShapeKind::Triangle, plane, [0.0; 3])
            .with_parameter("side1", s1)
            .with_parameter("side2", s2)
            .with_parameter("side3", s3);
        let valid = s1 < s2 + s3 && s2 < s1 + s3 && s3 < s1 + s2;
        match outline(&triangle) {
            Ok(o) => {
                prop_assert!(valid);
                let points = o.polyline();
                prop_assert!(points.iter().all(|p| p.coords.iter().all(|v| v.is_finite())));
                let (a, b, c) = (points[0], points[1], points[2]);
                prop_assert!((b - a).cross(&(c - a)).norm() > 0.0);
            }
            Err(e) => {
                prop_assert!(!valid);
                let is_invalid = matches!(e, EngineError::InvalidParameters { .. });
                prop_assert!(is_invalid);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Extrusion: default depth, and the solid sits on its plane.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn extrusion_defaults_and_lifts_by_half_depth(
        plane in arb_plane(),
        (x, y, z) in arb_point(),
        radius in arb_positive_dim(),
        depth in prop::option::of(arb_positive_dim()),
    ) {
        let shape = round_shape(ShapeKind::Circle, plane, [x, y, z], radius).extruded_by(depth);
        let solid = extrude(&shape).unwrap();
        let expected = depth.unwrap_or(DEFAULT_EXTRUSION);
        prop_assert_eq!(solid.primitive.depth(), expected);

        let lift = (solid.position - Point3::new(x, y, z)).dot(&plane.normal());
        prop_assert!((lift - expected / 2.0).abs() < TOL * (1.0 + lift.abs()) + 1e-9);
    }
}

// ---------------------------------------------------------------------------
// Extrusion footprint: the bottom face of the tessellated solid lies on the
// construction plane over exactly the outline the flat view draws, and the
// solid rises `depth` along the normal.
// ---------------------------------------------------------------------------

const FOOTPRINT_TOL: f64 = 1e-3;

/// Shape on `plane` built from a case index and a few dimensions.
fn footprint_shape(
    case: usize,
    plane: Plane,
    origin: [f64; 3],
    a: f64,
    b: f64,
    t: f64,
) -> ShapeDescriptor {
    match case {
        0 => ShapeDescriptor::new(ShapeKind::Ellipse, plane, origin)
            .with_parameter("major_radius", a.max(b))
            .with_parameter("minor_radius", a.min(b)),
        1 => ShapeDescriptor::new(ShapeKind::Polygon, plane, origin)
            .with_parameter("radius", a)
            .with_parameter("sides", (3.0 + (t * 10.0).floor()).min(12.0)),
        2 => {
            let spread = (a - b).abs();
            ShapeDescriptor::new(ShapeKind::Triangle, plane, origin)
                .with_parameter("side1", spread + t * (a + b - spread))
                .with_parameter("side2", a)
                .with_parameter("side3", b)
        }
        3 => ShapeDescriptor::new(ShapeKind::Rectangle, plane, origin)
            .with_parameter("width", a)
            .with_parameter("height", b),
        _ => ShapeDescriptor::new(ShapeKind::Circle, plane, origin).with_parameter("radius", a),
    }
}

/// Local `(a, b, n)` of a world point relative to the shape's origin.
fn local(plane: Plane, origin: &Point3<f64>, p: &Point3<f64>) -> Vector3<f64> {
    let (u, v) = plane.in_plane_axes();
    let offset = p - origin;
    Vector3::new(offset.dot(&u), offset.dot(&v), offset.dot(&plane.normal()))
}

proptest! {
    #[test]
    fn extrusion_footprint_matches_outline(
        case in 0usize..5,
        plane in arb_plane(),
        (x, y, z) in (-50.0f64..50.0, -50.0f64..50.0, -50.0f64..50.0),
        a in 0.5f64..20.0,
        b in 0.5f64..20.0,
        t in 0.05f64..0.95,
        depth in 0.1f64..10.0,
    ) {
        let origin = Point3::new(x, y, z);
        let shape = footprint_shape(case, plane, [x, y, z], a, b, t).extruded_by(Some(depth));

        let outline_points: Vec<_> = outline(&shape).unwrap().polyline()
            .iter().map(|p| local(plane, &origin, p)).collect();
        let mesh_points: Vec<_> = tessellate(&extrude(&shape).unwrap()).triangles.iter()
            .flat_map(|tri| tri.vertices.iter().map(|v| local(plane, &origin, &v.position.cast::<f64>())))
            .collect();

        // Outline lies on the plane; the solid spans [0, depth] above it.
        prop_assert!(outline_points.iter().all(|p| p.z.abs() < FOOTPRINT_TOL));
        for p in &mesh_points {
            prop_assert!(p.z > -FOOTPRINT_TOL && p.z < depth + FOOTPRINT_TOL,
                "vertex {:?} outside [0, {}] along the normal", p, depth);
        }
        let bottom: Vec<_> = mesh_points.iter().filter(|p| p.z.abs() < FOOTPRINT_TOL).collect();
        prop_assert!(!bottom.is_empty());
        prop_assert!(mesh_points.iter().any(|p| (p.z - depth).abs() < FOOTPRINT_TOL));

        let close = |p: &Vector3<f64>, q: &Vector3<f64>| {
            (p.x - q.x).abs() < FOOTPRINT_TOL && (p.y - q.y).abs() < FOOTPRINT_TOL
        };
        let extent = |points: &[&Vector3<f64>], pick: fn(&Vector3<f64>) -> f64| {
            points.iter().map(|p| pick(*p)).fold((f64::INFINITY, f64::NEG_INFINITY),
                |(lo, hi), v| (lo.min(v), hi.max(v)))
        };

        if matches!(case, 1..=3) {
            // Polygons, triangles and boxes: the bottom face has exactly the
            // outline's corners.
            for p in &outline_points {
                prop_assert!(bottom.iter().any(|q| close(p, *q)),
                    "outline corner {:?} missing from the solid", p);
            }
            for q in &bottom {
                prop_assert!(outline_points.iter().any(|p| close(p, *q)),
                    "solid corner {:?} not on the outline", q);
            }
        } else {
            // Curves are sampled differently in each view; the extents along
            // both in-plane axes still agree.
            let drawn: Vec<_> = outline_points.iter().collect();
            for pick in [(|p: &Vector3<f64>| p.x) as fn(&Vector3<f64>) -> f64, |p: &Vector3<f64>| p.y] {
                let (lo, hi) = extent(&drawn, pick);
                let (blo, bhi) = extent(&bottom, pick);
                prop_assert!((lo - blo).abs() < FOOTPRINT_TOL && (hi - bhi).abs() < FOOTPRINT_TOL,
                    "footprint [{}, {}] differs from outline [{}, {}]", blo, bhi, lo, hi);
            }
        }
    }
}
