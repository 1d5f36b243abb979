/// Triangulation of solid primitives into world-space meshes
use nalgebra::{Point2, Point3};

use crate::extrude::{Primitive, Solid};
use crate::geometry::{Mesh, Triangle};
use crate::outline::ring;
use crate::transform::Transform;

/// Segments around curved surfaces.
pub const CURVE_SEGMENTS: usize = 32;

/// Mesh of a solid, placed in world space.
pub fn tessellate(solid: &Solid) -> Mesh {
    local_mesh(&solid.primitive)
        .transformed(&Transform::placement_matrix(&solid.position, &solid.rotation))
}

/// Mesh of a primitive in its own frame, centered on the origin.
pub fn local_mesh(primitive: &Primitive) -> Mesh {
    match *primitive {
        Primitive::Cylinder { radius, length } => {
            let profile = ring(radius, radius, CURVE_SEGMENTS);
            build(loft(&profile, &profile, length), revolved_axes)
        }
        Primitive::TaperedCylinder {
            radius_top,
            radius_bottom,
            length,
        } => build(
            loft(
                &ring(radius_bottom, radius_bottom, CURVE_SEGMENTS),
                &ring(radius_top, radius_top, CURVE_SEGMENTS),
                length,
            ),
            revolved_axes,
        ),
        Primitive::EllipticCylinder {
            major_radius,
            minor_radius,
            length,
        } => {
            let profile = ring(major_radius, minor_radius, CURVE_SEGMENTS);
            build(loft(&profile, &profile, length), revolved_axes)
        }
        Primitive::Prism {
            radius,
            sides,
            length,
        } => {
            let profile = ring(radius, radius, sides);
            build(loft(&profile, &profile, length), revolved_axes)
        }
        Primitive::Cone { radius, height } => build(
            pyramid(&ring(radius, radius, CURVE_SEGMENTS), height),
            revolved_axes,
        ),
        Primitive::Box {
            width,
            height,
            depth,
        } => {
            let (hw, hh) = (width / 2.0, height / 2.0);
            let profile = [
                Point2::new(-hw, -hh),
                Point2::new(hw, -hh),
                Point2::new(hw, hh),
                Point2::new(-hw, hh),
            ];
            build(loft(&profile, &profile, depth), framed_axes)
        }
        Primitive::TriangularPrism { vertices, depth } => {
            let mut profile = vertices.to_vec();
            if signed_area(&profile) < 0.0 {
                profile.reverse();
            }
            build(loft(&profile, &profile, depth), framed_axes)
        }
    }
}

/// Profile coordinates `(a, b)` plus axial `h`, mapped so the axis is local `y`.
fn revolved_axes(a: f64, b: f64, h: f64) -> Point3<f64> {
    Point3::new(a, h, -b)
}

/// Profile coordinates `(a, b)` plus axial `h`, mapped so the axis is local `z`.
fn framed_axes(a: f64, b: f64, h: f64) -> Point3<f64> {
    Point3::new(a, b, h)
}

type Face = [(f64, f64, f64); 3];

fn build(faces: Vec<Face>, axes: fn(f64, f64, f64) -> Point3<f64>) -> Mesh {
    let mut mesh = Mesh::with_capacity(faces.len());
    for [p, q, r] in faces {
        mesh.add_triangle(Triangle::from_points(
            axes(p.0, p.1, p.2),
            axes(q.0, q.1, q.2),
            axes(r.0, r.1, r.2),
        ));
    }
    mesh
}

/// Closed solid between two counter-clockwise convex profiles with the same
/// vertex count, `bottom` at `-depth/2` and `top` at `+depth/2`.
fn loft(bottom: &[Point2<f64>], top: &[Point2<f64>], depth: f64) -> Vec<Face> {
    let (lo, hi) = (-depth / 2.0, depth / 2.0);
    let n = bottom.len();
    let mut faces = Vec::with_capacity(4 * n);

    for i in 0..n {
        let j = (i + 1) % n;
        let (b0, b1) = (bottom[i], bottom[j]);
        let (t0, t1) = (top[i], top[j]);
        faces.push([(b0.x, b0.y, lo), (b1.x, b1.y, lo), (t1.x, t1.y, hi)]);
        faces.push([(b0.x, b0.y, lo), (t1.x, t1.y, hi), (t0.x, t0.y, hi)]);
    }
    for i in 1..n.saturating_sub(1) {
        let (t0, t1, t2) = (top[0], top[i], top[i + 1]);
        faces.push([(t0.x, t0.y, hi), (t1.x, t1.y, hi), (t2.x, t2.y, hi)]);
        let (b0, b1, b2) = (bottom[0], bottom[i], bottom[i + 1]);
        faces.push([(b0.x, b0.y, lo), (b2.x, b2.y, lo), (b1.x, b1.y, lo)]);
    }
    faces
}

/// Base profile at `-height/2`, apex at `+height/2`.
fn pyramid(base: &[Point2<f64>], height: f64) -> Vec<Face> {
    let (lo, hi) = (-height / 2.0, height / 2.0);
    let n = base.len();
    let mut faces = Vec::with_capacity(2 * n);

    for i in 0..n {
        let (b0, b1) = (base[i], base[(i + 1) % n]);
        faces.push([(b0.x, b0.y, lo), (b1.x, b1.y, lo), (0.0, 0.0, hi)]);
    }
    for i in 1..n.saturating_sub(1) {
        let (b0, b1, b2) = (base[0], base[i], base[i + 1]);
        faces.push([(b0.x, b0.y, lo), (b2.x, b2.y, lo), (b1.x, b1.y, lo)]);
    }
    faces
}

fn signed_area(profile: &[Point2<f64>]) -> f64 {
    let n = profile.len();
    (0..n)
        .map(|i| {
            let (p, q) = (profile[i], profile[(i + 1) % n]);
            p.x * q.y - q.x * p.y
        })
        .sum::<f64>()
        / 2.0
}
