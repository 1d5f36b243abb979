/// Shape outlines: ordered world-space boundary points of a flat shape
use std::f64::consts::TAU;

use nalgebra::{Point2, Point3};

use crate::error::Result;
use crate::shape::{ResolvedShape, Shape, ShapeDescriptor};

/// Steps used to approximate circles and ellipses.
pub const CIRCLE_STEPS: usize = 100;

/// Arc segments of the cone silhouette (the arc has one more point).
pub const CONE_ARC_POINTS: usize = 24;

/// Boundary of a shape in its construction plane.
#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    /// Closed loop. The last point repeats the first.
    Loop(Vec<Point3<f64>>),
    /// Cone silhouette, drawn apex -> arc -> apex.
    Fan {
        apex: Point3<f64>,
        arc: Vec<Point3<f64>>,
    },
}

impl Outline {
    /// Points in stroke order.
    pub fn polyline(&self) -> Vec<Point3<f64>> {
        match self {
            Outline::Loop(points) => points.clone(),
            Outline::Fan { apex, arc } => {
                let mut points = Vec::with_capacity(arc.len() + 2);
                points.push(*apex);
                points.extend_from_slice(arc);
                points.push(*apex);
                points
            }
        }
    }
}

/// Outline of a descriptor. Fails on the same conditions as
/// [`ShapeDescriptor::resolve`].
pub fn outline(descriptor: &ShapeDescriptor) -> Result<Outline> {
    let resolved = descriptor.resolve()?;
    Ok(outline_of(&resolved))
}

pub fn outline_of(resolved: &ResolvedShape) -> Outline {
    let place = |p: &Point2<f64>| resolved.plane.place(&resolved.origin, p.x, p.y);

    match resolved.shape {
        Shape::Cone { radius, height } => {
            let (apex, arc) = cone_silhouette(radius, height);
            Outline::Fan {
                apex: place(&apex),
                arc: arc.iter().map(place).collect(),
            }
        }
        shape => {
            let local = local_loop(&shape);
            let mut points: Vec<Point3<f64>> = local.iter().map(place).collect();
            if let Some(first) = points.first().copied() {
                points.push(first);
            }
            Outline::Loop(points)
        }
    }
}

/// Vertices of a shape in plane-local coordinates, without the closing
/// point. Cones have no loop and return their silhouette arc.
pub fn local_loop(shape: &Shape) -> Vec<Point2<f64>> {
    match *shape {
        Shape::Circle { radius } => ring(radius, radius, CIRCLE_STEPS),
        Shape::Ellipse {
            major_radius,
            minor_radius,
        } => ring(major_radius, minor_radius, CIRCLE_STEPS),
        Shape::Polygon { radius, sides } => ring(radius, radius, sides),
        Shape::Rectangle { width, height } => vec![
            Point2::new(0.0, 0.0),
            Point2::new(width, 0.0),
            Point2::new(width, height),
            Point2::new(0.0, height),
        ],
        Shape::Triangle {
            side1,
            side2,
            side3,
        } => triangle_vertices(side1, side2, side3).to_vec(),
        Shape::Cone { radius, height } => cone_silhouette(radius, height).1,
    }
}

/// `steps` points on an axis-aligned ellipse around the local origin,
/// counter-clockwise from `(rx, 0)`.
pub(crate) fn ring(rx: f64, ry: f64, steps: usize) -> Vec<Point2<f64>> {
    (0..steps)
        .map(|i| {
            let theta = TAU * i as f64 / steps as f64;
            Point2::new(rx * theta.cos(), ry * theta.sin())
        })
        .collect()
}

/// Triangle from three side lengths: the angle between `side2` and `side3`
/// follows from the law of cosines. Sides must already satisfy the strict
/// triangle inequality.
pub fn triangle_vertices(side1: f64, side2: f64, side3: f64) -> [Point2<f64>; 3] {
    let cos_a = (side2 * side2 + side3 * side3 - side1 * side1) / (2.0 * side2 * side3);
    // Rounding can push a valid but nearly flat triangle just past +-1.
    let angle = cos_a.clamp(-1.0, 1.0).acos();
    [
        Point2::new(0.0, 0.0),
        Point2::new(side2, 0.0),
        Point2::new(side3 * angle.cos(), side3 * angle.sin()),
    ]
}

/// Apex and arc of the cone's flat silhouette. The base center sits at the
/// local origin and the apex at `(0, height)`; the arc swings the slant
/// length around the apex so it ends at `(+-radius, 0)`.
fn cone_silhouette(radius: f64, height: f64) -> (Point2<f64>, Vec<Point2<f64>>) {
    let half_angle = (radius / height).atan();
    let slant = (radius * radius + height * height).sqrt();
    let apex = Point2::new(0.0, height);
    let arc = (0..=CONE_ARC_POINTS)
        .map(|i| {
            let phi = -half_angle + 2.0 * half_angle * i as f64 / CONE_ARC_POINTS as f64;
            Point2::new(slant * phi.sin(), height - slant * phi.cos())
        })
        .collect();
    (apex, arc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::Plane;
    use crate::shape::ShapeKind;
    use approx::assert_relative_eq;

    fn rectangle() -> ShapeDescriptor {
        ShapeDescriptor::new(ShapeKind::Rectangle, Plane::XY, [1.0, 2.0, 0.0])
            .with_parameter("width", 4.0)
            .with_parameter("height", 6.0)
    }

    #[test]
    fn test_rectangle_outline() {
        let Outline::Loop(points) = outline(&rectangle()).unwrap() else {
            panic!("rectangle should be a loop");
        };
        assert_eq!(
            points,
            vec![
                Point3::new(1.0, 2.0, 0.0),
                Point3::new(5.0, 2.0, 0.0),
                Point3::new(5.0, 8.0, 0.0),
                Point3::new(1.0, 8.0, 0.0),
                Point3::new(1.0, 2.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_rectangle_on_yz() {
        let mut descriptor = rectangle();
        descriptor.plane = "YZ".to_string();
        let polyline = outline(&descriptor).unwrap().polyline();
        assert_eq!(polyline[2], Point3::new(1.0, 6.0, 6.0));
    }

    #[test]
    fn test_circle_outline() {
        let descriptor = ShapeDescriptor::new(ShapeKind::Circle, Plane::XZ, [1.0, 1.0, 1.0])
            .with_parameter("radius", 2.0);
        let points = outline(&descriptor).unwrap().polyline();
        assert_eq!(points.len(), CIRCLE_STEPS + 1);
        assert_eq!(points.first(), points.last());
        for p in &points {
            assert_relative_eq!(p.y, 1.0);
            let d = ((p.x - 1.0).powi(2) + (p.z - 1.0).powi(2)).sqrt();
            assert_relative_eq!(d, 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_ellipse_extents() {
        let descriptor = ShapeDescriptor::new(ShapeKind::Ellipse, Plane::XY, [0.0; 3])
            .with_parameter("major_radius", 5.0)
            .with_parameter("minor_radius", 2.0);
        let points = outline(&descriptor).unwrap().polyline();
        let max_x = points.iter().map(|p| p.x).fold(f64::MIN, f64::max);
        let max_y = points.iter().map(|p| p.y).fold(f64::MIN, f64::max);
        assert_relative_eq!(max_x, 5.0);
        assert_relative_eq!(max_y, 2.0, epsilon = 1e-3);
    }

    #[test]
    fn test_polygon_vertices() {
        let descriptor = ShapeDescriptor::new(ShapeKind::Polygon, Plane::XY, [0.0; 3])
            .with_parameter("radius", 3.0)
            .with_parameter("sides", 4.0);
        let points = outline(&descriptor).unwrap().polyline();
        assert_eq!(points.len(), 5);
        assert_relative_eq!(points[0], Point3::new(3.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(points[1], Point3::new(0.0, 3.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(points[2], Point3::new(-3.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_right_triangle() {
        let [a, b, c] = triangle_vertices(5.0, 3.0, 4.0);
        assert_eq!(a, Point2::new(0.0, 0.0));
        assert_eq!(b, Point2::new(3.0, 0.0));
        assert_relative_eq!(c, Point2::new(0.0, 4.0), epsilon = 1e-12);
    }

    #[test]
    fn test_cone_fan() {
        let descriptor = ShapeDescriptor::new(ShapeKind::Cone, Plane::XY, [0.0; 3])
            .with_parameter("radius", 3.0)
            .with_parameter("height", 4.0);
        let Outline::Fan { apex, arc } = outline(&descriptor).unwrap() else {
            panic!("cone should be a fan");
        };
        assert_eq!(apex, Point3::new(0.0, 4.0, 0.0));
        assert_eq!(arc.len(), CONE_ARC_POINTS + 1);
        assert_relative_eq!(arc[0], Point3::new(-3.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(arc[CONE_ARC_POINTS], Point3::new(3.0, 0.0, 0.0), epsilon = 1e-12);
        for p in &arc {
            assert_relative_eq!((p - apex).norm(), 5.0, epsilon = 1e-12);
        }

        let polyline = Outline::Fan { apex, arc }.polyline();
        assert_eq!(polyline.first(), Some(&apex));
        assert_eq!(polyline.last(), Some(&apex));
    }
}
