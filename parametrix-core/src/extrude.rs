/// Extrusion of flat shapes into oriented solid primitives
///
/// Primitives are described in a canonical local frame and centered on
/// their position:
///
/// - revolved primitives ([`Primitive::Cylinder`], [`Primitive::EllipticCylinder`],
///   [`Primitive::Prism`], [`Primitive::Cone`], [`Primitive::TaperedCylinder`])
///   have their axis on local `y`, the cone's apex on `+y`;
/// - [`Primitive::Box`] and [`Primitive::TriangularPrism`] carry width on local
///   `x`, height on `y` and depth on `z`.
///
/// The solid's rotation turns that frame so the extrusion axis follows the
/// construction plane's normal, and its position lifts it by half the depth
/// so it sits on the plane instead of straddling it.
use nalgebra::{Point2, Point3};
use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::outline::triangle_vertices;
use crate::shape::{ResolvedShape, Shape, ShapeDescriptor};
use crate::transform::RotationState;

/// Thickness used when an extruded descriptor carries no amount. The
/// application assigns the same value the first time a shape is extruded.
pub const DEFAULT_EXTRUSION: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "primitive_kind", rename_all = "snake_case")]
pub enum Primitive {
    Cylinder {
        radius: f64,
        length: f64,
    },
    /// Cylinder with different end radii. Only produced as an approximation
    /// by [`Primitive::fallback`].
    TaperedCylinder {
        radius_top: f64,
        radius_bottom: f64,
        length: f64,
    },
    Box {
        width: f64,
        height: f64,
        depth: f64,
    },
    /// Profile vertices in local `x`/`y`, relative to the box corner the
    /// 2D outline starts from.
    TriangularPrism {
        vertices: [Point2<f64>; 3],
        depth: f64,
    },
    /// Major radius on local `x`, minor on local `z`.
    EllipticCylinder {
        major_radius: f64,
        minor_radius: f64,
        length: f64,
    },
    /// Regular prism, first vertex on local `+x`.
    Prism {
        radius: f64,
        sides: usize,
        length: f64,
    },
    Cone {
        radius: f64,
        height: f64,
    },
}

impl Primitive {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Primitive::Cylinder { .. } => "cylinder",
            Primitive::TaperedCylinder { .. } => "tapered_cylinder",
            Primitive::Box { .. } => "box",
            Primitive::TriangularPrism { .. } => "triangular_prism",
            Primitive::EllipticCylinder { .. } => "elliptic_cylinder",
            Primitive::Prism { .. } => "prism",
            Primitive::Cone { .. } => "cone",
        }
    }

    /// Extent along the extrusion axis.
    pub fn depth(&self) -> f64 {
        match *self {
            Primitive::Cylinder { length, .. }
            | Primitive::TaperedCylinder { length, .. }
            | Primitive::EllipticCylinder { length, .. }
            | Primitive::Prism { length, .. } => length,
            Primitive::Box { depth, .. } | Primitive::TriangularPrism { depth, .. } => depth,
            Primitive::Cone { height, .. } => height,
        }
    }

    /// Closest primitive a renderer with only boxes, cylinders and cones
    /// can draw. Triangular prisms become a `side2 x side3` box, elliptic
    /// cylinders a cylinder tapering from the major to the minor radius.
    /// The approximation keeps the solid's frame, not its exact shape.
    pub fn fallback(&self) -> Primitive {
        match *self {
            Primitive::TriangularPrism { vertices, depth } => {
                let [a, b, c] = vertices;
                Primitive::Box {
                    width: (b - a).norm(),
                    height: (c - a).norm(),
                    depth,
                }
            }
            Primitive::EllipticCylinder {
                major_radius,
                minor_radius,
                length,
            } => Primitive::TaperedCylinder {
                radius_top: major_radius,
                radius_bottom: minor_radius,
                length,
            },
            Primitive::Prism {
                radius,
                sides: _,
                length,
            } => Primitive::Cylinder { radius, length },
            ref other => other.clone(),
        }
    }
}

/// A primitive placed in the world, ready for a 3D scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solid {
    pub primitive: Primitive,
    pub position: Point3<f64>,
    pub rotation: RotationState,
}

/// Depth of an extruded descriptor: the explicit amount if present,
/// otherwise [`DEFAULT_EXTRUSION`].
pub fn extrusion_depth(descriptor: &ShapeDescriptor) -> Result<f64> {
    match descriptor.extrusion_amount {
        None => Ok(DEFAULT_EXTRUSION),
        Some(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        Some(amount) => Err(EngineError::invalid(
            descriptor.kind.as_str(),
            format!("extrusion amount must be a positive number, got {amount}"),
        )),
    }
}

/// Solid for a descriptor. The `extruded` flag is not consulted here;
/// callers decide which descriptors to extrude.
pub fn extrude(descriptor: &ShapeDescriptor) -> Result<Solid> {
    let resolved = descriptor.resolve()?;
    let depth = extrusion_depth(descriptor)?;
    Ok(extrude_resolved(&resolved, depth))
}

/// Solid for an already validated shape. `depth` is ignored by cones,
/// which take their height from the shape itself.
pub fn extrude_resolved(resolved: &ResolvedShape, depth: f64) -> Solid {
    let plane = resolved.plane;
    let origin = &resolved.origin;
    let lifted = |a: f64, b: f64, n: f64| plane.place_offset(origin, a, b, n);

    match resolved.shape {
        Shape::Circle { radius } => Solid {
            primitive: Primitive::Cylinder {
                radius,
                length: depth,
            },
            position: lifted(0.0, 0.0, depth / 2.0),
            rotation: plane.revolve_rotation(),
        },
        Shape::Ellipse {
            major_radius,
            minor_radius,
        } => Solid {
            primitive: Primitive::EllipticCylinder {
                major_radius,
                minor_radius,
                length: depth,
            },
            position: lifted(0.0, 0.0, depth / 2.0),
            rotation: plane.revolve_rotation(),
        },
        Shape::Polygon { radius, sides } => Solid {
            primitive: Primitive::Prism {
                radius,
                sides,
                length: depth,
            },
            position: lifted(0.0, 0.0, depth / 2.0),
            rotation: plane.revolve_rotation(),
        },
        Shape::Cone { radius, height } => Solid {
            primitive: Primitive::Cone { radius, height },
            position: lifted(0.0, 0.0, height / 2.0),
            rotation: plane.directed_revolve_rotation(),
        },
        Shape::Rectangle { width, height } => Solid {
            primitive: Primitive::Box {
                width,
                height,
                depth,
            },
            position: lifted(width / 2.0, height / 2.0, depth / 2.0),
            rotation: plane.frame_rotation(),
        },
        Shape::Triangle {
            side1,
            side2,
            side3,
        } => {
            let corners = triangle_vertices(side1, side2, side3);
            // Center the prism on its bounding box so it rotates in place
            // like the box does.
            let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
            let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
            let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
            let (cx, cy) = ((min_x + max_x) / 2.0, max_y / 2.0);
            let vertices = corners.map(|p| Point2::new(p.x - cx, p.y - cy));
            Solid {
                primitive: Primitive::TriangularPrism { vertices, depth },
                position: lifted(cx, cy, depth / 2.0),
                rotation: plane.frame_rotation(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::Plane;
    use crate::shape::ShapeKind;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_circle_becomes_cylinder_on_its_plane() {
        let descriptor = ShapeDescriptor::new(ShapeKind::Circle, Plane::XY, [0.0, 0.0, 2.0])
            .with_parameter("radius", 5.0)
            .extruded_by(None);
        let solid = extrude(&descriptor).unwrap();
        assert_eq!(
            solid.primitive,
            Primitive::Cylinder {
                radius: 5.0,
                length: 1.0
            }
        );
        assert_eq!(solid.position, Point3::new(0.0, 0.0, 2.5));
        assert_eq!(solid.rotation, RotationState::new(FRAC_PI_2, 0.0, 0.0));
    }

    #[test]
    fn test_cylinder_rotation_per_plane() {
        let circle = |plane| {
            ShapeDescriptor::new(ShapeKind::Circle, plane, [1.0, 2.0, 3.0])
                .with_parameter("radius", 1.0)
                .extruded_by(Some(4.0))
        };
        let xz = extrude(&circle(Plane::XZ)).unwrap();
        assert_eq!(xz.rotation, RotationState::zero());
        assert_eq!(xz.position, Point3::new(1.0, 4.0, 3.0));

        let yz = extrude(&circle(Plane::YZ)).unwrap();
        assert_eq!(yz.rotation, RotationState::new(0.0, 0.0, FRAC_PI_2));
        assert_eq!(yz.position, Point3::new(3.0, 2.0, 3.0));
    }

    #[test]
    fn test_default_depth_is_one() {
        let rectangle = ShapeDescriptor::new(ShapeKind::Rectangle, Plane::XY, [0.0; 3])
            .with_parameter("width", 2.0)
            .with_parameter("height", 3.0)
            .extruded_by(None);
        let solid = extrude(&rectangle).unwrap();
        assert_eq!(solid.primitive.depth(), 1.0);
        assert_eq!(
            solid.primitive,
            Primitive::Box {
                width: 2.0,
                height: 3.0,
                depth: 1.0
            }
        );
        // Corner stays where the outline starts.
        assert_eq!(solid.position, Point3::new(1.0, 1.5, 0.5));
    }

    #[test]
    fn test_invalid_depth() {
        let circle = ShapeDescriptor::new(ShapeKind::Circle, Plane::XY, [0.0; 3])
            .with_parameter("radius", 1.0)
            .extruded_by(Some(-2.0));
        assert!(matches!(
            extrude(&circle),
            Err(EngineError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn test_cone_uses_its_own_height() {
        let cone = ShapeDescriptor::new(ShapeKind::Cone, Plane::YZ, [0.0; 3])
            .with_parameter("radius", 2.0)
            .with_parameter("height", 6.0)
            .extruded_by(Some(9.0));
        let solid = extrude(&cone).unwrap();
        assert_eq!(
            solid.primitive,
            Primitive::Cone {
                radius: 2.0,
                height: 6.0
            }
        );
        assert_eq!(solid.position, Point3::new(3.0, 0.0, 0.0));
        assert_eq!(solid.rotation, Plane::YZ.directed_revolve_rotation());
    }

    #[test]
    fn test_triangle_is_a_true_prism() {
        let triangle = ShapeDescriptor::new(ShapeKind::Triangle, Plane::XY, [0.0; 3])
            .with_parameter("side1", 5.0)
            .with_parameter("side2", 3.0)
            .with_parameter("side3", 4.0)
            .extruded_by(Some(2.0));
        let solid = extrude(&triangle).unwrap();
        let Primitive::TriangularPrism { vertices, depth } = solid.primitive else {
            panic!("expected a triangular prism");
        };
        assert_eq!(depth, 2.0);
        // Placing the profile back gives the outline's corners.
        let world: Vec<Point3<f64>> = vertices
            .iter()
            .map(|v| solid.position + nalgebra::Vector3::new(v.x, v.y, -1.0))
            .collect();
        assert_relative_eq!(world[0], Point3::new(0.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(world[1], Point3::new(3.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(world[2], Point3::new(0.0, 4.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_fallback_approximations() {
        let prism = Primitive::TriangularPrism {
            vertices: triangle_vertices(5.0, 3.0, 4.0),
            depth: 1.0,
        };
        let Primitive::Box {
            width,
            height,
            depth,
        } = prism.fallback()
        else {
            panic!("expected a box");
        };
        assert_relative_eq!(width, 3.0);
        assert_relative_eq!(height, 4.0, epsilon = 1e-12);
        assert_eq!(depth, 1.0);

        let ellipse = Primitive::EllipticCylinder {
            major_radius: 4.0,
            minor_radius: 2.0,
            length: 1.0,
        };
        assert_eq!(
            ellipse.fallback(),
            Primitive::TaperedCylinder {
                radius_top: 4.0,
                radius_bottom: 2.0,
                length: 1.0
            }
        );

        let cone = Primitive::Cone {
            radius: 1.0,
            height: 2.0,
        };
        assert_eq!(cone.fallback(), cone);
    }

    #[test]
    fn test_solid_serializes_with_primitive_kind() {
        let solid = Solid {
            primitive: Primitive::Cylinder {
                radius: 5.0,
                length: 1.0,
            },
            position: Point3::new(0.0, 0.0, 2.5),
            rotation: RotationState::new(FRAC_PI_2, 0.0, 0.0),
        };
        let value = serde_json::to_value(&solid).unwrap();
        assert_eq!(value["primitive"]["primitive_kind"], "cylinder");
        assert_eq!(
            value["primitive"]["primitive_kind"],
            solid.primitive.kind_name()
        );
        assert_eq!(solid.primitive.fallback().kind_name(), "cylinder");
        assert_eq!(value["primitive"]["radius"], 5.0);
        assert_eq!(value["position"], serde_json::json!([0.0, 0.0, 2.5]));
    }
}
