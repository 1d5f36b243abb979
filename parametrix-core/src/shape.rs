/// Shape descriptors and their validation into typed shapes
///
/// A [`ShapeDescriptor`] is the loosely typed record exchanged with the
/// command resolver and the shape store. Geometry code never reads it
/// directly: it goes through [`ShapeDescriptor::resolve`], which checks the
/// kind, the parameters and the plane once and hands back a [`ResolvedShape`].
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, Result};
use crate::plane::Plane;

/// Upper bound on polygon sides; outlines and prisms allocate one vertex
/// per side.
pub const MAX_POLYGON_SIDES: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Circle,
    Rectangle,
    Triangle,
    Ellipse,
    Polygon,
    Cone,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Circle,
        ShapeKind::Rectangle,
        ShapeKind::Triangle,
        ShapeKind::Ellipse,
        ShapeKind::Polygon,
        ShapeKind::Cone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Cone => "cone",
        }
    }

    /// Parameter keys a descriptor of this kind must carry.
    pub fn required_parameters(&self) -> &'static [&'static str] {
        match self {
            ShapeKind::Circle => &["radius"],
            ShapeKind::Rectangle => &["width", "height"],
            ShapeKind::Triangle => &["side1", "side2", "side3"],
            ShapeKind::Ellipse => &["major_radius", "minor_radius"],
            ShapeKind::Polygon => &["radius", "sides"],
            ShapeKind::Cone => &["radius", "height"],
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let kind = s.trim().to_ascii_lowercase();
        ShapeKind::ALL
            .into_iter()
            .find(|k| k.as_str() == kind)
            .ok_or_else(|| EngineError::UnsupportedShape(s.to_string()))
    }
}

/// Serializable shape record, as produced by the command resolver and kept
/// by the shape store.
///
/// Decoding is lenient: kind, plane, parameter values and coordinates are
/// only checked by [`ShapeDescriptor::resolve`], so a malformed record is
/// skipped by a render pass instead of failing the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    #[serde(rename = "shape", alias = "kind", default)]
    pub kind: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,
    #[serde(default)]
    pub plane: String,
    #[serde(default)]
    pub coordinates: Vec<Value>,
    #[serde(default)]
    pub extruded: bool,
    #[serde(
        rename = "extrusionAmount",
        alias = "height",
        alias = "depth",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub extrusion_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Set when the record could not be decoded at all.
    #[serde(skip)]
    decode_error: Option<String>,
}

impl ShapeDescriptor {
    pub fn new(kind: ShapeKind, plane: Plane, coordinates: [f64; 3]) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            parameters: BTreeMap::new(),
            plane: plane.as_str().to_string(),
            coordinates: coordinates.iter().map(|&c| Value::from(c)).collect(),
            extruded: false,
            extrusion_amount: None,
            name: None,
            decode_error: None,
        }
    }

    /// Stand-in for a JSON entry that is not a descriptor at all, keeping
    /// whatever kind and name it carries. It always fails to resolve.
    pub fn undecodable(entry: &Value, error: &serde_json::Error) -> Self {
        let text = |key: &str| entry.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            kind: text("shape").or_else(|| text("kind")).unwrap_or_default(),
            parameters: BTreeMap::new(),
            plane: String::new(),
            coordinates: Vec::new(),
            extruded: false,
            extrusion_amount: None,
            name: text("name"),
            decode_error: Some(error.to_string()),
        }
    }

    pub fn with_parameter(mut self, key: &str, value: f64) -> Self {
        self.parameters.insert(key.to_string(), Value::from(value));
        self
    }

    /// Mark as extruded. `None` leaves the depth to the engine default.
    pub fn extruded_by(mut self, amount: Option<f64>) -> Self {
        self.extruded = true;
        self.extrusion_amount = amount;
        self
    }

    pub fn shape_kind(&self) -> Result<ShapeKind> {
        self.kind.parse()
    }

    pub fn construction_plane(&self) -> Result<Plane> {
        self.plane.parse()
    }

    /// Name shown to the user, falling back to the list position.
    pub fn display_name(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{}#{}", self.kind, index + 1),
        }
    }

    /// Validate the descriptor into a typed shape placed on its plane.
    pub fn resolve(&self) -> Result<ResolvedShape> {
        if let Some(reason) = &self.decode_error {
            let kind = if self.kind.is_empty() {
                "unknown"
            } else {
                self.kind.as_str()
            };
            return Err(EngineError::invalid(kind, reason.clone()));
        }
        let kind = self.shape_kind()?;
        let shape = Shape::from_parameters(kind, &self.parameters)?;
        let plane = self.construction_plane()?;
        let origin = self.origin().ok_or_else(|| {
            EngineError::invalid(kind.as_str(), "coordinates must be three finite numbers")
        })?;
        Ok(ResolvedShape {
            shape,
            plane,
            origin,
        })
    }

    fn origin(&self) -> Option<Point3<f64>> {
        let [x, y, z] = self.coordinates.as_slice() else {
            return None;
        };
        let coord = |v: &Value| v.as_f64().filter(|c| c.is_finite());
        Some(Point3::new(coord(x)?, coord(y)?, coord(z)?))
    }
}

/// A shape with validated, typed parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f64 },
    Rectangle { width: f64, height: f64 },
    Triangle { side1: f64, side2: f64, side3: f64 },
    Ellipse { major_radius: f64, minor_radius: f64 },
    Polygon { radius: f64, sides: usize },
    Cone { radius: f64, height: f64 },
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle { .. } => ShapeKind::Circle,
            Shape::Rectangle { .. } => ShapeKind::Rectangle,
            Shape::Triangle { .. } => ShapeKind::Triangle,
            Shape::Ellipse { .. } => ShapeKind::Ellipse,
            Shape::Polygon { .. } => ShapeKind::Polygon,
            Shape::Cone { .. } => ShapeKind::Cone,
        }
    }

    /// Build from a parameter map. Extra keys are ignored; missing,
    /// non-numeric, non-finite or non-positive values are rejected.
    pub fn from_parameters(kind: ShapeKind, parameters: &BTreeMap<String, Value>) -> Result<Self> {
        let param = |key: &str| -> Result<f64> {
            let raw = parameters
                .get(key)
                .ok_or_else(|| EngineError::invalid(kind.as_str(), format!("missing `{key}`")))?;
            let value = raw.as_f64().ok_or_else(|| {
                EngineError::invalid(kind.as_str(), format!("`{key}` must be a number, got {raw}"))
            })?;
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::invalid(
                    kind.as_str(),
                    format!("`{key}` must be a positive number, got {value}"),
                ));
            }
            Ok(value)
        };

        let shape = match kind {
            ShapeKind::Circle => Shape::Circle {
                radius: param("radius")?,
            },
            ShapeKind::Rectangle => Shape::Rectangle {
                width: param("width")?,
                height: param("height")?,
            },
            ShapeKind::Triangle => {
                let (side1, side2, side3) = (param("side1")?, param("side2")?, param("side3")?);
                if side1 >= side2 + side3 || side2 >= side1 + side3 || side3 >= side1 + side2 {
                    return Err(EngineError::invalid(
                        kind.as_str(),
                        format!("sides {side1}, {side2}, {side3} violate the triangle inequality"),
                    ));
                }
                Shape::Triangle { side1, side2, side3 }
            }
            ShapeKind::Ellipse => Shape::Ellipse {
                major_radius: param("major_radius")?,
                minor_radius: param("minor_radius")?,
            },
            ShapeKind::Polygon => {
                let radius = param("radius")?;
                let sides = param("sides")?;
                if sides.fract() != 0.0 || sides < 3.0 || sides > MAX_POLYGON_SIDES as f64 {
                    return Err(EngineError::invalid(
                        kind.as_str(),
                        format!(
                            "`sides` must be a whole number from 3 to {MAX_POLYGON_SIDES}, got {sides}"
                        ),
                    ));
                }
                Shape::Polygon {
                    radius,
                    sides: sides as usize,
                }
            }
            ShapeKind::Cone => Shape::Cone {
                radius: param("radius")?,
                height: param("height")?,
            },
        };
        Ok(shape)
    }
}

/// Output of [`ShapeDescriptor::resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedShape {
    pub shape: Shape,
    pub plane: Plane,
    pub origin: Point3<f64>,
}
