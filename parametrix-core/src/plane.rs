/// Construction planes and how their local axes map onto world space
use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;

use nalgebra::{Point3, Vector3};

use crate::error::EngineError;
use crate::transform::RotationState;

/// One of the three coordinate planes a flat shape is drawn on.
///
/// Local coordinates `(a, b)` plus a normal offset `n` land in world space as
///
/// | plane | world point        |
/// |-------|--------------------|
/// | `XY`  | `(x+a, y+b, z+n)`  |
/// | `XZ`  | `(x+a, y+n, z+b)`  |
/// | `YZ`  | `(x+n, y+a, z+b)`  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plane {
    XY,
    XZ,
    YZ,
}

impl Plane {
    pub const ALL: [Plane; 3] = [Plane::XY, Plane::XZ, Plane::YZ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Plane::XY => "XY",
            Plane::XZ => "XZ",
            Plane::YZ => "YZ",
        }
    }

    /// First and second in-plane axes.
    pub fn in_plane_axes(&self) -> (Vector3<f64>, Vector3<f64>) {
        match self {
            Plane::XY => (Vector3::x(), Vector3::y()),
            Plane::XZ => (Vector3::x(), Vector3::z()),
            Plane::YZ => (Vector3::y(), Vector3::z()),
        }
    }

    /// Extrusion direction.
    pub fn normal(&self) -> Vector3<f64> {
        match self {
            Plane::XY => Vector3::z(),
            Plane::XZ => Vector3::y(),
            Plane::YZ => Vector3::x(),
        }
    }

    /// Place local `(a, b)` relative to `origin`.
    pub fn place(&self, origin: &Point3<f64>, a: f64, b: f64) -> Point3<f64> {
        self.place_offset(origin, a, b, 0.0)
    }

    /// Place local `(a, b)` relative to `origin`, lifted `n` along the normal.
    pub fn place_offset(&self, origin: &Point3<f64>, a: f64, b: f64, n: f64) -> Point3<f64> {
        let (u, v) = self.in_plane_axes();
        origin + u * a + v * b + self.normal() * n
    }

    /// Rotation that turns a solid of revolution (axis on local `y`) so its
    /// axis lies along this plane's normal.
    pub fn revolve_rotation(&self) -> RotationState {
        match self {
            Plane::XY => RotationState::new(FRAC_PI_2, 0.0, 0.0),
            Plane::XZ => RotationState::zero(),
            Plane::YZ => RotationState::new(0.0, 0.0, FRAC_PI_2),
        }
    }

    /// Like [`Plane::revolve_rotation`], but local `+y` ends up on the
    /// positive normal. Needed for solids that are not symmetric along
    /// their axis (cones).
    pub fn directed_revolve_rotation(&self) -> RotationState {
        match self {
            Plane::YZ => RotationState::new(0.0, 0.0, -FRAC_PI_2),
            _ => self.revolve_rotation(),
        }
    }

    /// Rotation that maps local `x`, `y` onto the plane's in-plane axes and
    /// local `z` onto the normal axis (sign may flip, boxes and prisms are
    /// centered on their depth).
    pub fn frame_rotation(&self) -> RotationState {
        match self {
            Plane::XY => RotationState::zero(),
            Plane::XZ => RotationState::new(FRAC_PI_2, 0.0, 0.0),
            Plane::YZ => RotationState::new(FRAC_PI_2, FRAC_PI_2, 0.0),
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plane {
    type Err = EngineError;

    /// Accepts the short labels and the `*ConstructionPlane` names the
    /// command resolver emits. `ZX` is the same plane as `XZ`.
    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let trimmed = label.trim();
        let short = trimmed
            .strip_suffix("ConstructionPlane")
            .unwrap_or(trimmed)
            .to_ascii_uppercase();
        match short.as_str() {
            "XY" => Ok(Plane::XY),
            "XZ" | "ZX" => Ok(Plane::XZ),
            "YZ" => Ok(Plane::YZ),
            _ => Err(EngineError::UnknownPlane(label.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_labels() {
        assert_eq!("XY".parse::<Plane>().unwrap(), Plane::XY);
        assert_eq!("xz".parse::<Plane>().unwrap(), Plane::XZ);
        assert_eq!("ZX".parse::<Plane>().unwrap(), Plane::XZ);
        assert_eq!("YZConstructionPlane".parse::<Plane>().unwrap(), Plane::YZ);
        assert_eq!("ZXConstructionPlane".parse::<Plane>().unwrap(), Plane::XZ);
    }

    #[test]
    fn test_unknown_label() {
        let err = "XW".parse::<Plane>().unwrap_err();
        assert_eq!(err, EngineError::UnknownPlane("XW".to_string()));
    }

    #[test]
    fn test_place_maps_local_coordinates() {
        let origin = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(Plane::XY.place(&origin, 10.0, 20.0), Point3::new(11.0, 22.0, 3.0));
        assert_eq!(Plane::XZ.place(&origin, 10.0, 20.0), Point3::new(11.0, 2.0, 23.0));
        assert_eq!(Plane::YZ.place(&origin, 10.0, 20.0), Point3::new(1.0, 12.0, 23.0));
        assert_eq!(
            Plane::YZ.place_offset(&origin, 0.0, 0.0, 5.0),
            Point3::new(6.0, 2.0, 3.0)
        );
    }

    #[test]
    fn test_revolve_rotation_aligns_axis_with_normal() {
        for plane in Plane::ALL {
            let axis = Transform::rotation_matrix(&plane.revolve_rotation())
                .transform_vector(&Vector3::y());
            assert_relative_eq!(axis.dot(&plane.normal()).abs(), 1.0, epsilon = 1e-12);

            let directed = Transform::rotation_matrix(&plane.directed_revolve_rotation())
                .transform_vector(&Vector3::y());
            assert_relative_eq!(directed, plane.normal(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_frame_rotation_maps_local_axes_onto_plane() {
        for plane in Plane::ALL {
            let m = Transform::rotation_matrix(&plane.frame_rotation());
            let (u, v) = plane.in_plane_axes();
            assert_relative_eq!(m.transform_vector(&Vector3::x()), u, epsilon = 1e-12);
            assert_relative_eq!(m.transform_vector(&Vector3::y()), v, epsilon = 1e-12);
            let z = m.transform_vector(&Vector3::z());
            assert_relative_eq!(z.dot(&plane.normal()).abs(), 1.0, epsilon = 1e-12);
        }
    }
}
