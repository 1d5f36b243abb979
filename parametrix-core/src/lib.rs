/// Parametrix Core Library - Shape geometry engine
///
/// Stateless transform pipeline shared by every front end: shape
/// descriptors become outlines for the flat axonometric view and oriented
/// solids for the extruded 3D view.

pub mod config;
pub mod error;
pub mod extrude;
pub mod geometry;
pub mod outline;
pub mod plane;
pub mod projection;
pub mod scene2d;
pub mod scene3d;
pub mod shape;
pub mod stl;
pub mod store;
pub mod tessellate;
pub mod transform;

// Re-export commonly used types
pub use config::ViewConfig;
pub use error::{EngineError, SkippedShape};
pub use extrude::{extrude, Primitive, Solid, DEFAULT_EXTRUSION};
pub use geometry::{Mesh, Triangle, Vertex};
pub use outline::{outline, Outline};
pub use plane::Plane;
pub use projection::{AxonometricProjector, Camera, CanvasSize, ProjectionMode};
pub use scene2d::{render, DrawCommand, Frame, StrokeColor};
pub use scene3d::{compose, Scene, SceneNode};
pub use shape::{ResolvedShape, Shape, ShapeDescriptor, ShapeKind};
pub use store::{ResolverResponse, ShapeList};
pub use transform::{RotationState, Transform};
