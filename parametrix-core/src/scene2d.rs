/// Flat view: axes and shape outlines as draw commands
///
/// A pass is a pure function of the descriptor list and the view. The
/// caller owns the actual surface and replays the commands on it.
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ViewConfig;
use crate::error::SkippedShape;
use crate::outline::outline_of;
use crate::shape::{ShapeDescriptor, ShapeKind};

pub const AXIS_LINE_WIDTH: f64 = 1.0;
pub const SHAPE_LINE_WIDTH: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeColor {
    Blue,
    Green,
    Red,
    Purple,
    Orange,
    Gray,
}

impl StrokeColor {
    pub fn for_kind(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Circle => StrokeColor::Blue,
            ShapeKind::Rectangle => StrokeColor::Green,
            ShapeKind::Triangle => StrokeColor::Red,
            ShapeKind::Ellipse | ShapeKind::Cone => StrokeColor::Purple,
            ShapeKind::Polygon => StrokeColor::Orange,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        width: f64,
        height: f64,
    },
    Polyline {
        points: Vec<Point2<f64>>,
        color: StrokeColor,
        line_width: f64,
    },
}

/// Result of one render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
    pub skipped: Vec<SkippedShape>,
}

impl Frame {
    /// Shape polylines, without the clear command and the axes.
    pub fn shape_strokes(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().skip(4)
    }
}

/// Clear, draw the three axes, then every shape in list order.
pub fn render(descriptors: &[ShapeDescriptor], view: &ViewConfig) -> Frame {
    let projector = view.projector();
    let mut frame = Frame::default();

    frame.commands.push(DrawCommand::Clear {
        width: view.canvas_width,
        height: view.canvas_height,
    });

    let e = view.axis_extent;
    let axes = [
        (Point3::new(-e, 0.0, 0.0), Point3::new(e, 0.0, 0.0)),
        (Point3::new(0.0, -e, 0.0), Point3::new(0.0, e, 0.0)),
        (Point3::new(0.0, 0.0, -e), Point3::new(0.0, 0.0, e)),
    ];
    for (start, end) in axes {
        frame.commands.push(DrawCommand::Polyline {
            points: vec![projector.project_point(&start), projector.project_point(&end)],
            color: StrokeColor::Gray,
            line_width: AXIS_LINE_WIDTH,
        });
    }

    for (index, descriptor) in descriptors.iter().enumerate() {
        match descriptor.resolve() {
            Ok(resolved) => {
                let points = outline_of(&resolved)
                    .polyline()
                    .iter()
                    .map(|p| projector.project_point(p))
                    .collect();
                frame.commands.push(DrawCommand::Polyline {
                    points,
                    color: StrokeColor::for_kind(resolved.shape.kind()),
                    line_width: SHAPE_LINE_WIDTH,
                });
            }
            Err(error) => {
                let name = descriptor.display_name(index);
                warn!(shape = %name, %error, "skipping shape in 2D view");
                frame.skipped.push(SkippedShape { index, name, error });
            }
        }
    }

    debug!(
        drawn = descriptors.len() - frame.skipped.len(),
        skipped = frame.skipped.len(),
        "2D pass complete"
    );
    frame
}
