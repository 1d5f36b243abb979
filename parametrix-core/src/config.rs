/// Render pass inputs for the flat view
use serde::{Deserialize, Serialize};

use crate::projection::{AxonometricProjector, CanvasSize};

/// Everything a 2D render pass needs besides the descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Pixels per world unit
    pub unit: f64,
    /// Axes are drawn from `-axis_extent` to `+axis_extent`
    pub axis_extent: f64,
}

impl ViewConfig {
    /// Full-size coordinate plane view.
    pub fn coordinate_plane() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 700.0,
            unit: 16.0,
            axis_extent: 64.0,
        }
    }

    /// Smaller tutorial view.
    pub fn compact() -> Self {
        Self {
            canvas_width: 600.0,
            canvas_height: 400.0,
            unit: 20.0,
            axis_extent: 15.0,
        }
    }

    pub fn canvas(&self) -> CanvasSize {
        CanvasSize::new(self.canvas_width, self.canvas_height)
    }

    pub fn projector(&self) -> AxonometricProjector {
        AxonometricProjector::new(self.canvas(), self.unit)
    }

    /// Same view on a differently sized surface.
    pub fn resized(&self, canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            canvas_width,
            canvas_height,
            ..*self
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::coordinate_plane()
    }
}
