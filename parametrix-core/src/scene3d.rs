/// Solid view: extruded descriptors placed as scene nodes
use tracing::{debug, warn};

use crate::error::SkippedShape;
use crate::extrude::{extrude, Solid};
use crate::geometry::Mesh;
use crate::scene2d::StrokeColor;
use crate::shape::ShapeDescriptor;
use crate::tessellate::tessellate;

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub color: StrokeColor,
    pub solid: Solid,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
    pub skipped: Vec<SkippedShape>,
}

impl Scene {
    /// All nodes tessellated into one world-space mesh.
    pub fn mesh(&self) -> Mesh {
        let mut mesh = Mesh::new();
        for node in &self.nodes {
            mesh.append(tessellate(&node.solid));
        }
        mesh
    }
}

/// Place a solid for every extruded descriptor. Flat descriptors are left
/// out; invalid ones are reported and skipped. Solids may overlap.
pub fn compose(descriptors: &[ShapeDescriptor]) -> Scene {
    let mut scene = Scene::default();

    for (index, descriptor) in descriptors.iter().enumerate() {
        if !descriptor.extruded {
            continue;
        }
        let name = descriptor.display_name(index);
        let node = descriptor.shape_kind().and_then(|kind| {
            extrude(descriptor).map(|solid| SceneNode {
                name: name.clone(),
                color: StrokeColor::for_kind(kind),
                solid,
            })
        });
        match node {
            Ok(node) => scene.nodes.push(node),
            Err(error) => {
                warn!(shape = %name, %error, "skipping shape in 3D view");
                scene.skipped.push(SkippedShape { index, name, error });
            }
        }
    }

    debug!(
        solids = scene.nodes.len(),
        skipped = scene.skipped.len(),
        "3D pass complete"
    );
    scene
}
