/// Descriptor snapshots and the command resolver's replies
///
/// The engine never owns the shape collection. [`ShapeList`] is the
/// snapshot the application keeps: it is loaded from and saved to a JSON
/// array, and every edit replaces a whole descriptor.
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::extrude::DEFAULT_EXTRUSION;
use crate::shape::{ShapeDescriptor, ShapeKind};

/// `"<kind>_<n>"`, where `n` counts the shapes of that kind already present
/// plus one. Kinds compare the way [`ShapeKind`] parses them, ignoring case
/// and surrounding blanks.
///
/// Names are a count, not a sequence: after a removal the next shape of the
/// same kind can repeat an existing name.
pub fn next_name(kind: &str, existing: &[ShapeDescriptor]) -> String {
    let label = match kind.parse::<ShapeKind>() {
        Ok(kind) => kind.as_str().to_string(),
        Err(_) => kind.trim().to_ascii_lowercase(),
    };
    let count = existing
        .iter()
        .filter(|d| d.kind.trim().eq_ignore_ascii_case(&label))
        .count();
    format!("{}_{}", label, count + 1)
}

/// Ordered shape collection.
///
/// Entries are decoded one at a time. One that is not a descriptor at all is
/// kept as [`ShapeDescriptor::undecodable`], so it shows up as a skipped
/// shape and the rest of the snapshot still renders. Such an entry is
/// written back with only the kind and name it carried.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ShapeList {
    shapes: Vec<ShapeDescriptor>,
}

impl<'de> Deserialize<'de> for ShapeList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<Value>::deserialize(deserializer)?;
        let shapes = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                ShapeDescriptor::deserialize(entry).unwrap_or_else(|error| {
                    warn!(index, %error, "undecodable shape entry");
                    ShapeDescriptor::undecodable(entry, &error)
                })
            })
            .collect();
        Ok(Self { shapes })
    }
}

impl ShapeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn as_slice(&self) -> &[ShapeDescriptor] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ShapeDescriptor> {
        self.shapes.get(index)
    }

    /// Append a freshly resolved descriptor: it gets a generated name and
    /// starts flat. Returns the new index.
    pub fn push(&mut self, mut descriptor: ShapeDescriptor) -> usize {
        descriptor.name = Some(next_name(&descriptor.kind, &self.shapes));
        descriptor.extruded = false;
        descriptor.extrusion_amount = None;
        self.shapes.push(descriptor);
        self.shapes.len() - 1
    }

    /// Swap in an edited descriptor. Returns the old one.
    pub fn replace(&mut self, index: usize, descriptor: ShapeDescriptor) -> Option<ShapeDescriptor> {
        let slot = self.shapes.get_mut(index)?;
        Some(std::mem::replace(slot, descriptor))
    }

    /// Mark a shape extruded, keeping its amount or falling back to
    /// [`DEFAULT_EXTRUSION`]. Returns `false` for an out of range index.
    pub fn set_extruded(&mut self, index: usize) -> bool {
        let Some(shape) = self.shapes.get_mut(index) else {
            return false;
        };
        shape.extruded = true;
        shape.extrusion_amount = Some(shape.extrusion_amount.unwrap_or(DEFAULT_EXTRUSION));
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<ShapeDescriptor> {
        (index < self.shapes.len()).then(|| self.shapes.remove(index))
    }
}

impl From<Vec<ShapeDescriptor>> for ShapeList {
    fn from(shapes: Vec<ShapeDescriptor>) -> Self {
        Self { shapes }
    }
}

/// Reply of the natural-language command resolver.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResolverResponse {
    Failed { error: String },
    Shape(ShapeDescriptor),
}

impl ResolverResponse {
    pub fn parse(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn into_result(self) -> Result<ShapeDescriptor, String> {
        match self {
            ResolverResponse::Shape(descriptor) => Ok(descriptor),
            ResolverResponse::Failed { error } => Err(error),
        }
    }
}
