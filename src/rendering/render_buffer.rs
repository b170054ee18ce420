//! # Render Buffer Module
//!
//! A CPU-side vertex buffer made of named, interleavable float attributes plus an index
//! list, ready to be handed to an external renderer.
//!
//! ## Architecture
//!
//! Attributes are referenced by name and kept in insertion order. Every attribute must
//! describe the same number of vertices; the first attribute attached fixes that count.
//! Raw bytes for upload are produced with `bytemuck` without copying.

use bytemuck::cast_slice;
use log::debug;

use crate::error::{PipelineError, Result};

/// Name and width of one vertex attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeDescriptor {
    /// Attribute name, unique within a buffer
    pub name: String,
    /// Number of `f32` components per vertex
    pub num_components: usize,
}

impl AttributeDescriptor {
    /// Creates a descriptor.
    pub fn new(name: impl Into<String>, num_components: usize) -> Self {
        AttributeDescriptor {
            name: name.into(),
            num_components,
        }
    }
}

/// A set of named vertex attributes and the indices that draw them.
///
/// # Examples
///
/// ```
/// use block_voxeliser::rendering::{AttributeDescriptor, RenderBuffer};
///
/// let mut buffer = RenderBuffer::new();
/// buffer
///     .attach_new_attribute(AttributeDescriptor::new("position", 3), vec![0.0; 12])
///     .unwrap();
/// assert_eq!(buffer.vertex_count(), 4);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderBuffer {
    attributes: Vec<(AttributeDescriptor, Vec<f32>)>,
    indices: Vec<u32>,
}

impl RenderBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an independent copy of this buffer.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Adds an attribute.
    ///
    /// # Arguments
    /// * `descriptor` - Name and component count
    /// * `data` - Flat component data, `num_components` values per vertex
    ///
    /// # Returns
    /// `DuplicateAttribute` if the name is taken, `BufferMismatch` if the data does not
    /// describe the same number of vertices as the attributes already present.
    pub fn attach_new_attribute(
        &mut self,
        descriptor: AttributeDescriptor,
        data: Vec<f32>,
    ) -> Result<()> {
        if self.attribute(&descriptor.name).is_some() {
            return Err(PipelineError::DuplicateAttribute(descriptor.name));
        }

        if descriptor.num_components == 0 || data.len() % descriptor.num_components != 0 {
            return Err(PipelineError::Configuration(format!(
                "attribute '{}' has {} values, not a multiple of {} components",
                descriptor.name,
                data.len(),
                descriptor.num_components
            )));
        }

        let vertices = data.len() / descriptor.num_components;
        if !self.attributes.is_empty() && vertices != self.vertex_count() {
            return Err(PipelineError::BufferMismatch {
                expected: self.vertex_count(),
                actual: vertices,
            });
        }

        debug!(
            "Attaching attribute '{}' ({} components, {} vertices)",
            descriptor.name, descriptor.num_components, vertices
        );
        self.attributes.push((descriptor, data));
        Ok(())
    }

    /// Removes an attribute by name.
    ///
    /// # Returns
    /// The removed data, or `None` if no attribute has that name.
    pub fn remove_attribute(&mut self, name: &str) -> Option<Vec<f32>> {
        let index = self.attributes.iter().position(|(d, _)| d.name == name)?;
        Some(self.attributes.remove(index).1)
    }

    /// Looks up an attribute's data by name.
    pub fn attribute(&self, name: &str) -> Option<&[f32]> {
        self.attributes
            .iter()
            .find(|(d, _)| d.name == name)
            .map(|(_, data)| data.as_slice())
    }

    /// The attribute descriptors in insertion order.
    pub fn descriptors(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.attributes.iter().map(|(d, _)| d)
    }

    /// Number of vertices described by the attributes, zero for an empty buffer.
    pub fn vertex_count(&self) -> usize {
        self.attributes
            .first()
            .map(|(d, data)| data.len() / d.num_components)
            .unwrap_or(0)
    }

    /// The index list.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Replaces the index list.
    pub fn set_indices(&mut self, indices: Vec<u32>) {
        self.indices = indices;
    }

    /// Raw bytes of an attribute, suitable for a vertex buffer upload.
    pub fn attribute_bytes(&self, name: &str) -> Option<&[u8]> {
        self.attribute(name).map(cast_slice)
    }

    /// Raw bytes of the index list.
    pub fn index_bytes(&self) -> &[u8] {
        cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_position() -> RenderBuffer {
        let mut buffer = RenderBuffer::new();
        buffer
            .attach_new_attribute(AttributeDescriptor::new("position", 3), vec![1.0; 6])
            .unwrap();
        buffer
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut buffer = with_position();
        let result = buffer.attach_new_attribute(AttributeDescriptor::new("position", 3), vec![]);
        assert!(matches!(result, Err(PipelineError::DuplicateAttribute(name)) if name == "position"));
    }

    #[test]
    fn rejects_mismatched_vertex_counts() {
        let mut buffer = with_position();
        let result = buffer.attach_new_attribute(AttributeDescriptor::new("uv", 2), vec![0.0; 6]);
        assert!(matches!(
            result,
            Err(PipelineError::BufferMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn copy_is_independent() {
        let original = with_position();
        let mut copy = original.copy();
        copy.attach_new_attribute(AttributeDescriptor::new("uv", 2), vec![0.5; 4])
            .unwrap();
        assert!(copy.remove_attribute("position").is_some());

        assert!(original.attribute("position").is_some());
        assert!(original.attribute("uv").is_none());
        assert_eq!(copy.descriptors().count(), 1);
    }

    #[test]
    fn bytes_cover_every_component() {
        let mut buffer = with_position();
        buffer.set_indices(vec![0, 1, 0]);
        assert_eq!(buffer.attribute_bytes("position").unwrap().len(), 6 * 4);
        assert_eq!(buffer.index_bytes().len(), 3 * 4);
        assert!(buffer.attribute_bytes("missing").is_none());
    }
}
