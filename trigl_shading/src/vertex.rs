//! Descriptions of interleaved `f32` vertex data.
//!
//! These are plain values; they only say how to read a buffer. Turning a layout into vertex
//! attribute pointers is up to the backend, which looks each attribute up by name in a linked
//! program.

use std::mem::size_of;

/// One shader input within an interleaved vertex. `components` and `offset` are counted in
/// floats, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: &'static str,
    pub components: usize,
    pub offset: usize,
}

impl VertexAttribute {
    pub const fn new(name: &'static str, components: usize, offset: usize) -> Self {
        Self { name, components, offset }
    }

    pub fn byte_offset(&self) -> usize {
        self.offset * size_of::<f32>()
    }
}

/// A set of attributes sharing one stride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: &'static [VertexAttribute],
    stride: usize,
}

impl VertexLayout {
    pub const fn new(attributes: &'static [VertexAttribute], stride: usize) -> Self {
        Self { attributes, stride }
    }

    pub fn attributes(&self) -> &'static [VertexAttribute] { self.attributes }

    /// Floats per vertex.
    pub fn stride(&self) -> usize { self.stride }

    pub fn byte_stride(&self) -> usize {
        self.stride * size_of::<f32>()
    }

    /// Whole vertices in `data`. A trailing partial vertex is not counted.
    pub fn vertex_count(&self, data: &[f32]) -> usize {
        if self.stride == 0 { 0 } else { data.len() / self.stride }
    }

    /// True if every attribute lies inside the stride and no two attributes overlap.
    pub fn is_well_formed(&self) -> bool {
        let mut spans: Vec<(usize, usize)> = self.attributes
            .iter()
            .map(|a| (a.offset, a.offset + a.components))
            .collect();
        spans.sort_unstable();

        let inside = spans.iter().all(|&(start, end)| start < end && end <= self.stride);
        let disjoint = spans.windows(2).all(|w| w[0].1 <= w[1].0);

        inside && disjoint
    }
}
