use bytemuck::{Pod, Zeroable};

use crate::buffer::{AttributeLayout, DataLayout};

/// Interleaved position + normal vertex.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    /// Slot 0: position, slot 1: normal.
    pub fn layout() -> DataLayout {
        DataLayout::from([
            (0, AttributeLayout::new(3, 0)),
            (1, AttributeLayout::new(3, 12)),
        ])
    }
}
