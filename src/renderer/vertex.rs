//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Convert an sRGB-encoded channel to linear light
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Colors for game elements (sRGB)
pub mod colors {
    const fn rgb(r: u8, g: u8, b: u8) -> [f32; 4] {
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
    }

    pub const BACKGROUND_TOP: [f32; 4] = rgb(0, 0, 0);
    pub const BACKGROUND_BOTTOM: [f32; 4] = rgb(119, 119, 156);
    pub const WALL_TOP: [f32; 4] = rgb(128, 128, 128);
    pub const WALL_BOTTOM: [f32; 4] = rgb(64, 64, 64);
    pub const WALL_OUTLINE: [f32; 4] = rgb(255, 255, 255);
    pub const PADDLE: [f32; 4] = rgb(255, 175, 175);
    pub const BALL: [f32; 4] = rgb(255, 255, 255);
    pub const BLOCK_PLAIN: [f32; 4] = rgb(150, 100, 150);
    pub const BLOCK_YELLOW: [f32; 4] = rgb(255, 255, 0);
    /// Block outlines fade from this at the top of the field to the fill color
    pub const BLOCK_OUTLINE_TOP: [f32; 4] = rgb(255, 255, 255);
}
