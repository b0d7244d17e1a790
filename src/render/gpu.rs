//! GPU submission helpers for draw batches (WebGPU/wgpu).

use wgpu::util::DeviceExt;

use super::batch::{DrawBatch, PointVertex};

const POINT_VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2, 2 => Float32x4];

impl PointVertex {
    /// Vertex buffer layout: location 0 position, 1 uv, 2 color.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &POINT_VERTEX_ATTRIBUTES,
        }
    }
}

/// One draw batch uploaded to GPU buffers.
pub struct GpuBatch {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuBatch {
    /// Upload a batch's vertex and index data.
    pub fn upload(device: &wgpu::Device, batch: &DrawBatch) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Cloud Vertices"),
            contents: bytemuck::cast_slice(&batch.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Cloud Indices"),
            contents: bytemuck::cast_slice(&batch.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: batch.indices.len() as u32,
        }
    }

    /// Upload every batch in order.
    pub fn upload_all(device: &wgpu::Device, batches: &[DrawBatch]) -> Vec<Self> {
        batches.iter().map(|b| Self::upload(device, b)).collect()
    }
}
