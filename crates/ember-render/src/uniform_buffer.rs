//! GPU-resident uniform buffers with change-detected uploads

use bytemuck::Pod;
use ember_core::Result;
use ember_uniform::{LayoutDesc, UniformBlock};
use wgpu::util::DeviceExt;

/// A [`UniformBlock`] paired with its GPU buffer.
///
/// The buffer is created once, sized to the block's padded layout and
/// initialized with the zeroed store, which records the block's hash
/// baseline. After that, [`update`](Self::update) uploads the whole store
/// verbatim, but only on frames where some write actually changed a byte.
pub struct GpuUniformBuffer {
    block: UniformBlock,
    buffer: wgpu::Buffer,
}

impl GpuUniformBuffer {
    /// Compile `desc` and create the backing GPU buffer
    pub fn new(device: &wgpu::Device, desc: &LayoutDesc, label: Option<&str>) -> Result<Self> {
        let block = UniformBlock::new(desc)?;
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label,
            contents: block.bytes(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        Ok(Self { block, buffer })
    }

    /// The CPU-side block, for reads and layout inspection
    pub fn block(&self) -> &UniformBlock {
        &self.block
    }

    pub fn block_mut(&mut self) -> &mut UniformBlock {
        &mut self.block
    }

    /// Write a named field on the CPU-side block
    pub fn write<T: Pod>(&mut self, name: &str, value: T) -> Result<()> {
        self.block.write(name, value)
    }

    /// Read a named field back from the CPU-side block
    pub fn read<T: Pod>(&self, name: &str) -> Result<T> {
        self.block.read(name)
    }

    /// Upload the store if it changed since the last upload. Returns true
    /// when bytes actually moved; a clean block skips the queue entirely.
    pub fn update(&mut self, queue: &wgpu::Queue) -> bool {
        if !self.block.is_dirty() {
            return false;
        }
        queue.write_buffer(&self.buffer, 0, self.block.bytes());
        self.block.mark_clean();
        true
    }

    /// The GPU handle, for binding into a draw call
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn binding(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }

    /// Build a single-entry bind group pointing at this buffer
    pub fn bind_group(
        &self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: Option<&str>,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label,
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: self.binding(),
            }],
        })
    }
}
