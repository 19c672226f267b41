//! Ember Render - wgpu plumbing for the Ember demos
//!
//! This crate owns the GPU side of the uniform layout engine: window and
//! offscreen contexts, the GPU-resident uniform buffer that uploads only
//! when its block's contents change, and the small forward pipeline the
//! demos draw with.

mod camera;
mod context;
mod gpu_mesh;
mod headless;
mod pipeline;
mod primitives;
mod uniform_buffer;

pub use camera::Camera;
pub use context::{RenderContext, RenderError, DEPTH_FORMAT};
pub use gpu_mesh::GpuMesh;
pub use headless::HeadlessContext;
pub use pipeline::MeshPipeline;
pub use primitives::{create_cube_mesh, Mesh, Vertex};
pub use uniform_buffer::GpuUniformBuffer;

#[cfg(test)]
mod tests {
    #[test]
    fn mesh_shader_wgsl_parses() {
        let source = include_str!("shader.wgsl");
        naga::front::wgsl::parse_str(source).expect("shader.wgsl failed to parse");
    }
}
