//! The spinning-cube scene: geometry, pipeline, and the two uniform
//! buffers that feed it
//!
//! All per-frame shader constants flow through runtime-declared layouts;
//! nothing in here hardcodes a byte offset. The WGSL structs in
//! `ember-render` mirror the descriptors built below.

use anyhow::Result;
use ember_core::{mat4_rotation_y, FieldKind};
use ember_render::{create_cube_mesh, Camera, GpuMesh, GpuUniformBuffer, MeshPipeline};
use ember_uniform::{FieldNode, LayoutDesc};

/// Per-frame constants: view-projection, eye, and two directional lights
fn frame_desc() -> Result<LayoutDesc> {
    let mut frame = FieldNode::new("frame", FieldKind::Struct);
    frame.add_child("view_proj", FieldKind::Float4x4)?;
    frame.add_child("eye", FieldKind::Float4)?;
    let lights = frame.add_child("lights", FieldKind::Array)?;
    lights.add_child("", FieldKind::Float4)?;
    lights.add_child("", FieldKind::Float4)?;
    Ok(LayoutDesc::new().with_node(frame))
}

/// Per-object constants: model matrix plus material tint
fn object_desc() -> Result<LayoutDesc> {
    let mut object = FieldNode::new("object", FieldKind::Struct);
    object.add_child("model", FieldKind::Float4x4)?;
    let mut material = FieldNode::new("material", FieldKind::Struct);
    material.add_child("tint", FieldKind::Float4)?;
    Ok(LayoutDesc::new().with_node(object).with_node(material))
}

pub struct Scene {
    pipeline: MeshPipeline,
    cube: GpuMesh,
    frame_uniforms: GpuUniformBuffer,
    object_uniforms: GpuUniformBuffer,
    frame_bind_group: wgpu::BindGroup,
    object_bind_group: wgpu::BindGroup,
    pub camera: Camera,
    angle: f32,
}

impl Scene {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, aspect: f32) -> Result<Self> {
        let pipeline = MeshPipeline::new(device, format);
        let cube = GpuMesh::upload(
            device,
            &create_cube_mesh(1.6, [0.85, 0.55, 0.25, 1.0]),
            "Cube",
        );

        let mut frame_uniforms =
            GpuUniformBuffer::new(device, &frame_desc()?, Some("Frame Uniforms"))?;
        let mut object_uniforms =
            GpuUniformBuffer::new(device, &object_desc()?, Some("Object Uniforms"))?;

        let frame_bind_group = frame_uniforms.bind_group(
            device,
            &pipeline.frame_bind_group_layout,
            Some("Frame Bind Group"),
        );
        let object_bind_group = object_uniforms.bind_group(
            device,
            &pipeline.object_bind_group_layout,
            Some("Object Bind Group"),
        );

        // Key and fill lights never change after setup; their writes dirty
        // the block once and ride along with the first frame's upload.
        frame_uniforms.write("frame.lights[0]", [0.5f32, 1.0, 0.3, 1.1])?;
        frame_uniforms.write("frame.lights[1]", [-0.4f32, -0.3, -0.6, 0.35])?;
        object_uniforms.write("material.tint", [1.0f32, 1.0, 1.0, 1.0])?;

        let mut camera = Camera::new();
        camera.aspect = aspect;

        Ok(Self {
            pipeline,
            cube,
            frame_uniforms,
            object_uniforms,
            frame_bind_group,
            object_bind_group,
            camera,
            angle: 0.0,
        })
    }

    /// Advance the cube's spin by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        self.angle = (self.angle + dt * 0.9) % std::f32::consts::TAU;
    }

    /// Write this frame's constants, upload whatever changed, and record
    /// one render pass drawing the cube
    pub fn render(
        &mut self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
    ) -> Result<()> {
        self.frame_uniforms
            .write("frame.view_proj", self.camera.view_projection_matrix())?;
        let [x, y, z] = self.camera.position_array();
        self.frame_uniforms.write("frame.eye", [x, y, z, 1.0])?;
        self.object_uniforms
            .write("object.model", mat4_rotation_y(self.angle))?;

        // A frame where neither camera nor cube moved uploads nothing
        self.frame_uniforms.update(queue);
        self.object_uniforms.update(queue);

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.015,
                        g: 0.02,
                        b: 0.03,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline.pipeline);
        pass.set_bind_group(0, &self.frame_bind_group, &[]);
        pass.set_bind_group(1, &self.object_bind_group, &[]);
        self.cube.draw(&mut pass);

        Ok(())
    }
}
