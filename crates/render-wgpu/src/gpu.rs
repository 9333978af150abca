use crate::material::{self, GpuMaterial, GpuTexture};
use crate::mesh::{GpuMesh, GpuVertex};
use crate::shaders::{self, LIT_ENTRY_POINTS, MAX_LIGHTS};
use bytemuck::{Pod, Zeroable};
use orbit_render::FlyCamera;
use orbit_scene::{CLEAR_COLOR, DirectionalLight, Scene, ShaderProgram, TextureData};
use wgpu::util::DeviceExt;

/// Errors from the wgpu backend.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("entity `{entity}` references mesh {mesh} which was never uploaded")]
    MissingMesh { entity: String, mesh: usize },
    #[error("entity `{entity}` references material {material} which was never uploaded")]
    MissingMaterial { entity: String, material: usize },
    #[error("material `{material}` uses entry points {vertex}/{fragment}, which the lit shader does not define")]
    UnknownEntryPoint {
        material: String,
        vertex: String,
        fragment: String,
    },
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct LightUniform {
    ambient: [f32; 4],
    diffuse: [f32; 4],
    direction: [f32; 4],
}

impl From<&DirectionalLight> for LightUniform {
    fn from(light: &DirectionalLight) -> Self {
        Self {
            ambient: light.ambient.to_array(),
            diffuse: light.diffuse.to_array(),
            direction: light.direction.extend(0.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct FrameUniforms {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    lights: [LightUniform; MAX_LIGHTS],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct EntityUniforms {
    world: [[f32; 4]; 4],
}

const ENTITY_UNIFORM_SIZE: u64 = std::mem::size_of::<EntityUniforms>() as u64;

/// Round `size` up to the next multiple of `alignment`.
fn align_to(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

fn frame_uniforms(camera: &FlyCamera, lights: &[DirectionalLight]) -> FrameUniforms {
    let mut packed = [LightUniform::zeroed(); MAX_LIGHTS];
    for (slot, light) in packed.iter_mut().zip(lights) {
        *slot = LightUniform::from(light);
    }
    FrameUniforms {
        view: camera.view_matrix().to_cols_array_2d(),
        projection: camera.projection_matrix().to_cols_array_2d(),
        lights: packed,
    }
}

/// Per-entity world matrices, one per `stride`-byte slot, in draw order.
fn entity_slots(scene: &Scene, stride: u64) -> Vec<u8> {
    let mut bytes = vec![0u8; (stride as usize) * scene.entity_count()];
    for (i, entity) in scene.entities().iter().enumerate() {
        let start = i * stride as usize;
        let uniforms = EntityUniforms {
            world: entity.draw_matrix(),
        };
        bytes[start..start + ENTITY_UNIFORM_SIZE as usize]
            .copy_from_slice(bytemuck::bytes_of(&uniforms));
    }
    bytes
}

/// wgpu scene renderer.
///
/// Mirrors the scene's mesh and material lists on the GPU. Both lists are
/// append-only in the scene, so new entries are uploaded lazily at the start
/// of a frame and existing ones are never touched.
pub struct WgpuRenderer {
    surface_format: wgpu::TextureFormat,
    pipeline_layout: wgpu::PipelineLayout,
    shader: wgpu::ShaderModule,
    /// One pipeline per distinct shader program in use.
    pipelines: Vec<(ShaderProgram, wgpu::RenderPipeline)>,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    entity_layout: wgpu::BindGroupLayout,
    entity_buffer: wgpu::Buffer,
    entity_bind_group: wgpu::BindGroup,
    entity_stride: u64,
    entity_capacity: usize,
    material_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    default_texture: GpuTexture,
    meshes: Vec<GpuMesh>,
    materials: Vec<GpuMaterial>,
    depth_texture: wgpu::TextureView,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame_uniform_buffer"),
            contents: bytemuck::bytes_of(&FrameUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let entity_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("entity_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(ENTITY_UNIFORM_SIZE),
                },
                count: None,
            }],
        });

        let entity_stride = align_to(
            ENTITY_UNIFORM_SIZE,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let entity_capacity = 16;
        let (entity_buffer, entity_bind_group) =
            Self::create_entity_slots(device, &entity_layout, entity_stride, entity_capacity);

        let material_layout = material::bind_group_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lit_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &entity_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lit_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::LIT_SHADER.into()),
        });

        let sampler = material::create_sampler(device);
        let default_texture =
            GpuTexture::upload(device, queue, &TextureData::white(), "default_texture");
        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            surface_format,
            pipeline_layout,
            shader,
            pipelines: Vec::new(),
            frame_buffer,
            frame_bind_group,
            entity_layout,
            entity_buffer,
            entity_bind_group,
            entity_stride,
            entity_capacity,
            material_layout,
            sampler,
            default_texture,
            meshes: Vec::new(),
            materials: Vec::new(),
            depth_texture,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Upload any meshes and materials added to the scene since the last call.
    pub fn sync_assets(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &Scene,
    ) -> Result<(), RenderError> {
        for mesh in scene.meshes().iter().skip(self.meshes.len()) {
            self.meshes.push(GpuMesh::upload(device, mesh));
        }
        for material in scene.materials().iter().skip(self.materials.len()) {
            let pipeline = self.pipeline_for(device, material.name(), material.program())?;
            self.materials.push(GpuMaterial::upload(
                device,
                queue,
                &self.material_layout,
                &self.sampler,
                &self.default_texture,
                material,
                pipeline,
            ));
        }
        Ok(())
    }

    /// Render one frame: clear, then one indexed draw per entity.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &FlyCamera,
        scene: &Scene,
    ) -> Result<(), RenderError> {
        self.sync_assets(device, queue, scene)?;
        self.ensure_entity_capacity(device, scene.entity_count());

        if scene.lights().len() > MAX_LIGHTS {
            tracing::warn!(
                lights = scene.lights().len(),
                "only the first {MAX_LIGHTS} lights are used"
            );
        }
        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&frame_uniforms(camera, scene.lights())),
        );
        if scene.entity_count() > 0 {
            queue.write_buffer(
                &self.entity_buffer,
                0,
                &entity_slots(scene, self.entity_stride),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let [r, g, b, a] = CLEAR_COLOR;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for (i, entity) in scene.entities().iter().enumerate() {
                let material = self.materials.get(entity.material().index()).ok_or_else(|| {
                    RenderError::MissingMaterial {
                        entity: entity.name().to_string(),
                        material: entity.material().index(),
                    }
                })?;
                let mesh = self.meshes.get(entity.mesh().index()).ok_or_else(|| {
                    RenderError::MissingMesh {
                        entity: entity.name().to_string(),
                        mesh: entity.mesh().index(),
                    }
                })?;
                let offset = (i as u64 * self.entity_stride) as u32;

                pass.set_pipeline(&self.pipelines[material.pipeline].1);
                pass.set_bind_group(1, &self.entity_bind_group, &[offset]);
                pass.set_bind_group(2, &material.bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    /// Index of the pipeline for `program`, building it on first use.
    fn pipeline_for(
        &mut self,
        device: &wgpu::Device,
        material: &str,
        program: &ShaderProgram,
    ) -> Result<usize, RenderError> {
        if let Some(i) = self.pipelines.iter().position(|(p, _)| p == program) {
            return Ok(i);
        }
        let known = LIT_ENTRY_POINTS.iter().any(|(vs, fs)| {
            *vs == program.vertex_entry.as_str() && *fs == program.fragment_entry.as_str()
        });
        if !known {
            return Err(RenderError::UnknownEntryPoint {
                material: material.to_string(),
                vertex: program.vertex_entry.clone(),
                fragment: program.fragment_entry.clone(),
            });
        }

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!(
                "{}_{}_pipeline",
                program.vertex_entry, program.fragment_entry
            )),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some(program.vertex_entry.as_str()),
                compilation_options: Default::default(),
                buffers: &[GpuVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some(program.fragment_entry.as_str()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // Flat demo shapes are seen from both sides.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });
        tracing::debug!(
            vertex = %program.vertex_entry,
            fragment = %program.fragment_entry,
            "built pipeline"
        );
        self.pipelines.push((program.clone(), pipeline));
        Ok(self.pipelines.len() - 1)
    }

    /// Grow the per-entity uniform buffer to hold at least `count` slots.
    fn ensure_entity_capacity(&mut self, device: &wgpu::Device, count: usize) {
        if count <= self.entity_capacity {
            return;
        }
        let capacity = count.next_power_of_two();
        let (buffer, bind_group) =
            Self::create_entity_slots(device, &self.entity_layout, self.entity_stride, capacity);
        tracing::debug!(from = self.entity_capacity, to = capacity, "grew entity slots");
        self.entity_buffer = buffer;
        self.entity_bind_group = bind_group;
        self.entity_capacity = capacity;
    }

    fn create_entity_slots(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("entity_uniform_buffer"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("entity_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(ENTITY_UNIFORM_SIZE),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};
    use orbit_scene::DemoScene;

    #[test]
    fn uniform_sizes() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 48);
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 128 + 48 * MAX_LIGHTS);
        assert_eq!(ENTITY_UNIFORM_SIZE, 64);
    }

    #[test]
    fn align_rounds_up() {
        assert_eq!(align_to(64, 256), 256);
        assert_eq!(align_to(256, 256), 256);
        assert_eq!(align_to(257, 256), 512);
    }

    #[test]
    fn missing_lights_are_zeroed() {
        let light = DirectionalLight::new(Vec4::ONE, Vec4::ONE, Vec3::new(1.0, -1.0, 0.0));
        let frame = frame_uniforms(&FlyCamera::default(), &[light]);
        assert_eq!(frame.lights[0].direction, [1.0, -1.0, 0.0, 0.0]);
        assert_eq!(frame.lights[1].diffuse, [0.0; 4]);
    }

    #[test]
    fn entity_slots_hold_draw_matrices() {
        let mut demo = DemoScene::build().unwrap();
        demo.animate(0.0).unwrap();
        let scene = demo.scene();
        let bytes = entity_slots(scene, 256);
        assert_eq!(bytes.len(), 256 * scene.entity_count());

        let crate_index = scene
            .entities()
            .iter()
            .position(|e| e.id() == demo.entities().crate_box)
            .unwrap();
        let start = crate_index * 256;
        let floats: &[f32] = bytemuck::cast_slice(&bytes[start..start + 64]);
        assert_eq!(&floats[12..16], &[0.0, 0.0, -2.0, 1.0]);
        // Padding past the matrix stays zero.
        assert!(bytes[start + 64..start + 256].iter().all(|&b| b == 0));
    }
}
