//! WebGPU rendering for the showroom scene: the product model, any
//! AR-placed copies, and the placement reticle.

use glam::Mat4;
use showroom_core::{RETICLE_INNER_RADIUS, RETICLE_OUTER_RADIUS, RETICLE_SEGMENTS};
use web_sys as web;
use wgpu::util::DeviceExt;

use crate::assets::MeshData;

// Per-object uniform slots are dynamically offset; WebGPU requires 256-byte
// alignment.
const OBJECT_STRIDE: u64 = 256;
const INITIAL_OBJECT_CAPACITY: usize = 64;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ObjectData {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    // x: metalness, y: roughness, z: unlit flag
    params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

struct GpuMesh {
    vertex_buf: wgpu::Buffer,
    index_buf: wgpu::Buffer,
    index_count: u32,
}

/// Which geometry a draw item uses.
#[derive(Clone, Copy, Debug)]
pub enum MeshRef {
    /// Index into the uploaded model mesh list.
    Model(usize),
    Reticle,
}

/// One object to draw this frame.
#[derive(Clone, Copy, Debug)]
pub struct DrawItem {
    pub mesh: MeshRef,
    pub matrix: Mat4,
    pub color: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
    pub unlit: bool,
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    object_buffer: wgpu::Buffer,
    object_capacity: usize,
    object_bgl: wgpu::BindGroupLayout,
    globals_bind_group: wgpu::BindGroup,
    object_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    meshes: Vec<GpuMesh>,
    reticle_mesh: GpuMesh,
    width: u32,
    height: u32,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let object_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("objects"),
            size: OBJECT_STRIDE * INITIAL_OBJECT_CAPACITY as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let object_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ObjectData>() as u64
                    ),
                },
                count: None,
            }],
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals bg"),
            layout: &globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });
        let object_bind_group =
            Self::object_bind_group(&device, &object_bgl, &object_buffer);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene pl"),
            bind_group_layouts: &[&globals_bgl, &object_bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x3,
                            offset: 0,
                            shader_location: 0,
                        },
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x3,
                            offset: 12,
                            shader_location: 1,
                        },
                    ],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                cull_mode: None,
                ..wgpu::PrimitiveState::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth24Plus,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let depth_view = Self::depth_view(&device, width, height);
        let reticle_mesh = Self::upload_mesh(&device, &ring_mesh());

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            object_buffer,
            object_capacity: INITIAL_OBJECT_CAPACITY,
            object_bgl,
            globals_bind_group,
            object_bind_group,
            depth_view,
            meshes: Vec::new(),
            reticle_mesh,
            width,
            height,
        })
    }

    fn object_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object bg"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ObjectData>() as u64),
                }),
            }],
        })
    }

    fn depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let tex = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth24Plus,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        tex.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn upload_mesh(device: &wgpu::Device, data: &MeshData) -> GpuMesh {
        let vertices: Vec<Vertex> = data
            .positions
            .iter()
            .zip(&data.normals)
            .map(|(p, n)| Vertex {
                position: *p,
                normal: *n,
            })
            .collect();
        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh vb"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh ib"),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        GpuMesh {
            vertex_buf,
            index_buf,
            index_count: data.indices.len() as u32,
        }
    }

    /// Upload the decoded product model. Called once after the load resolves.
    pub fn upload_model(&mut self, meshes: &[MeshData]) {
        self.meshes = meshes
            .iter()
            .map(|m| Self::upload_mesh(&self.device, m))
            .collect();
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = Self::depth_view(&self.device, width, height);
        }
    }

    fn ensure_object_capacity(&mut self, needed: usize) {
        if needed <= self.object_capacity {
            return;
        }
        let mut capacity = self.object_capacity;
        while capacity < needed {
            capacity *= 2;
        }
        self.object_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("objects"),
            size: OBJECT_STRIDE * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.object_bind_group =
            Self::object_bind_group(&self.device, &self.object_bgl, &self.object_buffer);
        self.object_capacity = capacity;
    }

    pub fn render(
        &mut self,
        view_proj: Mat4,
        items: &[DrawItem],
    ) -> Result<(), wgpu::SurfaceError> {
        self.ensure_object_capacity(items.len());

        self.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals {
                view_proj: view_proj.to_cols_array_2d(),
            }),
        );
        for (i, item) in items.iter().enumerate() {
            let data = ObjectData {
                model: item.matrix.to_cols_array_2d(),
                color: [item.color[0], item.color[1], item.color[2], 1.0],
                params: [
                    item.metalness,
                    item.roughness,
                    if item.unlit { 1.0 } else { 0.0 },
                    0.0,
                ],
            };
            self.queue.write_buffer(
                &self.object_buffer,
                OBJECT_STRIDE * i as u64,
                bytemuck::bytes_of(&data),
            );
        }

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        // transparent clear so the page shows through
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.globals_bind_group, &[]);
            for (i, item) in items.iter().enumerate() {
                let mesh = match item.mesh {
                    MeshRef::Model(index) => match self.meshes.get(index) {
                        Some(m) => m,
                        None => continue,
                    },
                    MeshRef::Reticle => &self.reticle_mesh,
                };
                rpass.set_bind_group(1, &self.object_bind_group, &[(OBJECT_STRIDE * i as u64) as u32]);
                rpass.set_vertex_buffer(0, mesh.vertex_buf.slice(..));
                rpass.set_index_buffer(mesh.index_buf.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// Flat ring in the XZ plane used as the AR placement reticle.
fn ring_mesh() -> MeshData {
    let segments = RETICLE_SEGMENTS;
    let mut positions = Vec::with_capacity(segments as usize * 2);
    let mut normals = Vec::with_capacity(segments as usize * 2);
    let mut indices = Vec::with_capacity(segments as usize * 6);
    for i in 0..segments {
        let theta = (i as f32 / segments as f32) * std::f32::consts::TAU;
        let (sin, cos) = theta.sin_cos();
        positions.push([cos * RETICLE_INNER_RADIUS, 0.0, sin * RETICLE_INNER_RADIUS]);
        positions.push([cos * RETICLE_OUTER_RADIUS, 0.0, sin * RETICLE_OUTER_RADIUS]);
        normals.push([0.0, 1.0, 0.0]);
        normals.push([0.0, 1.0, 0.0]);
        let a = i * 2;
        let b = i * 2 + 1;
        let c = (i * 2 + 2) % (segments * 2);
        let d = (i * 2 + 3) % (segments * 2);
        indices.extend_from_slice(&[a, b, c, b, d, c]);
    }
    MeshData {
        positions,
        normals,
        indices,
    }
}

const SCENE_WGSL: &str = r#"
struct Globals { view_proj: mat4x4<f32> };
struct ObjectData {
  model: mat4x4<f32>,
  color: vec4<f32>,
  params: vec4<f32>, // x: metalness, y: roughness, z: unlit flag
};
@group(0) @binding(0) var<uniform> globals: Globals;
@group(1) @binding(0) var<uniform> object: ObjectData;

struct VsOut {
  @builtin(position) pos: vec4<f32>,
  @location(0) normal: vec3<f32>,
  @location(1) world: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) normal: vec3<f32>) -> VsOut {
  var out: VsOut;
  let world = object.model * vec4<f32>(position, 1.0);
  out.pos = globals.view_proj * world;
  out.world = world.xyz;
  out.normal = (object.model * vec4<f32>(normal, 0.0)).xyz;
  return out;
}

@fragment
fn fs_main(inf: VsOut) -> @location(0) vec4<f32> {
  if (object.params.z > 0.5) {
    return vec4<f32>(object.color.rgb, 1.0);
  }
  let n = normalize(inf.normal);
  let key_dir = normalize(vec3<f32>(0.5, 7.5, 2.5));
  let fill_dir = normalize(vec3<f32>(-15.0, 0.0, -5.0));
  let ambient = 0.35;
  let diffuse = max(dot(n, key_dir), 0.0) * 0.9 + max(dot(n, fill_dir), 0.0) * 0.25;
  let rough = clamp(object.params.y, 0.04, 1.0);
  let view_dir = normalize(vec3<f32>(0.0, 1.0, 4.0) - inf.world);
  let h = normalize(key_dir + view_dir);
  let spec = pow(max(dot(n, h), 0.0), 2.0 / (rough * rough)) * mix(0.04, 1.0, object.params.x);
  let rgb = object.color.rgb * (ambient + diffuse) + vec3<f32>(spec);
  return vec4<f32>(rgb, 1.0);
}
"#;
