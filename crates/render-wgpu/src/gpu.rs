use crate::camera::FlyCamera;
use crate::primitives::{Vertex, build_mesh};
use crate::texture::GpuTexture;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use sweetcart_assets::{ShaderSource, TextureImage};
use sweetcart_scene::{CLEAR_COLOR, LIGHT, MeshId, Projection, TABLEAU, TextureId};
use wgpu::util::DeviceExt;

/// Dynamic-offset stride for per-object model uniforms. Matches the default
/// `min_uniform_buffer_offset_alignment`.
const MODEL_STRIDE: u64 = 256;

/// Errors raised while building the renderer.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("shader '{label}' failed to compile: {message}")]
    ShaderCompile { label: String, message: String },
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    light_pos: [f32; 4],
    light_color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ModelUniform {
    model: [[f32; 4]; 4],
}

/// One uploaded mesh. The plane draws non-indexed; everything else indexed.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    draw_count: u32,
}

/// wgpu scene renderer for the fixed tableau.
///
/// All scene-constant GPU state (meshes, textures, model matrices) is built
/// once in [`SceneRenderer::new`]; per-frame work is limited to the globals
/// write and the draw pass. Dropping the renderer releases every GPU handle.
pub struct SceneRenderer {
    scene_pipeline: wgpu::RenderPipeline,
    lamp_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    model_bind_group: wgpu::BindGroup,
    meshes: Vec<GpuMesh>,
    textures: Vec<GpuTexture>,
    depth_texture: wgpu::TextureView,
}

impl SceneRenderer {
    /// Build pipelines and upload every scene-constant resource.
    ///
    /// `textures` must be ordered like [`TextureId::ALL`] (the loader follows
    /// the manifest order). The decoded images are consumed; their pixel
    /// memory is freed once uploaded.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        scene_shader: &ShaderSource,
        lamp_shader: &ShaderSource,
        textures: Vec<TextureImage>,
    ) -> Result<Self, RenderError> {
        assert_eq!(textures.len(), TextureId::ALL.len());

        let scene_module = compile_shader(device, scene_shader)?;
        let lamp_module = compile_shader(device, lamp_shader)?;

        // Bind group layouts: globals, per-object model (dynamic offset),
        // per-object texture.
        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bind_group_layout"),
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

        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("model_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ModelUniform>() as u64
                    ),
                },
                count: None,
            }],
        });

        let texture_layout = GpuTexture::bind_group_layout(device);

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals_buffer"),
            contents: bytemuck::bytes_of(&Globals {
                view: Mat4::IDENTITY.to_cols_array_2d(),
                projection: Mat4::IDENTITY.to_cols_array_2d(),
                camera_pos: [0.0; 4],
                light_pos: LIGHT.position.extend(1.0).to_array(),
                light_color: LIGHT.color.extend(1.0).to_array(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        // The tableau transforms are constants, so every model matrix is
        // written exactly once. The last slot holds the light marker.
        let model_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("model_buffer"),
            size: MODEL_STRIDE * (TABLEAU.len() as u64 + 1),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        for (i, object) in TABLEAU.iter().enumerate() {
            let model = ModelUniform {
                model: object.transform.model_matrix().to_cols_array_2d(),
            };
            queue.write_buffer(&model_buffer, i as u64 * MODEL_STRIDE, bytemuck::bytes_of(&model));
        }
        let lamp_model = ModelUniform {
            model: (Mat4::from_translation(LIGHT.position)
                * Mat4::from_scale(Vec3::splat(LIGHT.marker_scale)))
            .to_cols_array_2d(),
        };
        queue.write_buffer(
            &model_buffer,
            TABLEAU.len() as u64 * MODEL_STRIDE,
            bytemuck::bytes_of(&lamp_model),
        );

        let model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("model_bind_group"),
            layout: &model_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &model_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ModelUniform>() as u64),
                }),
            }],
        });

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![
                0 => Float32x3,
                1 => Float32x2,
                2 => Float32x3,
            ],
        };

        let scene_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("scene_pipeline_layout"),
                bind_group_layouts: &[&globals_layout, &model_layout, &texture_layout],
                push_constant_ranges: &[],
            });

        let scene_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&scene_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &scene_module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout.clone()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &scene_module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // The tableau is viewed from every side; no culling.
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

        let lamp_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("lamp_pipeline_layout"),
                bind_group_layouts: &[&globals_layout, &model_layout],
                push_constant_ranges: &[],
            });

        let lamp_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lamp_pipeline"),
            layout: Some(&lamp_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &lamp_module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout],
            },
            fragment: Some(wgpu::FragmentState {
                module: &lamp_module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
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

        // One vertex/index buffer pair per distinct mesh.
        let meshes = MeshId::ALL
            .iter()
            .map(|mesh_id| {
                let data = build_mesh(mesh_id.primitive());
                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{mesh_id:?}_vertex_buffer")),
                    contents: bytemuck::cast_slice(&data.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index_buffer = (!data.indices.is_empty()).then(|| {
                    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(&format!("{mesh_id:?}_index_buffer")),
                        contents: bytemuck::cast_slice(&data.indices),
                        usage: wgpu::BufferUsages::INDEX,
                    })
                });
                GpuMesh {
                    vertex_buffer,
                    index_buffer,
                    draw_count: data.draw_count(),
                }
            })
            .collect();

        let textures = textures
            .into_iter()
            .map(|image| GpuTexture::upload(device, queue, &texture_layout, &image))
            .collect();

        let depth_texture = create_depth_texture(device, width, height);

        tracing::info!(
            objects = TABLEAU.len(),
            meshes = MeshId::ALL.len(),
            textures = TextureId::ALL.len(),
            "scene renderer ready"
        );

        Ok(Self {
            scene_pipeline,
            lamp_pipeline,
            globals_buffer,
            globals_bind_group,
            model_bind_group,
            meshes,
            textures,
            depth_texture,
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = create_depth_texture(device, width, height);
    }

    /// Render one frame: the tableau pass, then the light marker.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &FlyCamera,
        projection: Projection,
        aspect: f32,
    ) {
        queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals {
                view: camera.view_matrix().to_cols_array_2d(),
                projection: projection.matrix(camera.zoom(), aspect).to_cols_array_2d(),
                camera_pos: camera.position.extend(1.0).to_array(),
                light_pos: LIGHT.position.extend(1.0).to_array(),
                light_color: LIGHT.color.extend(1.0).to_array(),
            }),
        );

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: CLEAR_COLOR[0],
                            g: CLEAR_COLOR[1],
                            b: CLEAR_COLOR[2],
                            a: CLEAR_COLOR[3],
                        }),
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

            // Tableau objects, in authored order.
            pass.set_pipeline(&self.scene_pipeline);
            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            for (i, object) in TABLEAU.iter().enumerate() {
                let mesh = &self.meshes[object.mesh.index()];
                let texture = &self.textures[object.texture.index()];
                pass.set_bind_group(1, &self.model_bind_group, &[(i as u64 * MODEL_STRIDE) as u32]);
                pass.set_bind_group(2, &texture.bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                match &mesh.index_buffer {
                    Some(index_buffer) => {
                        pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                        pass.draw_indexed(0..mesh.draw_count, 0, 0..1);
                    }
                    None => pass.draw(0..mesh.draw_count, 0..1),
                }
            }

            // Light marker: the plane mesh again, flat-colored at the light.
            let marker = &self.meshes[MeshId::Tabletop.index()];
            pass.set_pipeline(&self.lamp_pipeline);
            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            pass.set_bind_group(
                1,
                &self.model_bind_group,
                &[(TABLEAU.len() as u64 * MODEL_STRIDE) as u32],
            );
            pass.set_vertex_buffer(0, marker.vertex_buffer.slice(..));
            pass.draw(0..marker.draw_count, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

/// Compile one WGSL module, surfacing the validation diagnostic on failure.
fn compile_shader(
    device: &wgpu::Device,
    source: &ShaderSource,
) -> Result<wgpu::ShaderModule, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&source.label),
        source: wgpu::ShaderSource::Wgsl(source.code.as_str().into()),
    });
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(RenderError::ShaderCompile {
            label: source.label.clone(),
            message: error.to_string(),
        });
    }
    tracing::debug!(label = %source.label, "shader compiled");
    Ok(module)
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
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
