use super::{
    color::{Color, ColorMap, ColorMapType, UniformPalette},
    grid::{GridLayout, UniformGridLayout},
    map::InstanceTile,
    primitive::{BufferVertices, PrimitiveType, Vertex},
    render::{GpuContext, RenderState, RenderError},
    types::{Transform2D, UniformTransform2D},
};
use wgpu::util::DeviceExt;

/// The vertex stage shared by all pipelines
const SHADER_PLACEMENT: &str = include_str!("shaders/placement.wgsl");
/// The fragment stage for gradients
const SHADER_GRADIENT: &str = include_str!("shaders/gradient.wgsl");
/// The fragment stage for palettes
const SHADER_PALETTE: &str = include_str!("shaders/palette.wgsl");

/// Builds the full shader source for the pipeline of a color map type, the placement stage followed by the fragment stage
///
/// # Parameters
///
/// color_map_type: The type of color map the pipeline draws with
pub fn shader_source(color_map_type: ColorMapType) -> String {
    let fragment = match color_map_type {
        ColorMapType::Gradient => SHADER_GRADIENT,
        ColorMapType::Palette => SHADER_PALETTE,
    };

    format!("{}\n{}", SHADER_PLACEMENT, fragment)
}

/// The instance buffer content when there are no tiles
static EMPTY_TILES: [InstanceTile; 1] = [InstanceTile::new(0.0)];

/// All color map types in pipeline order
const COLOR_MAP_TYPES: [ColorMapType; ColorMapType::COUNT] = [ColorMapType::Gradient, ColorMapType::Palette];

/// The representation of the tile grid in the gpu allowing for rendering
pub struct GPUGrid {
    /// The type of the currently loaded color map, selects the pipeline
    color_map_type: ColorMapType,
    /// The vertices of the tile primitive
    primitive: BufferVertices,
    /// The per tile values
    buffer_instances: wgpu::Buffer,
    /// The number of tiles in the instance buffer
    instance_count: u32,
    /// The world to screen transform
    buffer_transform: wgpu::Buffer,
    /// The grid layout
    buffer_grid_layout: wgpu::Buffer,
    /// The color map, large enough for any color map type
    buffer_color_map: wgpu::Buffer,
    /// The bind group for all uniforms
    bind_group: wgpu::BindGroup,
    /// One render pipeline for each color map type
    pipelines: Vec<wgpu::RenderPipeline>,
}

impl GPUGrid {
    /// Uploads everything needed to draw the tiles
    ///
    /// # Parameters
    ///
    /// primitive: The shape of every tile
    ///
    /// transform: The world to screen transform
    ///
    /// grid_layout: The layout of the tiles
    ///
    /// color_map: The color map resolving tile values
    ///
    /// tiles: The tiles in instance order
    ///
    /// context: The gpu to create the resources on
    pub fn new(
        primitive: PrimitiveType,
        transform: &Transform2D,
        grid_layout: &GridLayout,
        color_map: &ColorMap,
        tiles: &[InstanceTile],
        context: &GpuContext,
    ) -> Self {
        // Create the uniform buffers
        let buffer_transform = context.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Transform Uniform"),
            contents: bytemuck::bytes_of(&transform.get_data()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let buffer_grid_layout = context.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grid Layout Uniform"),
            contents: bytemuck::bytes_of(&grid_layout.get_data()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let color_map_size = COLOR_MAP_TYPES.iter().map(|kind| kind.uniform_size()).max().unwrap_or(std::mem::size_of::<UniformPalette>());
        let buffer_color_map = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Color Map Uniform"),
            size: color_map_size as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        context.queue.write_buffer(&buffer_color_map, 0, &color_map.get_bytes());

        // Create the bind group
        let bind_group_layout = Self::bind_group_layout(context);
        let bind_group = context.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Bind Group Uniforms"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer_transform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffer_grid_layout.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: buffer_color_map.as_entire_binding(),
                },
            ]
        });

        // Create a pipeline for every color map type
        let pipelines = COLOR_MAP_TYPES
            .iter()
            .map(|&kind| Self::create_pipeline(kind, &bind_group_layout, context))
            .collect();

        Self {
            color_map_type: color_map.get_type(),
            primitive: BufferVertices::new(primitive, context),
            buffer_instances: Self::create_instance_buffer(tiles, context),
            instance_count: tiles.len() as u32,
            buffer_transform,
            buffer_grid_layout,
            buffer_color_map,
            bind_group,
            pipelines,
        }
    }

    /// Writes a new world to screen transform
    ///
    /// # Parameters
    ///
    /// transform: The transform to write
    ///
    /// context: The gpu holding the buffers
    pub fn write_transform(&self, transform: &Transform2D, context: &GpuContext) {
        let data: UniformTransform2D = transform.get_data();
        context.queue.write_buffer(&self.buffer_transform, 0, bytemuck::bytes_of(&data));
    }

    /// Writes a new grid layout
    ///
    /// # Parameters
    ///
    /// grid_layout: The grid layout to write
    ///
    /// context: The gpu holding the buffers
    pub fn write_grid_layout(&self, grid_layout: &GridLayout, context: &GpuContext) {
        let data: UniformGridLayout = grid_layout.get_data();
        context.queue.write_buffer(&self.buffer_grid_layout, 0, bytemuck::bytes_of(&data));
    }

    /// Writes a new color map, switching pipeline if the type of color map changed
    ///
    /// # Parameters
    ///
    /// color_map: The color map to write
    ///
    /// context: The gpu holding the buffers
    pub fn write_color_map(&mut self, color_map: &ColorMap, context: &GpuContext) {
        let color_map_type = color_map.get_type();
        if color_map_type != self.color_map_type {
            log::info!("Switching pipeline from {:?} to {:?}", self.color_map_type, color_map_type);
            self.color_map_type = color_map_type;
        }

        context.queue.write_buffer(&self.buffer_color_map, 0, &color_map.get_bytes());
    }

    /// Writes new tile values, the instance buffer is recreated if the number of tiles changed
    ///
    /// # Parameters
    ///
    /// tiles: The tiles in instance order
    ///
    /// context: The gpu holding the buffers
    pub fn write_tiles(&mut self, tiles: &[InstanceTile], context: &GpuContext) {
        if tiles.len() as u32 != self.instance_count {
            log::debug!("Resizing instance buffer from {} to {} tiles", self.instance_count, tiles.len());
            self.buffer_instances = Self::create_instance_buffer(tiles, context);
            self.instance_count = tiles.len() as u32;
            return;
        }

        context.queue.write_buffer(&self.buffer_instances, 0, bytemuck::cast_slice(tiles));
    }

    /// Replaces the shape drawn for every tile
    ///
    /// # Parameters
    ///
    /// primitive: The new shape
    ///
    /// context: The gpu holding the buffers
    pub fn set_primitive(&mut self, primitive: PrimitiveType, context: &GpuContext) {
        self.primitive = BufferVertices::new(primitive, context);
    }

    /// Draws all tiles to the screen
    ///
    /// # Parameters
    ///
    /// clear_color: The color of the background
    ///
    /// render_state: The render state holding the surface
    ///
    /// # Errors
    ///
    /// RenderError::SurfaceTexture if no texture could be retrieved from the surface
    pub fn render(&self, clear_color: &Color, render_state: &RenderState) -> Result<(), RenderError> {
        // Get the current view
        let output_texture = render_state.get_surface().get_current_texture()?;
        let view = output_texture.texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.draw(&view, clear_color, &render_state.get_context());

        // Show to screen
        output_texture.present();

        Ok(())
    }

    /// Draws all tiles to a texture view and submits the commands
    ///
    /// # Parameters
    ///
    /// view: The view to draw to, its format must match the format of the context
    ///
    /// clear_color: The color of the background
    ///
    /// context: The gpu the grid was created on
    pub fn draw(&self, view: &wgpu::TextureView, clear_color: &Color, context: &GpuContext) {
        // Create the encoder
        let mut encoder = context.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Command Encoder"),
        });

        // Initialize the render pass
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                timestamp_writes: None,
                occlusion_query_set: None,
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color.get_wgpu()),
                        store: wgpu::StoreOp::Store,
                    }
                })],
                depth_stencil_attachment: None,
            });

            if self.instance_count > 0 {
                render_pass.set_pipeline(&self.pipelines[self.color_map_type.id()]);
                render_pass.set_bind_group(0, &self.bind_group, &[]);

                let index_count = self.primitive.set(&mut render_pass);
                render_pass.set_vertex_buffer(1, self.buffer_instances.slice(..));

                render_pass.draw_indexed(0..index_count, 0, 0..self.instance_count);
            }
        }

        context.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Creates the buffer holding the tile values
    ///
    /// # Parameters
    ///
    /// tiles: The initial tiles
    ///
    /// context: The gpu to create the resources on
    fn create_instance_buffer(tiles: &[InstanceTile], context: &GpuContext) -> wgpu::Buffer {
        // Zero sized buffers cannot be bound, keep room for one tile
        let contents = if tiles.is_empty() {
            &EMPTY_TILES[..]
        } else {
            tiles
        };

        context.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Instance Buffer"),
            contents: bytemuck::cast_slice(contents),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        })
    }

    /// Creates the layout of the uniform bind group
    ///
    /// # Parameters
    ///
    /// context: The gpu to create the resources on
    fn bind_group_layout(context: &GpuContext) -> wgpu::BindGroupLayout {
        let entry = |binding, visibility| wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        context.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Bind Group Uniforms Layout"),
            entries: &[
                entry(0, wgpu::ShaderStages::VERTEX),
                entry(1, wgpu::ShaderStages::VERTEX),
                entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        })
    }

    /// Compiles the shader and builds the render pipeline for one color map type
    ///
    /// # Parameters
    ///
    /// color_map_type: The color map type to build the pipeline for
    ///
    /// bind_group_layout: The layout of the uniforms
    ///
    /// context: The gpu to create the resources on
    fn create_pipeline(color_map_type: ColorMapType, bind_group_layout: &wgpu::BindGroupLayout, context: &GpuContext) -> wgpu::RenderPipeline {
        log::debug!("Building render pipeline for {:?}", color_map_type);

        let shader = context.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Tile Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source(color_map_type).into()),
        });

        let layout = context.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Pipeline Layout Descriptor"),
            bind_group_layouts: &[bind_group_layout],
            push_constant_ranges: &[],
        });

        context.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline Fill"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[
                    Vertex::desc(),
                    InstanceTile::desc(),
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: context.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })]
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        })
    }
}
