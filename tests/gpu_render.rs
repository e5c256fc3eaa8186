//! Draws small grids offscreen and reads the pixels back. Every test passes without drawing
//! when no adapter is available.

use hexagon_tiles::{
    color::{Color, ColorMap, GradientMap, PaletteMap, PALETTE_SIZE},
    gpu_grid::GPUGrid,
    grid::{GridLayout, ROW_HEIGHT},
    map::InstanceTile,
    primitive::PrimitiveType,
    render::GpuContext,
    types::{Point, Transform2D},
};

const SIZE: u32 = 64;
const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const TOLERANCE: f32 = 2.0 / 255.0;

const BLACK: Color = Color::new_rgb(0.0, 0.0, 0.0);
const WHITE: Color = Color::new_rgb(1.0, 1.0, 1.0);
const RED: Color = Color::new_rgb(1.0, 0.0, 0.0);
const GREEN: Color = Color::new_rgb(0.0, 1.0, 0.0);
const BLUE: Color = Color::new_rgb(0.0, 0.0, 1.0);

struct Gpu {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl Gpu {
    fn new() -> Option<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))?;
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: None,
                features: wgpu::Features::empty(),
                limits: adapter.limits(),
            },
            None,
        )).ok()?;

        Some(Self { device, queue })
    }

    fn context(&self) -> GpuContext<'_> {
        GpuContext {
            device: &self.device,
            queue: &self.queue,
            format: FORMAT,
        }
    }

    /// Draws the tiles and returns the pixels row by row from the top
    fn draw(&self, transform: &Transform2D, layout: &GridLayout, color_map: &ColorMap, tiles: &[InstanceTile]) -> Vec<u8> {
        let context = self.context();
        let grid = GPUGrid::new(PrimitiveType::Hexagon, transform, layout, color_map, tiles, &context);

        let extent = wgpu::Extent3d {
            width: SIZE,
            height: SIZE,
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Target"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        grid.draw(&view, &GREEN, &context);

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Readback"),
            size: (SIZE * SIZE * 4) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(SIZE * 4),
                    rows_per_image: Some(SIZE),
                },
            },
            extent,
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        receiver.recv().unwrap().unwrap();

        let pixels = slice.get_mapped_range().to_vec();
        pixels
    }
}

/// Converts a point in clip space to the pixel covering it
fn pixel_at(x: f32, y: f32) -> (u32, u32) {
    let column = ((x + 1.0) * 0.5 * SIZE as f32) as u32;
    let row = ((1.0 - y) * 0.5 * SIZE as f32) as u32;

    (column.min(SIZE - 1), row.min(SIZE - 1))
}

fn assert_pixel(pixels: &[u8], (column, row): (u32, u32), expected: Color) {
    let start = ((row * SIZE + column) * 4) as usize;
    let found: Vec<f32> = pixels[start..start + 4].iter().map(|&byte| byte as f32 / 255.0).collect();
    let expected = [expected.r, expected.g, expected.b, expected.a];

    assert!(
        found.iter().zip(expected).all(|(found, expected)| (found - expected).abs() <= TOLERANCE),
        "pixel ({column}, {row}) is {found:?}, expected {expected:?}",
    );
}

fn single_tile(color_map: ColorMap, value: f32) -> Option<Vec<u8>> {
    let gpu = Gpu::new()?;
    let transform = Transform2D::scale(&Point::new(0.5, 0.5));
    let layout = GridLayout::new(1).unwrap();

    Some(gpu.draw(&transform, &layout, &color_map, &[InstanceTile::new(value)]))
}

#[test]
fn fifth_tile_of_three_columns_sits_on_the_second_row() {
    let Some(gpu) = Gpu::new() else { return };
    let layout = GridLayout::new(3).unwrap();
    let color_map = GradientMap::new(WHITE, BLACK).into();
    let mut tiles = vec![InstanceTile::new(0.0); 5];
    tiles[4] = InstanceTile::new(1.0);

    // Center the view on (1.5, -ROW_HEIGHT)
    let transform = Transform2D::scale(&Point::new(0.5, 0.5))
        * Transform2D::translate(&Point::new(-1.5, ROW_HEIGHT as f64));
    let pixels = gpu.draw(&transform, &layout, &color_map, &tiles);

    assert_pixel(&pixels, pixel_at(0.0, 0.0), WHITE);
    // The third tile starts the second row half a column to the right
    assert_pixel(&pixels, pixel_at(-0.5, 0.0), BLACK);
    // The second tile is one row up, half a column to the left
    assert_pixel(&pixels, pixel_at(-0.25, 0.5 * ROW_HEIGHT), BLACK);
    assert_pixel(&pixels, pixel_at(-0.95, -0.95), GREEN);
}

#[test]
fn gradient_blends_between_empty_and_saturated() {
    let Some(pixels) = single_tile(GradientMap::new(RED, BLUE).into(), 0.25) else { return };

    assert_pixel(&pixels, pixel_at(0.0, 0.0), Color::new_rgb(0.25, 0.0, 0.75));
}

#[test]
fn continuous_palette_interpolates_neighbours() {
    let mut palette = PaletteMap::new(&[RED; PALETTE_SIZE], true).unwrap();
    palette.set_color(10, BLACK);
    palette.set_color(11, WHITE);

    let Some(pixels) = single_tile(palette.into(), 10.5 / 255.0) else { return };

    assert_pixel(&pixels, pixel_at(0.0, 0.0), Color::new_rgb(0.5, 0.5, 0.5));
}

#[test]
fn discrete_palette_picks_nearest_entry() {
    let mut palette = PaletteMap::new(&[RED; PALETTE_SIZE], false).unwrap();
    palette.set_color(50, BLUE);
    palette.set_color(51, GREEN);
    palette.set_color(52, BLUE);

    // 0.2 * 255 = 51
    let Some(pixels) = single_tile(palette.into(), 0.2) else { return };

    assert_pixel(&pixels, pixel_at(0.0, 0.0), GREEN);
}

#[test]
fn palette_clamps_values_outside_the_unit_range() {
    for continuous in [false, true] {
        let mut palette = PaletteMap::new(&[RED; PALETTE_SIZE], continuous).unwrap();
        palette.set_color(0, BLACK);
        palette.set_color(PALETTE_SIZE - 1, WHITE);

        let Some(above) = single_tile(palette.clone().into(), 2.0) else { return };
        let Some(below) = single_tile(palette.into(), -1.0) else { return };

        assert_pixel(&above, pixel_at(0.0, 0.0), WHITE);
        assert_pixel(&below, pixel_at(0.0, 0.0), BLACK);
    }
}
