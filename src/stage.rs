//! The vertex and fragment stages evaluated on the cpu.
//!
//! These follow the arithmetic of `shaders/placement.wgsl`, `shaders/gradient.wgsl` and
//! `shaders/palette.wgsl` operation by operation in f32, so the results match what the gpu draws.

use super::{
    color::{Color, ColorMap},
    grid::GridLayout,
    map::InstanceTile,
    primitive::Vertex,
    types::{Transform2D, UniformTransform2D},
};

/// All data shared by every invocation of a draw call
#[derive(Clone, Debug, PartialEq)]
pub struct Uniforms {
    /// The world to clip space transform
    pub transform: UniformTransform2D,
    /// The layout of the tiles
    pub grid_layout: GridLayout,
    /// The color map resolving tile values
    pub color_map: ColorMap,
}

impl Uniforms {
    /// Collects the uniforms of a draw call
    ///
    /// # Parameters
    ///
    /// transform: The world to clip space transform
    ///
    /// grid_layout: The layout of the tiles
    ///
    /// color_map: The color map resolving tile values
    pub fn new(transform: &Transform2D, grid_layout: GridLayout, color_map: ColorMap) -> Self {
        Self {
            transform: transform.get_data(),
            grid_layout,
            color_map,
        }
    }
}

/// The result of the vertex stage
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexOutput {
    /// The position in clip space
    pub clip_position: [f32; 4],
    /// The value of the tile, unchanged
    pub value: f32,
}

/// Places one vertex of a tile
///
/// # Parameters
///
/// uniforms: The uniforms of the draw call
///
/// vertex: The vertex relative to the tile center
///
/// id: The instance index of the tile
///
/// instance: The tile data
pub fn vertex(uniforms: &Uniforms, vertex: &Vertex, id: u32, instance: &InstanceTile) -> VertexOutput {
    let [grid_x, grid_y] = uniforms.grid_layout.offset(id);
    let world = [vertex.position[0] + grid_x, vertex.position[1] + grid_y, 0.0, 1.0];

    VertexOutput {
        clip_position: uniforms.transform.apply(world),
        value: instance.value,
    }
}

/// Resolves the color of a pixel from its interpolated tile value
///
/// # Parameters
///
/// uniforms: The uniforms of the draw call
///
/// value: The interpolated tile value
pub fn fragment(uniforms: &Uniforms, value: f32) -> Color {
    uniforms.color_map.sample(value)
}

/// Runs the vertex stage for every vertex of every instance of a draw call, instance by instance
///
/// # Parameters
///
/// uniforms: The uniforms of the draw call
///
/// vertices: The vertices of the primitive shared by all instances
///
/// instances: The tiles, their position in the slice is their instance index
pub fn vertices<'a>(uniforms: &'a Uniforms, vertices: &'a [Vertex], instances: &'a [InstanceTile]) -> impl Iterator<Item = VertexOutput> + 'a {
    instances
        .iter()
        .zip(0u32..)
        .flat_map(move |(instance, id)| {
            vertices.iter().map(move |local| vertex(uniforms, local, id, instance))
        })
}

/// Interpolates the tile value across a triangle the way the rasterizer does
///
/// # Parameters
///
/// triangle: The outputs of the three vertices
///
/// weights: The barycentric weights of the pixel, summing to 1
pub fn interpolate(triangle: &[VertexOutput; 3], weights: [f32; 3]) -> f32 {
    triangle.iter().zip(weights.iter()).map(|(output, weight)| output.value * weight).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        color::{GradientMap, PaletteMap},
        grid::SPACING_WIDE,
        primitive::PrimitiveType,
        types::Point,
    };

    fn gradient() -> ColorMap {
        GradientMap::new(Color::new_rgb(0.0, 0.0, 1.0), Color::new_rgb(0.5, 0.5, 1.0)).into()
    }

    fn palette(continuous: bool) -> ColorMap {
        PaletteMap::new_linear(&Color::new_gray(0.0), &Color::new_gray(1.0), continuous).into()
    }

    #[test]
    fn vertex_places_tile_and_forwards_value() {
        let uniforms = Uniforms::new(&Transform2D::identity(), GridLayout::new(3).unwrap(), gradient());
        let local = Vertex { position: [0.25, -0.5] };

        let output = vertex(&uniforms, &local, 4, &InstanceTile::new(0.3));

        assert!((output.clip_position[0] - 1.75).abs() < 1e-6, "got {output:?}");
        assert!((output.clip_position[1] + 1.3660254).abs() < 1e-6, "got {output:?}");
        assert_eq!(output.clip_position[2..], [0.0, 1.0]);
        assert_eq!(output.value, 0.3);
    }

    #[test]
    fn vertex_applies_transform_after_placement() {
        let transform = Transform2D::scale(&Point::new(0.5, 2.0)) * Transform2D::translate(&Point::new(-1.0, 0.0));
        let layout = GridLayout::new(3).unwrap().with_spacing(SPACING_WIDE);
        let uniforms = Uniforms::new(&transform, layout, gradient());

        let output = vertex(&uniforms, &Vertex { position: [0.0, 0.0] }, 4, &InstanceTile::new(1.0));

        assert!((output.clip_position[0] - 0.2875).abs() < 1e-6, "got {output:?}");
        assert!((output.clip_position[1] + 1.7320508).abs() < 1e-6, "got {output:?}");
    }

    #[test]
    fn color_map_does_not_change_placement() {
        let layout = GridLayout::new(4).unwrap();
        let tiles: Vec<InstanceTile> = (0..10).map(|i| InstanceTile::new(i as f32 / 9.0)).collect();
        let shape = PrimitiveType::Hexagon.vertices();

        let a = Uniforms::new(&Transform2D::rotation(0.4), layout, gradient());
        let b = Uniforms::new(&Transform2D::rotation(0.4), layout, palette(true));

        assert!(vertices(&a, shape, &tiles).eq(vertices(&b, shape, &tiles)));
    }

    #[test]
    fn vertices_are_instance_major() {
        let layout = GridLayout::new(2).unwrap();
        let tiles = [InstanceTile::new(0.0), InstanceTile::new(0.5), InstanceTile::new(1.0)];
        let shape = PrimitiveType::Rectangle.vertices();
        let uniforms = Uniforms::new(&Transform2D::identity(), layout, gradient());

        let outputs: Vec<VertexOutput> = vertices(&uniforms, shape, &tiles).collect();

        assert_eq!(outputs.len(), 12);
        assert!(outputs[4..8].iter().all(|output| output.value == 0.5));
        // Third tile starts the second row, shifted half a column
        assert_eq!(outputs[8].clip_position[0], 0.5 + 0.5);
    }

    #[test]
    fn fragment_uses_selected_strategy() {
        let layout = GridLayout::new(1).unwrap();
        let by_gradient = Uniforms::new(&Transform2D::identity(), layout, gradient());
        let by_palette = Uniforms::new(&Transform2D::identity(), layout, palette(false));

        assert_eq!(fragment(&by_gradient, 1.0), Color::new_rgb(0.0, 0.0, 1.0));
        assert_eq!(fragment(&by_gradient, 0.0), Color::new_rgb(0.5, 0.5, 1.0));
        assert_eq!(fragment(&by_palette, 0.0), Color::new_gray(0.0));
        assert_eq!(fragment(&by_palette, 2.0).r, 1.0);
    }

    #[test]
    fn interpolated_value_of_a_flat_tile_is_constant() {
        let uniforms = Uniforms::new(&Transform2D::identity(), GridLayout::new(2).unwrap(), palette(true));
        let outputs: Vec<VertexOutput> = vertices(&uniforms, PrimitiveType::Hexagon.vertices(), &[InstanceTile::new(0.6)]).collect();
        let triangle = [outputs[0], outputs[1], outputs[2]];

        let value = interpolate(&triangle, [0.2, 0.3, 0.5]);

        assert!((value - 0.6).abs() < 1e-6, "got {value}");
        assert_eq!(fragment(&uniforms, 0.6), uniforms.color_map.sample(0.6));
    }
}
