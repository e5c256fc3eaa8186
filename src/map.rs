use super::grid::GridLayout;

/// The per tile data sent to the gpu, the tile index is given implicitly by its position in the buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceTile {
    /// The value to color the tile by, nominally in [0, 1]
    pub value: f32,
}

impl InstanceTile {
    /// Creates a new tile instance
    ///
    /// # Parameters
    ///
    /// value: The value to color the tile by
    pub const fn new(value: f32) -> Self {
        Self {
            value,
        }
    }

    /// Gets the memory description of a tile instance
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32,
                },
            ]
        }
    }
}

/// A rectangular map of tiles each holding a single value
#[derive(Clone, Debug)]
pub struct Map {
    /// The layout of the tiles
    layout: GridLayout,
    /// The tiles in instance order, row by row
    tiles: Vec<InstanceTile>,
}

impl Map {
    /// Creates a map where every tile has the same value
    ///
    /// # Parameters
    ///
    /// layout: The layout of the tiles
    ///
    /// n_rows: The number of rows
    ///
    /// value: The value of all tiles
    pub fn new_uniform(layout: GridLayout, n_rows: u32, value: f32) -> Self {
        let count = tile_count(&layout, n_rows);

        Self {
            layout,
            tiles: vec![InstanceTile::new(value); count],
        }
    }

    /// Creates a map where the value is 1 at the center tile and decreases linearly with
    /// the distance to the center, reaching 0 at the farthest tile
    ///
    /// # Parameters
    ///
    /// layout: The layout of the tiles
    ///
    /// n_rows: The number of rows
    pub fn new_layered(layout: GridLayout, n_rows: u32) -> Self {
        let count = tile_count(&layout, n_rows);
        let center_id = (n_rows / 2).saturating_mul(layout.get_n_columns()).saturating_add(layout.get_n_columns() / 2);
        let [center_x, center_y] = layout.offset(center_id);

        let distances: Vec<f32> = (0..count)
            .map(|id| {
                let [x, y] = layout.offset(id as u32);
                ((x - center_x) * (x - center_x) + (y - center_y) * (y - center_y)).sqrt()
            })
            .collect();
        let max_distance = distances.iter().copied().fold(0.0, f32::max);

        let tiles = distances
            .into_iter()
            .map(|distance| {
                if max_distance > 0.0 {
                    InstanceTile::new(1.0 - distance / max_distance)
                } else {
                    InstanceTile::new(1.0)
                }
            })
            .collect();

        Self {
            layout,
            tiles,
        }
    }

    /// Retrieves the layout
    pub fn get_layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Retrieves all tiles in instance order
    pub fn get_tiles(&self) -> &[InstanceTile] {
        &self.tiles
    }

    /// Retrieves the value of a single tile
    ///
    /// # Parameters
    ///
    /// id: The instance index of the tile
    pub fn get_value(&self, id: usize) -> Option<f32> {
        self.tiles.get(id).map(|tile| tile.value)
    }

    /// Sets the value of a single tile, returns false if the tile does not exist
    ///
    /// # Parameters
    ///
    /// id: The instance index of the tile
    ///
    /// value: The new value
    pub fn set_value(&mut self, id: usize, value: f32) -> bool {
        match self.tiles.get_mut(id) {
            Some(tile) => {
                tile.value = value;
                true
            }
            None => false,
        }
    }

    /// Replaces the value of every tile
    ///
    /// # Parameters
    ///
    /// f: Maps the old value of a tile to its new value
    pub fn map_values(&mut self, mut f: impl FnMut(f32) -> f32) {
        self.tiles.iter_mut().for_each(|tile| tile.value = f(tile.value));
    }

    /// The number of tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True if there are no tiles
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// The number of tiles in a grid with full rows
///
/// # Parameters
///
/// layout: The layout of the tiles
///
/// n_rows: The number of rows
fn tile_count(layout: &GridLayout, n_rows: u32) -> usize {
    layout.get_n_columns() as usize * n_rows as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layered_values_peak_at_center() {
        let layout = GridLayout::new(7).unwrap();
        let map = Map::new_layered(layout, 5);

        assert_eq!(map.len(), 35);
        assert_eq!(map.get_value(2 * 7 + 3), Some(1.0));
        assert!(map.get_tiles().iter().all(|tile| (0.0..=1.0).contains(&tile.value)));
        assert!(map.get_tiles().iter().any(|tile| tile.value == 0.0));
    }

    #[test]
    fn single_tile_map_is_saturated() {
        let map = Map::new_layered(GridLayout::new(1).unwrap(), 1);

        assert_eq!(map.get_tiles(), &[InstanceTile::new(1.0)]);
    }

    #[test]
    fn set_value_only_touches_existing_tiles() {
        let mut map = Map::new_uniform(GridLayout::new(3).unwrap(), 2, 0.25);

        assert!(map.set_value(5, 0.75));
        assert!(!map.set_value(6, 0.75));
        assert_eq!(map.get_value(5), Some(0.75));
        assert_eq!(map.get_value(4), Some(0.25));
        assert_eq!(map.get_value(6), None);
    }

    #[test]
    fn map_values_touches_every_tile() {
        let mut map = Map::new_layered(GridLayout::new(4).unwrap(), 3);
        let before: Vec<f32> = map.get_tiles().iter().map(|tile| tile.value).collect();

        map.map_values(|value| 1.0 - value);

        for (tile, value) in map.get_tiles().iter().zip(before) {
            assert_eq!(tile.value, 1.0 - value);
        }
        assert_eq!(map.len(), 12);
    }

    #[test]
    fn instance_is_a_single_float() {
        assert_eq!(std::mem::size_of::<InstanceTile>(), 4);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn tile_count_does_not_wrap() {
        let layout = GridLayout::new(1 << 16).unwrap();

        assert_eq!(tile_count(&layout, 1 << 16), 1 << 32);
    }
}
