use integer_sqrt::IntegerSquareRoot;
use thiserror::Error;
use super::SQRT_3;

/// The vertical distance between two rows of pointy-top hexagons of unit width
pub const ROW_HEIGHT: f32 = (0.5 * SQRT_3) as f32;

/// The extra horizontal spacing used by the spaced tile layout
pub const SPACING_WIDE: f32 = 1.05;

/// Describes how instances are laid out in an offset grid where every odd row is shifted half a column
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    /// The number of columns, never 0
    n_columns: u32,
    /// The factor to multiply the horizontal position with
    spacing: f32,
}

impl GridLayout {
    /// Creates a new grid layout without extra spacing
    ///
    /// # Parameters
    ///
    /// n_columns: The number of columns
    ///
    /// # Errors
    ///
    /// GridLayoutError::NoColumns if n_columns is 0
    pub fn new(n_columns: u32) -> Result<Self, GridLayoutError> {
        if n_columns == 0 {
            return Err(GridLayoutError::NoColumns);
        }

        Ok(Self {
            n_columns,
            spacing: 1.0,
        })
    }

    /// Creates a layout for the given number of tiles which is as close to square as possible
    ///
    /// # Parameters
    ///
    /// count: The number of tiles
    pub fn with_square_columns(count: u32) -> Self {
        let root = count.integer_sqrt();
        let n_columns = if root * root < count {
            root + 1
        } else {
            root
        };

        Self {
            n_columns: n_columns.max(1),
            spacing: 1.0,
        }
    }

    /// Sets the horizontal spacing factor and returns the layout
    ///
    /// # Parameters
    ///
    /// spacing: The factor to multiply the horizontal position with
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Retrieves the number of columns
    pub fn get_n_columns(&self) -> u32 {
        self.n_columns
    }

    /// Retrieves the horizontal spacing factor
    pub fn get_spacing(&self) -> f32 {
        self.spacing
    }

    /// The number of rows needed to hold the given number of tiles
    ///
    /// # Parameters
    ///
    /// count: The number of tiles
    pub fn n_rows(&self, count: u32) -> u32 {
        count.div_ceil(self.n_columns)
    }

    /// Finds the column and row of an instance
    ///
    /// # Parameters
    ///
    /// id: The zero-based index of the instance
    pub fn coordinate(&self, id: u32) -> TileCoordinate {
        TileCoordinate {
            column: id % self.n_columns,
            row: id / self.n_columns,
        }
    }

    /// Finds the center of an instance in grid coordinates
    ///
    /// # Parameters
    ///
    /// id: The zero-based index of the instance
    pub fn offset(&self, id: u32) -> [f32; 2] {
        let coordinate = self.coordinate(id);
        let x = (coordinate.column as f32 + 0.5 * (coordinate.row % 2) as f32) * self.spacing;
        let y = -ROW_HEIGHT * coordinate.row as f32;

        [x, y]
    }

    /// Constructs the shader compatible version off a grid layout
    pub fn get_data(&self) -> UniformGridLayout {
        UniformGridLayout {
            n_columns: self.n_columns,
            spacing: self.spacing,
        }
    }
}

/// The position of a tile in the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileCoordinate {
    /// The column, always smaller than the number of columns
    pub column: u32,
    /// The row
    pub row: u32,
}

impl TileCoordinate {
    /// Retrieves the instance index of this coordinate
    ///
    /// # Parameters
    ///
    /// layout: The layout the coordinate belongs to
    pub fn index(&self, layout: &GridLayout) -> u32 {
        self.row * layout.n_columns + self.column
    }
}

/// All data for the layout of the grid
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UniformGridLayout {
    /// The number of columns
    pub n_columns: u32,
    /// The horizontal spacing factor
    pub spacing: f32,
}

/// The error types for when creating a grid layout
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridLayoutError {
    /// There must be at least one column to lay out tiles in
    #[error("The number of columns must be at least 1")]
    NoColumns,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_columns_is_rejected() {
        assert_eq!(GridLayout::new(0), Err(GridLayoutError::NoColumns));
    }

    #[test]
    fn coordinate_round_trips() {
        for n_columns in [1, 2, 3, 7, 64] {
            let layout = GridLayout::new(n_columns).unwrap();
            for id in 0..500 {
                let coordinate = layout.coordinate(id);
                assert!(coordinate.column < n_columns);
                assert_eq!(coordinate.index(&layout), id);
            }
        }
    }

    #[test]
    fn concrete_placement() {
        let layout = GridLayout::new(3).unwrap();

        assert_eq!(layout.coordinate(4), TileCoordinate { column: 1, row: 1 });

        let [x, y] = layout.offset(4);
        assert!((x - 1.5).abs() < 1e-6, "got {x}");
        assert!((y + 0.8660254).abs() < 1e-6, "got {y}");

        let [x, y] = layout.with_spacing(SPACING_WIDE).offset(4);
        assert!((x - 1.575).abs() < 1e-6, "got {x}");
        assert!((y + 0.8660254).abs() < 1e-6, "got {y}");
    }

    #[test]
    fn next_row_moves_down_by_row_height() {
        let layout = GridLayout::new(5).unwrap().with_spacing(SPACING_WIDE);

        for id in 0..40 {
            let [_, y0] = layout.offset(id);
            let [_, y1] = layout.offset(id + 5);
            assert!((y1 - y0 + 0.5 * 3f32.sqrt()).abs() < 1e-4, "id {id}: {y0} -> {y1}");
        }
    }

    #[test]
    fn odd_rows_are_shifted_half_a_column() {
        let layout = GridLayout::new(4).unwrap();

        assert_eq!(layout.offset(0)[0], 0.0);
        assert_eq!(layout.offset(4)[0], 0.5);
        assert_eq!(layout.offset(8)[0], 0.0);
        assert_eq!(layout.offset(13)[0], 1.5);
    }

    #[test]
    fn single_column_stacks_rows() {
        let layout = GridLayout::new(1).unwrap();

        assert_eq!(layout.coordinate(9), TileCoordinate { column: 0, row: 9 });
        assert_eq!(layout.n_rows(9), 9);
    }

    #[test]
    fn square_columns() {
        assert_eq!(GridLayout::with_square_columns(0).get_n_columns(), 1);
        assert_eq!(GridLayout::with_square_columns(16).get_n_columns(), 4);
        assert_eq!(GridLayout::with_square_columns(17).get_n_columns(), 5);
        assert_eq!(GridLayout::with_square_columns(17).n_rows(17), 4);
    }

    #[test]
    fn row_count_of_huge_grids() {
        let layout = GridLayout::new(2).unwrap();

        assert_eq!(layout.n_rows(u32::MAX), 1 << 31);
        assert_eq!(GridLayout::new(1).unwrap().n_rows(u32::MAX), u32::MAX);
    }
}
