use winit::dpi::PhysicalSize;
use super::{
    color::{Color, ColorMap, GradientMap, PaletteMap},
    grid::GridLayout,
    primitive::PrimitiveType,
    types::{Point, Transform2D},
};

/// All settings for opening the window and drawing the tiles
#[derive(Clone, Debug)]
pub struct Settings {
    /// The title of the window
    pub name: String,
    /// The initial size of the window
    pub size: PhysicalSize<u32>,
    /// How many times a second the camera is updated
    pub framerate: f64,
    /// The background color
    pub color_clear: Color,
    /// The shape of every tile
    pub primitive: PrimitiveType,
    /// The horizontal spacing factor of the grid
    pub spacing: f32,
    /// The color maps to cycle through, the first one is shown initially
    pub color_maps: Vec<ColorMap>,
    /// The initial world to screen transform, before the aspect correction
    pub transform: Transform2D,
}

impl Settings {
    /// Sets the window title and returns the settings
    ///
    /// # Parameters
    ///
    /// name: The title of the window
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Sets the initial window size and returns the settings
    ///
    /// # Parameters
    ///
    /// size: The size of the window
    pub fn with_size(mut self, size: PhysicalSize<u32>) -> Self {
        self.size = size;
        self
    }

    /// Sets the framerate and returns the settings
    ///
    /// # Parameters
    ///
    /// framerate: How many times a second the camera is updated
    pub fn with_framerate(mut self, framerate: f64) -> Self {
        self.framerate = framerate;
        self
    }

    /// Sets the clear color and returns the settings
    ///
    /// # Parameters
    ///
    /// color: The background color
    pub fn with_color_clear(mut self, color: Color) -> Self {
        self.color_clear = color;
        self
    }

    /// Sets the tile shape and returns the settings
    ///
    /// # Parameters
    ///
    /// primitive: The shape of every tile
    pub fn with_primitive(mut self, primitive: PrimitiveType) -> Self {
        self.primitive = primitive;
        self
    }

    /// Sets the horizontal spacing factor and returns the settings
    ///
    /// # Parameters
    ///
    /// spacing: The horizontal spacing factor of the grid
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Sets the color maps and returns the settings, an empty list keeps the current maps
    ///
    /// # Parameters
    ///
    /// color_maps: The color maps to cycle through
    pub fn with_color_maps(mut self, color_maps: Vec<ColorMap>) -> Self {
        if color_maps.is_empty() {
            log::warn!("Ignoring empty list of color maps");
            return self;
        }

        self.color_maps = color_maps;
        self
    }

    /// Sets the initial transform and returns the settings
    ///
    /// # Parameters
    ///
    /// transform: The initial world to screen transform
    pub fn with_transform(mut self, transform: Transform2D) -> Self {
        self.transform = transform;
        self
    }

    /// Applies the spacing to a grid layout
    ///
    /// # Parameters
    ///
    /// layout: The layout to space
    pub fn space_layout(&self, layout: GridLayout) -> GridLayout {
        layout.with_spacing(self.spacing)
    }
}

impl Default for Settings {
    fn default() -> Self {
        let saturated = Color::new_rgb(0.0, 0.0, 1.0);
        let empty = Color::new_rgb(0.5, 0.5, 1.0);

        Self {
            name: "Hexagon Tiles".to_string(),
            size: PhysicalSize::new(800, 600),
            framerate: 60.0,
            color_clear: Color::new_rgb(0.0, 0.0, 0.0),
            primitive: PrimitiveType::Hexagon,
            spacing: 1.0,
            color_maps: vec![
                GradientMap::new(saturated, empty).into(),
                PaletteMap::new_linear(&empty, &saturated, false).into(),
            ],
            transform: Transform2D::scale(&Point::new(0.1, 0.1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::SPACING_WIDE;

    #[test]
    fn empty_color_maps_are_ignored() {
        let settings = Settings::default().with_color_maps(Vec::new());

        assert_eq!(settings.color_maps.len(), 2);
    }

    #[test]
    fn spacing_is_applied_to_layouts() {
        let settings = Settings::default().with_spacing(SPACING_WIDE);
        let layout = settings.space_layout(GridLayout::with_square_columns(16));

        assert_eq!(layout.get_spacing(), SPACING_WIDE);
        assert_eq!(layout.get_n_columns(), 4);
    }

    #[test]
    fn default_starts_with_a_gradient() {
        let settings = Settings::default();

        assert!(matches!(settings.color_maps[0], ColorMap::Gradient(_)), "got {:?}", settings.color_maps[0]);
        assert_eq!(settings.primitive, PrimitiveType::Hexagon);
    }
}
