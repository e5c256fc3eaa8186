use thiserror::Error;

/// The number of entries in a palette
pub const PALETTE_SIZE: usize = 256;

/// The largest palette index as a float, the scale applied to a normalized value
const PALETTE_MAX: f32 = (PALETTE_SIZE - 1) as f32;

/// Describes a rgba color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    /// The red component
    pub r: f32,
    /// The green component
    pub g: f32,
    /// The blue component
    pub b: f32,
    /// The alpha component
    pub a: f32,
}

impl Color {
    /// Creates a new rgba color
    ///
    /// # Parameters
    ///
    /// r: The red component
    ///
    /// g: The green component
    ///
    /// b: The blue component
    ///
    /// a: The alpha component
    pub const fn new_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r,
            g,
            b,
            a,
        }
    }

    /// Creates a new rgb color with a = 1
    ///
    /// # Parameters
    ///
    /// r: The red component
    ///
    /// g: The green component
    ///
    /// b: The blue component
    pub const fn new_rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            r,
            g,
            b,
            a: 1.0,
        }
    }

    /// Creates a new gray scale color with a = 1, all other colors are equal
    ///
    /// # Parameters
    ///
    /// g: The value of all the color components
    pub const fn new_gray(g: f32) -> Self {
        Self {
            r: g,
            g,
            b: g,
            a: 1.0,
        }
    }

    /// Blends two colors as `weight * self + (1 - weight) * other`, the weight is not clamped
    ///
    /// # Parameters
    ///
    /// other: The color receiving the remaining weight
    ///
    /// weight: The weight of this color
    pub fn mix(&self, other: &Color, weight: f32) -> Self {
        let rest = 1.0 - weight;
        Self {
            r: weight * self.r + rest * other.r,
            g: weight * self.g + rest * other.g,
            b: weight * self.b + rest * other.b,
            a: weight * self.a + rest * other.a,
        }
    }

    /// Retrieves the data for the gpu
    pub const fn get_data(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Converts to the wgpu color used for clearing
    pub fn get_wgpu(&self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

/// A linear blend between two colors
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientMap {
    /// The color for a value of 1
    pub saturated: Color,
    /// The color for a value of 0
    pub empty: Color,
}

impl GradientMap {
    /// Creates a new gradient
    ///
    /// # Parameters
    ///
    /// saturated: The color for a value of 1
    ///
    /// empty: The color for a value of 0
    pub const fn new(saturated: Color, empty: Color) -> Self {
        Self {
            saturated,
            empty,
        }
    }

    /// Resolves the color of a value, values outside of [0, 1] are extrapolated
    ///
    /// # Parameters
    ///
    /// value: The value to color
    pub fn sample(&self, value: f32) -> Color {
        self.saturated.mix(&self.empty, value)
    }

    /// Constructs the shader compatible version of the gradient
    pub fn get_data(&self) -> UniformGradient {
        UniformGradient {
            saturated: self.saturated.get_data(),
            empty: self.empty.get_data(),
        }
    }
}

/// A table of 256 colors sampled either by snapping to the nearest entry or by interpolating between neighbours
#[derive(Clone, Debug, PartialEq)]
pub struct PaletteMap {
    /// The colors, index 0 is used for a value of 0 and index 255 for a value of 1
    colors: Box<[Color; PALETTE_SIZE]>,
    /// True if values between entries should be interpolated
    continuous: bool,
}

impl PaletteMap {
    /// Creates a palette from exactly 256 colors
    ///
    /// # Parameters
    ///
    /// colors: The colors of the palette
    ///
    /// continuous: True if values between entries should be interpolated
    ///
    /// # Errors
    ///
    /// ColorMapError::PaletteSize if there are not exactly 256 colors
    pub fn new(colors: &[Color], continuous: bool) -> Result<Self, ColorMapError> {
        let colors: [Color; PALETTE_SIZE] = colors.try_into().map_err(|_| ColorMapError::PaletteSize(colors.len()))?;

        Ok(Self {
            colors: Box::new(colors),
            continuous,
        })
    }

    /// Create a linear palette such that index 0 has color: start and index 255 has color: end
    ///
    /// # Parameters
    ///
    /// start: The color for index 0
    ///
    /// end: The color for index 255
    ///
    /// continuous: True if values between entries should be interpolated
    pub fn new_linear(start: &Color, end: &Color, continuous: bool) -> Self {
        let colors = std::array::from_fn(|id| {
            let fraction = (id as f32) / PALETTE_MAX;
            end.mix(start, fraction)
        });

        Self {
            colors: Box::new(colors),
            continuous,
        }
    }

    /// Create a palette which passes linearly through a list of equally spaced colors
    ///
    /// # Parameters
    ///
    /// stops: The colors to pass through, the first is index 0 and the last is index 255
    ///
    /// continuous: True if values between entries should be interpolated
    ///
    /// # Errors
    ///
    /// ColorMapError::TooFewStops if less than 2 stops are given
    pub fn new_stops(stops: &[Color], continuous: bool) -> Result<Self, ColorMapError> {
        if stops.len() < 2 {
            return Err(ColorMapError::TooFewStops(stops.len()));
        }

        let segments = (stops.len() - 1) as f32;
        let colors = std::array::from_fn(|id| {
            let position = (id as f32) / PALETTE_MAX * segments;
            let segment = (position.floor() as usize).min(stops.len() - 2);
            let fraction = position - segment as f32;
            stops[segment + 1].mix(&stops[segment], fraction)
        });

        Ok(Self {
            colors: Box::new(colors),
            continuous,
        })
    }

    /// Retrieves the colors of the palette
    pub fn get_colors(&self) -> &[Color; PALETTE_SIZE] {
        &self.colors
    }

    /// Sets a single entry
    ///
    /// # Parameters
    ///
    /// index: The entry to set, must be below 256
    ///
    /// color: The new color
    pub fn set_color(&mut self, index: usize, color: Color) {
        self.colors[index] = color;
    }

    /// True if values between entries are interpolated
    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    /// Sets the sampling mode
    ///
    /// # Parameters
    ///
    /// continuous: True if values between entries should be interpolated
    pub fn set_continuous(&mut self, continuous: bool) {
        self.continuous = continuous;
    }

    /// Resolves the color of a value, values are clamped to [0, 1] first and NaN is treated as 0
    ///
    /// # Parameters
    ///
    /// value: The value to color
    pub fn sample(&self, value: f32) -> Color {
        let scaled = Self::scale(value);

        if self.continuous {
            self.sample_continuous(scaled)
        } else {
            self.sample_discrete(scaled)
        }
    }

    /// Clamps a value into [0, 1] and scales it to the index range [0, 255]
    ///
    /// # Parameters
    ///
    /// value: The value to scale
    pub fn scale(value: f32) -> f32 {
        value.max(0.0).min(1.0) * PALETTE_MAX
    }

    /// Retrieves the nearest entry to a scaled value, ties round up
    ///
    /// # Parameters
    ///
    /// scaled: The value in index units, must be in [0, 255]
    pub fn sample_discrete(&self, scaled: f32) -> Color {
        self.colors[Self::nearest_index(scaled)]
    }

    /// Interpolates between the two entries surrounding a scaled value
    ///
    /// # Parameters
    ///
    /// scaled: The value in index units, must be in [0, 255]
    pub fn sample_continuous(&self, scaled: f32) -> Color {
        let index = Self::floor_index(scaled);
        if index == PALETTE_SIZE - 1 {
            return self.colors[index];
        }

        let fraction = scaled - index as f32;
        self.colors[index + 1].mix(&self.colors[index], fraction)
    }

    /// The index of the nearest entry with round half up, kept within the palette
    ///
    /// # Parameters
    ///
    /// scaled: The value in index units
    pub fn nearest_index(scaled: f32) -> usize {
        let below = scaled.floor();
        let index = if scaled - below >= 0.5 {
            below as usize + 1
        } else {
            below as usize
        };

        index.min(PALETTE_SIZE - 1)
    }

    /// The index of the entry at or below a scaled value, kept within the palette
    ///
    /// # Parameters
    ///
    /// scaled: The value in index units
    pub fn floor_index(scaled: f32) -> usize {
        (scaled.floor() as usize).min(PALETTE_SIZE - 1)
    }

    /// Constructs the shader compatible version of the palette
    pub fn get_data(&self) -> UniformPalette {
        UniformPalette {
            colors: (*self.colors).map(|color| color.get_data()),
            continuous: self.continuous as u32,
            _padding: [0; 3],
        }
    }
}

/// Describes which way to convert a tile value into a color
#[derive(Clone, Debug, PartialEq)]
pub enum ColorMap {
    /// Blend linearly between two colors
    Gradient(GradientMap),
    /// Look the color up in a palette
    Palette(PaletteMap),
}

impl ColorMap {
    /// Resolves the color of a value
    ///
    /// # Parameters
    ///
    /// value: The value to color
    pub fn sample(&self, value: f32) -> Color {
        match self {
            Self::Gradient(gradient) => gradient.sample(value),
            Self::Palette(palette) => palette.sample(value),
        }
    }

    /// Retrieves which variant this is
    pub fn get_type(&self) -> ColorMapType {
        match self {
            Self::Gradient(_) => ColorMapType::Gradient,
            Self::Palette(_) => ColorMapType::Palette,
        }
    }

    /// Retrieves the bytes to upload to the color map uniform
    pub fn get_bytes(&self) -> Vec<u8> {
        match self {
            Self::Gradient(gradient) => bytemuck::bytes_of(&gradient.get_data()).to_vec(),
            Self::Palette(palette) => bytemuck::bytes_of(&palette.get_data()).to_vec(),
        }
    }
}

impl From<GradientMap> for ColorMap {
    fn from(value: GradientMap) -> Self {
        Self::Gradient(value)
    }
}

impl From<PaletteMap> for ColorMap {
    fn from(value: PaletteMap) -> Self {
        Self::Palette(value)
    }
}

/// The variant of a color map without its data, used to select a render pipeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMapType {
    Gradient,
    Palette,
}

impl ColorMapType {
    /// The number of different color map types
    pub const COUNT: usize = 2;

    /// The id to find the type in a list of pipelines
    pub fn id(&self) -> usize {
        match self {
            Self::Gradient => 0,
            Self::Palette => 1,
        }
    }

    /// The size of the uniform for this type
    pub fn uniform_size(&self) -> usize {
        match self {
            Self::Gradient => std::mem::size_of::<UniformGradient>(),
            Self::Palette => std::mem::size_of::<UniformPalette>(),
        }
    }
}

/// The gradient as laid out in the shader
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UniformGradient {
    /// The color for a value of 1
    pub saturated: [f32; 4],
    /// The color for a value of 0
    pub empty: [f32; 4],
}

/// The palette as laid out in the shader
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UniformPalette {
    /// The colors of the palette
    pub colors: [[f32; 4]; PALETTE_SIZE],
    /// 1 if continuous, 0 if discrete
    pub continuous: u32,
    /// The uniform struct is rounded up to 16 bytes
    pub _padding: [u32; 3],
}

/// The error types for when creating a color map
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorMapError {
    /// The palette did not have the correct number of colors
    #[error("A palette must have exactly 256 colors but received {:?}", .0)]
    PaletteSize(usize),
    /// Not enough colors to interpolate between
    #[error("At least 2 colors are needed for a palette but received {:?}", .0)]
    TooFewStops(usize),
}
