use std::ops::{Mul, Add, Sub, Neg};

/// A 2D point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// The x-coordinate
    x: f64,
    /// The y-coordinate
    y: f64,
}

impl Point {
    /// Creates a new point
    ///
    /// # Parameters
    ///
    /// x: The x-coordinate
    ///
    /// y: The y-coordinate
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
        }
    }

    /// Retrieves the x-coordinate
    pub fn get_x(&self) -> f64 {
        self.x
    }

    /// Retrieves the y-coordinate
    pub fn get_y(&self) -> f64 {
        self.y
    }

    /// The euclidean length of the point seen as a vector
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

impl Add<Point> for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Add<&Point> for Point {
    type Output = Point;

    fn add(self, rhs: &Point) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Point> for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Sub<&Point> for Point {
    type Output = Point;

    fn sub(self, rhs: &Point) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<f64> for &Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Self::Output {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Defines a 2x2 matrix
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix {
    /// The values of the matrix, first index is row, second index is column
    values: [[f64; 2]; 2],
}

impl Matrix {
    /// Creates a new matrix
    ///
    /// # Parameters
    ///
    /// values: The values of the matrix, first index is row, second index is column
    pub const fn new(values: &[[f64; 2]; 2]) -> Self {
        Self { values: *values }
    }

    /// Creates the identity matrix
    pub const fn identity() -> Self {
        Self::new(&[[1.0, 0.0], [0.0, 1.0]])
    }

    /// Calculates the determinant
    pub fn det(&self) -> f64 {
        self.values[0][0] * self.values[1][1] - self.values[0][1] * self.values[1][0]
    }

    /// Inverts the matrix
    ///
    /// # Panics
    ///
    /// In debug mode it panics if the determinant is 0 (it is not invertible)
    pub fn inv(&self) -> Self {
        // Calculate determinant
        let d = self.det();

        // Make sure it is not invalid
        if cfg!(debug_assertions) && d == 0.0 {
            panic!("The matrix is not invertible: {:?}", self);
        }

        // Calculate inverse
        Self::new(&[[self.values[1][1] / d, -self.values[0][1] / d], [-self.values[1][0] / d, self.values[0][0] / d]])
    }
}

impl Mul<Matrix> for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Self::Output {
        Self::new(&[[
                self.values[0][0] * rhs.values[0][0] + self.values[0][1] * rhs.values[1][0],
                self.values[0][0] * rhs.values[0][1] + self.values[0][1] * rhs.values[1][1]
            ], [
                self.values[1][0] * rhs.values[0][0] + self.values[1][1] * rhs.values[1][0],
                self.values[1][0] * rhs.values[0][1] + self.values[1][1] * rhs.values[1][1],
        ]])
    }
}

impl Neg for Matrix {
    type Output = Matrix;

    fn neg(self) -> Self::Output {
        Self::new(&[[-self.values[0][0], -self.values[0][1]], [-self.values[1][0], -self.values[1][1]]])
    }
}

impl Mul<Point> for Matrix {
    type Output = Point;

    fn mul(self, rhs: Point) -> Self::Output {
        Point::new(
            self.values[0][0] * rhs.x + self.values[0][1] * rhs.y,
            self.values[1][0] * rhs.x + self.values[1][1] * rhs.y,
        )
    }
}

impl Mul<&Point> for Matrix {
    type Output = Point;

    fn mul(self, rhs: &Point) -> Self::Output {
        self * *rhs
    }
}

/// A 2D transform which acts on Point types, including rotation, scaling and translation.
///
/// The operation is y = r * x + c where
///
/// y: The output point
///
/// x: The input point
///
/// c: The offset
///
/// r: The 2x2 linear part
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform2D {
    /// The linear part of the transform
    linear: Matrix,
    /// The offset added after the linear part
    offset: Point,
}

impl Transform2D {
    /// Creates a transform from its linear part and offset
    ///
    /// # Parameters
    ///
    /// linear: The 2x2 matrix applied first
    ///
    /// offset: The translation applied afterwards
    pub const fn new(linear: Matrix, offset: Point) -> Self {
        Self { linear, offset }
    }

    /// Creates the identity operation
    pub const fn identity() -> Self {
        Self::new(Matrix::identity(), Point::new(0.0, 0.0))
    }

    /// Rotate around origo
    ///
    /// # Parameters
    ///
    /// angle: The angle to rotate
    pub fn rotation(angle: f64) -> Self {
        let linear = Matrix::new(&[[angle.cos(), -angle.sin()], [angle.sin(), angle.cos()]]);

        Self::new(linear, Point::new(0.0, 0.0))
    }

    /// Scale at origo
    ///
    /// # Parameters
    ///
    /// scale: The ratio to scale x and y with
    pub fn scale(scale: &Point) -> Self {
        let linear = Matrix::new(&[[scale.x, 0.0], [0.0, scale.y]]);

        Self::new(linear, Point::new(0.0, 0.0))
    }

    /// Translates a point
    ///
    /// # Parameters
    ///
    /// offset: The amount to translate
    pub fn translate(offset: &Point) -> Self {
        Self::new(Matrix::identity(), *offset)
    }

    /// Applies this transform around a given fix point instead of origo
    ///
    /// # Parameters
    ///
    /// center: The point which is left unchanged
    pub fn at(&self, center: &Point) -> Self {
        let offset = self.offset + center - self.linear * center;

        Self::new(self.linear, offset)
    }

    /// Retrieves the inverse transform
    ///
    /// # Panics
    ///
    /// In debug mode it panics if the linear part is not invertible
    pub fn inv(&self) -> Self {
        let linear = self.linear.inv();
        let offset = -(linear * self.offset);

        Self::new(linear, offset)
    }

    /// Retrieves the data for the gpu as a column major 4x4 matrix acting on (x, y, 0, 1)
    pub fn get_data(&self) -> UniformTransform2D {
        UniformTransform2D {
            transform: [
                [self.linear.values[0][0] as f32, self.linear.values[1][0] as f32, 0.0, 0.0],
                [self.linear.values[0][1] as f32, self.linear.values[1][1] as f32, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [self.offset.x as f32, self.offset.y as f32, 0.0, 1.0],
            ],
        }
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul<&Transform2D> for &Transform2D {
    type Output = Transform2D;

    /// t2 * t1 * x = r2 * (r1 * x + c1) + c2 = r2 * r1 * x + (r2 * c1 + c2)
    fn mul(self, rhs: &Transform2D) -> Self::Output {
        let linear = self.linear * rhs.linear;
        let offset = self.linear * rhs.offset + self.offset;

        Transform2D::new(linear, offset)
    }
}

impl Mul<Transform2D> for &Transform2D {
    type Output = Transform2D;

    fn mul(self, rhs: Transform2D) -> Self::Output {
        self * &rhs
    }
}

impl Mul<&Transform2D> for Transform2D {
    type Output = Transform2D;

    fn mul(self, rhs: &Transform2D) -> Self::Output {
        &self * rhs
    }
}

impl Mul<Transform2D> for Transform2D {
    type Output = Transform2D;

    fn mul(self, rhs: Transform2D) -> Self::Output {
        &self * &rhs
    }
}

impl Mul<&Point> for &Transform2D {
    type Output = Point;

    fn mul(self, rhs: &Point) -> Self::Output {
        self.linear * rhs + self.offset
    }
}

impl Mul<Point> for &Transform2D {
    type Output = Point;

    fn mul(self, rhs: Point) -> Self::Output {
        self * &rhs
    }
}

impl Mul<Point> for Transform2D {
    type Output = Point;

    fn mul(self, rhs: Point) -> Self::Output {
        &self * &rhs
    }
}

/// The Transform2D as it is laid out for a `mat4x4<f32>` uniform
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UniformTransform2D {
    /// The columns of the matrix
    pub transform: [[f32; 4]; 4],
}

impl UniformTransform2D {
    /// Multiplies the matrix with a homogeneous coordinate, the same way the vertex shader does
    ///
    /// # Parameters
    ///
    /// vector: The (x, y, z, w) coordinate to transform
    pub fn apply(&self, vector: [f32; 4]) -> [f32; 4] {
        let mut result = [0.0; 4];
        for (column, &scale) in self.transform.iter().zip(vector.iter()) {
            for (out, value) in result.iter_mut().zip(column.iter()) {
                *out += value * scale;
            }
        }
        result
    }
}
