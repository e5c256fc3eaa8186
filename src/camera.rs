use winit::{
    dpi::PhysicalSize,
    event::{ElementState, KeyboardInput, VirtualKeyCode},
};
use super::types::{Transform2D, Point};

/// How fast the camera moves in screen heights per second
const MOVE_SPEED: f64 = 1.0;
/// How fast the camera zooms, the relative change per second
const ZOOM_SPEED: f64 = 1.2;
/// How fast the camera rotates in radians per second
const ROTATE_SPEED: f64 = 1.0;
/// The speed multiplier while boosting
const BOOST_FACTOR: f64 = 3.0;

/// Describes a how the camera is moving
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    /// The movement keys: d, a, w, s
    move_active: [bool; 4],
    /// The zoom keys: q, e
    zoom_active: [bool; 2],
    /// The rotation keys: r, f
    rotate_active: [bool; 2],
    /// True while left shift is held down
    boost: bool,
    /// True if any button is pressed and the camera needs to be updated
    active: bool,
    /// The framerate of the program, this is how many times a second the transform should be updated
    framerate: f64,
    /// The current transform
    transform: Transform2D,
    /// The transform to make the aspect ratio correct
    transform_aspect: Transform2D,
    /// The transform to apply to the current transform every frame
    transform_update: Transform2D,
}

impl Camera {
    /// Creates a new camera
    ///
    /// # Parameters
    ///
    /// framerate: The expected framerate of the program, this is how many times a second the transform should be updated
    ///
    /// transform: The initial transform to use
    ///
    /// size: The current size of the window
    pub fn new(framerate: f64, transform: &Transform2D, size: &PhysicalSize<u32>) -> Self {
        Self {
            move_active: [false; 4],
            zoom_active: [false; 2],
            rotate_active: [false; 2],
            boost: false,
            active: false,
            framerate,
            transform: *transform,
            transform_aspect: Self::size_to_aspect(size),
            transform_update: Transform2D::identity(),
        }
    }

    /// Attempts to use a keyboard input, returns true if the key controls the camera
    ///
    /// # Parameters
    ///
    /// input: The keyboard input to handle
    pub fn apply_key(&mut self, input: &KeyboardInput) -> bool {
        let active = input.state == ElementState::Pressed;

        match input.virtual_keycode {
            Some(VirtualKeyCode::D) => self.move_active[0] = active,
            Some(VirtualKeyCode::A) => self.move_active[1] = active,
            Some(VirtualKeyCode::W) => self.move_active[2] = active,
            Some(VirtualKeyCode::S) => self.move_active[3] = active,
            Some(VirtualKeyCode::Q) => self.zoom_active[0] = active,
            Some(VirtualKeyCode::E) => self.zoom_active[1] = active,
            Some(VirtualKeyCode::R) => self.rotate_active[0] = active,
            Some(VirtualKeyCode::F) => self.rotate_active[1] = active,
            Some(VirtualKeyCode::LShift) => self.boost = active,
            _ => return false,
        }

        self.reload_transform();

        true
    }

    /// Reset all of the input such that all of it is turned off
    pub fn reset_keys(&mut self) {
        self.move_active.iter_mut().for_each(|val| *val = false);
        self.zoom_active.iter_mut().for_each(|val| *val = false);
        self.rotate_active.iter_mut().for_each(|val| *val = false);
        self.boost = false;
        self.reload_transform();
    }

    /// Recalculates the aspect transform after resizing
    ///
    /// # Parameters
    ///
    /// size: The new size of the window
    pub fn resize(&mut self, size: &PhysicalSize<u32>) {
        self.transform_aspect = Self::size_to_aspect(size);
    }

    /// True if a camera key is held down
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Retrieves the world to screen transform
    pub fn get_transform(&self) -> Transform2D {
        self.transform_aspect * self.transform
    }

    /// Update the transform using the current input, should be run once per frame
    ///
    /// Returns true if the transform has updated
    pub fn update_transform(&mut self) -> bool {
        if !self.active {
            return false;
        }

        self.transform = self.transform_update * self.transform;

        true
    }

    /// Reload the transform_update for when the input has changed
    fn reload_transform(&mut self) {
        // Check if it is active
        self.active = self.move_active.iter().any(|&x| x) || self.zoom_active.iter().any(|&x| x) || self.rotate_active.iter().any(|&x| x);

        if !self.active {
            return;
        }

        let boost = if self.boost {
            BOOST_FACTOR
        } else {
            1.0
        };

        // Calculate the movement direction, the view moves opposite to the world
        let move_val = 2.0 * MOVE_SPEED * boost / self.framerate;
        let key_move = [
            Point::new(-1.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, -1.0),
            Point::new(0.0, 1.0),
        ];
        let mut move_dir = Self::sum_active(&self.move_active, &key_move, Point::new(0.0, 0.0), |prev, next| prev + next);
        let length = move_dir.norm();
        if length > 0.0 {
            move_dir = move_dir * (move_val / length);
        }

        // Calculate the zoom
        let zoom_val = 1.0 + ZOOM_SPEED * boost / self.framerate;
        let zoom_dir = Self::sum_active(&self.zoom_active, &[zoom_val, 1.0 / zoom_val], 1.0, |prev, next| prev * next);

        // Calculate the rotation
        let rotate_val = ROTATE_SPEED * boost / self.framerate;
        let rotate_dir = Self::sum_active(&self.rotate_active, &[rotate_val, -rotate_val], 0.0, |prev, next| prev + next);

        // Combine all of the transforms
        let transform_move = Transform2D::translate(&move_dir);
        let transform_zoom = Transform2D::scale(&Point::new(zoom_dir, zoom_dir));
        let transform_rotate = Transform2D::rotation(rotate_dir);

        self.transform_update = transform_rotate * transform_zoom * transform_move;
    }

    /// Combines the values of all active keys
    ///
    /// # Parameters
    ///
    /// active: Which keys are held down
    ///
    /// values: The value of each key
    ///
    /// init: The value when no keys are held down
    ///
    /// combine: The function combining two values
    fn sum_active<T: Copy>(active: &[bool], values: &[T], init: T, combine: impl Fn(T, T) -> T) -> T {
        active
            .iter()
            .zip(values.iter())
            .filter_map(|(&active, &value)| {
                if active {
                    Some(value)
                } else {
                    None
                }
            })
            .fold(init, combine)
    }

    /// Converts a size to an aspect transform, the screen height always spans 2 units
    ///
    /// # Parameters
    ///
    /// size: The size of the window
    fn size_to_aspect(size: &PhysicalSize<u32>) -> Transform2D {
        Transform2D::scale(&Point::new((size.height as f64) / (size.width.max(1) as f64), 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(deprecated)]
    fn key(code: VirtualKeyCode, state: ElementState) -> KeyboardInput {
        KeyboardInput {
            scancode: 0,
            state,
            virtual_keycode: Some(code),
            modifiers: Default::default(),
        }
    }

    fn camera() -> Camera {
        Camera::new(10.0, &Transform2D::identity(), &PhysicalSize::new(200, 100))
    }

    #[test]
    fn aspect_keeps_tiles_square() {
        let transform = camera().get_transform();
        let corner = transform * Point::new(1.0, 1.0);

        assert_eq!(corner, Point::new(0.5, 1.0));
    }

    #[test]
    fn idle_camera_does_not_update() {
        let mut camera = camera();

        assert!(!camera.update_transform());
        assert_eq!(camera.get_transform(), Transform2D::scale(&Point::new(0.5, 1.0)));
    }

    #[test]
    fn moving_right_shifts_the_world_left() {
        let mut camera = camera();
        assert!(camera.apply_key(&key(VirtualKeyCode::D, ElementState::Pressed)));
        assert!(camera.is_active());

        assert!(camera.update_transform());
        let origin = camera.get_transform() * Point::new(0.0, 0.0);
        assert!((origin.get_x() + 0.5 * 0.2).abs() < 1e-12, "got {origin:?}");
        assert_eq!(origin.get_y(), 0.0);

        assert!(camera.apply_key(&key(VirtualKeyCode::D, ElementState::Released)));
        assert!(!camera.update_transform());
    }

    #[test]
    fn zoom_in_scales_up() {
        let mut camera = camera();
        camera.apply_key(&key(VirtualKeyCode::Q, ElementState::Pressed));
        camera.update_transform();

        let point = camera.get_transform() * Point::new(0.0, 1.0);
        assert!((point.get_y() - 1.12).abs() < 1e-12, "got {point:?}");
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let mut camera = camera();

        assert!(!camera.apply_key(&key(VirtualKeyCode::Space, ElementState::Pressed)));
        assert!(!camera.is_active());
    }

    #[test]
    fn reset_stops_movement() {
        let mut camera = camera();
        camera.apply_key(&key(VirtualKeyCode::W, ElementState::Pressed));
        camera.apply_key(&key(VirtualKeyCode::R, ElementState::Pressed));

        camera.reset_keys();

        assert!(!camera.is_active());
        assert!(!camera.update_transform());
    }
}
