use winit::{
    window::{Window, WindowBuilder},
    event_loop::{EventLoop, ControlFlow},
    dpi::PhysicalSize,
    event::{Event, WindowEvent, KeyboardInput, ElementState, VirtualKeyCode},
};
use thiserror::Error;
use instant::Instant;
#[cfg(target_arch="wasm32")]
use wasm_bindgen::prelude::*;
use super::{
    types::{Point, Transform2D},
    camera::Camera,
    clock::FrameClock,
    color::ColorMap,
    grid::{GridLayout, SPACING_WIDE},
    map::Map,
    primitive::PrimitiveType,
    render::{RenderState, NewRenderStateError, RenderError},
    gpu_grid::GPUGrid,
    settings::Settings,
};

/// Runs the application in the browser with the default settings
#[cfg(target_arch="wasm32")]
#[wasm_bindgen(start)]
pub async fn run_web() {
    let layout = GridLayout::with_square_columns(WEB_TILES);
    let n_rows = layout.n_rows(WEB_TILES);
    run(Map::new_layered(layout, n_rows), Settings::default()).await;
}

/// The number of tiles shown in the browser
#[cfg(target_arch="wasm32")]
const WEB_TILES: u32 = 1600;

/// Runs the application
///
/// # Parameters
///
/// map: The tiles to draw
///
/// settings: The settings for the window and rendering
pub async fn run(map: Map, settings: Settings) {
    // Setup logging
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            if let Err(e) = console_log::init_with_level(log::Level::Warn) {
                web_sys::console::error_1(&format!("Couldn't initialize logger: {:?}", e).into());
            }
        } else {
            env_logger::init();
        }
    }

    // Create the event loop
    let event_loop = EventLoop::new();

    // Create the window
    let window = WindowBuilder::new()
        .with_title(&settings.name)
        .with_inner_size(settings.size)
        .build(&event_loop);
    let window = match window {
        Ok(window) => window,
        Err(e) => {
            log::error!("Unable to open window: {:?}", e);
            return;
        }
    };

    // Create canvas for browser to draw in
    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::WindowExtWebSys;
        let appended = web_sys::window()
            .and_then(|win| win.document())
            .and_then(|doc| {
                let dst = doc.get_element_by_id("wasm-example")?;
                let canvas = web_sys::Element::from(window.canvas());
                dst.append_child(&canvas).ok()?;
                Some(())
            });
        if appended.is_none() {
            log::error!("Couldn't append canvas to document body");
            return;
        }
    }

    // Create the state
    let mut state = match State::new(window, map, settings).await {
        Ok(state) => state,
        Err(error) => {
            log::error!("Unable to create state: {}", error);
            return;
        },
    };

    // Run the event loop
    event_loop.run(move |event, _, control_flow| state.handle_event(&event, control_flow));
}

/// Holds the state of the application
struct State {
    /// The main window
    window: Window,
    /// The render state
    render_state: RenderState,
    /// The inner size of the window
    size: PhysicalSize<u32>,
    /// The settings the application was started with
    settings: Settings,
    /// The tiles
    map: Map,
    /// The current layout of the tiles
    grid_layout: GridLayout,
    /// The current tile shape
    primitive: PrimitiveType,
    /// The color maps to cycle through, never empty
    color_maps: Vec<ColorMap>,
    /// The index of the color map in use
    color_map_id: usize,
    /// The camera controlling the transform
    camera: Camera,
    /// Paces the camera updates to the framerate
    frame_clock: FrameClock,
    /// The gpu side of the tiles
    gpu_grid: GPUGrid,
}

impl State {
    /// Create a new state
    ///
    /// # Parameters
    ///
    /// window: The window to use for the application
    ///
    /// map: The tiles to render
    ///
    /// settings: The settings for rendering
    ///
    /// # Errors
    ///
    /// See NewStateError for the possible errors
    async fn new(window: Window, map: Map, settings: Settings) -> Result<Self, NewStateError> {
        // Get the size of the window
        let size = window.inner_size();

        if size.width == 0 || size.height == 0 {
            return Err(NewStateError::InvalidSize(size));
        }

        let color_maps = settings.color_maps.clone();
        let color_map = color_maps.first().ok_or(NewStateError::NoColorMap)?;

        // Initialize the render state
        let render_state = RenderState::new(&window).await?;

        // Center the camera on the middle of the map
        let grid_layout = settings.space_layout(*map.get_layout());
        let n_rows = grid_layout.n_rows(map.len() as u32);
        let center_id = (n_rows / 2) * grid_layout.get_n_columns() + grid_layout.get_n_columns() / 2;
        let [center_x, center_y] = grid_layout.offset(center_id);
        let transform = settings.transform * Transform2D::translate(&Point::new(-center_x as f64, -center_y as f64));
        let camera = Camera::new(settings.framerate, &transform, &size);
        let frame_clock = FrameClock::new(settings.framerate, Instant::now());

        // Initialize the gpu grid
        let gpu_grid = GPUGrid::new(settings.primitive, &camera.get_transform(), &grid_layout, color_map, map.get_tiles(), &render_state.get_context());

        log::info!("Drawing {} tiles in {} columns", map.len(), grid_layout.get_n_columns());

        Ok(Self {
            window,
            render_state,
            size,
            primitive: settings.primitive,
            settings,
            map,
            grid_layout,
            color_maps,
            color_map_id: 0,
            camera,
            frame_clock,
            gpu_grid,
        })
    }

    /// Render the screen
    ///
    /// # Errors
    ///
    /// See RenderError for the possible errors
    fn render(&self) -> Result<(), RenderError> {
        self.gpu_grid.render(&self.settings.color_clear, &self.render_state)
    }

    /// Handles all events from winit
    ///
    /// # Parameters
    ///
    /// event: The event to handle
    ///
    /// control_flow: The location to set the control flow
    fn handle_event(&mut self, event: &Event<'_, ()>, control_flow: &mut ControlFlow) {
        match event {
            // Run the window event handler
            Event::WindowEvent { window_id, event } => if *window_id == self.window.id() {
                self.handle_window_event(event, control_flow);
            }

            // Move the camera once per frame
            Event::MainEventsCleared => {
                if self.camera.is_active() && self.frame_clock.tick(Instant::now()) && self.camera.update_transform() {
                    self.gpu_grid.write_transform(&self.camera.get_transform(), &self.render_state.get_context());
                    self.window.request_redraw();
                }

                if *control_flow != ControlFlow::Exit {
                    *control_flow = if self.camera.is_active() {
                        ControlFlow::WaitUntil(self.frame_clock.get_next_frame_time())
                    } else {
                        ControlFlow::Wait
                    };
                }
            }

            // Render the screen
            Event::RedrawRequested(window_id) => if *window_id == self.window.id() {
                match self.render() {
                    Ok(_) => {}

                    // Reconfigure the surface if lost
                    Err(RenderError::SurfaceTexture(wgpu::SurfaceError::Lost)) => {
                        log::warn!("Surface lost, reconfiguring");
                        self.render_state.reconfigure();
                    }

                    // The system is out of memory, we should probably quit
                    Err(RenderError::SurfaceTexture(wgpu::SurfaceError::OutOfMemory)) => {
                        log::error!("System is out of memory");
                        *control_flow = ControlFlow::Exit;
                    }

                    // All other errors (Outdated, Timeout) should be resolved by the next frame
                    Err(e) => log::warn!("Error while rendering: {}", e),
                }
            }

            _ => ()
        }
    }

    /// Handle a window event
    ///
    /// # Parameters
    ///
    /// event: The event to handle
    ///
    /// control_flow: The location to set the control flow
    fn handle_window_event(&mut self, event: &WindowEvent<'_>, control_flow: &mut ControlFlow) {
        match event {
            // Close the window
            WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,

            // The size of the window has changed
            WindowEvent::Resized(physical_size) => {
                self.resize(*physical_size);
            }

            // The window has been dragged into an area with a different scale factor
            WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                self.resize(**new_inner_size);
            }

            // Stop moving when the keys can no longer be released
            WindowEvent::Focused(false) => {
                self.camera.reset_keys();
            }

            WindowEvent::KeyboardInput { input, .. } => {
                self.handle_keyboard_input(input, control_flow);
            }

            _ => (),
        }
    }

    /// Handle a keyboard input
    ///
    /// # Parameters
    ///
    /// input: The input to handle
    ///
    /// control_flow: The location to set the control flow
    fn handle_keyboard_input(&mut self, input: &KeyboardInput, control_flow: &mut ControlFlow) {
        if self.camera.apply_key(input) {
            return;
        }

        if input.state != ElementState::Pressed {
            return;
        }

        match input.virtual_keycode {
            Some(VirtualKeyCode::Escape) => *control_flow = ControlFlow::Exit,
            Some(VirtualKeyCode::Tab) => self.next_color_map(),
            Some(VirtualKeyCode::Space) => self.toggle_continuous(),
            Some(VirtualKeyCode::G) => self.toggle_spacing(),
            Some(VirtualKeyCode::P) => self.toggle_primitive(),
            Some(VirtualKeyCode::I) => self.invert_tiles(),
            _ => return,
        }

        self.window.request_redraw();
    }

    /// Switches to the next color map in the list
    fn next_color_map(&mut self) {
        self.color_map_id = (self.color_map_id + 1) % self.color_maps.len();
        log::info!("Using color map {} of {}", self.color_map_id + 1, self.color_maps.len());
        self.gpu_grid.write_color_map(&self.color_maps[self.color_map_id], &self.render_state.get_context());
    }

    /// Switches a palette between discrete and continuous sampling, gradients are left alone
    fn toggle_continuous(&mut self) {
        if let ColorMap::Palette(palette) = &mut self.color_maps[self.color_map_id] {
            palette.set_continuous(!palette.is_continuous());
            log::info!("Palette continuous: {}", palette.is_continuous());
            self.gpu_grid.write_color_map(&self.color_maps[self.color_map_id], &self.render_state.get_context());
        }
    }

    /// Switches between the plain and the widened horizontal spacing
    fn toggle_spacing(&mut self) {
        let spacing = if self.grid_layout.get_spacing() == 1.0 {
            SPACING_WIDE
        } else {
            1.0
        };
        log::info!("Grid spacing: {}", spacing);
        self.grid_layout = self.grid_layout.with_spacing(spacing);
        self.gpu_grid.write_grid_layout(&self.grid_layout, &self.render_state.get_context());
    }

    /// Switches between hexagon and rectangle tiles
    fn toggle_primitive(&mut self) {
        self.primitive = match self.primitive {
            PrimitiveType::Hexagon => PrimitiveType::Rectangle,
            PrimitiveType::Rectangle => PrimitiveType::Hexagon,
        };
        log::info!("Tile shape: {:?}", self.primitive);
        self.gpu_grid.set_primitive(self.primitive, &self.render_state.get_context());
    }

    /// Replaces the value of every tile by one minus the value
    fn invert_tiles(&mut self) {
        self.map.map_values(|value| 1.0 - value);
        log::info!("Inverted {} tiles", self.map.len());
        self.gpu_grid.write_tiles(self.map.get_tiles(), &self.render_state.get_context());
    }

    /// Reconfigure if the window has been resized
    ///
    /// # Parameters
    ///
    /// new_size: The new size to set
    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.render_state.resize(new_size);
            self.camera.resize(&self.size);
            self.gpu_grid.write_transform(&self.camera.get_transform(), &self.render_state.get_context());
        }
    }
}

/// The error types for when creating a new state
#[derive(Error, Debug, Clone)]
pub enum NewStateError {
    /// The width or height of the window is too small
    #[error("The width and height of the window must be larger than 0 but received {:?}", .0)]
    InvalidSize(PhysicalSize<u32>),
    /// There is nothing to color the tiles with
    #[error("At least one color map must be given")]
    NoColorMap,
    /// The render state could not be created
    #[error("Unable to initialize the render state: {}", .0)]
    RenderInitError(#[from] NewRenderStateError),
}
