use winit::{
    dpi::PhysicalSize,
    window::Window,
};
use thiserror::Error;

/// Everything needed to talk to the gpu and draw to the window
pub struct RenderState {
    /// The logical device
    device: wgpu::Device,
    /// The command queue of the device
    queue: wgpu::Queue,
    /// The surface of the window
    surface: wgpu::Surface,
    /// The current configuration of the surface
    config: wgpu::SurfaceConfiguration,
}

impl RenderState {
    /// Connects to the gpu and configures the surface of the window
    ///
    /// # Parameters
    ///
    /// window: The window to draw to, must outlive the render state
    ///
    /// # Errors
    ///
    /// See NewRenderStateError for the possible errors
    pub async fn new(window: &Window) -> Result<Self, NewRenderStateError> {
        // Get the size of the window
        let size = window.inner_size();

        if size.width == 0 || size.height == 0 {
            return Err(NewRenderStateError::InvalidSize(size));
        }

        // Get a handle to the API
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags: wgpu::InstanceFlags::VALIDATION, // Any other choice crashes when running app in debug mode due to subtract with overflow error
            dx12_shader_compiler: Default::default(),
            gles_minor_version: wgpu::Gles3MinorVersion::Automatic,
        });

        // Get a surface for the window
        let surface = unsafe { instance.create_surface(&window) }?;

        // Get an adapter to the GPU
        let adapter = instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            },
        ).await.ok_or(NewRenderStateError::GetAdapter)?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        // Create a logical device and a command queue
        let (device, queue) = adapter.request_device(
            &wgpu::DeviceDescriptor {
                features: wgpu::Features::empty(),
                limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                label: None,
            },
            None,
        ).await?;

        // Get an sRGB texture format for the surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps.formats.iter()
            .copied()
            .find(|f| f.is_srgb())
            .ok_or(NewRenderStateError::IncompatibleSurface)?;

        // Prefer vsync, it paces the event loop when the camera is moving
        let present_mode = if surface_caps.present_modes.contains(&wgpu::PresentMode::Fifo) {
            wgpu::PresentMode::Fifo
        } else {
            *surface_caps.present_modes.first().ok_or(NewRenderStateError::IncompatibleSurface)?
        };
        let alpha_mode = *surface_caps.alpha_modes.first().ok_or(NewRenderStateError::IncompatibleSurface)?;

        // Setup the configurations and configure the surface
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        log::debug!("Configured surface: {:?}", config);

        Ok(Self {
            device,
            queue,
            surface,
            config,
        })
    }

    /// Reconfigures the surface for a new window size, sizes with a zero side are ignored
    ///
    /// # Parameters
    ///
    /// new_size: The new size of the window
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.reconfigure();
    }

    /// Configures the surface again with the current configuration, used when the surface is lost
    pub fn reconfigure(&self) {
        log::debug!("Reconfiguring surface to {}x{}", self.config.width, self.config.height);
        self.surface.configure(&self.device, &self.config);
    }

    /// Retrieves what is needed to create buffers and pipelines drawing to the surface
    pub fn get_context(&self) -> GpuContext<'_> {
        GpuContext {
            device: &self.device,
            queue: &self.queue,
            format: self.config.format,
        }
    }

    pub fn get_surface(&self) -> &wgpu::Surface {
        &self.surface
    }
}

/// A device with its queue and the format of the texture drawn to
#[derive(Clone, Copy, Debug)]
pub struct GpuContext<'a> {
    /// The logical device
    pub device: &'a wgpu::Device,
    /// The command queue of the device
    pub queue: &'a wgpu::Queue,
    /// The format of the texture the pipelines draw to
    pub format: wgpu::TextureFormat,
}

/// The error types for when connecting to the gpu
#[derive(Error, Debug, Clone)]
pub enum NewRenderStateError {
    #[error("The width and height of the window must be larger than 0 but received {:?}", .0)]
    InvalidSize(PhysicalSize<u32>),
    #[error("Unable to create surface: {:?}", .0)]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("Unable to get adapter for gpu")]
    GetAdapter,
    #[error("Unable to retrieve logical device: {:?}", .0)]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("No compatible surface found")]
    IncompatibleSurface,
}

/// The error types for when drawing a frame
#[derive(Error, Debug, Clone)]
pub enum RenderError {
    #[error("Unable to get surface texture: {:?}", .0)]
    SurfaceTexture(#[from] wgpu::SurfaceError),
}
