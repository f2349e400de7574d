//! GPU context the sprite renderer draws with.
//!
//! A [`GpuContext`] is a device and queue, plus a [`RenderSurface`] when
//! frames go to a window. The device is requested with the adapter's own
//! texture-size limit, so glyph atlases can grow as large as the hardware
//! allows instead of stopping at the portable default.

use lumen_core::CpuTextureStore;

use thiserror::Error;
use wgpu::{
    Adapter, Device, DeviceDescriptor, Instance, InstanceDescriptor, Limits, Queue,
    RequestAdapterOptions, Surface, SurfaceConfiguration, SurfaceError, SurfaceTexture,
    TextureFormat, TextureUsages,
};

#[derive(Error, Debug)]
pub enum GpuError {
    #[error("No suitable GPU adapter found")]
    NoAdapter,
    #[error("Failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Window surface and the configuration it was last set up with.
pub struct RenderSurface {
    surface: Surface<'static>,
    config: SurfaceConfiguration,
}

impl RenderSurface {
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Next frame to draw into. A lost or outdated surface is
    /// reconfigured once before giving up.
    pub fn acquire(&self, device: &Device) -> Result<SurfaceTexture, SurfaceError> {
        match self.surface.get_current_texture() {
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(device, &self.config);
                self.surface.get_current_texture()
            }
            frame => frame,
        }
    }

    fn resize(&mut self, device: &Device, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(device, &self.config);
    }
}

pub struct GpuContext {
    pub device: Device,
    pub queue: Queue,
    /// Format sprite pipelines render into.
    pub surface_format: TextureFormat,
    surface: Option<RenderSurface>,
}

impl GpuContext {
    /// Context without a window. Used by tests, benchmarks and
    /// off-screen rendering.
    pub async fn new_headless() -> Result<Self, GpuError> {
        let instance = Instance::new(&InstanceDescriptor::default());
        let (_, device, queue) = request_device(&instance, None, "lumen-headless").await?;

        Ok(Self {
            device,
            queue,
            surface_format: TextureFormat::Bgra8UnormSrgb,
            surface: None,
        })
    }

    /// Context presenting to `window`, which must outlive it.
    pub async fn new_with_surface<W>(window: W, width: u32, height: u32) -> Result<Self, GpuError>
    where
        W: wgpu::WasmNotSendSync + Into<wgpu::SurfaceTarget<'static>>,
    {
        let instance = Instance::new(&InstanceDescriptor::default());
        let surface = instance
            .create_surface(window)
            .map_err(|e| GpuError::Surface(e.to_string()))?;
        let (adapter, device, queue) =
            request_device(&instance, Some(&surface), "lumen-windowed").await?;

        // Sprite colours are authored in sRGB.
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| GpuError::Surface("surface reports no formats".to_string()))?;

        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        Ok(Self {
            device,
            queue,
            surface_format: format,
            surface: Some(RenderSurface { surface, config }),
        })
    }

    pub fn surface(&self) -> Option<&RenderSurface> {
        self.surface.as_ref()
    }

    /// Resize the window surface. Zero sizes and headless contexts are
    /// ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(surface) = &mut self.surface {
            surface.resize(&self.device, width, height);
        }
    }

    /// Current surface dimensions, or `(0, 0)` if headless.
    pub fn surface_size(&self) -> (u32, u32) {
        self.surface.as_ref().map_or((0, 0), RenderSurface::size)
    }

    /// Largest texture width or height the device accepts.
    pub fn max_texture_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    /// A CPU texture store with this device's size limit, for building
    /// glyph atlases before a renderer exists.
    pub fn cpu_texture_store(&self) -> CpuTextureStore {
        CpuTextureStore::with_max_dimension(self.max_texture_dimension())
    }
}

async fn request_device(
    instance: &Instance,
    compatible_surface: Option<&Surface<'_>>,
    label: &str,
) -> Result<(Adapter, Device, Queue), GpuError> {
    let adapter = instance
        .request_adapter(&RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface,
            force_fallback_adapter: false,
        })
        .await
        .ok_or(GpuError::NoAdapter)?;

    // Take the adapter's texture-size limit; everything else stays portable.
    let limits = Limits::downlevel_defaults().using_resolution(adapter.limits());
    let (device, queue) = adapter
        .request_device(
            &DeviceDescriptor {
                label: Some(label),
                required_limits: limits,
                ..Default::default()
            },
            None,
        )
        .await?;

    let info = adapter.get_info();
    log::info!(
        "GPU context '{}' on {} ({:?}), max texture {}px",
        label,
        info.name,
        info.backend,
        device.limits().max_texture_dimension_2d
    );
    Ok((adapter, device, queue))
}

// ===================================================================
// Tests
// ===================================================================
