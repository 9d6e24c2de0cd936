/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Request API validation and debug labels from the backend
    /// (`wgpu::InstanceFlags::debugging()`).
    pub debug_validation: bool,

    /// Surface format to use when the surface supports it.
    ///
    /// `None`, or an unsupported format, falls back to the first format the
    /// surface reports.
    pub preferred_format: Option<wgpu::TextureFormat>,

    /// Present mode. `Fifo` presents once per vertical blank.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Number of frames that may be queued ahead of presentation.
    /// `2` gives classic double buffering.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            debug_validation: true,
            preferred_format: Some(wgpu::TextureFormat::Bgra8Unorm),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
