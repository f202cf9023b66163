/// Device and surface settings used when the window comes up.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB surface format when the surface offers one.
    ///
    /// Offscreen feedback targets stay linear; only the final composite
    /// lands on this format.
    pub prefer_srgb: bool,

    /// FIFO runs exactly one feedback step per display refresh.
    pub present_mode: wgpu::PresentMode,

    /// Falls back to the first supported mode when unset or unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Frames the surface may queue ahead. A hint; backends may ignore it.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

impl GpuInit {
    /// Presents as soon as a frame is ready instead of waiting for vsync.
    ///
    /// The trail then advances once per rendered frame rather than once per
    /// refresh, so it fades faster on fast machines.
    pub fn unthrottled(self) -> Self {
        Self {
            present_mode: wgpu::PresentMode::AutoNoVsync,
            desired_maximum_frame_latency: 1,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paces_to_refresh() {
        let init = GpuInit::default();
        assert_eq!(init.present_mode, wgpu::PresentMode::Fifo);
        assert!(init.required_features.is_empty());
    }

    #[test]
    fn unthrottled_keeps_other_settings() {
        let init = GpuInit {
            prefer_srgb: false,
            ..GpuInit::default()
        }
        .unthrottled();
        assert_eq!(init.present_mode, wgpu::PresentMode::AutoNoVsync);
        assert_eq!(init.desired_maximum_frame_latency, 1);
        assert!(!init.prefer_srgb);
    }
}
