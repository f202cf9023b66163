use thiserror::Error;

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

/// The drawing surface or GPU device could not be brought up.
#[derive(Debug, Error)]
pub enum GraphicsInitError {
    #[error("window has zero size ({width}x{height})")]
    ZeroSize { width: u32, height: u32 },

    #[error("failed to create wgpu surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to find a suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create wgpu device/queue: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// A shader program failed to compile or validate.
#[derive(Debug, Error)]
#[error("shader program `{program}` failed to compile:\n{}", .messages.join("\n"))]
pub struct ShaderCompileError {
    pub program: String,
    pub messages: Vec<String>,
}

/// Fatal graphics failures. Both are reported once at startup.
#[derive(Debug, Error)]
pub enum GraphicsError {
    #[error(transparent)]
    Init(#[from] GraphicsInitError),

    #[error(transparent)]
    ShaderCompile(#[from] ShaderCompileError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_error_lists_every_message() {
        let err = ShaderCompileError {
            program: "processing".to_string(),
            messages: vec!["1:3 unknown identifier".to_string(), "4:1 expected `;`".to_string()],
        };
        let text = err.to_string();
        assert!(text.contains("`processing`"));
        assert!(text.contains("unknown identifier"));
        assert!(text.contains("expected `;`"));
    }

    #[test]
    fn graphics_error_is_transparent() {
        let err: GraphicsError = GraphicsInitError::NoSurfaceFormat.into();
        assert_eq!(err.to_string(), "surface reports no supported formats");
    }
}
