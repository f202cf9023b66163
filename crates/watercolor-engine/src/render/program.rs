use crate::device::ShaderCompileError;

/// Compiles a WGSL program and checks the device's compilation report.
///
/// Validation runs inside an error scope, so a broken program comes back as
/// [`ShaderCompileError`] instead of reaching the device's uncaptured-error
/// handler. Every error-level message is collected; anything else is logged.
pub fn compile_program(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, ShaderCompileError> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let info = pollster::block_on(module.get_compilation_info());
    let scoped = pollster::block_on(scope.pop());

    let mut errors = Vec::new();
    for msg in &info.messages {
        let at = msg
            .location
            .as_ref()
            .map(|l| format!("{}:{}: ", l.line_number, l.line_position))
            .unwrap_or_default();
        if matches!(msg.message_type, wgpu::CompilationMessageType::Error) {
            errors.push(format!("{at}{}", msg.message));
        } else {
            log::warn!("shader `{label}`: {at}{}", msg.message);
        }
    }

    if let Some(err) = scoped {
        if errors.is_empty() {
            errors.push(err.to_string());
        }
    }

    if errors.is_empty() {
        log::debug!("compiled shader program `{label}`");
        Ok(module)
    } else {
        Err(ShaderCompileError {
            program: label.to_string(),
            messages: errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> wgpu::Device {
        wgpu::Device::noop(&wgpu::DeviceDescriptor::default()).0
    }

    #[test]
    fn broken_source_is_reported_not_raised() {
        let err = compile_program(&device(), "broken", "fn main( {").unwrap_err();
        assert_eq!(err.program, "broken");
        assert!(!err.messages.is_empty());
    }

    #[test]
    fn valid_source_compiles() {
        let src = "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";
        assert!(compile_program(&device(), "solid", src).is_ok());
    }

    #[test]
    fn device_survives_a_failed_program() {
        let device = device();
        assert!(compile_program(&device, "broken", "let = ;").is_err());
        let src = "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(0.5); }";
        assert!(compile_program(&device, "after", src).is_ok());
    }
}
