use crate::scene::{SceneGraph, SceneId};
use crate::targets::{TargetId, TargetPool};

/// Destination of one scene render.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawTarget {
    /// The visible surface of the current frame.
    Surface,
    Offscreen(TargetId),
}

/// One scene drawn into one destination.
pub struct Pass<'a> {
    pub graph: &'a SceneGraph,
    pub targets: &'a TargetPool,
    pub scene: SceneId,
    pub target: DrawTarget,
}

/// Executes scene passes. Passes run in call order within a frame.
pub trait RenderBackend {
    fn render(&mut self, pass: Pass<'_>);
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    /// What a pass bound, captured when the pass was issued.
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedPass {
        pub scene: SceneId,
        pub target: DrawTarget,
        pub target_size: Option<(u32, u32)>,
        /// `(drawable, uniform, bound target)` for every texture input.
        pub textures: Vec<(&'static str, &'static str, Option<TargetId>)>,
        pub floats: Vec<(&'static str, &'static str, f32)>,
    }

    /// GPU-free backend that records passes.
    #[derive(Debug, Default)]
    pub struct RecordingBackend {
        pub passes: Vec<RecordedPass>,
    }

    impl RecordingBackend {
        pub fn texture(&self, pass: usize, uniform: &str) -> Option<TargetId> {
            self.passes[pass]
                .textures
                .iter()
                .find(|(_, name, _)| *name == uniform)
                .and_then(|(_, _, t)| *t)
        }
    }

    impl RenderBackend for RecordingBackend {
        fn render(&mut self, pass: Pass<'_>) {
            let target_size = match pass.target {
                DrawTarget::Surface => None,
                DrawTarget::Offscreen(id) => pass.targets.size(id),
            };
            let mut textures = Vec::new();
            let mut floats = Vec::new();
            if let Some(scene) = pass.graph.scene(pass.scene) {
                for d in scene.drawables() {
                    for (name, value) in d.uniforms.iter() {
                        match value {
                            crate::uniforms::UniformValue::Texture(t) => textures.push((d.label, name, t)),
                            crate::uniforms::UniformValue::Float(v) => floats.push((d.label, name, v)),
                            _ => {}
                        }
                    }
                }
            }
            self.passes.push(RecordedPass {
                scene: pass.scene,
                target: pass.target,
                target_size,
                textures,
                floats,
            });
        }
    }
}
