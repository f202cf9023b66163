//! Watercolor feedback effect on top of `watercolor-engine`.
//!
//! A small 3D scene (a rotating cube and a pointer-driven marker) is rendered
//! offscreen every frame and blended with the previous frame's result through
//! a ping-pong pair of targets, so motion leaves soft, bleeding trails.
//!
//! ```rust,ignore
//! use watercolor_fx::{Application, Variant};
//!
//! Application::new().variant(Variant::Watercolor).run()?;
//! ```
//!
//! [`Experience`] holds all effect state and issues passes to any
//! [`RenderBackend`]; [`renderer::SceneRenderer`] is the wgpu backend.

pub mod app;
pub mod backend;
pub mod camera;
pub mod config;
pub mod controls;
pub mod cursor;
pub mod experience;
pub mod feedback;
pub mod geometry;
pub mod programs;
pub mod renderer;
pub mod scene;
pub mod targets;
pub mod uniforms;

pub use app::Application;
pub use backend::{DrawTarget, Pass, RenderBackend};
pub use config::{CameraConfig, ControlsConfig, CursorConfig, ExperienceConfig, Variant};
pub use experience::Experience;
pub use feedback::FeedbackPipeline;
