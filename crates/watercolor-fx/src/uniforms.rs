use glam::{Vec2, Vec4};

use crate::targets::TargetId;

/// Seconds since the clock started.
pub const U_TIME: &str = "uTime";
/// Size of the pass' destination in pixels.
pub const U_RESOLUTION: &str = "uResolution";
/// Flat color for unlit programs.
pub const U_COLOR: &str = "uColor";

/// Value bound to a named program input.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2(Vec2),
    Vec4(Vec4),
    /// Sampled render target. `None` binds a 1x1 transparent texture.
    Texture(Option<TargetId>),
}

/// Named program inputs of one drawable, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformSet {
    entries: Vec<(&'static str, UniformValue)>,
}

impl UniformSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: UniformValue) -> Self {
        self.set(name, value);
        self
    }

    /// Inserts or overwrites `name`.
    pub fn set(&mut self, name: &'static str, value: UniformValue) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.entries.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            UniformValue::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn vec2(&self, name: &str) -> Option<Vec2> {
        match self.get(name)? {
            UniformValue::Vec2(v) => Some(v),
            _ => None,
        }
    }

    pub fn vec4(&self, name: &str) -> Option<Vec4> {
        match self.get(name)? {
            UniformValue::Vec4(v) => Some(v),
            _ => None,
        }
    }

    /// Target bound to a texture input. `None` when unset or bound to nothing.
    pub fn texture(&self, name: &str) -> Option<TargetId> {
        match self.get(name)? {
            UniformValue::Texture(t) => t,
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, UniformValue)> + '_ {
        self.entries.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_in_place() {
        let mut u = UniformSet::new().with(U_TIME, UniformValue::Float(0.0)).with(U_COLOR, UniformValue::Vec4(Vec4::ONE));
        u.set(U_TIME, UniformValue::Float(2.5));
        assert_eq!(u.float(U_TIME), Some(2.5));
        assert_eq!(u.iter().map(|(n, _)| n).collect::<Vec<_>>(), vec![U_TIME, U_COLOR]);
    }

    #[test]
    fn typed_getters_reject_other_kinds() {
        let u = UniformSet::new().with(U_RESOLUTION, UniformValue::Vec2(Vec2::new(800.0, 600.0)));
        assert_eq!(u.float(U_RESOLUTION), None);
        assert_eq!(u.vec2(U_RESOLUTION), Some(Vec2::new(800.0, 600.0)));
        assert_eq!(u.texture("tDiffuse"), None);
    }
}
