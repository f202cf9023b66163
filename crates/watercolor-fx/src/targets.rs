/// Handle to an offscreen render target in a [`TargetPool`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TargetId(pub(crate) usize);

impl TargetId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Size and name of one offscreen target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDesc {
    pub label: &'static str,
    pub size: (u32, u32),
}

/// Offscreen targets owned by the feedback pipeline.
///
/// Describes targets only. A backend materializes them and reallocates
/// storage when a description's size changes.
#[derive(Debug, Clone, Default)]
pub struct TargetPool {
    descs: Vec<TargetDesc>,
}

impl TargetPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, label: &'static str, size: (u32, u32)) -> TargetId {
        let id = TargetId(self.descs.len());
        self.descs.push(TargetDesc { label, size: clamp_size(size) });
        id
    }

    /// Resizes every target. Returns whether any size changed.
    pub fn resize_all(&mut self, size: (u32, u32)) -> bool {
        let size = clamp_size(size);
        let mut changed = false;
        for desc in &mut self.descs {
            if desc.size != size {
                desc.size = size;
                changed = true;
            }
        }
        changed
    }

    pub fn get(&self, id: TargetId) -> Option<&TargetDesc> {
        self.descs.get(id.0)
    }

    pub fn size(&self, id: TargetId) -> Option<(u32, u32)> {
        self.get(id).map(|d| d.size)
    }

    pub fn len(&self) -> usize {
        self.descs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TargetId, &TargetDesc)> {
        self.descs.iter().enumerate().map(|(i, d)| (TargetId(i), d))
    }
}

fn clamp_size(size: (u32, u32)) -> (u32, u32) {
    (size.0.max(1), size.1.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_all_is_idempotent() {
        let mut pool = TargetPool::new();
        let a = pool.allocate("a", (800, 600));
        let b = pool.allocate("b", (800, 600));
        assert!(!pool.resize_all((800, 600)));
        assert!(pool.resize_all((1024, 768)));
        assert_eq!(pool.size(a), Some((1024, 768)));
        assert_eq!(pool.size(b), Some((1024, 768)));
        assert!(!pool.resize_all((1024, 768)));
    }

    #[test]
    fn zero_sizes_are_clamped() {
        let mut pool = TargetPool::new();
        let a = pool.allocate("a", (0, 0));
        assert_eq!(pool.size(a), Some((1, 1)));
    }
}
