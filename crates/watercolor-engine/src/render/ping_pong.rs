/// Two slots plus an index flag.
///
/// One slot is the *write* side for the current frame, the other the *read*
/// side holding the last frame's output. [`DoubleBuffer::swap`] exchanges the
/// roles; two swaps restore the initial assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoubleBuffer<T> {
    slots: [T; 2],
    write: usize,
}

impl<T> DoubleBuffer<T> {
    /// `write` is written first; `read` is what the first frame reads.
    pub fn new(write: T, read: T) -> Self {
        Self {
            slots: [write, read],
            write: 0,
        }
    }

    #[inline]
    pub fn write(&self) -> &T {
        &self.slots[self.write]
    }

    #[inline]
    pub fn read(&self) -> &T {
        &self.slots[1 - self.write]
    }

    #[inline]
    pub fn swap(&mut self) {
        self.write = 1 - self.write;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_initial_assignment() {
        let buf = DoubleBuffer::new("a", "b");
        assert_eq!(*buf.write(), "a");
        assert_eq!(*buf.read(), "b");
    }

    #[test]
    fn odd_swaps_exchange_roles() {
        let buf = DoubleBuffer::new("a", "b");
        for n in [1, 3, 5, 101] {
            let mut b = buf.clone();
            for _ in 0..n {
                b.swap();
            }
            assert_eq!((*b.write(), *b.read()), ("b", "a"), "after {n} swaps");
        }
    }

    #[test]
    fn even_swaps_restore_roles() {
        for n in [0, 2, 4, 100] {
            let mut b = DoubleBuffer::new(1, 2);
            for _ in 0..n {
                b.swap();
            }
            assert_eq!((*b.write(), *b.read()), (1, 2), "after {n} swaps");
        }
    }

    #[test]
    fn read_and_write_never_alias() {
        let mut b = DoubleBuffer::new(10, 20);
        for _ in 0..7 {
            assert_ne!(b.write(), b.read());
            b.swap();
        }
    }
}
