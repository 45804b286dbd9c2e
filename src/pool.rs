// Free-list arena of reusable records, addressed by index handles.
//
// Search states are large (a full per-cell grid each) and millions of them
// are created and dropped over a search, so slots are recycled instead of
// going through the allocator.

/// Records stored in an `ObjectPool` must be able to drop whatever they hold
/// when they go back to the pool.
pub trait Recycle {
    fn recycle(&mut self);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u32);

impl Handle {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub acquired: u64,
    pub released: u64,
    /// Slots ever allocated, i.e. the pool's high-water mark.
    pub allocated: usize,
}

pub struct ObjectPool<T> {
    slots: Vec<T>,
    live: Vec<bool>,
    free: Vec<Handle>,
    stats: PoolStats,
}

impl<T: Default + Recycle> Default for ObjectPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default + Recycle> ObjectPool<T> {
    pub fn new() -> Self {
        ObjectPool {
            slots: Vec::new(),
            live: Vec::new(),
            free: Vec::new(),
            stats: PoolStats::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ObjectPool {
            slots: Vec::with_capacity(capacity),
            live: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
            stats: PoolStats::default(),
        }
    }

    fn push_live(&mut self, record: T) -> Handle {
        let handle = Handle(self.slots.len() as u32);
        self.slots.push(record);
        self.live.push(true);
        self.stats.allocated += 1;
        self.stats.acquired += 1;
        handle
    }

    fn pop_free(&mut self) -> Option<Handle> {
        let handle = self.free.pop()?;
        debug_assert!(!self.live[handle.index()], "free list holds a live record");
        self.live[handle.index()] = true;
        self.stats.acquired += 1;
        Some(handle)
    }

    /// Hands out a record, recycled if possible. `init` must set every field
    /// the caller relies on: a recycled record only went through `recycle`.
    pub fn acquire(&mut self, init: impl FnOnce(&mut T)) -> Handle {
        match self.pop_free() {
            Some(handle) => {
                init(&mut self.slots[handle.index()]);
                handle
            },
            None => {
                let mut record = T::default();
                init(&mut record);
                self.push_live(record)
            },
        }
    }

    /// Gives a record back. The handle must not be used afterwards.
    pub fn release(&mut self, handle: Handle) {
        let idx = handle.index();
        assert!(self.live[idx], "releasing a record that is not live: {handle:?}");
        self.slots[idx].recycle();
        self.live[idx] = false;
        self.free.push(handle);
        self.stats.released += 1;
    }

    #[inline]
    pub fn get(&self, handle: Handle) -> &T {
        debug_assert!(self.live[handle.index()], "reading a released record");
        &self.slots[handle.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, handle: Handle) -> &mut T {
        debug_assert!(self.live[handle.index()], "writing a released record");
        &mut self.slots[handle.index()]
    }

    pub fn is_live(&self, handle: Handle) -> bool {
        self.live.get(handle.index()).copied().unwrap_or(false)
    }

    /// Number of records currently handed out.
    pub fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}

impl<T: Default + Recycle + Clone> ObjectPool<T> {
    /// Hands out a copy of the live record `src`. Recycled slots are
    /// overwritten in place with `clone_from`, so no allocation happens once
    /// the pool is warm.
    pub fn acquire_clone(&mut self, src: Handle) -> Handle {
        debug_assert!(self.live[src.index()], "cloning a released record");
        match self.pop_free() {
            Some(dst) => {
                // A free slot is never live, so dst != src.
                let (src_idx, dst_idx) = (src.index(), dst.index());
                if src_idx < dst_idx {
                    let (left, right) = self.slots.split_at_mut(dst_idx);
                    right[0].clone_from(&left[src_idx]);
                } else {
                    let (left, right) = self.slots.split_at_mut(src_idx);
                    left[dst_idx].clone_from(&right[0]);
                }
                dst
            },
            None => {
                let record = self.slots[src.index()].clone();
                self.push_live(record)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashSet;
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Record {
        value: u32,
        owned: Option<Vec<u32>>,
    }

    impl Recycle for Record {
        fn recycle(&mut self) {
            self.owned = None;
        }
    }

    #[test]
    fn test_acquire_reuses_released_slots() {
        let mut pool: ObjectPool<Record> = ObjectPool::new();
        let a = pool.acquire(|r| r.value = 1);
        let b = pool.acquire(|r| r.value = 2);
        assert_ne!(a, b);
        assert_eq!(pool.live(), 2);
        pool.release(a);
        assert_eq!(pool.live(), 1);
        let c = pool.acquire(|r| r.value = 3);
        assert_eq!(c, a);
        assert_eq!(pool.get(c).value, 3);
        assert_eq!(pool.get(b).value, 2);
        assert_eq!(pool.capacity(), 2);
        assert_eq!(pool.stats(), PoolStats { acquired: 3, released: 1, allocated: 2 });
    }

    #[test]
    fn test_release_recycles_record() {
        let mut pool: ObjectPool<Record> = ObjectPool::new();
        let a = pool.acquire(|r| r.owned = Some(vec![1, 2, 3]));
        pool.release(a);
        let b = pool.acquire(|_| {});
        assert_eq!(a, b);
        assert_eq!(pool.get(b).owned, None);
    }

    #[test]
    fn test_acquire_clone() {
        let mut pool: ObjectPool<Record> = ObjectPool::new();
        let a = pool.acquire(|r| { r.value = 7; r.owned = Some(vec![7]); });
        let fresh = pool.acquire_clone(a);
        assert_eq!(pool.get(fresh), pool.get(a));
        // Recycled slot below and above the source index.
        let spare = pool.acquire(|r| r.value = 0);
        pool.release(spare);
        let recycled = pool.acquire_clone(fresh);
        assert_eq!(recycled, spare);
        assert_eq!(pool.get(recycled).value, 7);
        pool.release(a);
        let recycled = pool.acquire_clone(recycled);
        assert_eq!(recycled, a);
        assert_eq!(pool.get(recycled).owned, Some(vec![7]));
    }

    #[test]
    #[should_panic]
    fn test_double_release_panics() {
        let mut pool: ObjectPool<Record> = ObjectPool::new();
        let a = pool.acquire(|_| {});
        pool.release(a);
        pool.release(a);
    }

    #[test]
    fn test_never_double_issues() {
        let mut pool: ObjectPool<Record> = ObjectPool::with_capacity(8);
        let mut live: Vec<Handle> = Vec::new();
        // Deterministic churn of acquires and releases.
        for step in 0..1000u32 {
            if step % 3 == 2 && !live.is_empty() {
                let idx = (step as usize * 7) % live.len();
                pool.release(live.swap_remove(idx));
            } else {
                live.push(pool.acquire(|r| r.value = step));
            }
            let unique: FxHashSet<Handle> = live.iter().copied().collect();
            assert_eq!(unique.len(), live.len(), "double issue at step {}", step);
            assert_eq!(pool.live(), live.len());
            assert!(live.iter().all(|&h| pool.is_live(h)));
        }
    }
}
