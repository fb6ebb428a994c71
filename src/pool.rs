//! Entity pool for short-lived world objects
//!
//! Projectiles and buff pickups come and go every few frames. Instead of
//! erasing from a `Vec` while iterating it, entries are marked for removal and
//! swept out by a single [`EntityPool::compact`] pass at the end of the frame.
//! Handles stay valid (and unique) for the lifetime of the pool.

/// Stable identifier of an entry in an [`EntityPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u32);

#[derive(Debug, Clone)]
struct Entry<T> {
    handle: Handle,
    value: T,
    removed: bool,
}

#[derive(Debug, Clone)]
pub struct EntityPool<T> {
    entries: Vec<Entry<T>>,
    next: u32,
}

impl<T> Default for EntityPool<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next: 0,
        }
    }
}

impl<T> EntityPool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, returning its handle. Insertion order is iteration order.
    pub fn insert(&mut self, value: T) -> Handle {
        let handle = Handle(self.next);
        self.next += 1;
        self.entries.push(Entry {
            handle,
            value,
            removed: false,
        });
        handle
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.entries
            .iter()
            .find(|e| e.handle == handle && !e.removed)
            .map(|e| &e.value)
    }

    /// Mark an entry for removal. It disappears from lookups and iteration
    /// immediately, and its storage is reclaimed by the next `compact`.
    pub fn mark_removed(&mut self, handle: Handle) -> bool {
        match self.entries.iter_mut().find(|e| e.handle == handle && !e.removed) {
            Some(entry) => {
                entry.removed = true;
                true
            }
            None => false,
        }
    }

    /// Mark every live entry matching `predicate` for removal.
    pub fn mark_where(&mut self, mut predicate: impl FnMut(&T) -> bool) {
        for entry in self.entries.iter_mut().filter(|e| !e.removed) {
            if predicate(&entry.value) {
                entry.removed = true;
            }
        }
    }

    /// Drop every marked entry. Returns how many were reclaimed.
    pub fn compact(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !e.removed);
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.entries
            .iter()
            .filter(|e| !e.removed)
            .map(|e| (e.handle, &e.value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> {
        self.entries
            .iter_mut()
            .filter(|e| !e.removed)
            .map(|e| (e.handle, &mut e.value))
    }

    /// Number of live (unmarked) entries.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| !e.removed).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_unique_after_compaction() {
        let mut pool = EntityPool::new();
        let a = pool.insert("a");
        pool.mark_removed(a);
        pool.compact();
        let b = pool.insert("b");

        assert_ne!(a, b);
        assert!(pool.get(a).is_none());
        assert_eq!(pool.get(b), Some(&"b"));
    }

    #[test]
    fn test_marked_entries_are_hidden_before_compact() {
        let mut pool = EntityPool::new();
        let a = pool.insert(1);
        let _b = pool.insert(2);

        assert!(pool.mark_removed(a));
        assert!(!pool.mark_removed(a), "double removal is a no-op");
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.iter().map(|(_, v)| *v).collect::<Vec<_>>(), vec![2]);
        assert_eq!(pool.compact(), 1);
        assert_eq!(pool.compact(), 0);
    }

    #[test]
    fn test_mark_where_preserves_order() {
        let mut pool = EntityPool::new();
        for i in 0..6 {
            pool.insert(i);
        }
        pool.mark_where(|v| v % 2 == 0);
        pool.compact();

        let remaining: Vec<i32> = pool.iter().map(|(_, v)| *v).collect();
        assert_eq!(remaining, vec![1, 3, 5]);
    }
}
