//! Bookkeeping of live native handles so they can be released when their owner is gone.

use std::{fmt::Debug, hash::Hash};

use hashbrown::HashMap;

/// Registry of native handles keyed by the thing that owns them.
///
/// Handles are released by dropping them, so everything still registered is released when the manager itself is dropped.
#[derive(Debug)]
pub struct ResourceManager<K, V> {
    /// Live handles.
    resources: HashMap<K, V>,
}

impl<K, V> ResourceManager<K, V>
where
    K: Eq + Hash + Copy + Debug,
{
    /// Create an empty registry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            resources: HashMap::new(),
        }
    }

    /// Register a handle for an owner.
    ///
    /// Returns the previous handle of the owner, which will be released when dropped.
    #[inline]
    pub fn register(&mut self, key: K, value: V) -> Option<V> {
        log::debug!("Registering resource for {key:?}");

        self.resources.insert(key, value)
    }

    /// Remove the handle of an owner without releasing it.
    #[inline]
    pub fn unregister(&mut self, key: &K) -> Option<V> {
        self.resources.remove(key)
    }

    /// Handle of an owner.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.resources.get(key)
    }

    /// Mutable handle of an owner.
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.resources.get_mut(key)
    }

    /// Whether an owner has a registered handle.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.resources.contains_key(key)
    }

    /// Amount of live handles.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether there are no live handles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Owners with a registered handle, in no particular order.
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.resources.keys().copied()
    }

    /// Release every handle whose owner isn't alive anymore.
    ///
    /// Returns the amount of released handles.
    pub fn retain_live(&mut self, mut is_live: impl FnMut(&K) -> bool) -> usize {
        let before = self.resources.len();

        self.resources.retain(|key, _| {
            let live = is_live(key);
            if !live {
                log::debug!("Releasing resource for {key:?}");
            }

            live
        });

        before - self.resources.len()
    }

    /// Release all handles.
    #[inline]
    pub fn clear(&mut self) {
        log::debug!("Releasing all {} resources", self.resources.len());

        self.resources.clear();
    }
}

impl<K, V> Default for ResourceManager<K, V>
where
    K: Eq + Hash + Copy + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
