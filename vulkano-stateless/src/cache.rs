// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

use foldhash::HashMap;
use parking_lot::RwLock;
use std::{borrow::Borrow, hash::Hash};

/// A map specialized to caching properties that are specific to a Vulkan implementation.
///
/// Readers never block each other, except when an entry is vacant. In that case it gets written to
/// once and then never again, entries are immutable after insertion until the whole cache is
/// cleared.
#[derive(Debug)]
pub(crate) struct OnceCache<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for OnceCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> OnceCache<K, V> {
    /// Creates a new `OnceCache`.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::default()),
        }
    }

    /// Removes every entry, returning how many there were.
    pub(crate) fn clear(&self) -> usize {
        let mut inner = self.inner.write();
        let len = inner.len();
        inner.clear();

        len
    }

    /// Returns the number of entries.
    pub(crate) fn len(&self) -> usize {
        self.inner.read().len()
    }
}

impl<K, V> OnceCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Returns the value for the specified `key`, if it exists.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.inner.read().get(key).cloned()
    }

    /// Returns the value for the specified `key`. The entry gets written to with the key-value
    /// pair returned by `f` if it doesn't exist. If `f` returns [`Err`], the error is
    /// propagated and the entry isn't written to.
    pub(crate) fn get_or_try_insert<Q, E>(
        &self,
        key: &Q,
        f: impl FnOnce() -> Result<(K, V), E>,
    ) -> Result<V, E>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let (key, value) = f()?;

        // Someone else may have inserted the entry between releasing the read lock and acquiring
        // the write lock. Their value wins.
        let value = self
            .inner
            .write()
            .entry(key)
            .or_insert_with(|| value)
            .clone();

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_once() {
        let cache: OnceCache<u32, &'static str> = OnceCache::new();

        let value = cache.get_or_try_insert(&1, || Ok::<_, ()>((1, "first")));
        assert_eq!(value, Ok("first"));

        let value = cache.get_or_try_insert(&1, || Ok::<_, ()>((1, "second")));
        assert_eq!(value, Ok("first"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn errors_leave_entry_vacant() {
        let cache: OnceCache<u32, u32> = OnceCache::new();

        assert_eq!(cache.get_or_try_insert(&1, || Err("driver error")), Err("driver error"));
        assert_eq!(cache.get(&1), None);

        assert_eq!(cache.get_or_try_insert(&1, || Ok::<_, ()>((1, 7))), Ok(7));
        assert_eq!(cache.clear(), 1);
        assert_eq!(cache.get(&1), None);
    }
}
