//! Explicit memoization for loaded datasets.

/// Holds a value computed on first use until it is invalidated.
///
/// Owned by the caller rather than stored globally, so each instance (and
/// each test) starts empty.
#[derive(Debug)]
pub struct AnalysisCache<T> {
    value: Option<T>,
}

impl<T> Default for AnalysisCache<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T> AnalysisCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value, computing it with `init` if empty.
    pub fn get_or_insert_with<F: FnOnce() -> T>(&mut self, init: F) -> &T {
        self.value.get_or_insert_with(init)
    }

    /// Like [`get_or_insert_with`](Self::get_or_insert_with) for fallible
    /// loaders; nothing is cached on error.
    pub fn get_or_try_insert_with<E, F: FnOnce() -> Result<T, E>>(&mut self, init: F) -> Result<&T, E> {
        let value = match self.value.take() {
            Some(value) => value,
            None => init()?,
        };
        Ok(self.value.insert(value))
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Drops the cached value; the next access recomputes it.
    pub fn invalidate(&mut self) -> Option<T> {
        self.value.take()
    }

    pub fn is_populated(&self) -> bool {
        self.value.is_some()
    }
}
