//! Compute-once value holder for derived geometry.

use std::sync::OnceLock;

/// A lazily computed value that can only be cleared through `&mut self`.
///
/// Readers share `&self` and fill the cell on first access; any code that
/// can mutate the owner can also (and must) call [`Cached::invalidate`].
#[derive(Debug, Clone)]
pub struct Cached<T> {
    cell: OnceLock<T>,
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }
}

impl<T> Cached<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&self, compute: impl FnOnce() -> T) -> &T {
        self.cell.get_or_init(compute)
    }

    pub fn invalidate(&mut self) {
        self.cell.take();
    }

    pub fn is_valid(&self) -> bool {
        self.cell.get().is_some()
    }
}
