//! Change-tracked values.
//!
//! Much of the movement state needs "what was this last tick" alongside
//! the current value: jump input edges, grounded transitions, externally
//! edited config fields. `Stateful` keeps the current and previous value
//! plus a changed flag, and is only shifted in explicit commit points so
//! the previous value stays stable for a whole tick.

use serde::{Deserialize, Serialize};

/// A value with its previous-tick snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Stateful<T> {
    current: T,
    previous: T,
    changed: bool,
}

impl<T: Copy + PartialEq> Stateful<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: value,
            previous: value,
            changed: false,
        }
    }

    /// The current value.
    #[inline]
    pub fn get(&self) -> T {
        self.current
    }

    /// The value as of the last commit.
    #[inline]
    pub fn previous(&self) -> T {
        self.previous
    }

    /// Whether the last commit changed the value.
    #[inline]
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Overwrite the current value without shifting history. Used for
    /// mid-tick mutation; the enclosing tick's commit picks it up.
    #[inline]
    pub fn set(&mut self, value: T) {
        self.current = value;
    }

    /// Shift history and take a new value: previous becomes the old
    /// current, current becomes `value`.
    pub fn commit(&mut self, value: T) {
        self.previous = self.current;
        self.current = value;
        self.changed = self.previous != self.current;
    }

    /// Shift history keeping the current value (commit-in-place).
    pub fn roll(&mut self) {
        self.changed = self.previous != self.current;
        self.previous = self.current;
    }
}

impl<T: Copy + PartialEq + Default> Default for Stateful<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_tracks_change() {
        let mut v = Stateful::new(1.0f32);
        assert!(!v.changed());

        v.commit(2.0);
        assert!(v.changed());
        assert_eq!(v.get(), 2.0);
        assert_eq!(v.previous(), 1.0);

        v.commit(2.0);
        assert!(!v.changed());
    }

    #[test]
    fn test_set_does_not_shift_history() {
        let mut v = Stateful::new(false);
        v.commit(false);
        v.set(true);
        assert!(v.get());
        assert!(!v.previous());

        v.roll();
        assert!(v.changed());
        assert!(v.previous());
    }
}
