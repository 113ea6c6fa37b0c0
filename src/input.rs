//! Held-key sampling.
//!
//! Terminals differ in what they report: keyboard-enhancement capable ones
//! (kitty, Ghostty, ...) send proper press / repeat / release events, classic
//! ones only send repeated presses driven by the OS key-repeat.  `KeyTracker`
//! records the frame each key was last seen and treats it as held while that
//! frame is within `hold_window`, so both kinds behave the same.

use std::collections::HashMap;
use std::hash::Hash;

/// Default hold window in frames (about 133 ms at 60 frames per second).
/// The OS key-repeat rate is at least 15 Hz, so a held key is refreshed
/// before it expires.
pub const HOLD_WINDOW: u64 = 8;

/// Directional input sampled at the top of a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldInput {
    pub left: bool,
    pub right: bool,
}

impl HeldInput {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn left() -> Self {
        HeldInput { left: true, right: false }
    }

    pub fn right() -> Self {
        HeldInput { left: false, right: true }
    }
}

#[derive(Clone, Debug)]
pub struct KeyTracker<K> {
    last_seen: HashMap<K, u64>,
    hold_window: u64,
}

impl<K: Hash + Eq> Default for KeyTracker<K> {
    fn default() -> Self {
        Self::new(HOLD_WINDOW)
    }
}

impl<K: Hash + Eq> KeyTracker<K> {
    pub fn new(hold_window: u64) -> Self {
        KeyTracker {
            last_seen: HashMap::new(),
            hold_window,
        }
    }

    /// Record a press or repeat of `key` on `frame`.
    pub fn press(&mut self, key: K, frame: u64) {
        self.last_seen.insert(key, frame);
    }

    /// Forget `key` immediately (keyboard-enhancement path).
    pub fn release(&mut self, key: &K) {
        self.last_seen.remove(key);
    }

    pub fn clear(&mut self) {
        self.last_seen.clear();
    }

    pub fn is_held(&self, key: &K, frame: u64) -> bool {
        self.last_seen
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= self.hold_window)
            .unwrap_or(false)
    }

    pub fn any_held<'a>(&self, keys: impl IntoIterator<Item = &'a K>, frame: u64) -> bool
    where
        K: 'a,
    {
        keys.into_iter().any(|k| self.is_held(k, frame))
    }

    /// Sample the directional state for `frame` from the given key bindings.
    pub fn sample(&self, left_keys: &[K], right_keys: &[K], frame: u64) -> HeldInput {
        HeldInput {
            left: self.any_held(left_keys, frame),
            right: self.any_held(right_keys, frame),
        }
    }
}
