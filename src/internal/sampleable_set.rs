//! A mutable set of integers with constant-time insertion, removal and
//! uniform random sampling. The per-pattern match indices are of this type,
//! which is what makes `random_match` O(1).

use rand::Rng;
use rustc_hash::FxHashMap;

/// An unordered set backed by a dense array and a value-to-position index.
///
/// Invariant: `items[positions[x]] == x` for every member x.
#[derive(Debug, Clone, Default)]
pub(crate) struct SampleableSet {
    items: Vec<u32>,
    positions: FxHashMap<u32, usize>,
}

impl SampleableSet {
    /// Create an empty set.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert `value`. Returns true if the value was not yet present.
    pub(crate) fn insert(&mut self, value: u32) -> bool {
        if self.positions.contains_key(&value) {
            return false;
        }
        self.positions.insert(value, self.items.len());
        self.items.push(value);
        true
    }

    /// Remove `value` by swapping it with the last element. Returns true if
    /// the value was present.
    pub(crate) fn remove(&mut self, value: u32) -> bool {
        let Some(position) = self.positions.remove(&value) else {
            return false;
        };
        let last = self.items.pop().expect("index entry without array entry");
        if last != value {
            self.items[position] = last;
            self.positions.insert(last, position);
        }
        true
    }

    /// Check whether `value` is a member.
    #[allow(dead_code)]
    pub(crate) fn contains(&self, value: u32) -> bool {
        self.positions.contains_key(&value)
    }

    /// The number of members.
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the set has no members.
    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Draw a uniformly random member, or None if the set is empty.
    pub(crate) fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<u32> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.items[rng.gen_range(0..self.items.len())])
    }

    /// Iterate over the members in unspecified order.
    pub(crate) fn iter(&self) -> std::slice::Iter<'_, u32> {
        self.items.iter()
    }
}
