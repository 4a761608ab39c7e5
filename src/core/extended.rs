//! Extended state and patches.
//!
//! The extended state is the data a machine configuration alone cannot
//! express: a search query, a blocked flag, the selected option. It only
//! ever changes by merging patches returned from a reducer. Merging is
//! shallow: keys present in a later patch win, keys absent from it persist.

use serde_json::{Map, Value};
use std::fmt::Debug;

/// A partial update to an extended state record.
///
/// `merge` combines two patches so that applying the result equals
/// applying `self` and then `later`.
pub trait Patch: Clone + Debug + Default {
    /// Combine with a later patch. Keys set in `later` win.
    fn merge(self, later: Self) -> Self;

    /// Whether the patch sets no keys at all.
    fn is_empty(&self) -> bool;
}

/// A record updated only by shallow patch merges.
///
/// Use [`extended_state!`](crate::extended_state) to generate a record and
/// its patch type from a field list, or use `serde_json::Map` for an open
/// key/value bag.
pub trait ExtendedState: Clone + PartialEq + Debug {
    type Patch: Patch;

    /// Merge a patch into the record in place.
    fn apply(&mut self, patch: Self::Patch);

    /// Return a copy of the record with the patch merged in.
    fn patched(&self, patch: Self::Patch) -> Self {
        let mut next = self.clone();
        next.apply(patch);
        next
    }
}

impl Patch for Map<String, Value> {
    fn merge(mut self, later: Self) -> Self {
        self.extend(later);
        self
    }

    fn is_empty(&self) -> bool {
        Map::is_empty(self)
    }
}

impl ExtendedState for Map<String, Value> {
    type Patch = Map<String, Value>;

    fn apply(&mut self, patch: Self::Patch) {
        self.extend(patch);
    }
}
