//! Specialized collection types

pub use slotmap::{DefaultKey, SlotMap};

/// Handle-based map using slot map for stable references
///
/// Scenes typically store their objects in a `HandleMap` and feed the keys to
/// the spatial index, which treats them as opaque identities.
pub type HandleMap<T> = SlotMap<DefaultKey, T>;

/// Handle type for stable references
pub type Handle = DefaultKey;
