//! Sequence helpers: de-duplication, flattening and chunking.

use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::{InvalidInput, Result};

/// An arbitrarily nested sequence.
///
/// Deserializes untagged, so a JSON value like `[1, [2, [3]], 4]` maps
/// directly onto a `Vec<Nested<i64>>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Nested<T> {
    List(Vec<Nested<T>>),
    Item(T),
}

/// Remove duplicates, keeping the first occurrence of each value in order.
///
/// ```
/// assert_eq!(daybook::array::unique(&[1, 2, 2, 3, 1]), vec![1, 2, 3]);
/// ```
pub fn unique<T: Eq + Hash + Clone>(items: &[T]) -> Vec<T> {
    unique_by_key(items, |item| item.clone())
}

/// Like [`unique`], but two items are duplicates when `key` maps them to
/// equal values. The first item for each key is kept.
pub fn unique_by_key<T, K, F>(items: &[T], mut key: F) -> Vec<T>
where
    T: Clone,
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .filter(|item| seen.insert(key(*item)))
        .cloned()
        .collect()
}

/// Flatten a nested sequence depth-first, left to right.
pub fn flatten<T: Clone>(items: &[Nested<T>]) -> Vec<T> {
    fn walk<T: Clone>(items: &[Nested<T>], out: &mut Vec<T>) {
        for item in items {
            match item {
                Nested::Item(value) => out.push(value.clone()),
                Nested::List(inner) => walk(inner, out),
            }
        }
    }

    let mut out = Vec::new();
    walk(items, &mut out);
    out
}

/// Split `items` into consecutive runs of `size`; the last run may be shorter.
///
/// # Errors
///
/// Returns [`InvalidInput::ChunkSize`] if `size` is zero.
pub fn chunk<T: Clone>(items: &[T], size: usize) -> Result<Vec<Vec<T>>> {
    if size == 0 {
        return Err(InvalidInput::ChunkSize);
    }
    Ok(items.chunks(size).map(<[T]>::to_vec).collect())
}
