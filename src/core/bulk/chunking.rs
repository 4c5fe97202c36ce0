//! Order-preserving chunking and target grouping

use crate::utils::error::{Result, Tm1Error};
use std::collections::HashMap;

/// Split `items` into consecutive chunks of at most `size` items
///
/// Order is preserved across and within chunks; only the last chunk may be
/// shorter. A `size` of zero is rejected.
pub fn chunk<T>(items: Vec<T>, size: usize) -> Result<Vec<Vec<T>>> {
    if size == 0 {
        return Err(Tm1Error::invalid_request("Chunk size must be greater than 0"));
    }

    let mut chunks = Vec::with_capacity(items.len().div_ceil(size));
    let mut current = Vec::with_capacity(size.min(items.len()));
    for item in items {
        current.push(item);
        if current.len() == size {
            chunks.push(std::mem::replace(&mut current, Vec::with_capacity(size)));
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    Ok(chunks)
}

/// Stable partition of `items` by target
///
/// Groups appear in first-seen target order and keep their members in
/// submission order.
pub fn group_by_target<T, F>(items: Vec<T>, target_of: F) -> Vec<(String, Vec<T>)>
where
    F: Fn(&T) -> &str,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<T>)> = Vec::new();

    for item in items {
        let target = target_of(&item);
        match positions.get(target) {
            Some(&position) => groups[position].1.push(item),
            None => {
                let target = target.to_string();
                positions.insert(target.clone(), groups.len());
                groups.push((target, vec![item]));
            }
        }
    }

    groups
}
