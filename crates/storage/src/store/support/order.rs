#![forbid(unsafe_code)]

use super::super::StoreError;
use std::collections::BTreeSet;

/// `children_order` is persisted as a JSON array of page ids. A row that does
/// not parse, or that carries duplicates, is surfaced as invalid input rather
/// than silently repaired.
pub(in crate::store) fn decode(raw: &str) -> Result<Vec<String>, StoreError> {
    let order: Vec<String> = serde_json::from_str(raw)
        .map_err(|_| StoreError::InvalidInput("corrupt children_order"))?;
    let mut seen = BTreeSet::new();
    for id in &order {
        if !seen.insert(id.as_str()) {
            return Err(StoreError::InvalidInput("children_order has duplicates"));
        }
    }
    Ok(order)
}

pub(in crate::store) fn encode(order: &[String]) -> Result<String, StoreError> {
    serde_json::to_string(order).map_err(|_| StoreError::InvalidInput("unencodable children_order"))
}

/// Splice `id` in at `index` (clamped to the list length) or append.
pub(in crate::store) fn splice_in(order: &mut Vec<String>, id: &str, index: Option<usize>) {
    match index {
        Some(index) => {
            let index = index.min(order.len());
            order.insert(index, id.to_string());
        }
        None => order.push(id.to_string()),
    }
}

pub(in crate::store) fn splice_out(order: &mut Vec<String>, id: &str) -> bool {
    match order.iter().position(|entry| entry == id) {
        Some(index) => {
            order.remove(index);
            true
        }
        None => false,
    }
}
