#![forbid(unsafe_code)]

pub(in crate::store) mod order;
pub(in crate::store) mod schema;
