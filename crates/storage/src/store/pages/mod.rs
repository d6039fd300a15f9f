#![forbid(unsafe_code)]

mod delete;
mod get;
mod insert;
mod list;
mod move_page;
mod resolve;
mod subtree;
