pub mod access;

pub use access::{protect, require_bearer};
