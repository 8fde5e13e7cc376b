//! Data models for marknote

mod record;
mod remote;

pub use record::{LocalId, LocalRecord};
pub use remote::{RemoteId, RemoteRecord, Visibility};
