pub mod client;
pub mod memory;

pub use client::{RecordStore, RestRecordStore};
pub use memory::{FailingRecordStore, InMemoryRecordStore};
