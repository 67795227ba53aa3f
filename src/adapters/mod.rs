// Adapters layer: concrete implementations of the domain ports (store, open data, files).

pub mod memory;
pub mod secop;
pub mod snapshot;
pub mod storage;
