pub mod commit;
pub mod config;
pub mod eip1193;
pub mod reconnect_store;

pub use commit::CommitAdapter;
pub use config::{EvoteAdapterConfig, RuntimeProfile};
pub use eip1193::Eip1193Adapter;
pub use reconnect_store::{FileReconnectStore, MemoryReconnectStore};
