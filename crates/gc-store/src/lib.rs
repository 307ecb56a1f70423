pub mod config;
pub mod error;
pub mod json_bridge;
pub mod schema;
pub mod slot;
pub mod store;

pub use config::{CONFIG_FILE, load_config};
pub use error::{Result, StoreError};
pub use slot::{SlotStore, default_base_dir};
pub use store::Store;
