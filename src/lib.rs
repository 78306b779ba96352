pub mod checklist;
pub mod components;
pub mod config;
pub mod error;
pub mod report;
pub mod seed;
pub mod storage;
pub mod store;
pub mod task;
pub mod ui;

pub use checklist::{Action, Checklist, Outcome, Rejection};
pub use config::Config;
pub use error::StorageError;
pub use store::Store;
pub use task::{Status, Task};
