pub mod acquire;
pub mod core;
pub mod error;
pub mod models;
pub mod storage;

pub use crate::core::controller::{Controller, DownloadOutcome, SubmitOutcome};
pub use crate::error::AcquireError;
