pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::{NikePlusClient, Session};
pub use config::ClientConfig;
pub use error::{NikePlusError, Result};
pub use models::{ActivityDetail, ActivityRecord, ActivitySummary};
