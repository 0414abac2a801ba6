pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod notify;
pub mod platform;
pub mod report;
pub mod store;
pub mod util;

pub use error::{Error, Result};
