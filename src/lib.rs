pub mod analyzers;
pub mod collector;
pub mod config;
pub mod error;
pub mod fetch;
pub mod output;
pub mod table;
pub mod trends;

pub use error::{Error, Result};
