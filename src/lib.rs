pub mod ai;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod page;
pub mod panel;
pub mod score;
pub mod session;
pub mod site;

pub use error::{Result, TagscoutError};
