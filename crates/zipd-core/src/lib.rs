pub mod config;
pub mod logging;

pub mod archive;
pub mod error;
pub mod fetcher;
pub mod manifest;
pub mod urls;
