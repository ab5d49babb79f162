//! The _cmonkey_ library crate: a client for the Apache CloudStack API.

pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;

mod error;
pub use self::error::Error;
pub use self::client::ApiClient;
