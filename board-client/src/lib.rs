//! Board client
//!
//! Connects the board engine to the hosted store over its REST API.

pub mod config;
pub mod error;
pub mod http;
pub mod rest;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use rest::RestStore;
