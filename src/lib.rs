//! `pipedb-http` is an async HTTP client for SQL databases that speak the
//! JSON pipeline protocol.
//!
//! The crate wraps the `/v2/pipeline` endpoint behind one method:
//! - [`PipeDbClient::execute`]
//!
//! Each call sends a single `execute` + `close` pipeline and returns the
//! decoded rows, or a typed [`PipeDbError`] when the server reports failure.

mod client;
mod config;
mod decode;
mod error;
mod params;
mod row;
mod value;
mod wire;

pub mod transport;

pub use client::PipeDbClient;
pub use config::Config;
pub use error::PipeDbError;
pub use params::Params;
pub use row::Row;
pub use value::{Value, ValueType};

pub type Result<T> = std::result::Result<T, PipeDbError>;
