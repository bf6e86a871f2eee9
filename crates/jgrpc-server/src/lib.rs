//! Server-side dispatch engine (spec.md §4.5): a table of registered
//! implementations, a per-connection accept-and-serve loop, and the
//! `start`/`shutdown` lifecycle.

#![forbid(unsafe_code)]

mod dispatch;
mod error;
mod server;
mod service_map;

pub use dispatch::{DispatchEntry, ServiceDispatchEntry};
pub use error::ServerError;
pub use server::{Server, ServerConfig};
pub use service_map::{RegisterError, ServiceMap};
