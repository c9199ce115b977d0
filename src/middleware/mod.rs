//! Middleware and extractors for the HTTP surface

mod client_ip;
mod tracing;

pub use client_ip::{resolve_client_ip, strip_port, ClientIp};
pub use self::tracing::request_tracing;
