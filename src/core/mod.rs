//! HTTP server surface

pub mod http;
