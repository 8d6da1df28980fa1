//! Transport layer for the Apollo.io SDK.

pub mod http;

pub use http::HttpTransport;
