//! Response caching for the HTTP server

pub mod response_cache;

pub use response_cache::ResponseCache;
