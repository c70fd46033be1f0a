//! HTTP middleware.
//!
//! Request logging with latency tracking; CORS is layered directly in main.

pub mod logging;
