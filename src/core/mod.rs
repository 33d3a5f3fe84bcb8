//! Core application primitives: the polling scheduler and the HTTP surface.

pub mod http;
pub mod scheduler;

pub use http::*;
pub use scheduler::*;
