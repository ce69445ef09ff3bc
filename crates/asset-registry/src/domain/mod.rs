//! # Domain Layer (Inner Hexagon)
//!
//! Pure registry concepts: keys, records, errors and configuration.
//! NO I/O. Adapters and the service depend on this layer, never the reverse.

pub mod config;
pub mod entities;
pub mod errors;
pub mod keys;

pub use config::*;
pub use entities::*;
pub use errors::*;
pub use keys::*;
