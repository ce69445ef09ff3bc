//! # Ports Layer (Middle Hexagon)
//!
//! - **Driving Port (Inbound)**: `AssetRegistryApi`
//! - **Driven Port (Outbound)**: `StateStore`
//!
//! No concrete implementations in this module.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
