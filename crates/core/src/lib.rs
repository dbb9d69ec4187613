// Core types and client for driving a Grasshopper MCP host

pub mod api;
pub mod client;
pub mod component_types;
pub mod config;
pub mod document;
pub mod error;
pub mod grading;
pub mod review;
pub mod transport;
pub mod types;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use client::{GrasshopperClient, GrasshopperClientBuilder};
pub use component_types::ComponentTypes;
pub use config::BridgeConfig;
pub use error::{BridgeError, BridgeResult, ErrorKind};
pub use types::*;
