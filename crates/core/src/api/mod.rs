//! Typed wrappers over the host's command catalog.

pub mod components;
pub mod document;
pub mod patterns;
pub mod topology;
pub mod values;

pub use components::{AddComponent, ComponentsApi};
pub use document::DocumentApi;
pub use patterns::PatternsApi;
pub use topology::{ConnectRequest, ParamRef, TopologyApi};
pub use values::ValuesApi;
