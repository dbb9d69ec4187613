// MCP (Model Context Protocol) server exposing the Grasshopper command catalog
// as tools and resources to agent clients

pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;

pub use resources::{Resource, ResourceRegistry};
pub use server::McpServer;
pub use tools::{Tool, ToolRegistry, ToolTier};
