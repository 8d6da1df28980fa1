// MCP (Model Context Protocol) server exposing Apollo.io as agent tools

pub mod config;
pub mod protocol;
pub mod server;
pub mod tools;

pub use config::ServerConfig;
pub use server::{McpHandler, McpServer, ServerState};
pub use tools::{apollo_tools, ToolRegistry};
