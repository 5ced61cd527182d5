//! MCP (Model Context Protocol) server for Tubescript.
//!
//! Exposes transcript retrieval, segmentation, and video search as tools
//! for AI agents. Implements JSON-RPC 2.0 over stdio.

mod protocol;
mod server;
mod tools;

pub use server::McpServer;
