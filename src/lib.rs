//! nodetypes - schema and validation registry for AST node types
//!
//! Node kinds are registered once with their fields, visitor keys, builder
//! keys and categories; the sealed registry then builds and checks nodes.

pub mod cli;
pub mod config;
pub mod definitions;
pub mod observability;
pub mod schema;
