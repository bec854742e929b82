//! MCP tool parameter types.
//!
//! All parameter structs derive `Deserialize + JsonSchema`: the schema is
//! published through `tools/list` and the same struct validates `tools/call`
//! arguments.

pub mod params;

pub use params::*;
