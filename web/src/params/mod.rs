//! Typed parameters for endpoint inputs.
//!
//! Query strings and request bodies are deserialized into these structs before they reach
//! a controller, so malformed input is rejected by the extractor.

pub(crate) mod oauth;
pub(crate) mod scoreboard;
