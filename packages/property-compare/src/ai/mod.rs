//! AI implementations.
//!
//! The OpenAI-backed reference implementation of the `PropertyAi` trait.
//! Tests use the mocks in `testing` instead.

mod openai;

pub use openai::{OpenAi, DEFAULT_MODEL};
