//! Orchestrator module
//!
//! Contains the model-fallback completion orchestrator and its supporting
//! pieces: configuration, Gemini wire types, and the prompt builders that
//! assemble request payloads for the API handlers.

pub mod completion;
pub mod config;
pub mod gemini_types;
pub mod prompts;
