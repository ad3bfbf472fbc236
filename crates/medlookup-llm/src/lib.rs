//! Summary generation for medicine records.
//!
//! This crate turns a dataset record into a prompt, hands it to a pretrained
//! text-generation model served over HTTP (Ollama or a HuggingFace-style
//! inference endpoint), and cleans up the output.

pub mod backends;
pub mod generation;
pub mod prompts;
pub mod summarizer;

pub use backends::*;
pub use generation::*;
pub use prompts::*;
pub use summarizer::*;
