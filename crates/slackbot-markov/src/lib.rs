//! Word-level Markov chain used to invent chat replies.
//!
//! The model learns which word follows which from every observed message
//! and replays those transitions at random, weighted by how often each
//! one was seen.

mod model;
mod token;

pub use model::{GenerationError, TextModel, DEFAULT_MAX_STEPS};
pub use token::Token;
