//! Transition table and sampling.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::token::Token;

/// Default cap on the number of transitions a single reply may take.
pub const DEFAULT_MAX_STEPS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// The walk did not reach the end marker within the configured bound.
    #[error("generation exceeded step bound of {0}")]
    StepBoundExceeded(usize),
}

/// Maps each token to every token observed right after it, in arrival order.
///
/// Successor lists keep duplicates, so a uniform pick over a list is a
/// frequency-weighted pick over distinct successors.
#[derive(Debug, Clone)]
pub struct TextModel {
    table: HashMap<Token, Vec<Token>>,
    max_steps: Option<usize>,
    observations: usize,
}

impl TextModel {
    /// A model holding only the built-in greeting chain.
    pub fn new() -> Self {
        let mut table = HashMap::new();
        table.insert(Token::Begin, vec![Token::word("Hello,")]);
        table.insert(Token::word("Hello,"), vec![Token::word("World!")]);
        table.insert(Token::word("World!"), vec![Token::End]);
        table.insert(Token::End, vec![Token::End]);

        Self {
            table,
            max_steps: Some(DEFAULT_MAX_STEPS),
            observations: 0,
        }
    }

    /// Set the step bound. `None` lets a walk run until it picks the end marker.
    pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn max_steps(&self) -> Option<usize> {
        self.max_steps
    }

    /// Learn the transitions of one message. Blank text is ignored.
    pub fn observe(&mut self, text: &str) {
        let words: Vec<&str> = text.split_whitespace().collect();
        let (Some(first), Some(last)) = (words.first(), words.last()) else {
            return;
        };

        self.push(Token::Begin, Token::word(*first));
        for pair in words.windows(2) {
            self.push(Token::word(pair[0]), Token::word(pair[1]));
        }
        self.push(Token::word(*last), Token::End);

        self.observations += 1;
        trace!(tokens = words.len(), "observed message");
    }

    /// Sample one reply using the thread-local RNG.
    pub fn generate(&self) -> Result<String, GenerationError> {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Sample one reply, drawing every choice from `rng`.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String, GenerationError> {
        let mut current = &Token::Begin;
        let mut words: Vec<&str> = Vec::new();
        let mut steps = 0;

        loop {
            if let Some(max) = self.max_steps {
                if steps >= max {
                    trace!(last = %current, steps, "walk hit step bound");
                    return Err(GenerationError::StepBoundExceeded(max));
                }
            }

            let Some(next) = self.successors(current).choose(rng) else {
                break;
            };
            steps += 1;

            match next {
                Token::Word(w) => words.push(w.as_str()),
                Token::Begin | Token::End => break,
            }
            current = next;
        }

        // Begin only ever leads to words, so `words` is never empty here.
        Ok(words.join(" "))
    }

    /// Successors recorded for `token`, in observation order.
    pub fn successors(&self, token: &Token) -> &[Token] {
        self.table.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct tokens that have a successor list.
    pub fn token_count(&self) -> usize {
        self.table.len()
    }

    /// Number of non-blank messages observed so far.
    pub fn observations(&self) -> usize {
        self.observations
    }

    fn push(&mut self, from: Token, to: Token) {
        self.table.entry(from).or_default().push(to);
    }
}

impl Default for TextModel {
    fn default() -> Self {
        Self::new()
    }
}
