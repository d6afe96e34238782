use std::fmt;

/// A node of the transition table.
///
/// The boundary markers are their own variants, so no observed word can
/// ever be mistaken for one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// Start of a message.
    Begin,
    Word(String),
    /// End of a message.
    End,
}

impl Token {
    pub fn word(text: impl Into<String>) -> Self {
        Self::Word(text.into())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Begin => f.write_str("<begin>"),
            Self::Word(w) => f.write_str(w),
            Self::End => f.write_str("<end>"),
        }
    }
}
