/**
This modules parses a raw tag (such as `"B-PER"`) into its prefix and its entity type.
*/
use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::Display;

/// Prefix of a tag. It indicates where the token is located relative to the chunk: at its
/// beginning (`B`), inside of it (`I`) or outside of any chunk (`O`). Prefix can only be a single
/// ascii character.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Sequence, Serialize, Deserialize)]
pub enum Prefix {
    B,
    I,
    O,
}

impl Prefix {
    fn from_char(value: char) -> Option<Self> {
        match value {
            'B' => Some(Self::B),
            'I' => Some(Self::I),
            'O' => Some(Self::O),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Self::B => 'B',
            Self::I => 'I',
            Self::O => 'O',
        }
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// The tag is either empty or does not start with one of the `B`, `I` or `O` prefix.
pub struct MalformedTagError {
    tag: String,
    index: usize,
    sample: Option<usize>,
}

impl MalformedTagError {
    pub(crate) fn new(tag: &str, index: usize) -> Self {
        Self {
            tag: String::from(tag),
            index,
            sample: None,
        }
    }

    /// Attaches the index of the sample containing the malformed tag.
    pub(crate) fn in_sample(mut self, sample: usize) -> Self {
        self.sample = Some(sample);
        self
    }

    /// The offending tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Index of the offending tag inside its sample.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Index of the sample, when the tag was parsed as part of a corpus.
    pub fn sample(&self) -> Option<usize> {
        self.sample
    }
}

impl Display for MalformedTagError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.sample {
            Some(sample) => write!(
                f,
                "Malformed tag `{}` at index {} of sample {}. A tag must be non-empty and start with `B`, `I` or `O`",
                self.tag, self.index, sample
            ),
            None => write!(
                f,
                "Malformed tag `{}` at index {}. A tag must be non-empty and start with `B`, `I` or `O`",
                self.tag, self.index
            ),
        }
    }
}

impl Error for MalformedTagError {}

/// A tag split into its prefix and its entity type. The entity type is everything after the
/// prefix and the delimiter (e.g. `PER` for `B-PER`). It is empty for a bare prefix.
#[derive(Debug, PartialEq, Clone, Copy)]
pub(crate) struct InnerTag<'a> {
    /// The full tag, such as `"B-PER"`, `"I-LOC"`, etc.
    tag: &'a str,
    pub(crate) prefix: Prefix,
    pub(crate) entity_type: &'a str,
}

impl<'a> InnerTag<'a> {
    /// Parses the tag located at `index` of its sample.
    pub(crate) fn try_new(tag: &'a str, index: usize) -> Result<Self, MalformedTagError> {
        let mut chars = tag.chars();
        let prefix = chars
            .next()
            .and_then(Prefix::from_char)
            .ok_or_else(|| MalformedTagError::new(tag, index))?;
        // Skips the delimiter
        chars.next();
        Ok(Self {
            tag,
            prefix,
            entity_type: chars.as_str(),
        })
    }

    /// Only the bare `O` tag closes a chunk. Tags such as `O-PER` are left without effect.
    pub(crate) fn is_outside(&self) -> bool {
        self.tag == "O"
    }
}
