use serde::{Deserialize, Serialize};
use std::{borrow::Cow, fmt::Display, iter::Enumerate, slice::Iter};

mod compare;
mod tag;

use tag::InnerTag;

// Re-exporting
pub use compare::{compare, Outcome};
pub use tag::{MalformedTagError, Prefix};

/// A span represent a named objet in named entity recognition (NER). It contains a start and an
/// end (i.e. at what index of the sample does it starts and ends, both inclusive) and the type
/// of the entity (such as `LOC`, `PER`, etc.).
///
/// Spans are ordered by their start, then their end and then their type.
#[derive(Debug, Hash, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span<'a> {
    start: usize,
    end: usize,
    entity_type: Cow<'a, str>,
}

impl<'a> Span<'a> {
    /// Builds a new span. `end` is inclusive.
    ///
    /// # Panics
    ///
    /// Panics if `end` is smaller than `start`. Use `try_new` to build a span from unchecked
    /// boundaries.
    pub fn new<S: Into<Cow<'a, str>>>(entity_type: S, start: usize, end: usize) -> Self {
        assert!(start <= end, "a span can't end before its start");
        Span {
            start,
            end,
            entity_type: entity_type.into(),
        }
    }

    /// Builds a new span, or returns `None` if `end` is smaller than `start`.
    pub fn try_new<S: Into<Cow<'a, str>>>(
        entity_type: S,
        start: usize,
        end: usize,
    ) -> Option<Self> {
        (start <= end).then(|| Span {
            start,
            end,
            entity_type: entity_type.into(),
        })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn entity_type(&self) -> &str {
        self.entity_type.as_ref()
    }

    /// Two spans overlap when one of them starts inside the other.
    pub fn overlaps(&self, other: &Span) -> bool {
        (self.start <= other.start && other.start <= self.end)
            || (other.start <= self.start && self.start <= other.end)
    }

    pub fn into_owned(self) -> Span<'static> {
        Span {
            start: self.start,
            end: self.end,
            entity_type: Cow::Owned(self.entity_type.into_owned()),
        }
    }
}

impl<'a> Display for Span<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.entity_type, self.start, self.end)
    }
}

/// This struct iterates over a *single* sample and returns the spans found in it, from left to
/// right. A `B` tag opens a span, the following `I` tags extend it and a bare `O` tag closes it.
/// The last tag of the sample closes the span it belongs to.
///
/// The type of the `I` tags is never compared with the type of the opened span, and a `B` tag
/// met while a span is still opened replaces it.
pub struct SpanIter<'a, T> {
    tags: Enumerate<Iter<'a, T>>,
    len: usize,
    /// The type of the opened span, if any
    current_type: Option<&'a str>,
    start: usize,
    end: usize,
}

impl<'a, T: AsRef<str>> SpanIter<'a, T> {
    pub fn new(tags: &'a [T]) -> Self {
        SpanIter {
            tags: tags.iter().enumerate(),
            len: tags.len(),
            current_type: None,
            start: 0,
            end: 0,
        }
    }

    /// Closes the opened span and returns it.
    fn emit(&mut self) -> Option<Span<'a>> {
        self.current_type
            .take()
            .map(|entity_type| Span::new(entity_type, self.start, self.end))
    }
}

impl<'a, T: AsRef<str>> Iterator for SpanIter<'a, T> {
    type Item = Result<Span<'a>, MalformedTagError>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (index, raw_tag) = self.tags.next()?; // no more tags. We are done
            let tag = match InnerTag::try_new(raw_tag.as_ref(), index) {
                Ok(t) => t,
                Err(e) => return Some(Err(e)),
            };
            let is_last = index + 1 == self.len;
            let closed = match tag.prefix {
                Prefix::B => {
                    self.current_type = Some(tag.entity_type);
                    self.start = index;
                    self.end = index;
                    is_last
                }
                Prefix::I if self.current_type.is_some() => {
                    self.end = index;
                    is_last
                }
                // Dangling `I`, outside of any span
                Prefix::I => false,
                Prefix::O => tag.is_outside(),
            };
            if closed {
                if let Some(span) = self.emit() {
                    return Some(Ok(span));
                }
            }
        }
    }
}

/// Retrieves the spans of a single sample, from left to right.
///
/// * `tags`: The tags of the sample, one per token (e.g. `["O", "B-PER", "I-PER"]`).
pub fn get_spans<T: AsRef<str>>(tags: &[T]) -> Result<Vec<Span<'_>>, MalformedTagError> {
    SpanIter::new(tags).collect()
}

/// Same as `get_spans`, but an absent sample is treated as an empty one.
pub fn get_spans_opt<T: AsRef<str>>(
    tags: Option<&[T]>,
) -> Result<Vec<Span<'_>>, MalformedTagError> {
    get_spans(tags.unwrap_or_default())
}

/// Splits a sample given as a single string of space separated tags (e.g. `"O B-PER I-PER"`).
/// Every single space is a separator, so a repeated, leading or trailing space yields an empty
/// tag, which is rejected when the spans are retrieved. An empty string is an empty sample.
pub fn split_tags(sample: &str) -> Vec<&str> {
    if sample.is_empty() {
        return vec![];
    }
    sample.split(' ').collect()
}

/// Retrieves the spans of a sample given as a single string of space separated tags.
pub fn get_spans_from_str(sample: &str) -> Result<Vec<Span<'_>>, MalformedTagError> {
    let mut res = vec![];
    let tags = split_tags(sample);
    for span in SpanIter::new(&tags) {
        // The spans borrow from the local vector of tags
        res.push(span?.into_owned());
    }
    Ok(res)
}
