//! Ordered structural decoding for JSON unions without a discriminant field.
//!
//! A message family lists its candidate shapes in a fixed priority order. A
//! payload is tried against each candidate in turn and decoded by the first
//! one whose structural check passes. Payloads that match nothing are kept as
//! raw JSON in the family's `Unknown` variant, so new server message types
//! never break a consumer.
//!
//! The order of [`Tagged::candidates`] is part of each family's contract: a
//! payload that satisfies two shapes is always decoded as the earlier one.

pub mod shape;

use serde_json::Value;

/// One member of an ordered candidate list.
pub struct Candidate<T> {
    pub name: &'static str,
    pub validate: fn(&Value) -> bool,
    pub decode: fn(&Value) -> serde_json::Result<T>,
}

/// The candidate selected for a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Matched<T> {
    /// Position in the candidate list.
    pub index: usize,
    pub name: &'static str,
    pub value: T,
}

/// Decode `payload` with the first candidate that accepts it.
///
/// Rejections by earlier candidates are not reported. A candidate whose
/// `validate` passes but whose `decode` fails is treated as a rejection too.
pub fn decode_first<T>(payload: &Value, candidates: &[Candidate<T>]) -> Option<Matched<T>> {
    candidates.iter().enumerate().find_map(|(index, candidate)| {
        if !(candidate.validate)(payload) {
            return None;
        }
        (candidate.decode)(payload).ok().map(|value| Matched {
            index,
            name: candidate.name,
            value,
        })
    })
}

/// A closed family of message shapes with a soft-fail fallback.
pub trait Tagged: Sized + 'static {
    /// Candidates in priority order.
    fn candidates() -> &'static [Candidate<Self>];

    /// Wrap a payload that matched no candidate.
    fn unknown(raw: Value) -> Self;

    /// Decode a parsed payload. Never fails.
    fn from_value(raw: Value) -> Self {
        match decode_first(&raw, Self::candidates()) {
            Some(matched) => matched.value,
            None => Self::unknown(raw),
        }
    }

    /// Decode raw JSON text. Fails only when the text is not JSON at all.
    fn from_json_str(text: &str) -> serde_json::Result<Self> {
        let raw: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(raw))
    }

    /// Name of the candidate that would be selected for `raw`, if any.
    fn matched_name(raw: &Value) -> Option<&'static str> {
        decode_first(raw, Self::candidates()).map(|m| m.name)
    }
}
