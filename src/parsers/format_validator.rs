use crate::error::{ConversionError, Result};
use crate::models::{Axis, Notation};
use crate::parsers::grammar::{grammar_for, GrammarKey};
use regex::Captures;

/// A full-span grammar match over the normalised input text
#[derive(Debug)]
pub struct MatchResult<'t> {
    pub key: GrammarKey,
    pub text: &'t str,
    captures: Captures<'t>,
}

impl<'t> MatchResult<'t> {
    /// Captured text of a named group, if the group took part in the match
    pub fn group(&self, name: &str) -> Option<&'t str> {
        self.captures.name(name).map(|m| m.as_str())
    }

    pub fn has(&self, name: &str) -> bool {
        self.group(name).is_some()
    }
}

/// Normalise raw text for a notation: trim, and drop all whitespace for MGRS
pub fn normalise(text: &str, notation: Notation) -> String {
    match notation {
        Notation::Mgrs => text.split_whitespace().collect(),
        _ => text.trim().to_string(),
    }
}

/// Match already-normalised text against the grammar for `notation`/`axis`
///
/// Only a match spanning the whole input is accepted.
pub fn validate<'t>(text: &'t str, notation: Notation, axis: Option<Axis>) -> Result<MatchResult<'t>> {
    let key = GrammarKey::for_notation(notation, axis)?;
    let grammar = grammar_for(key)?;

    let invalid = || ConversionError::InvalidFormat {
        text: text.to_string(),
        expected: key.label(),
        axis: key.axis(),
    };

    let captures = grammar.regex.captures(text).ok_or_else(invalid)?;
    let whole = captures.get(0).ok_or_else(invalid)?;
    if whole.start() != 0 || whole.end() != text.len() {
        return Err(invalid());
    }

    Ok(MatchResult {
        key,
        text,
        captures,
    })
}
