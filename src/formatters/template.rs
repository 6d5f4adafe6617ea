use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    X,
    Y,
    Degree,
    Minutes,
    Seconds,
    Hemisphere,
}

impl Placeholder {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "X" | "x" => Some(Placeholder::X),
            "Y" | "y" => Some(Placeholder::Y),
            "degree" | "degrees" => Some(Placeholder::Degree),
            "minutes" | "minute" => Some(Placeholder::Minutes),
            "seconds" | "second" => Some(Placeholder::Seconds),
            "hemisphere" => Some(Placeholder::Hemisphere),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Placeholder::X => "X",
            Placeholder::Y => "Y",
            Placeholder::Degree => "degree",
            Placeholder::Minutes => "minutes",
            Placeholder::Seconds => "seconds",
            Placeholder::Hemisphere => "hemisphere",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Placeholder(Placeholder),
}

/// A user-editable output template such as `{degree}º{minutes}'{seconds}"`
///
/// Anything in braces that is not a known placeholder stays literal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RenderTemplate {
    source: String,
    tokens: Vec<Token>,
}

impl RenderTemplate {
    pub fn parse(source: &str) -> Self {
        let mut tokens = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find('{') {
            push_literal(&mut tokens, &rest[..start]);
            let after = &rest[start + 1..];

            match after.find(|c: char| c == '{' || c == '}') {
                Some(end) if after[end..].starts_with('}') => {
                    let name = &after[..end];
                    match Placeholder::from_name(name) {
                        Some(placeholder) => tokens.push(Token::Placeholder(placeholder)),
                        None => push_literal(&mut tokens, &rest[start..start + end + 2]),
                    }
                    rest = &after[end + 1..];
                }
                _ => {
                    push_literal(&mut tokens, "{");
                    rest = after;
                }
            }
        }
        push_literal(&mut tokens, rest);

        Self {
            source: source.to_string(),
            tokens,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, placeholder: Placeholder) -> bool {
        self.tokens
            .iter()
            .any(|token| token == &Token::Placeholder(placeholder))
    }

    /// Fill placeholders; ones the resolver declines are written back verbatim
    pub fn expand<F>(&self, resolve: F) -> String
    where
        F: Fn(Placeholder) -> Option<String>,
    {
        let mut output = String::with_capacity(self.source.len() + 16);
        for token in &self.tokens {
            match token {
                Token::Literal(text) => output.push_str(text),
                Token::Placeholder(placeholder) => match resolve(*placeholder) {
                    Some(value) => output.push_str(&value),
                    None => {
                        output.push('{');
                        output.push_str(placeholder.name());
                        output.push('}');
                    }
                },
            }
        }
        output
    }
}

fn push_literal(tokens: &mut Vec<Token>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Token::Literal(previous)) = tokens.last_mut() {
        previous.push_str(text);
    } else {
        tokens.push(Token::Literal(text.to_string()));
    }
}

impl FromStr for RenderTemplate {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for RenderTemplate {
    fn from(source: String) -> Self {
        Self::parse(&source)
    }
}

impl From<RenderTemplate> for String {
    fn from(template: RenderTemplate) -> Self {
        template.source
    }
}

impl fmt::Display for RenderTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
