//! URI/literal templates and their instantiation
//!
//! A template is tokenized **once** at parse time into constant and
//! variable-reference segments; instantiation is a direct value lookup per
//! token, with no re-scanning. The YARRRML reference syntax is `$(column)`.

use crate::error::{MappingResult, ParseError};
use serde::{Deserialize, Serialize};

/// Sentinel substituted for empty or missing column values
///
/// Instantiation never fails, so batch runs stay resilient to partial data;
/// misses are reported through [`Instantiated::missing`] instead.
pub const MISSING_SENTINEL: &str = "unknown";

/// One segment of a tokenized template
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateToken {
    /// Constant text
    Text(String),
    /// Reference to a record column: `$(column)`
    Var(String),
}

/// How variable values are rendered into the template
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueStyle {
    /// IRI-safe: characters outside `[A-Za-z0-9_.-]` collapse to `_`
    IriSafe,
    /// Raw record text (literal values keep their spaces)
    Raw,
}

/// Result of instantiating a template against one record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instantiated {
    /// The rendered string
    pub value: String,
    /// Columns that were referenced but absent from the record
    pub missing: Vec<String>,
}

/// An ordered sequence of constant and variable tokens
///
/// Immutable once parsed. Equality compares the source text, so two
/// templates written identically are interchangeable as cache-key slots.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Template {
    source: String,
    tokens: Vec<TemplateToken>,
}

impl Template {
    /// Tokenize a template string
    ///
    /// Fails on an unterminated `$(` reference.
    pub fn parse(source: impl Into<String>) -> MappingResult<Self> {
        let source = source.into();
        let mut tokens = Vec::new();
        let mut text = String::new();
        let mut rest = source.as_str();

        while let Some(start) = rest.find("$(") {
            text.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find(')').ok_or_else(|| ParseError::InvalidTemplate {
                template: source.clone(),
                message: "unterminated $( reference".to_string(),
            })?;
            if !text.is_empty() {
                tokens.push(TemplateToken::Text(std::mem::take(&mut text)));
            }
            tokens.push(TemplateToken::Var(after[..end].to_string()));
            rest = &after[end + 1..];
        }
        text.push_str(rest);
        if !text.is_empty() {
            tokens.push(TemplateToken::Text(text));
        }

        Ok(Self { source, tokens })
    }

    /// The template's source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The tokenized segments
    pub fn tokens(&self) -> &[TemplateToken] {
        &self.tokens
    }

    /// Iterate over the referenced column names
    pub fn vars(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|t| match t {
            TemplateToken::Var(v) => Some(v.as_str()),
            TemplateToken::Text(_) => None,
        })
    }

    /// Whether the template references no columns
    pub fn is_constant(&self) -> bool {
        self.tokens
            .iter()
            .all(|t| matches!(t, TemplateToken::Text(_)))
    }

    /// The single referenced column, if the template is exactly `$(column)`
    pub fn single_var(&self) -> Option<&str> {
        match self.tokens.as_slice() {
            [TemplateToken::Var(v)] => Some(v.as_str()),
            _ => None,
        }
    }

    /// Render the template against a record
    ///
    /// `lookup` resolves a column name to its raw value. Missing columns and
    /// empty values substitute [`MISSING_SENTINEL`]; missing columns are
    /// additionally reported in [`Instantiated::missing`] so the engine can
    /// tally resolution warnings. Never errors.
    pub fn instantiate<'a, F>(&self, lookup: F, style: ValueStyle) -> Instantiated
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let mut value = String::new();
        let mut missing = Vec::new();

        for token in &self.tokens {
            match token {
                TemplateToken::Text(t) => value.push_str(t),
                TemplateToken::Var(var) => match lookup(var) {
                    Some(raw) if !raw.is_empty() => match style {
                        ValueStyle::IriSafe => sanitize_into(&mut value, raw),
                        ValueStyle::Raw => value.push_str(raw),
                    },
                    Some(_) => value.push_str(MISSING_SENTINEL),
                    None => {
                        missing.push(var.clone());
                        value.push_str(MISSING_SENTINEL);
                    }
                },
            }
        }

        Instantiated { value, missing }
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Template {}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Sanitize a value for use as an IRI component
///
/// Characters outside `[A-Za-z0-9_.-]` (unicode alphanumerics included)
/// collapse to `_`; an empty input yields [`MISSING_SENTINEL`].
pub fn sanitize_component(value: &str) -> String {
    if value.is_empty() {
        return MISSING_SENTINEL.to_string();
    }
    let mut out = String::with_capacity(value.len());
    sanitize_into(&mut out, value);
    out
}

fn sanitize_into(out: &mut String, value: &str) {
    for c in value.chars() {
        if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' {
            out.push(c);
        } else {
            out.push('_');
        }
    }
}
