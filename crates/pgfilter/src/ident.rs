//! Column identifiers that are safe to splice into SQL text.
//!
//! Postgres cannot bind identifiers as parameters, so the clause builders
//! interpolate column names directly. Every column goes through [`Ident`]
//! first:
//!
//! - [`Ident::parse`] accepts bare, optionally dotted names whose parts match
//!   `[A-Za-z_][A-Za-z0-9_$]*` (e.g. `salary`, `j.company_handle`).
//! - [`Ident::quoted`] accepts any name without NUL and renders it as `"name"`,
//!   doubling embedded quotes.

use crate::error::{DbError, DbResult};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Repr {
    /// Dotted bare parts, e.g. `["j", "salary"]`.
    Bare(Vec<String>),
    /// A single quoted name (stored unescaped).
    Quoted(String),
}

/// A validated SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident(Repr);

impl Ident {
    /// Parse a bare (unquoted) identifier, optionally dotted.
    pub fn parse(name: &str) -> DbResult<Self> {
        if name.is_empty() {
            return Err(DbError::validation("Identifier cannot be empty"));
        }

        let mut parts = Vec::new();
        for part in name.split('.') {
            let mut chars = part.chars();
            match chars.next() {
                None => {
                    return Err(DbError::validation(format!(
                        "Empty segment in identifier '{name}'"
                    )));
                }
                Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
                Some(c) => {
                    return Err(DbError::validation(format!(
                        "Invalid identifier start character: '{c}'"
                    )));
                }
            }
            if let Some(c) = chars.find(|&c| !(c == '_' || c == '$' || c.is_ascii_alphanumeric())) {
                return Err(DbError::validation(format!(
                    "Invalid character in identifier: '{c}'"
                )));
            }
            parts.push(part.to_string());
        }

        Ok(Self(Repr::Bare(parts)))
    }

    /// Create a quoted identifier.
    pub fn quoted(name: &str) -> DbResult<Self> {
        if name.is_empty() {
            return Err(DbError::validation("Empty quoted identifier"));
        }
        if name.contains('\0') {
            return Err(DbError::validation(
                "Identifier cannot contain NUL character",
            ));
        }
        Ok(Self(Repr::Quoted(name.to_string())))
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        match &self.0 {
            Repr::Bare(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(part);
                }
            }
            Repr::Quoted(name) => {
                out.push('"');
                for ch in name.chars() {
                    if ch == '"' {
                        out.push('"');
                    }
                    out.push(ch);
                }
                out.push('"');
            }
        }
    }
}
