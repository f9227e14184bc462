// SPDX-License-Identifier: MIT

//! `Plural-Forms` header parsing.
//!
//! A catalog declares its plural grammar as
//! `nplurals=<count>; plural=<expr>;` (trailing semicolon optional,
//! whitespace free-form). Two catalogs are plural-compatible iff their
//! counts match and their `plural=` expressions parse to structurally equal
//! trees — comparing trees instead of raw strings is what makes
//! `plural=(n != 1)` and `plural=n!=1` compatible while still rejecting
//! genuinely different rules.

pub mod expr;

pub use expr::{Expr, ExprError};

use regex::Regex;
use thiserror::Error;

/// A Plural-Forms declaration that does not match the expected grammar.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("catalog has no Plural-Forms header")]
    Missing,
    #[error("malformed Plural-Forms header: `{value}`")]
    Header { value: String },
    #[error("nplurals must be at least 1")]
    Nplurals,
    #[error("invalid plural expression: {0}")]
    Expr(#[from] ExprError),
}

/// Normalized, comparable form of a catalog's plural grammar.
///
/// Immutable after parse; derived once per catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralFormSpec {
    pub nplurals: u32,
    pub plural: Expr,
}

impl PluralFormSpec {
    /// The msgstr slot a plural entry must provide per plural index.
    pub fn slot_count(&self) -> usize {
        self.nplurals as usize
    }

    /// Plural index selected for a quantity, clamped into range the way
    /// gettext runtimes do for out-of-range rule results.
    pub fn index_for(&self, n: u64) -> usize {
        let idx = self.plural.eval(n).max(0) as usize;
        idx.min(self.slot_count().saturating_sub(1))
    }
}

/// Parse a `Plural-Forms` header value into a [`PluralFormSpec`].
pub fn parse_plural_forms(header: &str) -> Result<PluralFormSpec, FormatError> {
    let shape = Regex::new(r"^nplurals\s*=\s*(\d+)\s*;\s*plural\s*=\s*(.+?)\s*;?$")
        .expect("header pattern is valid");
    let value = header.trim();
    let captures = shape.captures(value).ok_or_else(|| FormatError::Header {
        value: value.to_string(),
    })?;

    let nplurals: u32 = captures[1].parse().map_err(|_| FormatError::Header {
        value: value.to_string(),
    })?;
    if nplurals == 0 {
        return Err(FormatError::Nplurals);
    }

    let plural = expr::parse(&captures[2])?;
    Ok(PluralFormSpec { nplurals, plural })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_germanic_header() {
        let spec = parse_plural_forms("nplurals=2; plural=(n != 1);").unwrap();
        assert_eq!(spec.nplurals, 2);
        assert_eq!(spec.index_for(1), 0);
        assert_eq!(spec.index_for(4), 1);
    }

    #[test]
    fn whitespace_and_parens_are_insignificant() {
        let a = parse_plural_forms("nplurals=2; plural=(n != 1);").unwrap();
        let b = parse_plural_forms("nplurals=2;plural=n!=1").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_rules_are_not_equal() {
        let two = parse_plural_forms("nplurals=2; plural=(n != 1);").unwrap();
        let three = parse_plural_forms("nplurals=3; plural=(n==0?0:n==1?1:2);").unwrap();
        assert_ne!(two, three);
    }

    #[test]
    fn same_count_different_expression_is_not_equal() {
        let germanic = parse_plural_forms("nplurals=2; plural=(n != 1);").unwrap();
        let french = parse_plural_forms("nplurals=2; plural=(n > 1);").unwrap();
        assert_ne!(germanic, french);
    }

    #[test]
    fn trailing_semicolon_is_optional() {
        assert!(parse_plural_forms("nplurals=1; plural=0").is_ok());
        assert!(parse_plural_forms("nplurals=1; plural=0;").is_ok());
    }

    #[test]
    fn rejects_malformed_headers() {
        assert!(matches!(
            parse_plural_forms("plural=(n != 1);"),
            Err(FormatError::Header { .. })
        ));
        assert!(matches!(
            parse_plural_forms("nplurals=two; plural=0;"),
            Err(FormatError::Header { .. })
        ));
        assert!(matches!(
            parse_plural_forms("nplurals=0; plural=0;"),
            Err(FormatError::Nplurals)
        ));
        assert!(matches!(
            parse_plural_forms("nplurals=2; plural=(q != 1);"),
            Err(FormatError::Expr(_))
        ));
    }

    #[test]
    fn index_is_clamped_to_declared_slots() {
        // A rule yielding 2 with only two declared forms clamps to index 1.
        let spec = parse_plural_forms("nplurals=2; plural=n;").unwrap();
        assert_eq!(spec.index_for(9), 1);
    }
}
