//! Recognizes the three textual forms a string value can take.
//!
//! - plain text, returned as is;
//! - embedded templates, `{key.path}` anywhere inside the string, possibly several;
//! - structural references, a whole value of the form `#{key.path}`.
//!
//! Key paths inside either form may contain `@`, which stands for the caller's context.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::Value;
use crate::DbError;

static STRUCTURAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\{([^{}]*)\}$").expect("structural reference pattern is valid"));

/// Placeholder replaced by the caller's context inside reference key paths.
pub const CONTEXT_TOKEN: char = '@';

/// A `{key.path}` token found inside a string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template<'a> {
    /// The token including its braces, as it appears in the string.
    pub token: &'a str,
    /// The key path between the braces.
    pub keypath: &'a str,
}

/// Returns the target key path if the whole value is a structural reference.
pub fn structural_target(value: &str) -> Option<&str> {
    STRUCTURAL
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Finds the leftmost template: the first `{` and the first `}` after it.
pub fn first_template(value: &str) -> Option<Template<'_>> {
    let start = value.find('{')?;
    let end = start + value[start..].find('}')?;
    Some(Template {
        token: &value[start..=end],
        keypath: &value[start + 1..end],
    })
}

pub fn braces_balanced(value: &str) -> bool {
    value.matches('{').count() == value.matches('}').count()
}

/// The two strings with a meaning of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    Null,
    True,
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Null => Value::Null,
            Literal::True => Value::Bool(true),
        }
    }
}

/// Decodes the two reserved literals. Only an entire value qualifies.
pub fn reserved_literal(value: &str) -> Option<Literal> {
    match value {
        "null" => Some(Literal::Null),
        "true" => Some(Literal::True),
        _ => None,
    }
}

/// Replaces every `@` in `keypath` with `context`.
///
/// Fails with `InvalidContext` when `@` is present but there is no context to put there.
pub fn substitute_context(keypath: &str, context: Option<&str>) -> Result<String, DbError> {
    if !keypath.contains(CONTEXT_TOKEN) {
        return Ok(keypath.to_string());
    }
    match context {
        Some(ctx) if !ctx.is_empty() => Ok(keypath.replace(CONTEXT_TOKEN, ctx)),
        _ => Err(DbError::invalid_context(keypath)),
    }
}

/// Formats a key path as the template that would reference it.
pub fn template_of(keypath: &str) -> String {
    format!("{{{}}}", keypath)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_target() {
        assert_eq!(structural_target("#{p.board.k}"), Some("p.board.k"));
        assert_eq!(structural_target("#{@.oe}"), Some("@.oe"));
        assert_eq!(structural_target("{p.board.k}"), None);
        assert_eq!(structural_target("#{a}{b}"), None);
        assert_eq!(structural_target("#{a} tail"), None);
        assert_eq!(structural_target("x#{a}"), None);
    }

    #[test]
    fn test_first_template_is_leftmost() {
        let t = first_template("{name0}-{name1}.zip").unwrap();
        assert_eq!(t.token, "{name0}");
        assert_eq!(t.keypath, "name0");

        assert!(first_template("no templates here").is_none());
        assert!(first_template("}{").is_none());
    }

    #[test]
    fn test_braces_balanced() {
        assert!(braces_balanced("{a}/{b}"));
        assert!(braces_balanced("plain"));
        assert!(!braces_balanced("{a}/{b"));
        assert!(!braces_balanced("a}"));
    }

    #[test]
    fn test_reserved_literals_only_whole_value() {
        assert_eq!(reserved_literal("null"), Some(Literal::Null));
        assert_eq!(reserved_literal("true").map(Value::from), Some(Value::Bool(true)));
        assert_eq!(reserved_literal("false"), None);
        assert_eq!(reserved_literal("null pointer"), None);
        assert_eq!(reserved_literal("True"), None);
    }

    #[test]
    fn test_substitute_context() {
        assert_eq!(
            substitute_context("@.fedora.vsn", Some("p.board")).unwrap(),
            "p.board.fedora.vsn"
        );
        assert_eq!(substitute_context("arm.rel", None).unwrap(), "arm.rel");

        match substitute_context("@.pdir", None) {
            Err(DbError::InvalidContext { key, code, .. }) => {
                assert_eq!(key, "@.pdir");
                assert_eq!(code, Some(106));
            }
            other => panic!("Expected InvalidContext, got {:?}", other),
        }
    }

    #[test]
    fn test_template_of() {
        assert_eq!(template_of("arm.rel"), "{arm.rel}");
    }
}
