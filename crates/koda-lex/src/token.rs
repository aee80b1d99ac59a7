//! Token definitions for KODA text.

use std::fmt;

use koda_util::span::Span;

/// The kind of a lexical unit, with any decoded payload.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// A quoted string literal, escapes already resolved.
    Str(String),
    /// An unquoted identifier (`[A-Za-z_][A-Za-z0-9_\-]*`, not reserved).
    Ident(String),
    /// An integer literal within the signed 64-bit range.
    Int(i64),
    /// A floating-point literal.
    Float(f64),
    /// The reserved spelling `true`.
    True,
    /// The reserved spelling `false`.
    False,
    /// The reserved spelling `null`.
    Null,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// A short human-readable name for this token kind, used in
    /// `Expected <kind>` diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::Str(_) => "string",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Int(_) => "integer",
            TokenKind::Float(_) => "float",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Null => "'null'",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token together with the source range it covers.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// What was lexed.
    pub kind: TokenKind,
    /// Where it was lexed from.
    pub span: Span,
}

impl Token {
    /// Create a token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is the end-of-input marker.
    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

/// Returns true for characters that may start an identifier.
#[inline]
pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Returns true for characters that may continue an identifier.
#[inline]
pub fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Maps an accumulated identifier to its reserved token, if it is one of
/// the three reserved spellings.
pub fn reserved_word(text: &str) -> Option<TokenKind> {
    match text {
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "null" => Some(TokenKind::Null),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_words() {
        assert_eq!(reserved_word("true"), Some(TokenKind::True));
        assert_eq!(reserved_word("false"), Some(TokenKind::False));
        assert_eq!(reserved_word("null"), Some(TokenKind::Null));
        assert_eq!(reserved_word("nil"), None);
        // Reserved spellings are case-sensitive at the token level.
        assert_eq!(reserved_word("True"), None);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(TokenKind::LBrace.name(), "'{'");
        assert_eq!(TokenKind::Str(String::new()).name(), "string");
        assert_eq!(TokenKind::Eof.to_string(), "end of input");
    }
}
