//! The KODA lexer.
//!
//! Transforms source text into tokens using a dispatch-on-first-character
//! scan. Whitespace (space, tab, CR, LF) and comments are skipped between
//! tokens; `/* … */` comments nest. Every token records the span it
//! covers, and every failure carries the start position of the offending
//! token.

use koda_util::error::{ParseError, ParseErrorKind};
use koda_util::span::{Pos, Span};

use crate::cursor::Cursor;
use crate::token::{is_ident_continue, is_ident_start, reserved_word, Token, TokenKind};

/// The main lexer for KODA source text.
///
/// # Example
///
/// ```
/// use koda_lex::lexer::Lexer;
/// use koda_lex::token::TokenKind;
///
/// let mut lexer = Lexer::new("name: 1");
/// let token = lexer.next_token().unwrap();
/// assert_eq!(token.kind, TokenKind::Ident("name".to_string()));
/// ```
pub struct Lexer<'a> {
    /// Character cursor for traversing source.
    cursor: Cursor<'a>,

    /// Start position of the current token.
    token_start: Pos,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            token_start: Pos::START,
        }
    }

    /// Returns the next token from the source.
    ///
    /// Returns `TokenKind::Eof` (repeatedly, if called again) once the
    /// input is exhausted.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace_and_comments()?;

        self.token_start = self.cursor.pos();

        if self.cursor.is_at_end() {
            return Ok(Token::new(TokenKind::Eof, Span::point(self.token_start)));
        }

        let kind = match self.cursor.current_char() {
            '{' => {
                self.cursor.advance();
                TokenKind::LBrace
            }
            '}' => {
                self.cursor.advance();
                TokenKind::RBrace
            }
            '[' => {
                self.cursor.advance();
                TokenKind::LBracket
            }
            ']' => {
                self.cursor.advance();
                TokenKind::RBracket
            }
            ':' => {
                self.cursor.advance();
                TokenKind::Colon
            }
            ',' => {
                self.cursor.advance();
                TokenKind::Comma
            }

            quote @ ('"' | '\'') => self.lex_string(quote)?,

            c if c == '-' || c.is_ascii_digit() => self.lex_number()?,

            c if is_ident_start(c) => self.lex_identifier(),

            c => return Err(self.error(ParseErrorKind::UnexpectedCharacter(c))),
        };

        Ok(Token::new(kind, Span::new(self.token_start, self.cursor.pos())))
    }

    /// Lexes an identifier or one of the reserved spellings.
    fn lex_identifier(&mut self) -> TokenKind {
        let start = self.cursor.position();
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(start);
        reserved_word(text).unwrap_or_else(|| TokenKind::Ident(text.to_string()))
    }

    /// Lexes a string literal delimited by `quote`.
    ///
    /// Escapes are resolved into the returned text. Raw bytes in
    /// U+0000..=U+001F are rejected; the literal must close before end of
    /// input.
    fn lex_string(&mut self, quote: char) -> Result<TokenKind, ParseError> {
        self.cursor.advance(); // opening quote

        let mut content = String::new();
        loop {
            if self.cursor.is_at_end() {
                return Err(self.error(ParseErrorKind::UnclosedString));
            }

            let c = self.cursor.current_char();
            if c == quote {
                self.cursor.advance();
                break;
            }

            if c == '\\' {
                self.cursor.advance();
                content.push(self.lex_escape()?);
            } else if (c as u32) < 0x20 {
                return Err(self.error(ParseErrorKind::ControlCharacter));
            } else {
                content.push(c);
                self.cursor.advance();
            }
        }

        Ok(TokenKind::Str(content))
    }

    /// Resolves one escape sequence, with the leading backslash already
    /// consumed.
    fn lex_escape(&mut self) -> Result<char, ParseError> {
        if self.cursor.is_at_end() {
            return Err(self.error(ParseErrorKind::UnclosedString));
        }

        let c = self.cursor.current_char();
        self.cursor.advance();

        match c {
            '"' => Ok('"'),
            '\'' => Ok('\''),
            '\\' => Ok('\\'),
            '/' => Ok('/'),
            'b' => Ok('\u{0008}'),
            'f' => Ok('\u{000C}'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'u' => {
                // Exactly four hex digits, case-insensitive.
                let mut code: u32 = 0;
                for _ in 0..4 {
                    let h = self.cursor.current_char();
                    let digit = h
                        .to_digit(16)
                        .ok_or_else(|| self.error(ParseErrorKind::InvalidEscape))?;
                    code = code * 16 + digit;
                    self.cursor.advance();
                }
                // Surrogate code points are not Unicode scalar values.
                char::from_u32(code).ok_or_else(|| self.error(ParseErrorKind::InvalidEscape))
            }
            _ => Err(self.error(ParseErrorKind::InvalidEscape)),
        }
    }

    /// Lexes a number literal.
    ///
    /// The grammar is `-? int frac? exp?` where `int` is `0` or a nonzero
    /// digit followed by digits, `frac` is `. digit+`, and `exp` is
    /// `(e|E) [+-]? digit+`. A fraction or exponent makes the token a
    /// float; otherwise it is an integer and must fit in i64.
    fn lex_number(&mut self) -> Result<TokenKind, ParseError> {
        let start = self.cursor.position();

        if self.cursor.current_char() == '-' {
            self.cursor.advance();
        }

        // Numbers must begin with a digit; a bare `.5` or lone `-` is out.
        if !self.cursor.current_char().is_ascii_digit() {
            return Err(self.error(ParseErrorKind::InvalidNumber));
        }

        if self.cursor.current_char() == '0' {
            self.cursor.advance();
            if self.cursor.current_char().is_ascii_digit() {
                return Err(self.error(ParseErrorKind::LeadingZero));
            }
        } else {
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        let mut is_float = false;

        if self.cursor.current_char() == '.' {
            self.cursor.advance();
            if !self.cursor.current_char().is_ascii_digit() {
                return Err(self.error(ParseErrorKind::InvalidNumber));
            }
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
            is_float = true;
        }

        if matches!(self.cursor.current_char(), 'e' | 'E') {
            self.cursor.advance();
            if matches!(self.cursor.current_char(), '+' | '-') {
                self.cursor.advance();
            }
            if !self.cursor.current_char().is_ascii_digit() {
                return Err(self.error(ParseErrorKind::InvalidExponent));
            }
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
            is_float = true;
        }

        let text = self.cursor.slice_from(start);
        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| self.error(ParseErrorKind::InvalidNumber))
        } else {
            text.parse::<i64>()
                .map(TokenKind::Int)
                .map_err(|_| self.error(ParseErrorKind::IntegerOutOfRange))
        }
    }

    /// Skips whitespace and comments before the next token.
    ///
    /// Whitespace is space, tab, CR, LF. `//` comments run to end of line;
    /// `/* … */` comments nest and must be closed before end of input.
    fn skip_whitespace_and_comments(&mut self) -> Result<(), ParseError> {
        loop {
            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => self.cursor.advance(),

                '/' if self.cursor.peek_char(1) == '/' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                        self.cursor.advance();
                    }
                }

                '/' if self.cursor.peek_char(1) == '*' => {
                    let opener = self.cursor.pos();
                    self.cursor.advance();
                    self.cursor.advance();
                    self.skip_block_comment(opener)?;
                }

                _ => break,
            }

            if self.cursor.is_at_end() {
                break;
            }
        }
        Ok(())
    }

    /// Skips a block comment body, tracking nesting depth. `opener` is the
    /// position of the outermost `/*` for the unterminated-comment error.
    fn skip_block_comment(&mut self, opener: Pos) -> Result<(), ParseError> {
        let mut depth = 1usize;
        while depth > 0 {
            if self.cursor.is_at_end() {
                return Err(ParseError::new(ParseErrorKind::UnclosedComment, opener));
            }
            if self.cursor.current_char() == '/' && self.cursor.peek_char(1) == '*' {
                self.cursor.advance();
                self.cursor.advance();
                depth += 1;
            } else if self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/' {
                self.cursor.advance();
                self.cursor.advance();
                depth -= 1;
            } else {
                self.cursor.advance();
            }
        }
        Ok(())
    }

    /// Builds a parse error at the current token's start position.
    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.token_start)
    }
}

/// Lexes an entire source string into a token vector ending with `Eof`.
///
/// # Example
///
/// ```
/// use koda_lex::{tokenize, TokenKind};
///
/// let tokens = tokenize("[1, 2]").unwrap();
/// assert_eq!(tokens.len(), 6); // [ 1 , 2 ] eof
/// assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let eof = token.is_eof();
        tokens.push(token);
        if eof {
            break;
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to lex a source string into token kinds, dropping Eof.
    fn lex_all(source: &str) -> Vec<TokenKind> {
        let tokens = tokenize(source).expect("lexing should succeed");
        tokens
            .into_iter()
            .filter(|t| !t.is_eof())
            .map(|t| t.kind)
            .collect()
    }

    /// Helper to lex a source string expecting a failure.
    fn lex_err(source: &str) -> ParseError {
        tokenize(source).expect_err("lexing should fail")
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            lex_all("{}[]:,"),
            vec![
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Colon,
                TokenKind::Comma,
            ]
        );
    }

    #[test]
    fn test_identifiers_and_reserved() {
        assert_eq!(
            lex_all("name _x a-b true false null"),
            vec![
                TokenKind::Ident("name".into()),
                TokenKind::Ident("_x".into()),
                TokenKind::Ident("a-b".into()),
                TokenKind::True,
                TokenKind::False,
                TokenKind::Null,
            ]
        );
    }

    #[test]
    fn test_reserved_is_case_sensitive() {
        assert_eq!(lex_all("True"), vec![TokenKind::Ident("True".into())]);
    }

    #[test]
    fn test_double_and_single_quoted_strings() {
        assert_eq!(
            lex_all(r#""hello" 'world'"#),
            vec![
                TokenKind::Str("hello".into()),
                TokenKind::Str("world".into()),
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            lex_all(r#""a\n\t\\\"\b\f\r\/b""#),
            vec![TokenKind::Str("a\n\t\\\"\u{0008}\u{000C}\r/b".into())]
        );
    }

    #[test]
    fn test_unicode_escape() {
        assert_eq!(
            lex_all(r#""\u0041\u00e9\uFFFD""#),
            vec![TokenKind::Str("A\u{e9}\u{FFFD}".into())]
        );
    }

    #[test]
    fn test_surrogate_escape_rejected() {
        let err = lex_err(r#""\uD800""#);
        assert_eq!(err.kind, ParseErrorKind::InvalidEscape);
    }

    #[test]
    fn test_short_unicode_escape_rejected() {
        let err = lex_err(r#""\u12""#);
        assert_eq!(err.kind, ParseErrorKind::InvalidEscape);
    }

    #[test]
    fn test_unknown_escape_rejected() {
        let err = lex_err(r#""\q""#);
        assert_eq!(err.kind, ParseErrorKind::InvalidEscape);
    }

    #[test]
    fn test_control_character_rejected() {
        let err = lex_err("\"a\u{0001}b\"");
        assert_eq!(err.kind, ParseErrorKind::ControlCharacter);
    }

    #[test]
    fn test_raw_newline_in_string_rejected() {
        let err = lex_err("\"a\nb\"");
        assert_eq!(err.kind, ParseErrorKind::ControlCharacter);
    }

    #[test]
    fn test_unclosed_string() {
        let err = lex_err("\"abc");
        assert_eq!(err.kind, ParseErrorKind::UnclosedString);
        assert_eq!(err.pos, Pos::new(1, 1, 0));
    }

    #[test]
    fn test_integers() {
        assert_eq!(
            lex_all("0 42 -17"),
            vec![TokenKind::Int(0), TokenKind::Int(42), TokenKind::Int(-17)]
        );
    }

    #[test]
    fn test_int64_bounds() {
        assert_eq!(
            lex_all("9223372036854775807 -9223372036854775808"),
            vec![TokenKind::Int(i64::MAX), TokenKind::Int(i64::MIN)]
        );
    }

    #[test]
    fn test_integer_out_of_range() {
        let err = lex_err("9223372036854775808");
        assert_eq!(err.kind, ParseErrorKind::IntegerOutOfRange);
    }

    #[test]
    fn test_floats() {
        assert_eq!(
            lex_all("3.5 -0.25 1e3 2E-2 0.5e+1"),
            vec![
                TokenKind::Float(3.5),
                TokenKind::Float(-0.25),
                TokenKind::Float(1000.0),
                TokenKind::Float(0.02),
                TokenKind::Float(5.0),
            ]
        );
    }

    #[test]
    fn test_leading_zero_rejected() {
        let err = lex_err("01");
        assert_eq!(err.kind, ParseErrorKind::LeadingZero);
        assert_eq!(err.pos, Pos::new(1, 1, 0));
    }

    #[test]
    fn test_zero_with_fraction_and_exponent_allowed() {
        assert_eq!(
            lex_all("0.5 0e3"),
            vec![TokenKind::Float(0.5), TokenKind::Float(0.0)]
        );
    }

    #[test]
    fn test_empty_exponent_rejected() {
        let err = lex_err("1e");
        assert_eq!(err.kind, ParseErrorKind::InvalidExponent);
        let err = lex_err("1e+");
        assert_eq!(err.kind, ParseErrorKind::InvalidExponent);
    }

    #[test]
    fn test_trailing_dot_rejected() {
        let err = lex_err("1.");
        assert_eq!(err.kind, ParseErrorKind::InvalidNumber);
    }

    #[test]
    fn test_bare_dot_five_rejected() {
        let err = lex_err(".5");
        assert_eq!(err.kind, ParseErrorKind::UnexpectedCharacter('.'));
    }

    #[test]
    fn test_lone_minus_rejected() {
        let err = lex_err("-x");
        assert_eq!(err.kind, ParseErrorKind::InvalidNumber);
    }

    #[test]
    fn test_line_comment() {
        assert_eq!(
            lex_all("1 // rest of line\n2"),
            vec![TokenKind::Int(1), TokenKind::Int(2)]
        );
    }

    #[test]
    fn test_nested_block_comment() {
        assert_eq!(
            lex_all("1 /* outer /* inner */ still outer */ 2"),
            vec![TokenKind::Int(1), TokenKind::Int(2)]
        );
    }

    #[test]
    fn test_unclosed_block_comment() {
        let err = lex_err("1 /* /* */");
        assert_eq!(err.kind, ParseErrorKind::UnclosedComment);
        assert_eq!(err.pos, Pos::new(1, 3, 2));
    }

    #[test]
    fn test_newlines_in_comments_advance_lines() {
        let tokens = tokenize("/* a\n b */ x").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Ident("x".into()));
        assert_eq!(tokens[0].span.start, Pos::new(2, 7, 11));
    }

    #[test]
    fn test_token_spans() {
        let tokens = tokenize("ab 12").unwrap();
        assert_eq!(tokens[0].span.start, Pos::new(1, 1, 0));
        assert_eq!(tokens[0].span.end, Pos::new(1, 3, 2));
        assert_eq!(tokens[1].span.start, Pos::new(1, 4, 3));
        assert_eq!(tokens[1].span.end, Pos::new(1, 6, 5));
    }

    #[test]
    fn test_unexpected_character() {
        let err = lex_err("@");
        assert_eq!(err.kind, ParseErrorKind::UnexpectedCharacter('@'));
    }

    #[test]
    fn test_eof_token() {
        let tokens = tokenize("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
    }
}
