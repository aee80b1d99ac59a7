//! The KODA text parser.
//!
//! Recursive descent over the `koda-lex` token stream. The grammar is a
//! relaxed superset of a JSON dialect:
//!
//! ```text
//! document    := root-object | value
//! root-object := (key value)+            -- brace-less, two+ tokens
//! key         := identifier | string
//! value       := object | array | string | identifier
//!              | integer | float | 'true' | 'false' | 'null'
//! object      := '{' (key (':')? value (',')?)* '}'
//! array       := '[' (value (',')?)* ']'
//! ```
//!
//! The colon after a key and the comma between pairs or elements are both
//! optional; whitespace alone separates. A document whose first token is a
//! key with more tokens following is an implicit brace-less object.

use koda_lex::token::{Token, TokenKind};
use koda_lex::tokenize;
use koda_util::error::{ParseError, ParseErrorKind};
use koda_util::limits::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_INPUT_LENGTH};
use koda_util::span::Pos;
use koda_util::value::{Object, Value};

/// Options for [`parse`].
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Maximum nesting depth; the root sits at depth 0 and every nested
    /// array/object scope adds 1.
    pub max_depth: usize,

    /// Maximum accepted source length in bytes, checked before any
    /// tokenization work.
    pub max_input_length: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
        }
    }
}

/// Parses KODA source text into a [`Value`].
///
/// # Example
///
/// ```
/// use koda_text::parser::{parse, ParseOptions};
/// use koda_util::value::Value;
///
/// let value = parse("version: 1", &ParseOptions::default()).unwrap();
/// let obj = value.as_object().unwrap();
/// assert_eq!(obj.get("version"), Some(&Value::Int(1)));
/// ```
pub fn parse(source: &str, options: &ParseOptions) -> Result<Value, ParseError> {
    if source.len() > options.max_input_length {
        return Err(ParseError::new(ParseErrorKind::InputTooLong, Pos::START));
    }

    let tokens = tokenize(source)?;
    Parser::new(tokens, options.max_depth).document()
}

/// Token-stream parser state.
struct Parser {
    /// The full token stream, ending with `Eof`.
    tokens: Vec<Token>,

    /// Index of the current token.
    index: usize,

    /// Depth bound applied on entry to every value.
    max_depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>, max_depth: usize) -> Self {
        Self {
            tokens,
            index: 0,
            max_depth,
        }
    }

    /// The current token.
    fn current(&self) -> &Token {
        &self.tokens[self.index]
    }

    /// Start position of the current token.
    fn pos(&self) -> Pos {
        self.current().span.start
    }

    /// Takes the current token and moves to the next one. The stream never
    /// advances past `Eof`.
    fn bump(&mut self) -> Token {
        let token = self.tokens[self.index].clone();
        if !token.is_eof() {
            self.index += 1;
        }
        token
    }

    /// Consumes the current token if it is a colon.
    fn eat_colon(&mut self) {
        if matches!(self.current().kind, TokenKind::Colon) {
            self.index += 1;
        }
    }

    /// Consumes the current token if it is a comma.
    fn eat_comma(&mut self) {
        if matches!(self.current().kind, TokenKind::Comma) {
            self.index += 1;
        }
    }

    /// Parses a whole document: an implicit root object when the first
    /// token is a key and more follow, otherwise a single value.
    fn document(mut self) -> Result<Value, ParseError> {
        if self.current().is_eof() {
            return Err(ParseError::new(
                ParseErrorKind::Expected("value"),
                self.pos(),
            ));
        }

        let is_key = matches!(self.current().kind, TokenKind::Str(_) | TokenKind::Ident(_));
        if is_key && !self.tokens[1].is_eof() {
            return self.implicit_root();
        }

        let value = self.parse_value(0)?;
        if !self.current().is_eof() {
            return Err(ParseError::new(
                ParseErrorKind::Expected("end of input"),
                self.pos(),
            ));
        }
        Ok(value)
    }

    /// Parses the brace-less root object. The implicit root does not add a
    /// nesting level; its children sit at depth 1 like those of an
    /// explicit root object.
    fn implicit_root(&mut self) -> Result<Value, ParseError> {
        let mut object = Object::new();
        while !self.current().is_eof() {
            let (key, key_pos) = self.parse_key()?;
            self.eat_colon();
            let value = self.parse_value(1)?;
            if object.insert(key, value).is_some() {
                return Err(ParseError::new(ParseErrorKind::DuplicateKey, key_pos));
            }
            self.eat_comma();
        }
        Ok(Value::Object(object))
    }

    /// Parses an object key: an identifier or a string.
    fn parse_key(&mut self) -> Result<(String, Pos), ParseError> {
        let pos = self.pos();
        match self.bump().kind {
            TokenKind::Str(text) | TokenKind::Ident(text) => Ok((text, pos)),
            _ => Err(ParseError::new(ParseErrorKind::Expected("key"), pos)),
        }
    }

    /// Parses one value at the given depth.
    ///
    /// `depth` counts the container scopes above this value; exceeding the
    /// configured bound fails at the value's first token.
    fn parse_value(&mut self, depth: usize) -> Result<Value, ParseError> {
        let pos = self.pos();
        if depth > self.max_depth {
            return Err(ParseError::new(ParseErrorKind::MaxDepth, pos));
        }

        match self.current().kind {
            TokenKind::LBrace => self.parse_object(depth),
            TokenKind::LBracket => self.parse_array(depth),
            _ => match self.bump().kind {
                // An identifier in value position is a plain string.
                TokenKind::Str(text) | TokenKind::Ident(text) => Ok(Value::String(text)),
                TokenKind::Int(n) => Ok(Value::Int(n)),
                TokenKind::Float(f) => Ok(Value::Float(f)),
                TokenKind::True => Ok(Value::Bool(true)),
                TokenKind::False => Ok(Value::Bool(false)),
                TokenKind::Null => Ok(Value::Null),
                _ => Err(ParseError::new(ParseErrorKind::Expected("value"), pos)),
            },
        }
    }

    /// Parses a braced object; the current token is `{`.
    fn parse_object(&mut self, depth: usize) -> Result<Value, ParseError> {
        self.bump(); // '{'

        let mut object = Object::new();
        loop {
            if matches!(self.current().kind, TokenKind::RBrace) {
                self.bump();
                break;
            }
            if self.current().is_eof() {
                return Err(ParseError::new(ParseErrorKind::Expected("'}'"), self.pos()));
            }

            let (key, key_pos) = self.parse_key()?;
            self.eat_colon();
            let value = self.parse_value(depth + 1)?;
            if object.insert(key, value).is_some() {
                return Err(ParseError::new(ParseErrorKind::DuplicateKey, key_pos));
            }
            self.eat_comma();
        }
        Ok(Value::Object(object))
    }

    /// Parses a bracketed array; the current token is `[`.
    fn parse_array(&mut self, depth: usize) -> Result<Value, ParseError> {
        self.bump(); // '['

        let mut items = Vec::new();
        loop {
            if matches!(self.current().kind, TokenKind::RBracket) {
                self.bump();
                break;
            }
            if self.current().is_eof() {
                return Err(ParseError::new(ParseErrorKind::Expected("']'"), self.pos()));
            }

            items.push(self.parse_value(depth + 1)?);
            self.eat_comma();
        }
        Ok(Value::Array(items))
    }
}
