//! The KODA text serializer.
//!
//! Emits a [`Value`] as `.koda` text, compact by default or pretty-printed
//! when an indent string is configured. Object entries are written in the
//! value's in-memory insertion order; canonical key ordering is a binary
//! encoding concern and never happens here.

use std::fmt::Write;

use koda_lex::token::{is_ident_continue, is_ident_start};
use koda_util::value::{Object, Value};

/// Options for [`stringify`].
#[derive(Clone, Debug)]
pub struct StringifyOptions {
    /// Indent unit for pretty-printing. Empty selects compact mode.
    pub indent: String,

    /// Line separator for pretty-printing.
    pub newline: String,
}

impl Default for StringifyOptions {
    fn default() -> Self {
        Self {
            indent: String::new(),
            newline: "\n".to_string(),
        }
    }
}

/// Serializes a value to KODA text.
///
/// # Example
///
/// ```
/// use koda_text::writer::{stringify, StringifyOptions};
/// use koda_util::value::{Object, Value};
///
/// let mut obj = Object::new();
/// obj.insert("name".into(), Value::from("my-app"));
/// obj.insert("port".into(), Value::Int(80));
///
/// let text = stringify(&Value::Object(obj), &StringifyOptions::default());
/// assert_eq!(text, "{name: my-app port: 80 }");
/// ```
pub fn stringify(value: &Value, options: &StringifyOptions) -> String {
    let mut writer = Writer {
        out: String::new(),
        options,
    };
    writer.write_value(value, 0);
    writer.out
}

/// Serializer state: the output buffer plus formatting options.
struct Writer<'a> {
    out: String,
    options: &'a StringifyOptions,
}

impl Writer<'_> {
    fn pretty(&self) -> bool {
        !self.options.indent.is_empty()
    }

    fn push_indent(&mut self, level: usize) {
        for _ in 0..level {
            self.out.push_str(&self.options.indent);
        }
    }

    fn write_value(&mut self, value: &Value, level: usize) {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(true) => self.out.push_str("true"),
            Value::Bool(false) => self.out.push_str("false"),
            Value::Int(n) => {
                let _ = write!(self.out, "{}", n);
            }
            Value::Float(f) => self.write_float(*f),
            Value::String(s) => self.write_string(s),
            Value::Array(items) => self.write_array(items, level),
            Value::Object(obj) => self.write_object(obj, level),
        }
    }

    /// Writes a float using the host's shortest round-trip conversion.
    ///
    /// An integral rendering gets a `.0` suffix so the text re-parses as a
    /// float rather than an integer. Non-finite floats render as
    /// `inf`/`-inf`/`NaN`, which do not re-parse; binary is the
    /// authoritative round-trip for those.
    fn write_float(&mut self, f: f64) {
        let start = self.out.len();
        let _ = write!(self.out, "{}", f);
        if f.is_finite() && !self.out[start..].contains(['.', 'e', 'E']) {
            self.out.push_str(".0");
        }
    }

    /// Writes a string, unquoted when it has the identifier shape.
    fn write_string(&mut self, s: &str) {
        if is_bare(s) {
            self.out.push_str(s);
        } else {
            self.write_quoted(s);
        }
    }

    fn write_quoted(&mut self, s: &str) {
        self.out.push('"');
        for c in s.chars() {
            match c {
                '\\' => self.out.push_str("\\\\"),
                '"' => self.out.push_str("\\\""),
                '\u{0008}' => self.out.push_str("\\b"),
                '\u{000C}' => self.out.push_str("\\f"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                c if (c as u32) < 0x20 => {
                    let _ = write!(self.out, "\\u{:04x}", c as u32);
                }
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }

    fn write_array(&mut self, items: &[Value], level: usize) {
        if items.is_empty() {
            self.out.push_str("[]");
            return;
        }

        self.out.push('[');
        if self.pretty() {
            for item in items {
                self.out.push_str(&self.options.newline);
                self.push_indent(level + 1);
                self.write_value(item, level + 1);
            }
            self.out.push_str(&self.options.newline);
            self.push_indent(level);
        } else {
            let mut first = true;
            for item in items {
                if !first {
                    self.out.push(' ');
                }
                first = false;
                self.write_value(item, level + 1);
            }
            self.out.push(' ');
        }
        self.out.push(']');
    }

    fn write_object(&mut self, obj: &Object, level: usize) {
        if obj.is_empty() {
            self.out.push_str("{}");
            return;
        }

        self.out.push('{');
        if self.pretty() {
            for (key, value) in obj.iter() {
                self.out.push_str(&self.options.newline);
                self.push_indent(level + 1);
                self.write_string(key);
                self.out.push_str(": ");
                self.write_value(value, level + 1);
            }
            self.out.push_str(&self.options.newline);
            self.push_indent(level);
        } else {
            let mut first = true;
            for (key, value) in obj.iter() {
                if !first {
                    self.out.push(' ');
                }
                first = false;
                self.write_string(key);
                self.out.push_str(": ");
                self.write_value(value, level + 1);
            }
            self.out.push(' ');
        }
        self.out.push('}');
    }
}

/// Returns true if a string may be written without quotes: non-empty,
/// identifier-shaped, and not a reserved spelling in any letter case.
fn is_bare(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !is_ident_start(first) || !chars.all(is_ident_continue) {
        return false;
    }
    !(s.eq_ignore_ascii_case("true")
        || s.eq_ignore_ascii_case("false")
        || s.eq_ignore_ascii_case("null"))
}
