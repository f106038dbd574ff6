use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Failure while reading a collection literal passed on the command line.
#[derive(Debug, Error, PartialEq)]
#[error("{message} at position {pos}")]
pub struct LiteralError {
    pub pos: usize,
    pub message: String,
}

/// Parse a Python-style collection literal into JSON.
///
/// Accepts quoted strings (single or double), integers and floats,
/// `True`/`False`/`None` (and their JSON spellings), lists, tuples and dicts.
/// Tuples become arrays; non-string dict keys are stringified.
pub fn parse_literal(input: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser {
        chars: input.chars().collect(),
        pos: 0,
    };
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos < parser.chars.len() {
        return Err(parser.error("unexpected trailing characters"));
    }
    Ok(value)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn error(&self, message: &str) -> LiteralError {
        LiteralError {
            pos: self.pos,
            message: message.to_string(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        self.skip_ws();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('[') => self.sequence(']'),
            Some('(') => self.sequence(')'),
            Some('{') => self.dict(),
            Some(q @ ('\'' | '"')) => self.string(q).map(Value::String),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_alphabetic() => self.keyword(),
            Some(_) => Err(self.error("unexpected character")),
        }
    }

    fn sequence(&mut self, close: char) -> Result<Value, LiteralError> {
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(c) if c == close => {}
                None => return Err(self.error(&format!("missing closing '{close}'"))),
                Some(_) => return Err(self.error(&format!("expected ',' or '{close}'"))),
            }
        }
    }

    fn dict(&mut self) -> Result<Value, LiteralError> {
        self.pos += 1;
        let mut map = Map::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(Value::Object(map));
            }
            let key = match self.value()? {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return Err(self.error("dict keys must be strings or numbers")),
            };
            self.skip_ws();
            if self.peek() != Some(':') {
                return Err(self.error("expected ':' after dict key"));
            }
            self.pos += 1;
            let value = self.value()?;
            map.insert(key, value);
            self.skip_ws();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {}
                None => return Err(self.error("missing closing '}'")),
                Some(_) => return Err(self.error("expected ',' or '}'")),
            }
        }
    }

    fn string(&mut self, quote: char) -> Result<String, LiteralError> {
        self.pos += 1;
        let mut out = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(self.error("unterminated string"));
            };
            self.pos += 1;
            match c {
                c if c == quote => return Ok(out),
                '\\' => {
                    let Some(esc) = self.peek() else {
                        return Err(self.error("unterminated escape"));
                    };
                    self.pos += 1;
                    match esc {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '0' => out.push('\0'),
                        '\\' | '\'' | '"' | '/' => out.push(esc),
                        'x' => out.push(self.hex_escape(2)?),
                        'u' => out.push(self.hex_escape(4)?),
                        other => {
                            // unknown escapes are kept verbatim
                            out.push('\\');
                            out.push(other);
                        }
                    }
                }
                c => out.push(c),
            }
        }
    }

    fn hex_escape(&mut self, digits: usize) -> Result<char, LiteralError> {
        let end = self.pos + digits;
        if end > self.chars.len() {
            return Err(self.error("truncated escape sequence"));
        }
        let hex: String = self.chars[self.pos..end].iter().collect();
        let code = u32::from_str_radix(&hex, 16).map_err(|_| self.error("invalid escape sequence"))?;
        self.pos = end;
        char::from_u32(code).ok_or_else(|| self.error("invalid code point"))
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.pos += 1;
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => {}
                '.' | 'e' | 'E' => is_float = true,
                '-' | '+' if matches!(self.chars[self.pos - 1], 'e' | 'E') => {}
                _ => break,
            }
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos]
            .iter()
            .filter(|c| **c != '_')
            .collect();
        let text = text.strip_prefix('+').unwrap_or(&text);

        if !is_float {
            if let Ok(n) = text.parse::<i64>() {
                return Ok(Value::Number(n.into()));
            }
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| LiteralError {
                pos: start,
                message: format!("invalid number '{text}'"),
            })
    }

    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            _ => Err(LiteralError {
                pos: start,
                message: format!("unexpected bare word '{word}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_single_quoted_list() {
        let v = parse_literal("['Jane Doe', 'John Smith']").unwrap();
        assert_eq!(v, json!(["Jane Doe", "John Smith"]));
    }

    #[test]
    fn parses_json_as_is() {
        let v = parse_literal(r#"[{"id": "abc", "value": 3, "ok": true}]"#).unwrap();
        assert_eq!(v, json!([{"id": "abc", "value": 3, "ok": true}]));
    }

    #[test]
    fn parses_python_keywords_and_tuples() {
        let v = parse_literal("(True, False, None, -2, 1.5,)").unwrap();
        assert_eq!(v, json!([true, false, null, -2, 1.5]));
    }

    #[test]
    fn parses_nested_dict_with_numeric_key() {
        let v = parse_literal("{'a': {'b': [1, 2]}, 7: 'seven'}").unwrap();
        assert_eq!(v, json!({"a": {"b": [1, 2]}, "7": "seven"}));
    }

    #[test]
    fn handles_escapes_inside_strings() {
        let v = parse_literal(r#"['it\'s', "say \"hi\"", 'tab\there']"#).unwrap();
        assert_eq!(v, json!(["it's", "say \"hi\"", "tab\there"]));
    }

    #[test]
    fn empty_collections() {
        assert_eq!(parse_literal("[]").unwrap(), json!([]));
        assert_eq!(parse_literal(" { } ").unwrap(), json!({}));
    }

    #[test]
    fn rejects_unterminated_list() {
        let err = parse_literal("['a', 'b'").unwrap_err();
        assert!(err.message.contains("missing closing"));
    }

    #[test]
    fn rejects_bare_words() {
        let err = parse_literal("[alice]").unwrap_err();
        assert!(err.message.contains("bare word"));
        assert_eq!(err.pos, 1);
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse_literal("['a'] extra").is_err());
    }

    #[test]
    fn rejects_unterminated_string() {
        let err = parse_literal("['abc").unwrap_err();
        assert_eq!(err.message, "unterminated string");
    }
}
