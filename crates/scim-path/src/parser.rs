//! Attribute path and filter parser (RFC 7644 §3.4.2.2 and §3.10).

use serde_json::Value;
use thiserror::Error;

use crate::error::Error;
use crate::namespace::is_namespace;
use crate::types::*;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("expected an attribute name at position {0}")]
    ExpectedAttribute(usize),
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("invalid escape sequence at position {0}")]
    InvalidEscape(usize),
    #[error("invalid number at position {0}")]
    InvalidNumber(usize),
    #[error("unclosed string starting at position {0}")]
    UnclosedString(usize),
    #[error("unrecognized operator '{0}' at position {1}")]
    UnknownOperator(String, usize),
    #[error("expected a comparison value at position {0}")]
    ExpectedValue(usize),
}

/// Path and filter parser.
pub struct PathParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> PathParser<'a> {
    /// Parse an attribute path expression.
    ///
    /// Blank input yields the root path.
    pub fn parse(input: &'a str) -> Result<Path, Error> {
        Self::parse_path(input).map_err(|reason| Error::PathSyntax {
            text: input.to_string(),
            reason,
        })
    }

    /// Parse a filter expression.
    pub fn parse_filter(input: &'a str) -> Result<Filter, Error> {
        let mut parser = Self { input, pos: 0 };
        parser
            .parse_whole_filter()
            .map_err(|reason| Error::PathSyntax { text: input.to_string(), reason })
    }

    fn parse_path(input: &str) -> Result<Path, ParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Path::root());
        }

        let mut path = Path::root();
        let mut start = 0;
        if is_namespace(trimmed) {
            // The namespace runs up to the last ':' ahead of any value filter,
            // so URNs carrying versions like `2.0` stay intact.
            let head = match trimmed.find('[') {
                Some(bracket) => &trimmed[..bracket],
                None => trimmed,
            };
            let colon = head.rfind(':').ok_or(ParseError::UnexpectedEnd)?;
            path = Path::namespaced(&trimmed[..colon]);
            start = colon + 1;
            if start == trimmed.len() {
                return Ok(path);
            }
        }

        let mut parser = PathParser { input: trimmed, pos: start };
        parser.parse_elements(&mut path)?;
        Ok(path)
    }

    fn parse_elements(&mut self, path: &mut Path) -> Result<(), ParseError> {
        loop {
            let attribute = self.parse_attribute_name()?;

            let filter = if self.peek() == Some('[') {
                self.advance();
                let filter = self.parse_filter_expression()?;
                self.skip_whitespace();
                self.expect(']')?;
                Some(filter)
            } else {
                None
            };
            path.push(PathElement::new(attribute, filter));

            match self.peek() {
                None => return Ok(()),
                Some('.') => {
                    self.advance();
                    if self.is_at_end() {
                        return Err(ParseError::UnexpectedEnd);
                    }
                }
                Some(c) => return Err(ParseError::UnexpectedChar(c, self.pos)),
            }
        }
    }

    fn parse_attribute_name(&mut self) -> Result<String, ParseError> {
        let start = self.pos;

        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '$') {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start {
            return match self.peek() {
                Some('.') | None => Err(ParseError::ExpectedAttribute(start)),
                Some(c) => Err(ParseError::UnexpectedChar(c, start)),
            };
        }

        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_whole_filter(&mut self) -> Result<Filter, ParseError> {
        let filter = self.parse_filter_expression()?;
        self.skip_whitespace();
        match self.peek() {
            None => Ok(filter),
            Some(c) => Err(ParseError::UnexpectedChar(c, self.pos)),
        }
    }

    fn parse_filter_expression(&mut self) -> Result<Filter, ParseError> {
        self.parse_or_expression()
    }

    fn parse_or_expression(&mut self) -> Result<Filter, ParseError> {
        let mut left = self.parse_and_expression()?;
        self.skip_whitespace();

        while self.peek_keyword("or") {
            self.advance_by(2);
            let right = self.parse_and_expression()?;
            left = Filter::Or(Box::new(left), Box::new(right));
            self.skip_whitespace();
        }

        Ok(left)
    }

    fn parse_and_expression(&mut self) -> Result<Filter, ParseError> {
        let mut left = self.parse_unary_expression()?;
        self.skip_whitespace();

        while self.peek_keyword("and") {
            self.advance_by(3);
            let right = self.parse_unary_expression()?;
            left = Filter::And(Box::new(left), Box::new(right));
            self.skip_whitespace();
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> Result<Filter, ParseError> {
        self.skip_whitespace();

        if self.peek_keyword("not") {
            self.advance_by(3);
            self.skip_whitespace();
            self.expect('(')?;
            let expr = self.parse_filter_expression()?;
            self.skip_whitespace();
            self.expect(')')?;
            return Ok(Filter::Not(Box::new(expr)));
        }

        if self.peek() == Some('(') {
            self.advance();
            let expr = self.parse_filter_expression()?;
            self.skip_whitespace();
            self.expect(')')?;
            return Ok(expr);
        }

        self.parse_attribute_expression()
    }

    fn parse_attribute_expression(&mut self) -> Result<Filter, ParseError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '$' | '.' | ':') {
                self.advance();
            } else {
                break;
            }
        }
        if self.pos == start {
            return match self.peek() {
                None => Err(ParseError::UnexpectedEnd),
                Some(_) => Err(ParseError::ExpectedAttribute(start)),
            };
        }

        let path = Self::parse_path(&self.input[start..self.pos])?;
        if path.is_empty() {
            return Err(ParseError::ExpectedAttribute(start));
        }

        if self.peek() == Some('[') {
            self.advance();
            let filter = self.parse_filter_expression()?;
            self.skip_whitespace();
            self.expect(']')?;
            return Ok(Filter::Complex { path, filter: Box::new(filter) });
        }

        self.skip_whitespace();
        let op_start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
            self.advance();
        }
        let keyword = &self.input[op_start..self.pos];
        if keyword.is_empty() {
            return match self.peek() {
                None => Err(ParseError::UnexpectedEnd),
                Some(c) => Err(ParseError::UnexpectedChar(c, op_start)),
            };
        }
        if keyword.eq_ignore_ascii_case("pr") {
            return Ok(Filter::Present(path));
        }
        let op = CompareOp::from_keyword(keyword)
            .ok_or_else(|| ParseError::UnknownOperator(keyword.to_string(), op_start))?;

        self.skip_whitespace();
        let value = self.parse_literal()?;
        Ok(Filter::Compare { op, path, value })
    }

    fn parse_literal(&mut self) -> Result<Value, ParseError> {
        match self.peek() {
            None => Err(ParseError::ExpectedValue(self.pos)),
            Some('"') => Ok(Value::String(self.parse_string()?)),
            Some('-') | Some('0'..='9') => self.parse_number(),
            Some(_) if self.peek_keyword("true") => {
                self.advance_by(4);
                Ok(Value::Bool(true))
            }
            Some(_) if self.peek_keyword("false") => {
                self.advance_by(5);
                Ok(Value::Bool(false))
            }
            Some(_) if self.peek_keyword("null") => {
                self.advance_by(4);
                Ok(Value::Null)
            }
            Some(c) => Err(ParseError::UnexpectedChar(c, self.pos)),
        }
    }

    fn parse_number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        while matches!(self.peek(), Some('0'..='9' | '-' | '+' | '.' | 'e' | 'E')) {
            self.advance();
        }

        // Integers stay integers, so `42` compares against `42` exactly.
        match serde_json::from_str::<Value>(&self.input[start..self.pos]) {
            Ok(number @ Value::Number(_)) => Ok(number),
            _ => Err(ParseError::InvalidNumber(start)),
        }
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        self.advance();

        let mut result = String::new();

        loop {
            match self.peek() {
                None => return Err(ParseError::UnclosedString(start)),
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    let escape = self.pos;
                    self.advance();
                    match self.peek() {
                        Some('"') => result.push('"'),
                        Some('\\') => result.push('\\'),
                        Some('/') => result.push('/'),
                        Some('b') => result.push('\u{8}'),
                        Some('f') => result.push('\u{c}'),
                        Some('n') => result.push('\n'),
                        Some('r') => result.push('\r'),
                        Some('t') => result.push('\t'),
                        Some('u') => {
                            self.advance();
                            result.push(self.parse_unicode_escape(escape)?);
                            continue;
                        }
                        _ => return Err(ParseError::InvalidEscape(escape)),
                    }
                    self.advance();
                }
                Some(c) => {
                    result.push(c);
                    self.advance();
                }
            }
        }

        Ok(result)
    }

    /// Decode the hex digits following `\u`, joining surrogate pairs.
    fn parse_unicode_escape(&mut self, escape: usize) -> Result<char, ParseError> {
        let high = self.parse_hex4().ok_or(ParseError::InvalidEscape(escape))?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high).ok_or(ParseError::InvalidEscape(escape));
        }
        if !self.peek_str("\\u") {
            return Err(ParseError::InvalidEscape(escape));
        }
        self.advance_by(2);
        let low = self.parse_hex4().ok_or(ParseError::InvalidEscape(escape))?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(ParseError::InvalidEscape(escape));
        }
        char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
            .ok_or(ParseError::InvalidEscape(escape))
    }

    fn parse_hex4(&mut self) -> Option<u32> {
        let digits = self.input.get(self.pos..self.pos + 4)?;
        let code = u32::from_str_radix(digits, 16).ok()?;
        self.advance_by(4);
        Some(code)
    }

    /// Whether `keyword` (any case) follows, ending at a word boundary.
    fn peek_keyword(&self, keyword: &str) -> bool {
        let end = self.pos + keyword.len();
        let matches = self
            .input
            .get(self.pos..end)
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(keyword));
        matches
            && !self.input[end..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '$' | '.' | ':'))
    }

    fn peek_str(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.advance();
                Ok(())
            }
            Some(c) => Err(ParseError::UnexpectedChar(c, self.pos)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }
}
