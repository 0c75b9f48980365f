//! Hand-written tokenizer with one token of lookahead.
//!
//! The tokenizer is pull-based: the parser calls [`Tokenizer::peek`] and
//! [`Tokenizer::next`], and each call scans at most one token. Once the input
//! is exhausted the END token is returned forever without advancing.

use thiserror::Error;

use super::{
    Span,
    token::{Token, TokenKind},
};

/// Fatal tokenization failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexicalError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("unterminated string literal starting at offset {offset}")]
    UnterminatedString { offset: usize },
}

impl LexicalError {
    pub fn span(&self) -> Span {
        match self {
            LexicalError::UnexpectedChar { ch, offset } => {
                Span::new(*offset, offset + ch.len_utf8())
            }
            LexicalError::UnterminatedString { offset } => Span::new(*offset, offset + 1),
        }
    }
}

pub struct Tokenizer<'s> {
    source: &'s str,
    bytes: &'s [u8],
    pos: usize,
    lookahead: Option<Token>,
}

impl<'s> Tokenizer<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            lookahead: None,
        }
    }

    /// Return the next token without consuming it.
    pub fn peek(&mut self) -> Result<Token, LexicalError> {
        match self.lookahead {
            Some(token) => Ok(token),
            None => {
                let token = self.scan()?;
                self.lookahead = Some(token);
                Ok(token)
            }
        }
    }

    /// Consume and return the next token. END is sticky.
    pub fn next(&mut self) -> Result<Token, LexicalError> {
        let token = self.peek()?;
        if token.kind != TokenKind::End {
            self.lookahead = None;
        }
        Ok(token)
    }

    fn scan(&mut self) -> Result<Token, LexicalError> {
        while let Some(&byte) = self.bytes.get(self.pos) {
            if is_blank(byte) {
                self.pos += 1;
                continue;
            }
            if byte.is_ascii_alphabetic() || byte == b'_' {
                return Ok(self.lex_identifier());
            }
            if byte.is_ascii_digit() {
                return Ok(self.lex_numeric_literal());
            }

            let second = self.byte_at(1);
            let (kind, width) = match byte {
                b'\'' | b'"' => return self.lex_string_literal(byte),
                b'(' => (TokenKind::LParen, 1),
                b')' => (TokenKind::RParen, 1),
                b'[' => (TokenKind::LSquare, 1),
                b']' => (TokenKind::RSquare, 1),
                b'{' => (TokenKind::LCurly, 1),
                b'}' => (TokenKind::RCurly, 1),
                b'+' => (TokenKind::Plus, 1),
                b'-' => (TokenKind::Minus, 1),
                b'*' => (TokenKind::Star, 1),
                b'/' => (TokenKind::Div, 1),
                b'%' => (TokenKind::Mod, 1),
                b':' => (TokenKind::Colon, 1),
                b'#' => (TokenKind::Hash, 1),
                b'.' => (TokenKind::Dot, 1),
                b',' => (TokenKind::Comma, 1),
                b'^' => match second {
                    Some(b'[') => (TokenKind::SelectFirst, 2),
                    _ => (TokenKind::Power, 1),
                },
                b'?' => match second {
                    Some(b'[') => (TokenKind::Select, 2),
                    Some(b':') => (TokenKind::Elvis, 2),
                    Some(b'.') => (TokenKind::SafeNavi, 2),
                    _ => (TokenKind::QMark, 1),
                },
                b'>' => match second {
                    Some(b'=') => (TokenKind::Ge, 2),
                    _ => (TokenKind::Gt, 1),
                },
                b'<' => match second {
                    Some(b'=') => (TokenKind::Le, 2),
                    _ => (TokenKind::Lt, 1),
                },
                b'=' => match second {
                    Some(b'=') => (TokenKind::Eq, 2),
                    _ => (TokenKind::Assign, 1),
                },
                b'!' => match (second, self.byte_at(2)) {
                    (Some(b'='), _) => (TokenKind::Ne, 2),
                    (Some(b'['), _) => (TokenKind::Project, 2),
                    (Some(b'!'), Some(b'[')) => (TokenKind::FlatProject, 3),
                    _ => (TokenKind::Not, 1),
                },
                b'|' if second == Some(b'|') => (TokenKind::Or, 2),
                b'&' if second == Some(b'&') => (TokenKind::And, 2),
                b'$' if second == Some(b'[') => (TokenKind::SelectLast, 2),
                _ => return Err(self.unexpected_char()),
            };
            return Ok(self.emit(kind, width));
        }

        let end = self.bytes.len();
        Ok(Token::new(TokenKind::End, end, end))
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn emit(&mut self, kind: TokenKind, width: usize) -> Token {
        let token = Token::new(kind, self.pos, self.pos + width);
        self.pos += width;
        token
    }

    fn lex_identifier(&mut self) -> Token {
        let start = self.pos;
        while self
            .byte_at(0)
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.pos += 1;
        }
        let kind = match &self.source[start..self.pos] {
            "true" | "false" => TokenKind::LiteralBool,
            "null" => TokenKind::LiteralNull,
            "not" => TokenKind::Not,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            _ => TokenKind::Identifier,
        };
        Token::new(kind, start, self.pos)
    }

    fn lex_numeric_literal(&mut self) -> Token {
        let start = self.pos;
        self.skip_alphanumeric();
        if self.byte_at(0) == Some(b'.') {
            self.pos += 1;
            self.skip_alphanumeric();
            Token::new(TokenKind::LiteralFloat, start, self.pos)
        } else {
            Token::new(TokenKind::LiteralInt, start, self.pos)
        }
    }

    fn skip_alphanumeric(&mut self) {
        while self.byte_at(0).is_some_and(|b| b.is_ascii_alphanumeric()) {
            self.pos += 1;
        }
    }

    fn lex_string_literal(&mut self, quote: u8) -> Result<Token, LexicalError> {
        let start = self.pos;
        let body = &self.bytes[start + 1..];
        match body.iter().position(|&b| b == quote) {
            Some(len) => {
                self.pos = start + 1 + len + 1;
                Ok(Token::new(TokenKind::LiteralString, start, self.pos))
            }
            None => Err(LexicalError::UnterminatedString { offset: start }),
        }
    }

    fn unexpected_char(&self) -> LexicalError {
        // `pos` always sits on a char boundary: only ASCII bytes and whole
        // string literals are ever skipped.
        let ch = self.source[self.pos..].chars().next().unwrap_or('\0');
        LexicalError::UnexpectedChar {
            ch,
            offset: self.pos,
        }
    }
}

fn is_blank(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}
