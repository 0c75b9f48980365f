//! Token kinds produced by the tokenizer.

use core::fmt;

use super::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    LiteralNull,
    LiteralBool,
    LiteralInt,
    LiteralFloat,
    LiteralString,
    Identifier,
    LParen,
    RParen,
    LSquare,
    RSquare,
    LCurly,
    RCurly,
    Comma,
    Colon,
    Hash,
    Dot,
    Plus,
    Minus,
    Star,
    Power,
    Div,
    Mod,
    QMark,
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
    Not,
    And,
    Or,
    /// `?[`
    Select,
    /// `^[`
    SelectFirst,
    /// `$[`
    SelectLast,
    /// `![`
    Project,
    /// `!![`
    FlatProject,
    /// `?:`
    Elvis,
    /// `?.`
    SafeNavi,
    Assign,
    End,
}

impl TokenKind {
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::LiteralNull
                | TokenKind::LiteralBool
                | TokenKind::LiteralInt
                | TokenKind::LiteralFloat
                | TokenKind::LiteralString
        )
    }

    /// Spelling used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::LiteralNull => "null",
            TokenKind::LiteralBool => "boolean literal",
            TokenKind::LiteralInt => "integer literal",
            TokenKind::LiteralFloat => "float literal",
            TokenKind::LiteralString => "string literal",
            TokenKind::Identifier => "identifier",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LSquare => "'['",
            TokenKind::RSquare => "']'",
            TokenKind::LCurly => "'{'",
            TokenKind::RCurly => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::Hash => "'#'",
            TokenKind::Dot => "'.'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Power => "'^'",
            TokenKind::Div => "'/'",
            TokenKind::Mod => "'%'",
            TokenKind::QMark => "'?'",
            TokenKind::Gt => "'>'",
            TokenKind::Ge => "'>='",
            TokenKind::Lt => "'<'",
            TokenKind::Le => "'<='",
            TokenKind::Eq => "'=='",
            TokenKind::Ne => "'!='",
            TokenKind::Not => "'!'",
            TokenKind::And => "'&&'",
            TokenKind::Or => "'||'",
            TokenKind::Select => "'?['",
            TokenKind::SelectFirst => "'^['",
            TokenKind::SelectLast => "'$['",
            TokenKind::Project => "'!['",
            TokenKind::FlatProject => "'!!['",
            TokenKind::Elvis => "'?:'",
            TokenKind::SafeNavi => "'?.'",
            TokenKind::Assign => "'='",
            TokenKind::End => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A token positioned by byte offsets into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }
}
