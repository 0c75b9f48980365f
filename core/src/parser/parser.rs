//! Recursive-descent parser.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expression := logicalOr ( '=' logicalOr | '?:' expression | '?' expression ':' expression )?
//! logicalOr  := logicalAnd ( '||' logicalAnd )*
//! logicalAnd := relational ( '&&' relational )*
//! relational := sum ( relOp sum )?
//! sum        := product ( ('+'|'-') product )*
//! product    := power ( ('*'|'/'|'%') product )?
//! power      := unary ( '^' unary )?
//! unary      := ('+'|'-'|'!') unary | primary
//! primary    := startNode navSuffix*
//! ```
//!
//! Every rule returns `Ok(None)` when no expression starts at the current
//! token; callers that need an operand turn that into an error with
//! [`Parser::required`].

use tracing::debug;

use super::{
    ParseError, ParseErrorKind, Span, Token, TokenKind, Tokenizer,
    ast::{ArithmeticOp, ComparisonOp, Literal, LogicalOp, Node, NodeKind, SelectionMode, UnaryOp},
};
use crate::api::ParseOptions;

type ParseResult<T> = Result<T, ParseError>;

/// Remaining stack below which a nested rule moves to a fresh segment.
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 2 * 1024 * 1024;

/// Parse `source` with default options.
pub fn parse(source: &str) -> Result<Node, ParseError> {
    parse_with_options(source, &ParseOptions::default())
}

pub fn parse_with_options(source: &str, options: &ParseOptions) -> Result<Node, ParseError> {
    debug!(source, "parsing expression");
    if source.trim_matches([' ', '\t', '\r', '\n']).is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::EmptySource,
            Span::new(0, source.len()),
        ));
    }

    let mut parser = Parser::new(source, options);
    let root = match parser.expression()? {
        Some(root) => root,
        None => {
            let token = parser.tokens.peek()?;
            return Err(parser.no_expression(token, "an expression"));
        }
    };

    if options.require_end {
        let token = parser.tokens.peek()?;
        if token.kind != TokenKind::End {
            return Err(ParseError::new(
                ParseErrorKind::TrailingInput { found: token.kind },
                token.span(),
            ));
        }
    }

    debug!(span = %root.span, "parsed expression");
    Ok(root)
}

pub struct Parser<'s> {
    source: &'s str,
    tokens: Tokenizer<'s>,
    max_depth: usize,
    depth: usize,
}

impl<'s> Parser<'s> {
    pub fn new(source: &'s str, options: &ParseOptions) -> Self {
        Self {
            source,
            tokens: Tokenizer::new(source),
            max_depth: options.max_depth,
            depth: 0,
        }
    }

    pub fn expression(&mut self) -> ParseResult<Option<Node>> {
        let token = self.tokens.peek()?;
        self.nested(token, Self::expression_inner)
    }

    fn expression_inner(&mut self) -> ParseResult<Option<Node>> {
        let left = self.logical_or()?;
        let op = self.tokens.peek()?;
        if !matches!(
            op.kind,
            TokenKind::Assign | TokenKind::Elvis | TokenKind::QMark
        ) {
            return Ok(left);
        }

        let Some(left) = left else {
            // No left operand: yield a null literal just before the operator
            // and leave the operator for the caller.
            let span = Span::new(op.start.saturating_sub(1), op.end.saturating_sub(1));
            return Ok(Some(Node::new(NodeKind::Literal(Literal::Null), span)));
        };
        self.tokens.next()?;

        let node = match op.kind {
            TokenKind::Assign => {
                let value = self.required(Self::logical_or, op)?;
                binary(left, value, |target, value| NodeKind::Assign { target, value })
            }
            TokenKind::Elvis => {
                let fallback = self.required(Self::expression, op)?;
                binary(left, fallback, |value, fallback| NodeKind::Elvis {
                    value,
                    fallback,
                })
            }
            _ => {
                let then_branch = self.required(Self::expression, op)?;
                let colon = self.expect(TokenKind::Colon, None)?;
                let else_branch = self.required(Self::expression, colon)?;
                let span = Span::combine(&left.span, &else_branch.span);
                Node::new(
                    NodeKind::Ternary {
                        condition: Box::new(left),
                        then_branch: Box::new(then_branch),
                        else_branch: Box::new(else_branch),
                    },
                    span,
                )
            }
        };
        Ok(Some(node))
    }

    fn logical_or(&mut self) -> ParseResult<Option<Node>> {
        self.logical_chain(TokenKind::Or, LogicalOp::Or, Self::logical_and)
    }

    fn logical_and(&mut self) -> ParseResult<Option<Node>> {
        self.logical_chain(TokenKind::And, LogicalOp::And, Self::relational)
    }

    fn logical_chain(
        &mut self,
        token_kind: TokenKind,
        op: LogicalOp,
        operand: fn(&mut Self) -> ParseResult<Option<Node>>,
    ) -> ParseResult<Option<Node>> {
        self.chain(|p| {
            let mut left = operand(p)?;
            loop {
                let token = p.tokens.peek()?;
                if token.kind != token_kind {
                    return Ok(left);
                }
                let lhs = p.take_left(left, token)?;
                p.descend(token)?;
                p.tokens.next()?;
                let rhs = p.required(operand, token)?;
                left = Some(binary(lhs, rhs, |left, right| NodeKind::Logical {
                    op,
                    left,
                    right,
                }));
            }
        })
    }

    /// At most one comparison; `a < b < c` stops after `a < b`.
    fn relational(&mut self) -> ParseResult<Option<Node>> {
        let left = self.sum()?;
        let token = self.tokens.peek()?;
        let op = match token.kind {
            TokenKind::Gt => ComparisonOp::Gt,
            TokenKind::Ge => ComparisonOp::Ge,
            TokenKind::Lt => ComparisonOp::Lt,
            TokenKind::Le => ComparisonOp::Le,
            TokenKind::Eq => ComparisonOp::Eq,
            TokenKind::Ne => ComparisonOp::Ne,
            _ => return Ok(left),
        };
        let left = self.take_left(left, token)?;
        self.tokens.next()?;
        let right = self.required(Self::sum, token)?;
        Ok(Some(binary(left, right, |left, right| {
            NodeKind::Comparison { op, left, right }
        })))
    }

    fn sum(&mut self) -> ParseResult<Option<Node>> {
        self.chain(|p| {
            let mut left = p.product()?;
            loop {
                let token = p.tokens.peek()?;
                let op = match token.kind {
                    TokenKind::Plus => ArithmeticOp::Add,
                    TokenKind::Minus => ArithmeticOp::Sub,
                    _ => return Ok(left),
                };
                let lhs = p.take_left(left, token)?;
                p.descend(token)?;
                p.tokens.next()?;
                let rhs = p.required(Self::product, token)?;
                left = Some(arithmetic(op, lhs, rhs));
            }
        })
    }

    /// Right-recursive: `a * b / c` is `a * (b / c)`.
    fn product(&mut self) -> ParseResult<Option<Node>> {
        let left = self.power()?;
        let token = self.tokens.peek()?;
        let op = match token.kind {
            TokenKind::Star => ArithmeticOp::Mul,
            TokenKind::Div => ArithmeticOp::Div,
            TokenKind::Mod => ArithmeticOp::Mod,
            _ => return Ok(left),
        };
        let left = self.take_left(left, token)?;
        self.tokens.next()?;
        let right = self.nested(token, |p| p.required(Self::product, token))?;
        Ok(Some(arithmetic(op, left, right)))
    }

    fn power(&mut self) -> ParseResult<Option<Node>> {
        let left = self.unary()?;
        let token = self.tokens.peek()?;
        if token.kind != TokenKind::Power {
            return Ok(left);
        }
        let left = self.take_left(left, token)?;
        self.tokens.next()?;
        let right = self.required(Self::unary, token)?;
        Ok(Some(arithmetic(ArithmeticOp::Pow, left, right)))
    }

    fn unary(&mut self) -> ParseResult<Option<Node>> {
        let token = self.tokens.peek()?;
        let op = match token.kind {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Minus,
            TokenKind::Not => UnaryOp::Not,
            _ => return self.primary(),
        };
        self.tokens.next()?;
        let operand = self.nested(token, |p| p.required(Self::unary, token))?;
        let span = Span::new(token.start, operand.span.end());
        Ok(Some(Node::new(
            NodeKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )))
    }

    /// A start node followed by navigation suffixes, wrapped in a compound
    /// node only when at least one suffix is present.
    fn primary(&mut self) -> ParseResult<Option<Node>> {
        let Some(start) = self.start_node()? else {
            return Ok(None);
        };
        let mut nodes = vec![start];
        while let Some(suffix) = self.nav_suffix()? {
            nodes.push(suffix);
        }
        if nodes.len() == 1 {
            return Ok(nodes.pop());
        }
        let span = Span::combine(&nodes[0].span, &nodes[nodes.len() - 1].span);
        Ok(Some(Node::new(NodeKind::Compound(nodes), span)))
    }

    fn start_node(&mut self) -> ParseResult<Option<Node>> {
        let token = self.tokens.peek()?;
        let node = match token.kind {
            kind if kind.is_literal() => self.literal(token)?,
            TokenKind::LParen => {
                self.tokens.next()?;
                let inner = self.required(Self::expression, token)?;
                let close = self.expect(TokenKind::RParen, Some(token))?;
                // Parenthesized nodes keep their own kind; only the span widens.
                Node::new(inner.kind, Span::new(token.start, close.end))
            }
            TokenKind::Hash => {
                self.tokens.next()?;
                let name = self.expect(TokenKind::Identifier, None)?;
                let name_text = name.text(self.source).to_string();
                match self.arguments()? {
                    Some((args, end)) => Node::new(
                        NodeKind::FunctionCall {
                            name: name_text,
                            args,
                        },
                        Span::new(token.start, end),
                    ),
                    None => Node::new(
                        NodeKind::Variable(name_text),
                        Span::new(token.start, name.end),
                    ),
                }
            }
            TokenKind::Identifier => self.method_or_property(false)?,
            TokenKind::Project => self.projection(false)?,
            TokenKind::FlatProject => self.flat(false)?,
            TokenKind::Select | TokenKind::SelectFirst | TokenKind::SelectLast => {
                self.selection(false)?
            }
            TokenKind::LSquare => self.indexer()?,
            TokenKind::LCurly => self.inline()?,
            _ => return Ok(None),
        };
        Ok(Some(node))
    }

    fn nav_suffix(&mut self) -> ParseResult<Option<Node>> {
        let token = self.tokens.peek()?;
        match token.kind {
            TokenKind::Dot | TokenKind::SafeNavi => {
                self.tokens.next()?;
                let null_safe = token.kind == TokenKind::SafeNavi;
                let next = self.tokens.peek()?;
                let node = match next.kind {
                    TokenKind::Identifier => self.method_or_property(null_safe)?,
                    TokenKind::Project => self.projection(null_safe)?,
                    TokenKind::FlatProject => self.flat(null_safe)?,
                    TokenKind::Select | TokenKind::SelectFirst | TokenKind::SelectLast => {
                        self.selection(null_safe)?
                    }
                    TokenKind::End => {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedEnd {
                                expected: "a property, method, projection or selection",
                            },
                            next.span(),
                        ));
                    }
                    found => {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedToken {
                                expected: TokenKind::Identifier,
                                found,
                            },
                            next.span(),
                        ));
                    }
                };
                Ok(Some(node))
            }
            TokenKind::LSquare => self.indexer().map(Some),
            _ => Ok(None),
        }
    }

    fn literal(&mut self, token: Token) -> ParseResult<Node> {
        self.tokens.next()?;
        let text = token.text(self.source);
        let literal = match token.kind {
            TokenKind::LiteralNull => Literal::Null,
            TokenKind::LiteralBool => Literal::Bool(text == "true"),
            TokenKind::LiteralInt => Literal::Int(parse_int(text, token)?),
            TokenKind::LiteralFloat => Literal::Float(parse_float(text, token)?),
            // Quotes are single bytes, so slicing them off stays on char boundaries.
            _ => Literal::Str(text[1..text.len() - 1].to_string()),
        };
        Ok(Node::new(NodeKind::Literal(literal), token.span()))
    }

    /// `name` or `name(args)`; the call form is chosen only by an immediately
    /// following `(`.
    fn method_or_property(&mut self, null_safe: bool) -> ParseResult<Node> {
        let token = self.tokens.next()?;
        let name = token.text(self.source).to_string();
        match self.arguments()? {
            Some((args, end)) => Ok(Node::new(
                NodeKind::MethodCall {
                    name,
                    args,
                    null_safe,
                },
                Span::new(token.start, end),
            )),
            None => Ok(Node::new(
                NodeKind::Property { name, null_safe },
                token.span(),
            )),
        }
    }

    /// Parenthesized argument list, if one follows. A trailing comma is
    /// accepted. Returns the arguments and the end offset of `)`.
    fn arguments(&mut self) -> ParseResult<Option<(Vec<Node>, usize)>> {
        let open = self.tokens.peek()?;
        if open.kind != TokenKind::LParen {
            return Ok(None);
        }

        let mut args = Vec::new();
        loop {
            let separator = self.tokens.next()?;
            let token = self.tokens.peek()?;
            match token.kind {
                TokenKind::End => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnclosedDelimiter {
                            delimiter: TokenKind::RParen,
                            opened: open.span(),
                        },
                        token.span(),
                    ));
                }
                TokenKind::RParen => break,
                _ => args.push(self.required(Self::expression, separator)?),
            }
            if self.tokens.peek()?.kind != TokenKind::Comma {
                break;
            }
        }
        let close = self.expect(TokenKind::RParen, Some(open))?;
        Ok(Some((args, close.end)))
    }

    fn projection(&mut self, null_safe: bool) -> ParseResult<Node> {
        let (expr, span) = self.bracketed()?;
        Ok(Node::new(NodeKind::Projection { expr, null_safe }, span))
    }

    fn flat(&mut self, null_safe: bool) -> ParseResult<Node> {
        let (expr, span) = self.bracketed()?;
        Ok(Node::new(NodeKind::Flat { expr, null_safe }, span))
    }

    fn selection(&mut self, null_safe: bool) -> ParseResult<Node> {
        let mode = match self.tokens.peek()?.kind {
            TokenKind::SelectFirst => SelectionMode::First,
            TokenKind::SelectLast => SelectionMode::Last,
            _ => SelectionMode::All,
        };
        let (predicate, span) = self.bracketed()?;
        Ok(Node::new(
            NodeKind::Selection {
                mode,
                predicate,
                null_safe,
            },
            span,
        ))
    }

    fn indexer(&mut self) -> ParseResult<Node> {
        let (index, span) = self.bracketed()?;
        Ok(Node::new(NodeKind::Indexer { index }, span))
    }

    /// Consume an opening bracket token, an expression and `]`.
    fn bracketed(&mut self) -> ParseResult<(Box<Node>, Span)> {
        let open = self.tokens.next()?;
        let expr = self.required(Self::expression, open)?;
        let close = self.expect(TokenKind::RSquare, Some(open))?;
        Ok((Box::new(expr), Span::new(open.start, close.end)))
    }

    /// `{}` and `{a, b}` are lists, `{:}` and `{k: v, ...}` are maps. A `:`
    /// after the first element switches to map parsing.
    fn inline(&mut self) -> ParseResult<Node> {
        let open = self.tokens.next()?;
        let token = self.tokens.peek()?;
        match token.kind {
            TokenKind::RCurly => {
                self.tokens.next()?;
                return Ok(Node::new(
                    NodeKind::InlineList(Vec::new()),
                    Span::new(open.start, token.end),
                ));
            }
            TokenKind::Colon => {
                self.tokens.next()?;
                let close = self.expect(TokenKind::RCurly, Some(open))?;
                return Ok(Node::new(
                    NodeKind::InlineMap(Vec::new()),
                    Span::new(open.start, close.end),
                ));
            }
            _ => {}
        }

        let first = self.required(Self::expression, open)?;
        let token = self.tokens.peek()?;
        let kind = match token.kind {
            TokenKind::Colon => {
                self.tokens.next()?;
                let value = self.required(Self::expression, token)?;
                let mut entries = vec![(first, value)];
                while self.tokens.peek()?.kind == TokenKind::Comma {
                    let comma = self.tokens.next()?;
                    let key = self.required(Self::expression, comma)?;
                    let colon = self.expect(TokenKind::Colon, None)?;
                    let value = self.required(Self::expression, colon)?;
                    entries.push((key, value));
                }
                NodeKind::InlineMap(entries)
            }
            TokenKind::Comma | TokenKind::RCurly | TokenKind::End => {
                let mut elements = vec![first];
                while self.tokens.peek()?.kind == TokenKind::Comma {
                    let comma = self.tokens.next()?;
                    elements.push(self.required(Self::expression, comma)?);
                }
                NodeKind::InlineList(elements)
            }
            found => {
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedToken {
                        expected: TokenKind::RCurly,
                        found,
                    },
                    token.span(),
                ));
            }
        };
        let close = self.expect(TokenKind::RCurly, Some(open))?;
        Ok(Node::new(kind, Span::new(open.start, close.end)))
    }

    /// Consume a token of `kind`. Reaching the end while `opened` is set
    /// reports the unclosed opener.
    fn expect(&mut self, kind: TokenKind, opened: Option<Token>) -> ParseResult<Token> {
        let token = self.tokens.peek()?;
        if token.kind == kind {
            return self.tokens.next().map_err(ParseError::from);
        }
        let error_kind = match (token.kind, opened) {
            (TokenKind::End, Some(open)) => ParseErrorKind::UnclosedDelimiter {
                delimiter: kind,
                opened: open.span(),
            },
            (found, _) => ParseErrorKind::UnexpectedToken {
                expected: kind,
                found,
            },
        };
        Err(ParseError::new(error_kind, token.span()))
    }

    /// Run `rule` and fail if it finds no expression after `after`.
    fn required(
        &mut self,
        rule: impl FnOnce(&mut Self) -> ParseResult<Option<Node>>,
        after: Token,
    ) -> ParseResult<Node> {
        match rule(self)? {
            Some(node) => Ok(node),
            None => {
                let token = self.tokens.peek()?;
                let kind = match token.kind {
                    TokenKind::End => ParseErrorKind::UnexpectedEnd {
                        expected: "an expression",
                    },
                    found => ParseErrorKind::MissingOperand {
                        after: after.kind,
                        found,
                    },
                };
                Err(ParseError::new(kind, token.span()))
            }
        }
    }

    /// Left operand of a binary operator; its absence is an error.
    fn take_left(&self, left: Option<Node>, op: Token) -> ParseResult<Node> {
        left.ok_or_else(|| self.no_expression(op, "an expression"))
    }

    fn no_expression(&self, token: Token, expected: &'static str) -> ParseError {
        let kind = match token.kind {
            TokenKind::End => ParseErrorKind::UnexpectedEnd { expected },
            found => ParseErrorKind::ExpectedExpression { found },
        };
        ParseError::new(kind, token.span())
    }

    /// Run `rule` one nesting level deeper.
    fn nested<T>(
        &mut self,
        at: Token,
        rule: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        self.descend(at)?;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || rule(self));
        self.depth -= 1;
        result
    }

    /// Left-associative chain. Every link deepens the tree by one, so each
    /// one is charged with [`Parser::descend`] until the chain ends.
    fn chain<T>(&mut self, rule: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let depth = self.depth;
        let result = rule(self);
        self.depth = depth;
        result
    }

    fn descend(&mut self, at: Token) -> ParseResult<()> {
        if self.depth >= self.max_depth {
            return Err(ParseError::new(
                ParseErrorKind::MaxDepthExceeded {
                    max_depth: self.max_depth,
                },
                at.span(),
            ));
        }
        self.depth += 1;
        Ok(())
    }
}

fn binary(
    left: Node,
    right: Node,
    build: impl FnOnce(Box<Node>, Box<Node>) -> NodeKind,
) -> Node {
    let span = Span::combine(&left.span, &right.span);
    Node::new(build(Box::new(left), Box::new(right)), span)
}

fn arithmetic(op: ArithmeticOp, left: Node, right: Node) -> Node {
    binary(left, right, |left, right| NodeKind::Arithmetic {
        op,
        left,
        right,
    })
}

fn invalid_number(text: &str, token: Token) -> ParseError {
    ParseError::new(
        ParseErrorKind::InvalidNumber {
            text: text.to_string(),
        },
        token.span(),
    )
}

/// Decimal digits accumulated with wrapping arithmetic.
fn parse_int(text: &str, token: Token) -> ParseResult<i64> {
    text.bytes().try_fold(0i64, |value, byte| {
        if !byte.is_ascii_digit() {
            return Err(invalid_number(text, token));
        }
        Ok(value.wrapping_mul(10).wrapping_add(i64::from(byte - b'0')))
    })
}

/// Integer part accumulated directly, fractional digits each divided by a
/// growing power of ten.
fn parse_float(text: &str, token: Token) -> ParseResult<f64> {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    let mut value = 0.0f64;
    for byte in whole.bytes() {
        if !byte.is_ascii_digit() {
            return Err(invalid_number(text, token));
        }
        value = value * 10.0 + f64::from(byte - b'0');
    }
    let mut scale = 1.0f64;
    for byte in fraction.bytes() {
        if !byte.is_ascii_digit() {
            return Err(invalid_number(text, token));
        }
        scale *= 10.0;
        value += f64::from(byte - b'0') / scale;
    }
    if !value.is_finite() {
        return Err(invalid_number(text, token));
    }
    Ok(value)
}
