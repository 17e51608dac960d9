//! Guard parser
//!
//! Recursive descent over the token stream, lowest precedence first:
//!
//! ```text
//! or         := and ('or' and)*
//! and        := not ('and' not)*
//! not        := 'not' not | comparison
//! comparison := operand (cmp operand | 'in' list | 'not' 'in' list)?
//! operand    := literal | identifier ('.' identifier)? | '(' or ')'
//! ```

use super::lexer::{tokenize, Token, TokenKind};
use super::{BoolOp, CmpOp, GuardError, GuardExpr, GuardVocabulary};
use crate::domain::value_objects::AttrValue;

/// Deepest allowed nesting of parentheses and `not`, combined.
pub const MAX_NESTING: usize = 64;

/// Parse and type-check one guard against the identifier whitelist.
pub fn parse_guard(source: &str, vocabulary: &GuardVocabulary) -> Result<GuardExpr, GuardError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(GuardError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        end: source.len(),
        depth: 0,
        vocabulary,
    };
    let expr = parser.parse_or()?;
    if let Some(token) = parser.peek() {
        return Err(parser.unexpected(token.clone()));
    }

    check_boolean(&expr)?;
    Ok(expr)
}

struct Parser<'v> {
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
    depth: usize,
    vocabulary: &'v GuardVocabulary,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn peek_kind_at(&self, ahead: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + ahead).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, GuardError> {
        match self.advance() {
            Some(token) if token.kind == kind => Ok(token),
            Some(token) => Err(GuardError::Syntax {
                offset: token.offset,
                message: format!("expected {}, found {}", what, token.kind.describe()),
            }),
            None => Err(self.end_of_input(what)),
        }
    }

    fn enter(&mut self, offset: usize) -> Result<(), GuardError> {
        if self.depth >= MAX_NESTING {
            return Err(GuardError::Disallowed {
                offset,
                construct: "nesting deeper than 64 levels",
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn end_of_input(&self, what: &str) -> GuardError {
        GuardError::Syntax {
            offset: self.end,
            message: format!("expected {}, found end of expression", what),
        }
    }

    fn unexpected(&self, token: Token) -> GuardError {
        match token.kind {
            TokenKind::Assign => GuardError::Disallowed {
                offset: token.offset,
                construct: "assignment",
            },
            TokenKind::LParen => GuardError::Disallowed {
                offset: token.offset,
                construct: "function call",
            },
            TokenKind::Dot => GuardError::Disallowed {
                offset: token.offset,
                construct: "attribute access",
            },
            TokenKind::Cmp(_) => GuardError::Syntax {
                offset: token.offset,
                message: "chained comparison".to_string(),
            },
            other => GuardError::Syntax {
                offset: token.offset,
                message: format!("unexpected {}", other.describe()),
            },
        }
    }

    fn parse_or(&mut self) -> Result<GuardExpr, GuardError> {
        let mut operands = vec![self.parse_and()?];
        while self.peek_kind() == Some(&TokenKind::Or) {
            self.advance();
            operands.push(self.parse_and()?);
        }
        Ok(join(BoolOp::Or, operands))
    }

    fn parse_and(&mut self) -> Result<GuardExpr, GuardError> {
        let mut operands = vec![self.parse_not()?];
        while self.peek_kind() == Some(&TokenKind::And) {
            self.advance();
            operands.push(self.parse_not()?);
        }
        Ok(join(BoolOp::And, operands))
    }

    fn parse_not(&mut self) -> Result<GuardExpr, GuardError> {
        if let Some(Token {
            kind: TokenKind::Not,
            offset,
        }) = self.peek()
        {
            let offset = *offset;
            self.advance();
            self.enter(offset)?;
            let operand = self.parse_not()?;
            self.leave();
            return Ok(GuardExpr::Boolean {
                op: BoolOp::Not,
                operands: vec![operand],
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<GuardExpr, GuardError> {
        let left = self.parse_operand()?;

        let op = match self.peek_kind() {
            Some(TokenKind::Cmp(op)) => *op,
            Some(TokenKind::In) => CmpOp::In,
            Some(TokenKind::Not) if self.peek_kind_at(1) == Some(&TokenKind::In) => {
                self.advance();
                CmpOp::NotIn
            }
            _ => return Ok(left),
        };
        self.advance();

        let right = if op.is_membership() {
            self.parse_list()?
        } else {
            self.parse_operand()?
        };

        Ok(GuardExpr::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_operand(&mut self) -> Result<GuardExpr, GuardError> {
        let token = self
            .advance()
            .ok_or_else(|| self.end_of_input("an operand"))?;

        match token.kind {
            TokenKind::LParen => {
                self.enter(token.offset)?;
                let inner = self.parse_or()?;
                self.expect(TokenKind::RParen, "')'")?;
                self.leave();
                Ok(inner)
            }
            TokenKind::Ident(name) => self.parse_identifier(name, token.offset),
            TokenKind::LBracket => Err(GuardError::Syntax {
                offset: token.offset,
                message: "list literal is only allowed after 'in'".to_string(),
            }),
            kind => match literal_value(&kind) {
                Some(value) => Ok(GuardExpr::Literal(value)),
                None => Err(self.unexpected(Token {
                    kind,
                    offset: token.offset,
                })),
            },
        }
    }

    fn parse_identifier(&mut self, root: String, offset: usize) -> Result<GuardExpr, GuardError> {
        let mut path = root;

        if self.peek_kind() == Some(&TokenKind::Dot) {
            self.advance();
            match self.advance() {
                Some(Token {
                    kind: TokenKind::Ident(member),
                    ..
                }) => {
                    path.push('.');
                    path.push_str(&member);
                }
                Some(other) => {
                    return Err(GuardError::Syntax {
                        offset: other.offset,
                        message: format!("expected member name, found {}", other.kind.describe()),
                    })
                }
                None => return Err(self.end_of_input("a member name")),
            }
        }

        match self.peek() {
            Some(Token {
                kind: TokenKind::Dot,
                offset,
            }) => {
                return Err(GuardError::Disallowed {
                    offset: *offset,
                    construct: "attribute access deeper than one level",
                })
            }
            Some(Token {
                kind: TokenKind::LParen,
                ..
            }) => {
                return Err(GuardError::Disallowed {
                    offset,
                    construct: "function call",
                })
            }
            _ => {}
        }

        if !self.vocabulary.allows(&path) {
            return Err(GuardError::UnknownIdentifier(path));
        }
        Ok(GuardExpr::Identifier(path))
    }

    fn parse_list(&mut self) -> Result<GuardExpr, GuardError> {
        self.expect(TokenKind::LBracket, "'[' after 'in'")?;
        let mut items = Vec::new();
        loop {
            if self.peek_kind() == Some(&TokenKind::RBracket) {
                self.advance();
                return Ok(GuardExpr::List(items));
            }
            let token = self
                .advance()
                .ok_or_else(|| self.end_of_input("a list element or ']'"))?;
            match literal_value(&token.kind) {
                Some(value) => items.push(value),
                None => {
                    return Err(GuardError::Syntax {
                        offset: token.offset,
                        message: format!(
                            "list elements must be literals, found {}",
                            token.kind.describe()
                        ),
                    })
                }
            }
            match self.peek_kind() {
                Some(TokenKind::Comma) => {
                    self.advance();
                }
                Some(TokenKind::RBracket) => {}
                Some(_) => {
                    let token = self.advance().map(|t| t.offset).unwrap_or(self.end);
                    return Err(GuardError::Syntax {
                        offset: token,
                        message: "expected ',' or ']' in list".to_string(),
                    });
                }
                None => return Err(self.end_of_input("']'")),
            }
        }
    }
}

fn literal_value(kind: &TokenKind) -> Option<AttrValue> {
    match kind {
        TokenKind::Str(s) => Some(AttrValue::Text(s.clone())),
        TokenKind::Num(n) => Some(AttrValue::Number(*n)),
        TokenKind::True => Some(AttrValue::Bool(true)),
        TokenKind::False => Some(AttrValue::Bool(false)),
        TokenKind::Null => Some(AttrValue::Null),
        _ => None,
    }
}

/// Build an n-ary node, flattening nested nodes of the same operator.
fn join(op: BoolOp, mut operands: Vec<GuardExpr>) -> GuardExpr {
    if operands.len() == 1 {
        if let Some(only) = operands.pop() {
            return only;
        }
    }
    let mut flat = Vec::with_capacity(operands.len());
    for operand in operands {
        match operand {
            GuardExpr::Boolean {
                op: inner,
                operands: nested,
            } if inner == op => flat.extend(nested),
            other => flat.push(other),
        }
    }
    GuardExpr::Boolean { op, operands: flat }
}

/// The whole guard, and every boolean operand, must be boolean-valued.
fn check_boolean(expr: &GuardExpr) -> Result<(), GuardError> {
    match expr {
        GuardExpr::Boolean { operands, .. } => operands.iter().try_for_each(check_boolean),
        GuardExpr::Comparison { op, left, right } => check_comparison(*op, left, right),
        GuardExpr::Identifier(_) | GuardExpr::Literal(AttrValue::Bool(_)) => Ok(()),
        GuardExpr::Literal(value) => Err(GuardError::Type(format!(
            "expected a boolean expression, found {} literal {}",
            value.kind(),
            value
        ))),
        GuardExpr::List(_) => Err(GuardError::Type(
            "expected a boolean expression, found list literal".to_string(),
        )),
    }
}

fn check_comparison(op: CmpOp, left: &GuardExpr, right: &GuardExpr) -> Result<(), GuardError> {
    for side in [left, right] {
        if matches!(side, GuardExpr::Comparison { .. } | GuardExpr::Boolean { .. }) {
            return Err(GuardError::Type(format!(
                "operands of '{}' must be identifiers or literals",
                op.as_str()
            )));
        }
        if op.is_ordering() {
            if let GuardExpr::Literal(value @ (AttrValue::Bool(_) | AttrValue::Null)) = side {
                return Err(GuardError::Type(format!(
                    "'{}' cannot order {} literal {}",
                    op.as_str(),
                    value.kind(),
                    value
                )));
            }
        }
    }
    Ok(())
}
