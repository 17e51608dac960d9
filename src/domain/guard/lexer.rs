//! Guard tokenizer

use super::{CmpOp, GuardError};
use crate::domain::value_objects::Number;

#[derive(Debug, Clone, PartialEq)]
pub(super) enum TokenKind {
    Ident(String),
    Str(String),
    Num(Number),
    True,
    False,
    Null,
    And,
    Or,
    Not,
    In,
    Cmp(CmpOp),
    Assign,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
}

impl TokenKind {
    pub(super) fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::Str(_) => "string literal".to_string(),
            TokenKind::Num(n) => format!("number {}", n),
            TokenKind::True => "'true'".to_string(),
            TokenKind::False => "'false'".to_string(),
            TokenKind::Null => "'null'".to_string(),
            TokenKind::And => "'and'".to_string(),
            TokenKind::Or => "'or'".to_string(),
            TokenKind::Not => "'not'".to_string(),
            TokenKind::In => "'in'".to_string(),
            TokenKind::Cmp(op) => format!("'{}'", op.as_str()),
            TokenKind::Assign => "'='".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Dot => "'.'".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

pub(super) fn tokenize(src: &str) -> Result<Vec<Token>, GuardError> {
    let chars: Vec<(usize, char)> = src.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];
        let next = chars.get(i + 1).map(|(_, c)| *c);

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let (kind, width) = match (c, next) {
            ('=', Some('=')) => (TokenKind::Cmp(CmpOp::Eq), 2),
            ('!', Some('=')) => (TokenKind::Cmp(CmpOp::Ne), 2),
            ('<', Some('=')) => (TokenKind::Cmp(CmpOp::Le), 2),
            ('>', Some('=')) => (TokenKind::Cmp(CmpOp::Ge), 2),
            ('&', Some('&')) => (TokenKind::And, 2),
            ('|', Some('|')) => (TokenKind::Or, 2),
            ('<', _) => (TokenKind::Cmp(CmpOp::Lt), 1),
            ('>', _) => (TokenKind::Cmp(CmpOp::Gt), 1),
            ('=', _) => (TokenKind::Assign, 1),
            ('(', _) => (TokenKind::LParen, 1),
            (')', _) => (TokenKind::RParen, 1),
            ('[', _) => (TokenKind::LBracket, 1),
            (']', _) => (TokenKind::RBracket, 1),
            (',', _) => (TokenKind::Comma, 1),
            ('.', Some(d)) if d.is_ascii_digit() => lex_number(&chars, i)?,
            ('.', _) => (TokenKind::Dot, 1),
            ('\'' | '"', _) => lex_string(&chars, i)?,
            ('-', Some(d)) if d.is_ascii_digit() => lex_number(&chars, i)?,
            (d, _) if d.is_ascii_digit() => lex_number(&chars, i)?,
            (a, _) if a.is_ascii_alphabetic() || a == '_' => lex_word(&chars, i),
            (other, _) => {
                return Err(GuardError::Syntax {
                    offset,
                    message: format!("unexpected character '{}'", other),
                })
            }
        };

        tokens.push(Token { kind, offset });
        i += width;
    }

    Ok(tokens)
}

fn lex_word(chars: &[(usize, char)], start: usize) -> (TokenKind, usize) {
    let word: String = chars[start..]
        .iter()
        .map(|(_, c)| *c)
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    let width = word.chars().count();
    let kind = match word.as_str() {
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "in" => TokenKind::In,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,
        _ => TokenKind::Ident(word),
    };
    (kind, width)
}

fn lex_number(chars: &[(usize, char)], start: usize) -> Result<(TokenKind, usize), GuardError> {
    let offset = chars[start].0;
    let mut raw = String::new();
    let mut seen_dot = false;
    for (idx, (_, c)) in chars[start..].iter().enumerate() {
        match c {
            '-' if idx == 0 => raw.push('-'),
            '.' if !seen_dot => {
                seen_dot = true;
                raw.push('.');
            }
            d if d.is_ascii_digit() => raw.push(*d),
            _ => break,
        }
    }
    let width = raw.chars().count();
    let number = raw.parse::<Number>().map_err(|_| GuardError::Syntax {
        offset,
        message: format!("invalid number '{}'", raw),
    })?;
    Ok((TokenKind::Num(number), width))
}

fn lex_string(chars: &[(usize, char)], start: usize) -> Result<(TokenKind, usize), GuardError> {
    let (offset, quote) = chars[start];
    let mut value = String::new();
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i].1;
        if c == quote {
            return Ok((TokenKind::Str(value), i - start + 1));
        }
        if c == '\\' {
            let escaped = chars.get(i + 1).map(|(_, c)| *c);
            match escaped {
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some(e @ ('\\' | '\'' | '"')) => value.push(e),
                Some(other) => {
                    return Err(GuardError::Syntax {
                        offset: chars[i].0,
                        message: format!("unknown escape '\\{}'", other),
                    })
                }
                None => break,
            }
            i += 2;
            continue;
        }
        value.push(c);
        i += 1;
    }
    Err(GuardError::Syntax {
        offset,
        message: "unterminated string literal".to_string(),
    })
}
