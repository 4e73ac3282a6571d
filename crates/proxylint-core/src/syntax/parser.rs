//! Recursive descent parser building the position-aware tree

use super::ast::{
    ArrayNode, AstNode, IdentifierNode, LiteralNode, LiteralValue, Loc, ObjectNode, PropertyNode,
    SyntaxNode,
};
use super::lexer::{Lexer, Token, TokenKind};
use crate::{ProxyLintError, Result};

/// Maximum nesting depth before the parser gives up
const MAX_DEPTH: usize = 256;

struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(src);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            depth: 0,
        })
    }

    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn unexpected(&self, expected: &str) -> ProxyLintError {
        ProxyLintError::parse_error(
            format!(
                "Expected {expected}, found {}",
                self.current.kind.describe()
            ),
            self.current.start.line,
            self.current.start.column,
        )
    }

    fn raw(&self, token: &Token) -> String {
        self.lexer.source()[token.start.offset..token.end.offset].to_string()
    }

    fn parse_value(&mut self) -> Result<SyntaxNode> {
        match self.current.kind {
            TokenKind::LBrace => self.parse_object().map(SyntaxNode::Object),
            TokenKind::LBracket => self.parse_array().map(SyntaxNode::Array),
            TokenKind::String(_)
            | TokenKind::Number(_)
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null => {
                let token = self.advance()?;
                let raw = self.raw(&token);
                let value = match token.kind {
                    TokenKind::String(s) => LiteralValue::String(s),
                    TokenKind::Number(n) => LiteralValue::Number(n),
                    TokenKind::True => LiteralValue::Bool(true),
                    TokenKind::False => LiteralValue::Bool(false),
                    _ => LiteralValue::Null,
                };
                Ok(SyntaxNode::Literal(LiteralNode {
                    value,
                    raw,
                    loc: Loc::new(token.start, token.end),
                }))
            }
            _ => Err(self.unexpected("a value")),
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ProxyLintError::parse_error(
                "Document is nested too deeply",
                self.current.start.line,
                self.current.start.column,
            ));
        }
        Ok(())
    }

    fn parse_object(&mut self) -> Result<ObjectNode> {
        self.enter()?;
        let open = self.advance()?;
        let mut children = Vec::new();

        loop {
            if self.current.kind == TokenKind::RBrace {
                break;
            }

            let key_token = match self.current.kind {
                TokenKind::String(_) => self.advance()?,
                _ => return Err(self.unexpected("a property name")),
            };
            let raw = self.raw(&key_token);
            let TokenKind::String(key_value) = key_token.kind else {
                return Err(self.unexpected("a property name"));
            };
            let key = IdentifierNode {
                value: key_value,
                raw,
                loc: Loc::new(key_token.start, key_token.end),
            };

            if self.current.kind != TokenKind::Colon {
                return Err(self.unexpected("':'"));
            }
            self.advance()?;

            let value = self.parse_value()?;
            let loc = Loc::new(key.loc.start, value.loc().end);
            children.push(PropertyNode { key, value, loc });

            match self.current.kind {
                // Trailing commas are accepted (JSONC)
                TokenKind::Comma => {
                    self.advance()?;
                }
                TokenKind::RBrace => break,
                _ => return Err(self.unexpected("',' or '}'")),
            }
        }

        let close = self.advance()?;
        self.depth -= 1;
        Ok(ObjectNode {
            children,
            loc: Loc::new(open.start, close.end),
        })
    }

    fn parse_array(&mut self) -> Result<ArrayNode> {
        self.enter()?;
        let open = self.advance()?;
        let mut children = Vec::new();

        loop {
            if self.current.kind == TokenKind::RBracket {
                break;
            }
            children.push(self.parse_value()?);
            match self.current.kind {
                TokenKind::Comma => {
                    self.advance()?;
                }
                TokenKind::RBracket => break,
                _ => return Err(self.unexpected("',' or ']'")),
            }
        }

        let close = self.advance()?;
        self.depth -= 1;
        Ok(ArrayNode {
            children,
            loc: Loc::new(open.start, close.end),
        })
    }
}

/// Parse any JSON/JSONC value
pub fn parse_value(src: &str) -> Result<SyntaxNode> {
    let mut parser = Parser::new(src)?;
    let value = parser.parse_value()?;
    if parser.current.kind != TokenKind::Eof {
        return Err(parser.unexpected("end of input"));
    }
    Ok(value)
}

/// Parse a configuration document; the root must be an object
pub fn parse(src: &str) -> Result<ObjectNode> {
    match parse_value(src)? {
        SyntaxNode::Object(root) => Ok(root),
        SyntaxNode::Array(_) => Err(ProxyLintError::UnexpectedRoot {
            found: "array".to_string(),
        }),
        SyntaxNode::Literal(_) => Err(ProxyLintError::UnexpectedRoot {
            found: "literal".to_string(),
        }),
    }
}
