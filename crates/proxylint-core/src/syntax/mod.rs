//! JSON/JSONC syntax tree
//!
//! The linter never works on raw text directly: every operation parses the
//! document into a fresh [`ObjectNode`] root and walks it top-down. Nodes are
//! immutable and carry no back-references.

pub mod ast;
mod lexer;
mod parser;

pub use ast::{
    ArrayNode, AstNode, IdentifierNode, LiteralNode, LiteralValue, Loc, NodeKind, NodeRef,
    ObjectNode, Point, PropertyNode, SyntaxNode,
};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{parse, parse_value};
