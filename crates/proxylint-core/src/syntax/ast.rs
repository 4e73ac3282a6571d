//! Position-aware syntax tree for JSON/JSONC documents
//!
//! Every node carries a [`Loc`] whose points use 1-based lines and columns
//! (columns counted in UTF-16 code units). The end point is exclusive: it
//! points one past the last character of the node, so for a string literal
//! it sits just after the closing quote.

use std::fmt;

/// A point in the source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based, UTF-16 code units)
    pub column: u32,
    /// Byte offset into the source
    pub offset: usize,
}

impl Point {
    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// Source span of a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Loc {
    pub start: Point,
    pub end: Point,
}

impl Loc {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// Syntactic type of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Object,
    Array,
    Property,
    Literal,
    Identifier,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Object => "Object",
            NodeKind::Array => "Array",
            NodeKind::Property => "Property",
            NodeKind::Literal => "Literal",
            NodeKind::Identifier => "Identifier",
        };
        f.write_str(name)
    }
}

/// Decoded scalar value of a literal
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl LiteralValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LiteralValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// A JSON value node
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxNode {
    Object(ObjectNode),
    Array(ArrayNode),
    Literal(LiteralNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNode {
    /// Properties in document order
    pub children: Vec<PropertyNode>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNode {
    pub children: Vec<SyntaxNode>,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyNode {
    pub key: IdentifierNode,
    pub value: SyntaxNode,
    pub loc: Loc,
}

/// Property key. Keys are always identifiers, quotes included in `loc`.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierNode {
    pub value: String,
    pub raw: String,
    pub loc: Loc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralNode {
    pub value: LiteralValue,
    pub raw: String,
    pub loc: Loc,
}

/// Common accessors shared by every node type
pub trait AstNode {
    fn kind(&self) -> NodeKind;

    fn loc(&self) -> &Loc;

    /// True for literals whose decoded value is a string
    fn is_string_literal(&self) -> bool {
        false
    }
}

impl AstNode for ObjectNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Object
    }

    fn loc(&self) -> &Loc {
        &self.loc
    }
}

impl AstNode for ArrayNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Array
    }

    fn loc(&self) -> &Loc {
        &self.loc
    }
}

impl AstNode for PropertyNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Property
    }

    fn loc(&self) -> &Loc {
        &self.loc
    }
}

impl AstNode for IdentifierNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Identifier
    }

    fn loc(&self) -> &Loc {
        &self.loc
    }
}

impl AstNode for LiteralNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Literal
    }

    fn loc(&self) -> &Loc {
        &self.loc
    }

    fn is_string_literal(&self) -> bool {
        matches!(self.value, LiteralValue::String(_))
    }
}

impl AstNode for SyntaxNode {
    fn kind(&self) -> NodeKind {
        match self {
            SyntaxNode::Object(_) => NodeKind::Object,
            SyntaxNode::Array(_) => NodeKind::Array,
            SyntaxNode::Literal(_) => NodeKind::Literal,
        }
    }

    fn loc(&self) -> &Loc {
        match self {
            SyntaxNode::Object(node) => &node.loc,
            SyntaxNode::Array(node) => &node.loc,
            SyntaxNode::Literal(node) => &node.loc,
        }
    }

    fn is_string_literal(&self) -> bool {
        matches!(self, SyntaxNode::Literal(node) if node.is_string_literal())
    }
}

impl SyntaxNode {
    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            SyntaxNode::Object(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayNode> {
        match self {
            SyntaxNode::Array(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&LiteralNode> {
        match self {
            SyntaxNode::Literal(node) => Some(node),
            _ => None,
        }
    }

    /// Decoded string value when this is a string literal
    pub fn as_str(&self) -> Option<&str> {
        self.as_literal().and_then(|lit| lit.value.as_str())
    }

    /// Decoded boolean value when this is a boolean literal
    pub fn as_bool(&self) -> Option<bool> {
        self.as_literal().and_then(|lit| lit.value.as_bool())
    }
}

/// Borrowed view over any node, including properties and keys
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Object(&'a ObjectNode),
    Array(&'a ArrayNode),
    Property(&'a PropertyNode),
    Literal(&'a LiteralNode),
    Identifier(&'a IdentifierNode),
}

impl<'a> NodeRef<'a> {
    /// The node a diagnostic should point at: a property's key, otherwise itself
    pub fn diagnostic_target(self) -> NodeRef<'a> {
        match self {
            NodeRef::Property(prop) => NodeRef::Identifier(&prop.key),
            other => other,
        }
    }
}

impl<'a> From<&'a SyntaxNode> for NodeRef<'a> {
    fn from(node: &'a SyntaxNode) -> Self {
        match node {
            SyntaxNode::Object(obj) => NodeRef::Object(obj),
            SyntaxNode::Array(arr) => NodeRef::Array(arr),
            SyntaxNode::Literal(lit) => NodeRef::Literal(lit),
        }
    }
}

impl AstNode for NodeRef<'_> {
    fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Object(_) => NodeKind::Object,
            NodeRef::Array(_) => NodeKind::Array,
            NodeRef::Property(_) => NodeKind::Property,
            NodeRef::Literal(_) => NodeKind::Literal,
            NodeRef::Identifier(_) => NodeKind::Identifier,
        }
    }

    fn loc(&self) -> &Loc {
        match self {
            NodeRef::Object(node) => &node.loc,
            NodeRef::Array(node) => &node.loc,
            NodeRef::Property(node) => &node.loc,
            NodeRef::Literal(node) => &node.loc,
            NodeRef::Identifier(node) => &node.loc,
        }
    }

    fn is_string_literal(&self) -> bool {
        matches!(self, NodeRef::Literal(lit) if lit.is_string_literal())
    }
}
