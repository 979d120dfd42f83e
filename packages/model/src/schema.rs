//! # Schema
//!
//! Declares which node types exist, what payload each carries, and which
//! categories each type satisfies.
//!
//! Categories are capability tags ("textish", "list") used for behavior
//! lookup. Every type implicitly satisfies a category named after itself,
//! which is its most specific category. The resolved, ranked list is computed
//! once when the schema is built so lookups never inspect node payloads.

use crate::{DocumentError, DocumentResult, NodeContent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Capability tag satisfied by one or more node types
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub const TEXTISH: &'static str = "textish";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Category(s.to_string())
    }
}

/// Payload shape of a node type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Text,
    Children,
    Void,
}

impl NodeKind {
    fn name(self) -> &'static str {
        match self {
            NodeKind::Text => "text",
            NodeKind::Children => "children",
            NodeKind::Void => "void",
        }
    }

    fn accepts(self, content: &NodeContent) -> bool {
        matches!(
            (self, content),
            (NodeKind::Text, NodeContent::Text(_))
                | (NodeKind::Children, NodeContent::Children(_))
                | (NodeKind::Void, NodeContent::Void)
        )
    }
}

/// A declared node type with its resolved categories
#[derive(Debug, Clone)]
pub struct NodeTypeSpec {
    pub name: String,
    pub kind: NodeKind,

    /// Own name first, then declared categories in declaration order
    pub categories: Vec<Category>,
}

impl NodeTypeSpec {
    /// Rank of `category` in this type's resolved list (0 = most specific)
    pub fn rank(&self, category: &Category) -> Option<usize> {
        self.categories.iter().position(|c| c == category)
    }
}

#[derive(Debug, Clone)]
pub struct Schema {
    types: HashMap<String, NodeTypeSpec>,
    default_text_type: String,
    container_type: String,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Schema for prose articles: paragraphs, headings, lists and images
    pub fn prose() -> Self {
        Self::builder()
            .children("container", &[])
            .text("paragraph", &[Category::TEXTISH])
            .text("heading", &[Category::TEXTISH])
            .text("blockquote", &[Category::TEXTISH])
            .text("codeblock", &[Category::TEXTISH])
            .children("list", &[])
            .text("list-item", &[Category::TEXTISH])
            .void("image", &[])
            .default_text_type("paragraph")
            .container_type("container")
            .build()
            .expect("prose schema is well-formed")
    }

    pub fn node_type(&self, name: &str) -> DocumentResult<&NodeTypeSpec> {
        self.types
            .get(name)
            .ok_or_else(|| DocumentError::UnknownNodeType(name.to_string()))
    }

    pub fn categories(&self, name: &str) -> &[Category] {
        self.types
            .get(name)
            .map(|spec| spec.categories.as_slice())
            .unwrap_or(&[])
    }

    pub fn default_text_type(&self) -> &str {
        &self.default_text_type
    }

    pub fn container_type(&self) -> &str {
        &self.container_type
    }

    /// Check that `content` matches the payload shape of `node_type`
    pub fn check_content(&self, node_type: &str, content: &NodeContent) -> DocumentResult<()> {
        let spec = self.node_type(node_type)?;
        if spec.kind.accepts(content) {
            Ok(())
        } else {
            Err(DocumentError::InvalidContent {
                node_type: node_type.to_string(),
                expected: spec.kind.name(),
            })
        }
    }

    /// Copy of this schema with a different default text type
    pub fn with_default_text_type(&self, name: &str) -> DocumentResult<Self> {
        if self.node_type(name)?.kind != NodeKind::Text {
            return Err(DocumentError::InvalidContent {
                node_type: name.to_string(),
                expected: NodeKind::Text.name(),
            });
        }
        let mut schema = self.clone();
        schema.default_text_type = name.to_string();
        Ok(schema)
    }
}

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    types: Vec<(String, NodeKind, Vec<Category>)>,
    default_text_type: Option<String>,
    container_type: Option<String>,
}

impl SchemaBuilder {
    pub fn text(self, name: &str, categories: &[&str]) -> Self {
        self.node(name, NodeKind::Text, categories)
    }

    pub fn children(self, name: &str, categories: &[&str]) -> Self {
        self.node(name, NodeKind::Children, categories)
    }

    pub fn void(self, name: &str, categories: &[&str]) -> Self {
        self.node(name, NodeKind::Void, categories)
    }

    pub fn node(mut self, name: &str, kind: NodeKind, categories: &[&str]) -> Self {
        self.types.push((
            name.to_string(),
            kind,
            categories.iter().map(|c| Category::from(*c)).collect(),
        ));
        self
    }

    pub fn default_text_type(mut self, name: &str) -> Self {
        self.default_text_type = Some(name.to_string());
        self
    }

    pub fn container_type(mut self, name: &str) -> Self {
        self.container_type = Some(name.to_string());
        self
    }

    pub fn build(self) -> DocumentResult<Schema> {
        let mut types = HashMap::new();
        for (name, kind, declared) in self.types {
            let mut categories = vec![Category::new(name.clone())];
            for category in declared {
                if !categories.contains(&category) {
                    categories.push(category);
                }
            }
            types.insert(
                name.clone(),
                NodeTypeSpec {
                    name,
                    kind,
                    categories,
                },
            );
        }

        let default_text_type = self
            .default_text_type
            .ok_or_else(|| DocumentError::UnknownNodeType("<default text type>".to_string()))?;
        let container_type = self
            .container_type
            .ok_or_else(|| DocumentError::UnknownNodeType("<container type>".to_string()))?;

        let schema = Schema {
            types,
            default_text_type: default_text_type.clone(),
            container_type: container_type.clone(),
        };
        if schema.node_type(&default_text_type)?.kind != NodeKind::Text {
            return Err(DocumentError::InvalidContent {
                node_type: default_text_type,
                expected: NodeKind::Text.name(),
            });
        }
        if schema.node_type(&container_type)?.kind != NodeKind::Children {
            return Err(DocumentError::InvalidContent {
                node_type: container_type,
                expected: NodeKind::Children.name(),
            });
        }
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextContent;

    #[test]
    fn test_own_name_is_most_specific_category() {
        let schema = Schema::prose();
        let paragraph = schema.node_type("paragraph").unwrap();

        assert_eq!(paragraph.rank(&Category::from("paragraph")), Some(0));
        assert_eq!(paragraph.rank(&Category::from("textish")), Some(1));
        assert_eq!(paragraph.rank(&Category::from("list")), None);
    }

    #[test]
    fn test_check_content() {
        let schema = Schema::prose();
        assert!(schema
            .check_content("paragraph", &NodeContent::Text(TextContent::new("x")))
            .is_ok());
        assert!(matches!(
            schema.check_content("list", &NodeContent::Void),
            Err(DocumentError::InvalidContent { .. })
        ));
        assert!(matches!(
            schema.check_content("table", &NodeContent::Void),
            Err(DocumentError::UnknownNodeType(_))
        ));
    }

    #[test]
    fn test_default_text_type_must_be_text() {
        let result = Schema::builder()
            .children("container", &[])
            .void("image", &[])
            .default_text_type("image")
            .container_type("container")
            .build();
        assert!(result.is_err());

        let schema = Schema::prose().with_default_text_type("heading").unwrap();
        assert_eq!(schema.default_text_type(), "heading");
        assert!(Schema::prose().with_default_text_type("list").is_err());
    }
}
