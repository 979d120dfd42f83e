//! Shared fixtures for editor integration tests

#![allow(dead_code)]

use prose_editor::{EditingSession, EditorSession};
use prose_model::{
    Document, NodeContent, NodeId, NodeSelection, NodeSelectionMode, NodeSpec, Path, PropertySelection, Schema,
    Selection,
};

pub const SURFACE: &str = "body";

/// Top-level entry of a fixture document
pub enum Block<'a> {
    Text(&'a str, &'a str),
    List(&'a [&'a str]),
    Image,
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub struct Fixture {
    pub session: EditorSession,
    pub body: NodeId,

    /// Top-level node ids, in document order at creation time
    pub blocks: Vec<NodeId>,
}

impl Fixture {
    pub fn new(blocks: &[Block]) -> Self {
        let mut doc = Document::new(Schema::prose());
        let ids: Vec<NodeId> = blocks
            .iter()
            .map(|block| match block {
                Block::Text(node_type, text) => doc.create(NodeSpec::text(*node_type, *text)).unwrap(),
                Block::List(items) => {
                    let items = items
                        .iter()
                        .map(|item| doc.create(NodeSpec::text("list-item", *item)).unwrap())
                        .collect();
                    doc.create(NodeSpec::children("list", items)).unwrap()
                }
                Block::Image => doc.create(NodeSpec::void("image")).unwrap(),
            })
            .collect();
        let body = doc.create(NodeSpec::children("container", ids)).unwrap();
        Self::from_document(doc, body)
    }

    pub fn from_document(doc: Document, body: NodeId) -> Self {
        init_tracing();
        let blocks = doc.children_of(&body).unwrap().to_vec();
        let mut session = EditorSession::new("test-client", doc);
        session.focus(Some(SURFACE.to_string()));
        Self { session, body, blocks }
    }

    pub fn doc(&self) -> &Document {
        self.session.document()
    }

    pub fn selection(&self) -> &Selection {
        self.session.selection()
    }

    pub fn select(&mut self, selection: impl Into<Selection>) {
        self.session.set_selection(selection.into()).unwrap();
    }

    pub fn caret(&mut self, path: Path, offset: usize) {
        let caret = self.caret_selection(path, offset);
        self.select(caret);
    }

    pub fn range(&mut self, path: Path, start: usize, end: usize) {
        let range = PropertySelection::new(path, start, end)
            .in_container(&self.body)
            .on_surface(SURFACE);
        self.select(range);
    }

    pub fn select_node(&mut self, id: &NodeId, mode: NodeSelectionMode) {
        let sel = NodeSelection::new(id, mode, &self.body).on_surface(SURFACE);
        self.select(sel);
    }

    /// Caret as the editor is expected to produce it
    pub fn caret_selection(&self, path: Path, offset: usize) -> Selection {
        PropertySelection::collapsed(path, offset)
            .in_container(&self.body)
            .on_surface(SURFACE)
            .into()
    }

    pub fn text(&self, path: &Path) -> String {
        self.doc().text(path).unwrap().text.clone()
    }

    /// Current top-level ids
    pub fn flow(&self) -> Vec<NodeId> {
        self.doc().children_of(&self.body).unwrap().to_vec()
    }

    /// Compact description of the container, e.g. `["paragraph:ab", "list:[x,y]"]`
    pub fn outline(&self) -> Vec<String> {
        let doc = self.doc();
        doc.children_of(&self.body)
            .unwrap()
            .iter()
            .map(|id| {
                let node = doc.get(id).unwrap();
                match &node.content {
                    NodeContent::Text(text) => format!("{}:{}", node.node_type, text.text),
                    NodeContent::Children(items) => {
                        let items: Vec<String> = items
                            .iter()
                            .map(|item| doc.get(item).unwrap().text().unwrap().text.clone())
                            .collect();
                        format!("{}:[{}]", node.node_type, items.join(","))
                    }
                    NodeContent::Void => node.node_type.clone(),
                }
            })
            .collect()
    }

    /// Selection resolves and every node is reachable from the container
    pub fn assert_consistent(&self) {
        let doc = self.doc();
        assert!(
            doc.validate_selection(self.selection()).is_ok(),
            "selection does not resolve: {:?}",
            self.selection()
        );
        for node in doc.nodes() {
            if node.id != self.body {
                assert!(doc.owner(&node.id).is_some(), "orphaned node {}", node.id);
            }
        }
    }
}
