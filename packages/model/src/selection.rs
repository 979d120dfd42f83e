//! # Selection Model
//!
//! Immutable description of the caret or range the next edit applies to.
//!
//! ## Shapes
//!
//! - **Null**: no addressable location, every edit is a no-op
//! - **Property**: offsets into one text property (equal offsets = caret)
//! - **Node**: a whole node in a container, anchored before, after, or full
//! - **Container**: a range spanning several container entries
//! - **Custom**: opaque payload owned by a component the core knows nothing about
//!
//! Every shape except null also carries the surface it belongs to, and all
//! but custom carry (or may carry) the owning container. Equality is
//! structural.

use crate::{NodeId, Path};
use serde::{Deserialize, Serialize};

/// Identifier of an editable region
pub type SurfaceId = String;

/// Direction of a delete or of a collapse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Left,
    Right,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Selection {
    #[default]
    Null,
    Property(PropertySelection),
    Node(NodeSelection),
    Container(ContainerSelection),
    Custom(CustomSelection),
}

impl Selection {
    /// Caret at `offset` in `path`
    pub fn caret(path: Path, offset: usize) -> Self {
        Selection::Property(PropertySelection::collapsed(path, offset))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Selection::Null)
    }

    pub fn is_property_selection(&self) -> bool {
        matches!(self, Selection::Property(_))
    }

    pub fn is_node_selection(&self) -> bool {
        matches!(self, Selection::Node(_))
    }

    pub fn is_container_selection(&self) -> bool {
        matches!(self, Selection::Container(_))
    }

    pub fn is_custom_selection(&self) -> bool {
        matches!(self, Selection::Custom(_))
    }

    /// Caret-like: a collapsed property or container range, or a node edge
    pub fn is_collapsed(&self) -> bool {
        match self {
            Selection::Property(sel) => sel.is_collapsed(),
            Selection::Container(sel) => sel.start == sel.end,
            Selection::Node(sel) => sel.mode != NodeSelectionMode::Full,
            Selection::Null | Selection::Custom(_) => false,
        }
    }

    pub fn is_before(&self) -> bool {
        matches!(self, Selection::Node(sel) if sel.mode == NodeSelectionMode::Before)
    }

    pub fn is_after(&self) -> bool {
        matches!(self, Selection::Node(sel) if sel.mode == NodeSelectionMode::After)
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Selection::Node(sel) if sel.mode == NodeSelectionMode::Full)
    }

    pub fn container_id(&self) -> Option<&NodeId> {
        match self {
            Selection::Property(sel) => sel.container_id.as_ref(),
            Selection::Node(sel) => Some(&sel.container_id),
            Selection::Container(sel) => Some(&sel.container_id),
            Selection::Null | Selection::Custom(_) => None,
        }
    }

    pub fn surface_id(&self) -> Option<&str> {
        match self {
            Selection::Property(sel) => sel.surface_id.as_deref(),
            Selection::Node(sel) => sel.surface_id.as_deref(),
            Selection::Container(sel) => sel.surface_id.as_deref(),
            Selection::Custom(sel) => sel.surface_id.as_deref(),
            Selection::Null => None,
        }
    }

    /// Copy of this selection with the given fields replaced
    ///
    /// Path and offsets only apply to property selections; container and
    /// surface apply to every shape that carries them. A null selection stays
    /// null.
    pub fn create_with(&self, patch: SelectionPatch) -> Selection {
        match self {
            Selection::Null => Selection::Null,
            Selection::Property(sel) => Selection::Property(sel.create_with(patch)),
            Selection::Node(sel) => {
                let mut sel = sel.clone();
                if let Some(container_id) = patch.container_id {
                    sel.container_id = container_id;
                }
                if let Some(surface_id) = patch.surface_id {
                    sel.surface_id = Some(surface_id);
                }
                Selection::Node(sel)
            }
            Selection::Container(sel) => {
                let mut sel = sel.clone();
                if let Some(container_id) = patch.container_id {
                    sel.container_id = container_id;
                }
                if let Some(surface_id) = patch.surface_id {
                    sel.surface_id = Some(surface_id);
                }
                Selection::Container(sel)
            }
            Selection::Custom(sel) => {
                let mut sel = sel.clone();
                if let Some(surface_id) = patch.surface_id {
                    sel.surface_id = Some(surface_id);
                }
                Selection::Custom(sel)
            }
        }
    }
}

/// Partial overrides for [`Selection::create_with`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionPatch {
    pub path: Option<Path>,
    pub start_offset: Option<usize>,
    pub end_offset: Option<usize>,
    pub container_id: Option<NodeId>,
    pub surface_id: Option<SurfaceId>,
}

impl SelectionPatch {
    /// Collapsed caret at `offset` in `path`
    pub fn caret(path: Path, offset: usize) -> Self {
        Self {
            path: Some(path),
            start_offset: Some(offset),
            end_offset: Some(offset),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySelection {
    pub path: Path,
    pub start_offset: usize,
    pub end_offset: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<NodeId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_id: Option<SurfaceId>,
}

impl PropertySelection {
    pub fn new(path: Path, start_offset: usize, end_offset: usize) -> Self {
        Self {
            path,
            start_offset: start_offset.min(end_offset),
            end_offset: start_offset.max(end_offset),
            container_id: None,
            surface_id: None,
        }
    }

    pub fn collapsed(path: Path, offset: usize) -> Self {
        Self::new(path, offset, offset)
    }

    pub fn in_container(mut self, container_id: impl Into<NodeId>) -> Self {
        self.container_id = Some(container_id.into());
        self
    }

    pub fn on_surface(mut self, surface_id: impl Into<SurfaceId>) -> Self {
        self.surface_id = Some(surface_id.into());
        self
    }

    pub fn is_collapsed(&self) -> bool {
        self.start_offset == self.end_offset
    }

    /// Collapse to the lower (`Left`) or upper (`Right`) bound
    pub fn collapse(&self, direction: Direction) -> Self {
        let offset = match direction {
            Direction::Left => self.start_offset,
            Direction::Right => self.end_offset,
        };
        let mut sel = self.clone();
        sel.start_offset = offset;
        sel.end_offset = offset;
        sel
    }

    pub fn create_with(&self, patch: SelectionPatch) -> Self {
        let start_offset = patch.start_offset.unwrap_or(self.start_offset);
        let end_offset = patch.end_offset.unwrap_or(self.end_offset);
        Self {
            path: patch.path.unwrap_or_else(|| self.path.clone()),
            start_offset: start_offset.min(end_offset),
            end_offset: start_offset.max(end_offset),
            container_id: patch.container_id.or_else(|| self.container_id.clone()),
            surface_id: patch.surface_id.or_else(|| self.surface_id.clone()),
        }
    }
}

impl From<PropertySelection> for Selection {
    fn from(sel: PropertySelection) -> Self {
        Selection::Property(sel)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeSelectionMode {
    Before,
    After,
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSelection {
    pub node_id: NodeId,
    pub mode: NodeSelectionMode,
    pub container_id: NodeId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_id: Option<SurfaceId>,
}

impl NodeSelection {
    pub fn new(node_id: impl Into<NodeId>, mode: NodeSelectionMode, container_id: impl Into<NodeId>) -> Self {
        Self {
            node_id: node_id.into(),
            mode,
            container_id: container_id.into(),
            surface_id: None,
        }
    }

    pub fn on_surface(mut self, surface_id: impl Into<SurfaceId>) -> Self {
        self.surface_id = Some(surface_id.into());
        self
    }
}

impl From<NodeSelection> for Selection {
    fn from(sel: NodeSelection) -> Self {
        Selection::Node(sel)
    }
}

/// One end of a container selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub path: Path,
    pub offset: usize,
}

impl Coordinate {
    pub fn new(path: Path, offset: usize) -> Self {
        Self { path, offset }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSelection {
    pub start: Coordinate,
    pub end: Coordinate,
    pub container_id: NodeId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_id: Option<SurfaceId>,
}

impl ContainerSelection {
    pub fn new(start: Coordinate, end: Coordinate, container_id: impl Into<NodeId>) -> Self {
        Self {
            start,
            end,
            container_id: container_id.into(),
            surface_id: None,
        }
    }
}

impl From<ContainerSelection> for Selection {
    fn from(sel: ContainerSelection) -> Self {
        Selection::Container(sel)
    }
}

/// Selection owned by a component type; passed through untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSelection {
    pub custom_type: String,
    pub data: serde_json::Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_id: Option<SurfaceId>,
}

impl From<CustomSelection> for Selection {
    fn from(sel: CustomSelection) -> Self {
        Selection::Custom(sel)
    }
}
