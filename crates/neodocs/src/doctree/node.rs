//! Doc tree nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a node is a page or a directory of pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A single page.
    File,
    /// A directory. Its content is the directory's index page.
    Directory,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::File => "file",
            Self::Directory => "directory",
        })
    }
}

/// A documentation node as it arrives from the host, before conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocNode {
    /// Node kind.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Source path, unique within a tree.
    pub path: String,
    /// Display title.
    pub title: String,
    /// Markdown source.
    #[serde(default)]
    pub content: String,
    /// Child nodes.
    #[serde(default)]
    pub children: Vec<Self>,
}

/// A raw documentation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocTree {
    /// The root node.
    pub root: RawDocNode,
}

/// A converted documentation node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocNode {
    /// Pre-order index within the tree, starting at 0 for the root.
    pub(crate) id: usize,
    /// Node kind.
    pub(crate) kind: NodeKind,
    /// Source path.
    pub(crate) path: String,
    /// Display title.
    pub(crate) title: String,
    /// Markdown source.
    pub(crate) content: String,
    /// Rendered content.
    pub(crate) html: String,
    /// Parent node id.
    pub(crate) parent: Option<usize>,
    /// Child node ids in source order.
    pub(crate) children: Vec<usize>,
}

impl DocNode {
    /// The node id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The node kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The source path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The markdown source.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The rendered content.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// The parent node id.
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Child node ids in source order.
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// Is this a directory?
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}
