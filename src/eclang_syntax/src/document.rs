//! The product of compiling one file, and the builder both front ends
//! (source parser, binary decoder) use to produce it.

use thiserror::Error;

use crate::node::Node;

/// Child-index path from the root list down to one node.
pub type NodePath = Vec<usize>;

/// Entry of the included-files table. Index 0 is always the file's own
/// name; dynamic imports append `Include`/`Template` entries whose index
/// becomes the `file_id` stamped on every node they contribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFile {
    Own(String),
    Include(String),
    Template(String),
}

impl SourceFile {
    pub fn path(&self) -> &str {
        match self {
            SourceFile::Own(p) | SourceFile::Include(p) | SourceFile::Template(p) => p,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("a template has already been imported into this file")]
    TemplateAlreadyImported,
    #[error("the included-files table is full (at most 255 dynamic imports per file)")]
    FileTableFull,
    #[error("the imported file does not mark a template node")]
    MissingTemplateNode,
}

/// What one compiled file amounts to: its root nodes plus the bookkeeping
/// the encoder and decompiler need to reproduce dynamic imports and
/// template marks.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub roots: Vec<Node>,
    pub files: Vec<SourceFile>,
    /// Path to the node marked by a bare `#template` in this file.
    pub template_path: Option<NodePath>,
    /// Path to the target node of the single template imported into this
    /// file, if any.
    pub external_template_path: Option<NodePath>,
    /// File ID this document was compiled as. Only a document with ID 0
    /// (loaded directly by the user) may be serialized.
    pub current_file: u8,
}

impl Document {
    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        let (&first, rest) = path.split_first()?;
        let mut node = self.roots.get(first)?;
        for &index in rest {
            node = node.children.get(index)?;
        }
        Some(node)
    }

    /// Path-addressed lookup: `"a/b/c"` descends by node name starting
    /// from the root list, first match per segment.
    pub fn object(&self, path: &str) -> Option<&Node> {
        let mut segments = path.split('/');
        let first = segments.next()?;
        let mut node = self.roots.iter().find(|n| n.name == first)?;
        for segment in segments {
            node = node.child(segment)?;
        }
        Some(node)
    }

    /// Root-level nodes of the given class, in insertion order.
    pub fn objects_by_class<'a>(&'a self, class_name: &str) -> Vec<&'a Node> {
        self.roots
            .iter()
            .filter(|n| n.class_name == class_name)
            .collect()
    }
}

/// What an `Importer` hands back for one imported file: the root nodes
/// (ownership moves with the vector) and, for templates, the path of the
/// node the importing file should keep extending.
#[derive(Debug)]
pub struct ImportedTree {
    pub nodes: Vec<Node>,
    pub template_path: Option<NodePath>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Include,
    Template,
}

/// Failure while resolving, loading or compiling an imported file.
#[derive(Debug, Error)]
#[error("import of `{path}` failed: {message}")]
pub struct ImportError {
    pub path: String,
    pub message: String,
}

/// Seam between the front ends and the coordinator. `#include*` and
/// `#template*` (and their binary counterparts) suspend the current file,
/// compile the referenced one to completion through this trait, and graft
/// the result.
pub trait Importer {
    /// Compiles `path` and returns its tree with every node stamped
    /// `file_id`.
    fn import(
        &mut self,
        path: &str,
        kind: ImportKind,
        file_id: u8,
    ) -> Result<ImportedTree, ImportError>;

    /// `#register "alias" "path"`.
    fn register_path(&mut self, alias: &str, path: &str);
}

/// Builds a [`Document`] node by node, tracking the scope stack as an
/// index path into the tree under construction.
#[derive(Debug)]
pub struct DocumentBuilder {
    doc: Document,
    scope: NodePath,
    /// Most recently created or entered node; binary `ATTRIBUTE`
    /// instructions resolve against this one.
    last: Option<NodePath>,
    /// True while this file is being compiled as an import of another
    /// file. Imported files never allocate dynamic file ids of their
    /// own; only the user-opened file re-emits dynamism.
    included: bool,
}

impl DocumentBuilder {
    pub fn new(name: impl Into<String>, current_file: u8, included: bool) -> Self {
        let name = name.into();
        Self {
            doc: Document {
                files: vec![SourceFile::Own(name.clone())],
                name,
                roots: Vec::new(),
                template_path: None,
                external_template_path: None,
                current_file,
            },
            scope: Vec::new(),
            last: None,
            included,
        }
    }

    pub fn current_file(&self) -> u8 {
        self.doc.current_file
    }

    /// Whether `#include-dyn`/`#template-dyn` (or their instructions) may
    /// allocate a new file id here, or must degrade to static inclusion.
    pub fn allows_dynamic(&self) -> bool {
        !self.included
    }

    pub fn in_scope(&self) -> bool {
        !self.scope.is_empty()
    }

    fn node_at_mut<'a>(doc: &'a mut Document, path: &[usize]) -> Option<&'a mut Node> {
        let (&first, rest) = path.split_first()?;
        let mut node = doc.roots.get_mut(first)?;
        for &index in rest {
            node = node.children.get_mut(index)?;
        }
        Some(node)
    }

    /// Node currently open for insertion (top of the scope stack).
    pub fn current_node(&self) -> Option<&Node> {
        if self.scope.is_empty() {
            return None;
        }
        self.doc.node_at(&self.scope)
    }

    pub fn current_node_mut(&mut self) -> Option<&mut Node> {
        if self.scope.is_empty() {
            return None;
        }
        let path = self.scope.clone();
        Self::node_at_mut(&mut self.doc, &path)
    }

    /// Target of an attribute instruction: the most recently created or
    /// entered node.
    pub fn last_node_mut(&mut self) -> Option<&mut Node> {
        let path = self.last.clone()?;
        Self::node_at_mut(&mut self.doc, &path)
    }

    pub fn last_node(&self) -> Option<&Node> {
        self.doc.node_at(self.last.as_deref()?)
    }

    /// Appends a node at the tail of the current scope (or the root list)
    /// and optionally enters it.
    pub fn append(&mut self, node: Node, enter: bool) {
        let mut path = self.scope.clone();
        let index = match Self::node_at_mut(&mut self.doc, &self.scope) {
            Some(parent) => {
                parent.children.push(node);
                parent.children.len() - 1
            }
            None => {
                self.doc.roots.push(node);
                self.doc.roots.len() - 1
            }
        };
        path.push(index);
        if enter {
            self.scope = path.clone();
        }
        self.last = Some(path);
    }

    /// Pops the scope stack. Returns false on underflow (the caller
    /// decides whether that is an error or a tolerated no-op).
    pub fn exit_scope(&mut self) -> bool {
        if self.scope.pop().is_none() {
            return false;
        }
        self.last = if self.scope.is_empty() {
            None
        } else {
            Some(self.scope.clone())
        };
        true
    }

    /// Descends into the most recently appended child of the current
    /// scope. Returns false (no-op) if there is none.
    pub fn enter_last(&mut self) -> bool {
        let roots_len = self.doc.roots.len();
        let index = match Self::node_at_mut(&mut self.doc, &self.scope) {
            Some(parent) if !parent.children.is_empty() => parent.children.len() - 1,
            Some(_) => return false,
            None if roots_len > 0 => roots_len - 1,
            None => return false,
        };
        self.scope.push(index);
        self.last = Some(self.scope.clone());
        true
    }

    /// Marks the current scope stack as this file's template node path.
    /// Returns false when no node is open.
    pub fn mark_template(&mut self) -> bool {
        if self.scope.is_empty() {
            return false;
        }
        self.doc.template_path = Some(self.scope.clone());
        true
    }

    /// Reserves the next file ID for a dynamic import.
    pub fn allocate_file(&mut self, file: SourceFile) -> Result<u8, TreeError> {
        if self.doc.files.len() > u8::MAX as usize {
            return Err(TreeError::FileTableFull);
        }
        let id = self.doc.files.len() as u8;
        self.doc.files.push(file);
        Ok(id)
    }

    /// Grafts imported nodes at the tail of the current scope (or the
    /// root list). Returns the child index of the first grafted node.
    pub fn graft(&mut self, nodes: Vec<Node>) -> usize {
        match Self::node_at_mut(&mut self.doc, &self.scope) {
            Some(parent) => {
                let base = parent.children.len();
                parent.children.extend(nodes);
                base
            }
            None => {
                let base = self.doc.roots.len();
                self.doc.roots.extend(nodes);
                base
            }
        }
    }

    pub fn has_template_import(&self) -> bool {
        self.doc.external_template_path.is_some()
    }

    /// Records the imported template's target node (rebased onto this
    /// tree) and moves the scope stack inside it, so everything that
    /// follows nests in the template. `base` is the value returned by
    /// [`DocumentBuilder::graft`] for the template's nodes.
    pub fn import_template(
        &mut self,
        base: usize,
        child_template: &[usize],
    ) -> Result<(), TreeError> {
        if self.doc.external_template_path.is_some() {
            return Err(TreeError::TemplateAlreadyImported);
        }
        let (&first, rest) = child_template
            .split_first()
            .ok_or(TreeError::MissingTemplateNode)?;
        let mut path = self.scope.clone();
        path.push(base + first);
        path.extend_from_slice(rest);
        self.doc.external_template_path = Some(path.clone());
        self.scope = path;
        self.last = None;
        Ok(())
    }

    pub fn finish(self) -> Document {
        self.doc
    }
}
