//! Arena-backed cell store.
//!
//! Cells live in a single `Vec` and are addressed by [`CellId`] handles; string ids are kept in a
//! side index. Containment (`parent` / `children`) and edge incidence (`edges`) are stored as
//! handle lists so that traversal order always follows insertion order.

use crate::error::{ModelError, Result};
use crate::{CellPath, Geometry, Point};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(usize);

impl CellId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Root,
    Layer,
    Vertex,
    Edge,
}

#[derive(Debug, Clone)]
struct CellEntry {
    id: String,
    kind: CellKind,
    parent: Option<CellId>,
    children: Vec<CellId>,
    geometry: Option<Geometry>,
    source: Option<CellId>,
    target: Option<CellId>,
    edges: Vec<CellId>,
    visible: bool,
    movable: bool,
    edge_style: bool,
}

impl CellEntry {
    fn new(id: String, kind: CellKind, parent: Option<CellId>) -> Self {
        Self {
            id,
            kind,
            parent,
            children: Vec::new(),
            geometry: None,
            source: None,
            target: None,
            edges: Vec::new(),
            visible: true,
            movable: true,
            edge_style: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Model {
    cells: Vec<CellEntry>,
    index: FxHashMap<String, CellId>,
    root: CellId,
    default_parent: CellId,

    update_level: usize,
    pending_changes: usize,
    revision: u64,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Creates a model holding the root cell `"0"` and the default layer `"1"`.
    pub fn new() -> Self {
        let root = CellId(0);
        let layer = CellId(1);
        let mut root_entry = CellEntry::new("0".to_string(), CellKind::Root, None);
        root_entry.children.push(layer);
        let layer_entry = CellEntry::new("1".to_string(), CellKind::Layer, Some(root));

        let mut index = FxHashMap::default();
        index.insert("0".to_string(), root);
        index.insert("1".to_string(), layer);

        Self {
            cells: vec![root_entry, layer_entry],
            index,
            root,
            default_parent: layer,
            update_level: 0,
            pending_changes: 0,
            revision: 0,
        }
    }

    pub fn root(&self) -> CellId {
        self.root
    }

    pub fn default_parent(&self) -> CellId {
        self.default_parent
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = CellId> + '_ {
        (0..self.cells.len()).map(CellId)
    }

    pub fn contains(&self, cell: CellId) -> bool {
        cell.0 < self.cells.len()
    }

    /// Resolves a string id to its handle.
    pub fn cell(&self, id: &str) -> Option<CellId> {
        self.index.get(id).copied()
    }

    pub fn id(&self, cell: CellId) -> Option<&str> {
        self.entry(cell).map(|e| e.id.as_str())
    }

    pub fn kind(&self, cell: CellId) -> Option<CellKind> {
        self.entry(cell).map(|e| e.kind)
    }

    pub fn is_vertex(&self, cell: CellId) -> bool {
        self.kind(cell) == Some(CellKind::Vertex)
    }

    pub fn is_edge(&self, cell: CellId) -> bool {
        self.kind(cell) == Some(CellKind::Edge)
    }

    fn entry(&self, cell: CellId) -> Option<&CellEntry> {
        self.cells.get(cell.0)
    }

    fn entry_mut(&mut self, cell: CellId) -> Result<&mut CellEntry> {
        self.cells
            .get_mut(cell.0)
            .ok_or(ModelError::UnknownCell { index: cell.0 })
    }

    fn check(&self, cell: CellId) -> Result<&CellEntry> {
        self.entry(cell)
            .ok_or(ModelError::UnknownCell { index: cell.0 })
    }

    fn push_cell(&mut self, entry: CellEntry) -> Result<CellId> {
        if self.index.contains_key(&entry.id) {
            return Err(ModelError::DuplicateId { id: entry.id });
        }
        let cell = CellId(self.cells.len());
        self.index.insert(entry.id.clone(), cell);
        if let Some(parent) = entry.parent {
            self.entry_mut(parent)?.children.push(cell);
        }
        self.cells.push(entry);
        self.record_change();
        Ok(cell)
    }

    pub fn insert_layer(&mut self, id: impl Into<String>) -> Result<CellId> {
        let root = self.root;
        self.push_cell(CellEntry::new(id.into(), CellKind::Layer, Some(root)))
    }

    pub fn insert_vertex(
        &mut self,
        parent: CellId,
        id: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<CellId> {
        let parent_entry = self.check(parent)?;
        if parent_entry.kind == CellKind::Edge {
            return Err(ModelError::WrongKind {
                id: parent_entry.id.clone(),
                actual: CellKind::Edge,
                expected: "a container",
            });
        }
        let mut entry = CellEntry::new(id.into(), CellKind::Vertex, Some(parent));
        entry.geometry = Some(Geometry::new(x, y, width, height));
        self.push_cell(entry)
    }

    /// Inserts an edge. Either terminal may be absent (a dangling edge).
    pub fn insert_edge(
        &mut self,
        parent: CellId,
        id: impl Into<String>,
        source: impl Into<Option<CellId>>,
        target: impl Into<Option<CellId>>,
    ) -> Result<CellId> {
        self.check(parent)?;
        let source = source.into();
        let target = target.into();
        for terminal in [source, target].into_iter().flatten() {
            let t = self.check(terminal)?;
            if t.kind != CellKind::Vertex {
                return Err(ModelError::WrongKind {
                    id: t.id.clone(),
                    actual: t.kind,
                    expected: "a vertex",
                });
            }
        }

        let mut entry = CellEntry::new(id.into(), CellKind::Edge, Some(parent));
        entry.geometry = Some(Geometry::default());
        entry.source = source;
        entry.target = target;
        let edge = self.push_cell(entry)?;

        if let Some(s) = source {
            self.entry_mut(s)?.edges.push(edge);
        }
        if let Some(t) = target.filter(|t| Some(*t) != source) {
            self.entry_mut(t)?.edges.push(edge);
        }
        Ok(edge)
    }

    pub fn parent(&self, cell: CellId) -> Option<CellId> {
        self.entry(cell).and_then(|e| e.parent)
    }

    pub fn children(&self, cell: CellId) -> &[CellId] {
        self.entry(cell).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    pub fn child_count(&self, cell: CellId) -> usize {
        self.children(cell).len()
    }

    pub fn child_index(&self, cell: CellId) -> Option<usize> {
        let parent = self.parent(cell)?;
        self.children(parent).iter().position(|c| *c == cell)
    }

    /// Returns true if `child` is `parent` or lies anywhere below it.
    pub fn is_ancestor(&self, parent: CellId, child: CellId) -> bool {
        let mut cur = Some(child);
        while let Some(c) = cur {
            if c == parent {
                return true;
            }
            cur = self.parent(c);
        }
        false
    }

    pub fn path(&self, cell: CellId) -> CellPath {
        let mut indices: Vec<usize> = Vec::new();
        let mut cur = cell;
        while let Some(idx) = self.child_index(cur) {
            indices.push(idx);
            match self.parent(cur) {
                Some(p) => cur = p,
                None => break,
            }
        }
        indices.reverse();
        CellPath::from_indices(indices)
    }

    pub fn cell_at_path(&self, path: &CellPath) -> Option<CellId> {
        let mut cur = self.root;
        for &idx in path.indices() {
            cur = *self.children(cur).get(idx)?;
        }
        Some(cur)
    }

    pub fn geometry(&self, cell: CellId) -> Option<&Geometry> {
        self.entry(cell).and_then(|e| e.geometry.as_ref())
    }

    pub fn set_geometry(&mut self, cell: CellId, geometry: Option<Geometry>) -> Result<()> {
        let entry = self.entry_mut(cell)?;
        if entry.geometry == geometry {
            return Ok(());
        }
        entry.geometry = geometry;
        self.record_change();
        Ok(())
    }

    pub fn terminal(&self, edge: CellId, source: bool) -> Option<CellId> {
        let e = self.entry(edge)?;
        if source { e.source } else { e.target }
    }

    /// Edges incident to `cell`, in insertion order.
    pub fn edges_of(&self, cell: CellId) -> &[CellId] {
        self.entry(cell).map(|e| e.edges.as_slice()).unwrap_or(&[])
    }

    pub fn edge_points(&self, edge: CellId) -> Option<&[Point]> {
        self.geometry(edge).and_then(|g| g.points.as_deref())
    }

    pub fn set_edge_points(&mut self, edge: CellId, points: Option<Vec<Point>>) -> Result<()> {
        let mut geo = self.geometry(edge).cloned().unwrap_or_default();
        geo.points = points;
        self.set_geometry(edge, Some(geo))
    }

    pub fn is_visible(&self, cell: CellId) -> bool {
        self.entry(cell).is_some_and(|e| e.visible)
    }

    pub fn set_visible(&mut self, cell: CellId, visible: bool) -> Result<()> {
        let entry = self.entry_mut(cell)?;
        if entry.visible != visible {
            entry.visible = visible;
            self.record_change();
        }
        Ok(())
    }

    pub fn is_movable(&self, cell: CellId) -> bool {
        self.entry(cell).is_some_and(|e| e.movable)
    }

    pub fn set_movable(&mut self, cell: CellId, movable: bool) -> Result<()> {
        self.entry_mut(cell)?.movable = movable;
        Ok(())
    }

    /// Whether the renderer may apply its own edge style (routing) to this edge.
    pub fn is_edge_style_enabled(&self, edge: CellId) -> bool {
        self.entry(edge).is_some_and(|e| e.edge_style)
    }

    pub fn set_edge_style_enabled(&mut self, edge: CellId, enabled: bool) -> Result<()> {
        let entry = self.entry_mut(edge)?;
        if entry.edge_style != enabled {
            entry.edge_style = enabled;
            self.record_change();
        }
        Ok(())
    }

    pub fn begin_update(&mut self) {
        self.update_level += 1;
    }

    /// Closes one batch scope. Closing the outermost scope folds the changes made inside it
    /// into a single revision.
    pub fn end_update(&mut self) {
        debug_assert!(self.update_level > 0, "end_update without begin_update");
        self.update_level = self.update_level.saturating_sub(1);
        if self.update_level == 0 && self.pending_changes > 0 {
            self.pending_changes = 0;
            self.revision += 1;
        }
    }

    pub fn update_level(&self) -> usize {
        self.update_level
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn record_change(&mut self) {
        if self.update_level == 0 {
            self.revision += 1;
        } else {
            self.pending_changes += 1;
        }
    }
}
