//! Hierarchy model consumed by the layered layout stages.
//!
//! A [`HierarchyVertex`] stands for one or more real vertices collapsed together; a
//! [`HierarchyEdge`] groups every real edge joining the same two vertices. Both live in arenas
//! owned by [`HierarchyModel`] and refer to each other by handle, so inverting an edge is a
//! matter of swapping two handles and moving one entry between incidence lists.

use crate::graph::CellId;
use rustc_hash::FxHashSet;

pub mod alg;
mod build;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(usize);

impl VertexId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(usize);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct HierarchyVertex {
    /// The real vertices this hierarchy vertex represents.
    pub cells: Vec<CellId>,
    connects_as_source: Vec<EdgeId>,
    connects_as_target: Vec<EdgeId>,
}

impl HierarchyVertex {
    pub fn connects_as_source(&self) -> &[EdgeId] {
        &self.connects_as_source
    }

    pub fn connects_as_target(&self) -> &[EdgeId] {
        &self.connects_as_target
    }
}

#[derive(Debug, Clone)]
pub struct HierarchyEdge {
    /// The real (parallel) edges this hierarchy edge represents.
    pub cells: Vec<CellId>,
    source: VertexId,
    target: VertexId,
    is_reversed: bool,
}

impl HierarchyEdge {
    pub fn source(&self) -> VertexId {
        self.source
    }

    pub fn target(&self) -> VertexId {
        self.target
    }

    /// Whether the direction was flipped to break a cycle.
    pub fn is_reversed(&self) -> bool {
        self.is_reversed
    }

    /// Swaps the endpoints. The incidence lists of both vertices must be updated in the same
    /// step, see [`HierarchyModel::invert_edge`].
    fn invert(&mut self) {
        std::mem::swap(&mut self.source, &mut self.target);
        self.is_reversed = !self.is_reversed;
    }
}

#[derive(Debug, Clone, Default)]
pub struct HierarchyModel {
    vertices: Vec<HierarchyVertex>,
    edges: Vec<HierarchyEdge>,
    roots: Option<Vec<VertexId>>,
}

impl HierarchyModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, cells: Vec<CellId>) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(HierarchyVertex {
            cells,
            ..Default::default()
        });
        id
    }

    /// Adds a directed edge. Both endpoints must already exist in this model.
    pub fn add_edge(&mut self, source: VertexId, target: VertexId, cells: Vec<CellId>) -> EdgeId {
        debug_assert!(source.0 < self.vertices.len() && target.0 < self.vertices.len());
        let id = EdgeId(self.edges.len());
        self.edges.push(HierarchyEdge {
            cells,
            source,
            target,
            is_reversed: false,
        });
        self.vertices[source.0].connects_as_source.push(id);
        self.vertices[target.0].connects_as_target.push(id);
        id
    }

    pub fn set_roots(&mut self, roots: Option<Vec<VertexId>>) {
        self.roots = roots;
    }

    pub fn roots(&self) -> Option<&[VertexId]> {
        self.roots.as_deref()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId)
    }

    pub fn vertex(&self, id: VertexId) -> &HierarchyVertex {
        &self.vertices[id.0]
    }

    pub fn edge(&self, id: EdgeId) -> &HierarchyEdge {
        &self.edges[id.0]
    }

    /// Targets of the edges currently leaving `v`.
    pub fn successors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices[v.0]
            .connects_as_source
            .iter()
            .map(|e| self.edges[e.0].target)
    }

    /// Flips `edge` and moves it between the incidence lists of its endpoints, so that the
    /// model never exposes an edge whose direction disagrees with the lists.
    pub fn invert_edge(&mut self, edge: EdgeId) {
        let (old_source, old_target) = {
            let e = &self.edges[edge.0];
            (e.source, e.target)
        };
        self.edges[edge.0].invert();

        let src = &mut self.vertices[old_source.0];
        src.connects_as_source.retain(|e| *e != edge);
        src.connects_as_target.push(edge);

        let tgt = &mut self.vertices[old_target.0];
        tgt.connects_as_target.retain(|e| *e != edge);
        tgt.connects_as_source.push(edge);
    }

    /// Depth-first walk from `roots` along outgoing edges.
    ///
    /// `seen` carries the visited state in and out, so consecutive walks can share it. The
    /// visitor runs once per traversal step: for the first arrival at a vertex (`seen == false`)
    /// and for every later arrival through another edge (`seen == true`). It may mutate the
    /// model; the outgoing edges of a vertex are captured before its children are entered.
    pub fn visit<F>(&mut self, roots: &[VertexId], seen: &mut FxHashSet<VertexId>, mut visitor: F)
    where
        F: FnMut(&mut HierarchyModel, &VisitStep<'_>),
    {
        let mut path = DfsPath::default();
        for &root in roots {
            self.dfs(None, root, None, 0, seen, &mut path, &mut visitor);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn dfs<F>(
        &mut self,
        parent: Option<VertexId>,
        vertex: VertexId,
        edge: Option<EdgeId>,
        layer: usize,
        seen: &mut FxHashSet<VertexId>,
        path: &mut DfsPath,
        visitor: &mut F,
    ) where
        F: FnMut(&mut HierarchyModel, &VisitStep<'_>),
    {
        let first = seen.insert(vertex);
        visitor(
            self,
            &VisitStep {
                parent,
                vertex,
                edge,
                layer,
                seen: !first,
                path: &*path,
            },
        );
        if !first {
            return;
        }

        path.push(vertex);
        let outgoing = self.vertices[vertex.0].connects_as_source.clone();
        for e in outgoing {
            let target = self.edges[e.0].target;
            self.dfs(Some(vertex), target, Some(e), layer + 1, seen, path, visitor);
        }
        path.pop();
    }
}

/// One step of [`HierarchyModel::visit`].
#[derive(Debug)]
pub struct VisitStep<'a> {
    /// The vertex the walk came from, `None` at a root.
    pub parent: Option<VertexId>,
    pub vertex: VertexId,
    /// The edge followed from `parent`.
    pub edge: Option<EdgeId>,
    /// Depth below the root of this walk.
    pub layer: usize,
    /// Whether `vertex` had been reached before.
    pub seen: bool,
    /// Vertices on the path from the root down to `parent`.
    pub path: &'a DfsPath,
}

/// The vertices currently on the DFS path, in order from the root.
#[derive(Debug, Default)]
pub struct DfsPath {
    stack: Vec<VertexId>,
    members: FxHashSet<VertexId>,
}

impl DfsPath {
    pub fn contains(&self, v: VertexId) -> bool {
        self.members.contains(&v)
    }

    pub fn vertices(&self) -> &[VertexId] {
        &self.stack
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    fn push(&mut self, v: VertexId) {
        self.stack.push(v);
        self.members.insert(v);
    }

    fn pop(&mut self) {
        if let Some(v) = self.stack.pop() {
            self.members.remove(&v);
        }
    }
}
