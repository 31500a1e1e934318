//! Compact tree layout.
//!
//! Builds a tree of layout nodes by walking edges from a root, packs sibling subtrees as tightly
//! as their contours allow (Moen's algorithm), then writes absolute positions back to the model.
//! Optional post-processing resizes the containers of moved cells and routes the edges leaving
//! each parent through evenly spaced jetties.
//!
//! Non-tree input is tolerated: a cell is entered at most once, so cycles and cross edges are
//! pruned rather than reported.

mod bounds;
mod contour;
mod edges;
mod groups;
mod place;

use crate::error::{Error, Result};
use crate::graph::{CellId, CellPath, Model, Rect, query};
use crate::options::CompactTreeOptions;
use contour::Contours;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One laid-out cell.
///
/// `width` is the lateral size and `height` the size along the depth axis, so in a horizontal
/// layout they are the cell's geometry height and width respectively.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub cell: CellId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Offset from the parent along the depth axis (first child) or from the previous sibling.
    pub offset_x: f64,
    /// Lateral offset from the parent (first child) or from the previous sibling.
    pub offset_y: f64,
    child: Option<NodeId>,
    next: Option<NodeId>,
}

impl TreeNode {
    fn new(cell: CellId) -> Self {
        Self {
            cell,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            child: None,
            next: None,
        }
    }

    pub fn first_child(&self) -> Option<NodeId> {
        self.child
    }

    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next
    }
}

/// The node tree produced by one [`CompactTreeLayout::execute`] call.
#[derive(Debug, Clone)]
pub struct LayoutTree {
    nodes: Vec<TreeNode>,
    root: NodeId,
    bounds: Option<Rect>,
}

impl LayoutTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            cur: self.nodes[id.0].child,
        }
    }

    /// Union of the placed vertex bounds in the coordinate space of the layout parent, before
    /// any container was resized.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in the order the build walk created them (pre-order).
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn find(&self, cell: CellId) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.cell == cell).map(NodeId)
    }
}

pub struct Children<'a> {
    tree: &'a LayoutTree,
    cur: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.cur?;
        self.cur = self.tree.nodes[id.0].next;
        Some(id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompactTreeLayout {
    options: CompactTreeOptions,
}

impl CompactTreeLayout {
    pub fn new(options: CompactTreeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompactTreeOptions {
        &self.options
    }

    /// Lays out the tree below `root`, or below a root picked among the children of `parent`.
    ///
    /// Returns `Ok(None)` without touching the model when no suitable root exists. All model
    /// writes happen inside one batch update.
    pub fn execute(
        &self,
        model: &mut Model,
        parent: CellId,
        root: Option<CellId>,
    ) -> Result<Option<LayoutTree>> {
        for cell in std::iter::once(parent).chain(root) {
            if !model.contains(cell) {
                return Err(Error::UnknownCell {
                    id: format!("#{}", cell.index()),
                });
            }
        }

        let Some(root) = root.or_else(|| self.find_root(model, parent)) else {
            debug!(parent = ?model.id(parent), "compact tree: no root found");
            return Ok(None);
        };

        let parent_location = if parent != root && self.options.maintain_parent_location {
            model.geometry(parent).map(|g| (g.x, g.y))
        } else {
            None
        };

        model.begin_update();
        let result = self.run(model, parent, root, parent_location);
        model.end_update();
        result
    }

    fn find_root(&self, model: &Model, parent: CellId) -> Option<CellId> {
        let invert = self.options.invert;
        let grand_parent = model.parent(parent);
        if !query::edges(model, parent, grand_parent, invert, !invert, false, false).is_empty() {
            return Some(parent);
        }

        query::find_tree_roots(model, parent, true, invert)
            .into_iter()
            .find(|&r| {
                !bounds::is_vertex_ignored(model, r)
                    && !query::edges(model, r, None, invert, !invert, false, false).is_empty()
            })
    }

    fn run(
        &self,
        model: &mut Model,
        parent: CellId,
        root: CellId,
        parent_location: Option<(f64, f64)>,
    ) -> Result<Option<LayoutTree>> {
        let timing_enabled = std::env::var("SIRENIA_TREE_TIMING")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let total_start = timing_enabled.then(std::time::Instant::now);

        let opts = &self.options;
        let mut pass = Pass {
            model,
            parent,
            options: opts,
            nodes: Vec::new(),
            visited: FxHashSet::default(),
            parents_changed: BTreeMap::new(),
        };

        let build_start = timing_enabled.then(std::time::Instant::now);
        let tree_root = pass.dfs(root)?;
        let build = build_start.map(|s| s.elapsed());
        let Some(tree_root) = tree_root else {
            debug!(root = ?pass.model.id(root), "compact tree: root is ignored");
            return Ok(None);
        };

        if opts.align_ranks {
            let heights = pass.find_rank_heights(tree_root);
            pass.set_cell_heights(tree_root, &heights);
        }

        let contour_start = timing_enabled.then(std::time::Instant::now);
        let mut contours = Contours::new(opts.node_distance, opts.level_distance);
        pass.layout(tree_root, &mut contours);
        let contour = contour_start.map(|s| s.elapsed());

        let place_start = timing_enabled.then(std::time::Instant::now);
        let (mut x0, mut y0) = (opts.grid_size, opts.grid_size);
        if !opts.move_tree {
            if let Some(r) = bounds::vertex_bounds(pass.model, parent, root) {
                x0 = r.x;
                y0 = r.y;
            }
        }

        let mut tree_bounds: Option<Rect> = None;
        if opts.is_horizontal() {
            pass.horizontal_layout(tree_root, x0, y0, &mut tree_bounds)?;
        } else {
            pass.vertical_layout(tree_root, x0, y0, &mut tree_bounds)?;
        }

        if let Some(b) = tree_bounds.as_mut() {
            let dx = if b.x < 0.0 { (x0 - b.x).abs() } else { 0.0 };
            let dy = if b.y < 0.0 { (y0 - b.y).abs() } else { 0.0 };
            if dx != 0.0 || dy != 0.0 {
                trace!(dx, dy, "compact tree: moving tree into positive space");
                pass.move_node(tree_root, dx, dy)?;
                *b = b.translate(dx, dy);
            }
        }
        let place = place_start.map(|s| s.elapsed());

        let post_start = timing_enabled.then(std::time::Instant::now);
        if tree_bounds.is_some() {
            if opts.resize_parent {
                pass.adjust_parents()?;
            }
            if opts.edge_routing {
                pass.local_edge_processing(tree_root)?;
            }
        }

        if let Some((x, y)) = parent_location {
            if let Some(geo) = pass.model.geometry(parent) {
                let mut geo = geo.clone();
                geo.x = x;
                geo.y = y;
                pass.model.set_geometry(parent, Some(geo))?;
            }
        }
        let post = post_start.map(|s| s.elapsed());

        debug!(
            root = ?pass.model.id(root),
            nodes = pass.nodes.len(),
            parents_changed = pass.parents_changed.len(),
            bounds = ?tree_bounds,
            "compact tree layout done"
        );
        if let Some(total_start) = total_start {
            debug!(
                total = ?total_start.elapsed(),
                build = ?build.unwrap_or_default(),
                contour = ?contour.unwrap_or_default(),
                place = ?place.unwrap_or_default(),
                post = ?post.unwrap_or_default(),
                "compact tree timings"
            );
        }

        Ok(Some(LayoutTree {
            nodes: pass.nodes,
            root: tree_root,
            bounds: tree_bounds,
        }))
    }
}

/// State of one layout run. Lives for a single `execute` call.
struct Pass<'a> {
    model: &'a mut Model,
    parent: CellId,
    options: &'a CompactTreeOptions,
    nodes: Vec<TreeNode>,
    visited: FxHashSet<CellPath>,
    parents_changed: BTreeMap<CellPath, CellId>,
}

impl Pass<'_> {
    fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0]
    }

    fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).child, move |&c| self.node(c).next)
    }

    fn create_node(&mut self, cell: CellId) -> NodeId {
        let mut node = TreeNode::new(cell);
        if let Some(geo) = bounds::vertex_bounds(self.model, self.parent, cell) {
            if self.options.is_horizontal() {
                node.width = geo.height;
                node.height = geo.width;
            } else {
                node.width = geo.width;
                node.height = geo.height;
            }
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Pre-order walk along outgoing (incoming when inverted) edges whose far end stays inside
    /// the layout parent.
    fn dfs(&mut self, cell: CellId) -> Result<Option<NodeId>> {
        let path = self.model.path(cell);
        if self.visited.contains(&path) || bounds::is_vertex_ignored(self.model, cell) {
            trace!(cell = ?self.model.id(cell), "compact tree: pruned");
            return Ok(None);
        }
        self.visited.insert(path);
        let node = self.create_node(cell);

        let invert = self.options.invert;
        let mut out = query::edges(self.model, cell, Some(self.parent), invert, !invert, false, true);
        if self.options.sort_edges {
            let model = &*self.model;
            out.sort_by_cached_key(|&e| {
                let far_is_source = model.terminal(e, false) == Some(cell);
                model.terminal(e, far_is_source).map(|c| model.path(c))
            });
        }

        let mut prev: Option<NodeId> = None;
        for edge in out {
            if bounds::is_edge_ignored(self.model, edge) {
                continue;
            }
            if self.options.reset_edges {
                self.model.set_edge_points(edge, None)?;
            }
            if self.options.edge_routing {
                self.model.set_edge_style_enabled(edge, false)?;
                self.model.set_edge_points(edge, None)?;
            }

            let Some(target) = self.model.terminal(edge, invert) else {
                continue;
            };
            let Some(child) = self.dfs(target)? else {
                continue;
            };
            if self.model.geometry(target).is_none() {
                continue;
            }
            match prev {
                None => self.node_mut(node).child = Some(child),
                Some(p) => self.node_mut(p).next = Some(child),
            }
            prev = Some(child);
        }

        Ok(Some(node))
    }
}
