//! Graph-level queries over a [`Model`].
//!
//! The model only knows raw incidence; layouts ask questions scoped to a container ("edges
//! leaving this vertex whose other end is inside that parent"). These helpers answer them
//! without mutating the model.

use crate::{CellId, Model, Rect};

fn is_valid_ancestor(model: &Model, cell: CellId, parent: CellId, recurse: bool) -> bool {
    if recurse {
        model.is_ancestor(parent, cell)
    } else {
        model.parent(cell) == Some(parent)
    }
}

/// Incident edges of `cell` filtered by direction.
///
/// When `parent` is given, the opposite terminal must be a direct child of it, or any
/// descendant when `recurse` is set. Loops (source == target) are only returned with
/// `include_loops`.
pub fn edges(
    model: &Model,
    cell: CellId,
    parent: Option<CellId>,
    incoming: bool,
    outgoing: bool,
    include_loops: bool,
    recurse: bool,
) -> Vec<CellId> {
    let mut out: Vec<CellId> = Vec::new();
    for &edge in model.edges_of(cell) {
        let source = model.terminal(edge, true);
        let target = model.terminal(edge, false);
        let scoped = |other: Option<CellId>| match (parent, other) {
            (None, _) => true,
            (Some(p), Some(o)) => is_valid_ancestor(model, o, p, recurse),
            (Some(_), None) => false,
        };

        let keep = if source == target {
            include_loops
        } else {
            (incoming && target == Some(cell) && scoped(source))
                || (outgoing && source == Some(cell) && scoped(target))
        };
        if keep {
            out.push(edge);
        }
    }
    out
}

pub fn incoming_edges(model: &Model, cell: CellId, parent: Option<CellId>) -> Vec<CellId> {
    edges(model, cell, parent, true, false, false, false)
}

pub fn outgoing_edges(model: &Model, cell: CellId, parent: Option<CellId>) -> Vec<CellId> {
    edges(model, cell, parent, false, true, false, false)
}

/// Incoming and outgoing edges of `cell`, loops excluded.
pub fn connections(model: &Model, cell: CellId, parent: Option<CellId>) -> Vec<CellId> {
    edges(model, cell, parent, true, true, false, false)
}

/// Edges running from `source` to `target` (either way round unless `directed`).
pub fn edges_between(model: &Model, source: CellId, target: CellId, directed: bool) -> Vec<CellId> {
    model
        .edges_of(source)
        .iter()
        .copied()
        .filter(|&e| {
            let s = model.terminal(e, true);
            let t = model.terminal(e, false);
            (s == Some(source) && t == Some(target))
                || (!directed && s == Some(target) && t == Some(source))
        })
        .collect()
}

/// Visible direct children of `parent`.
pub fn child_cells(model: &Model, parent: CellId) -> Vec<CellId> {
    model
        .children(parent)
        .iter()
        .copied()
        .filter(|&c| model.is_visible(c))
        .collect()
}

/// Visible direct children of `parent` that are vertices.
pub fn child_vertices(model: &Model, parent: CellId) -> Vec<CellId> {
    model
        .children(parent)
        .iter()
        .copied()
        .filter(|&c| model.is_vertex(c) && model.is_visible(c))
        .collect()
}

/// Candidate roots for a tree layout among the child vertices of `parent`.
///
/// A root has no incoming connection (no outgoing one when `invert`) and at least one in the
/// other direction. If no child qualifies, the child with the largest fan-out minus fan-in
/// (reversed when `invert`) is returned instead, provided that difference is positive. With
/// `isolate`, only connections to other children of `parent` are counted.
pub fn find_tree_roots(model: &Model, parent: CellId, isolate: bool, invert: bool) -> Vec<CellId> {
    let mut roots: Vec<CellId> = Vec::new();
    let mut best: Option<CellId> = None;
    let mut max_diff: i64 = 0;

    for cell in child_vertices(model, parent) {
        let conns = connections(model, cell, isolate.then_some(parent));
        let mut fan_out: i64 = 0;
        let mut fan_in: i64 = 0;
        for e in conns {
            if model.terminal(e, true) == Some(cell) {
                fan_out += 1;
            } else {
                fan_in += 1;
            }
        }

        if (invert && fan_out == 0 && fan_in > 0) || (!invert && fan_in == 0 && fan_out > 0) {
            roots.push(cell);
        }

        let diff = if invert {
            fan_in - fan_out
        } else {
            fan_out - fan_in
        };
        if diff > max_diff {
            max_diff = diff;
            best = Some(cell);
        }
    }

    if roots.is_empty() {
        roots.extend(best);
    }
    roots
}

/// Union of the geometries of `cells`: vertex bounds and edge waypoints. Cells without geometry
/// are skipped; `None` if nothing contributed.
pub fn bounding_box(model: &Model, cells: &[CellId]) -> Option<Rect> {
    let mut result: Option<Rect> = None;
    let mut add = |r: Rect| {
        result = Some(match result {
            Some(acc) => acc.union(&r),
            None => r,
        });
    };

    for &cell in cells {
        let Some(geo) = model.geometry(cell) else {
            continue;
        };
        if model.is_edge(cell) {
            for p in geo.points.iter().flatten() {
                add(Rect::new(p.x, p.y, 0.0, 0.0));
            }
        } else {
            add(geo.bounds());
        }
    }
    result
}
