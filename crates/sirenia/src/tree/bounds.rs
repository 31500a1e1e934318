//! Reading and writing vertex positions in the coordinate space of the layout parent.

use crate::graph::{CellId, Model, Point, Rect, query};

/// Sum of the positions of the containers between `cell_parent` (inclusive) and `layout_parent`
/// (exclusive). Zero unless `layout_parent` is an ancestor of `cell_parent`.
pub(crate) fn parent_offset(model: &Model, layout_parent: CellId, cell_parent: CellId) -> Point {
    let mut result = Point::default();
    if cell_parent == layout_parent || !model.is_ancestor(layout_parent, cell_parent) {
        return result;
    }

    let mut cur = Some(cell_parent);
    while let Some(p) = cur {
        if p == layout_parent {
            break;
        }
        if let Some(geo) = model.geometry(p) {
            result.x += geo.x;
            result.y += geo.y;
        }
        cur = model.parent(p);
    }
    result
}

fn offset_of(model: &Model, layout_parent: CellId, cell: CellId) -> Point {
    match model.parent(cell) {
        Some(p) => parent_offset(model, layout_parent, p),
        None => Point::default(),
    }
}

pub(crate) fn vertex_bounds(model: &Model, layout_parent: CellId, cell: CellId) -> Option<Rect> {
    let geo = model.geometry(cell)?;
    let off = offset_of(model, layout_parent, cell);
    Some(Rect::new(geo.x + off.x, geo.y + off.y, geo.width, geo.height))
}

/// Moves `cell` so its top-left corner lands on `(x, y)` in layout space. Returns the new
/// bounds in layout space, `None` if the cell has no geometry.
pub(crate) fn set_vertex_location(
    model: &mut Model,
    layout_parent: CellId,
    cell: CellId,
    x: f64,
    y: f64,
) -> crate::Result<Option<Rect>> {
    let Some(geo) = model.geometry(cell) else {
        return Ok(None);
    };
    let result = Rect::new(x, y, geo.width, geo.height);
    let off = offset_of(model, layout_parent, cell);
    let (lx, ly) = (x - off.x, y - off.y);

    if geo.x != lx || geo.y != ly {
        let mut geo = geo.clone();
        geo.x = lx;
        geo.y = ly;
        model.set_geometry(cell, Some(geo))?;
    }
    Ok(Some(result))
}

/// Vertices that are hidden or have no connections other than loops take no part in the tree.
pub(crate) fn is_vertex_ignored(model: &Model, cell: CellId) -> bool {
    !model.is_vertex(cell)
        || !model.is_visible(cell)
        || query::connections(model, cell, None).is_empty()
}

pub(crate) fn is_edge_ignored(model: &Model, edge: CellId) -> bool {
    !model.is_edge(edge)
        || !model.is_visible(edge)
        || model.terminal(edge, true).is_none()
        || model.terminal(edge, false).is_none()
}
