use super::Pass;
use crate::error::Result;
use crate::graph::{CellId, Model, query};

/// Padding kept between a container's border and its children.
#[derive(Debug, Clone, Copy)]
struct Padding {
    all: f64,
    top: f64,
    right: f64,
    bottom: f64,
    left: f64,
}

impl Pass<'_> {
    /// Fits every container whose children were moved around its visible children, keeping
    /// the children where they are in absolute space. Deeper containers are handled before the
    /// ones holding them.
    pub(super) fn adjust_parents(&mut self) -> Result<()> {
        let o = self.options;
        let padding = Padding {
            all: o.group_padding,
            top: o.group_padding_top,
            right: o.group_padding_right,
            bottom: o.group_padding_bottom,
            left: o.group_padding_left,
        };

        let parents: Vec<CellId> = self.parents_changed.values().rev().copied().collect();
        for cell in parents {
            fit_group(self.model, cell, padding)?;
        }
        Ok(())
    }
}

fn fit_group(model: &mut Model, cell: CellId, pad: Padding) -> Result<()> {
    let Some(geo) = model.geometry(cell) else {
        return Ok(());
    };
    let children = query::child_cells(model, cell);
    let Some(bbox) = query::bounding_box(model, &children) else {
        return Ok(());
    };
    if bbox.width <= 0.0 || bbox.height <= 0.0 {
        return Ok(());
    }

    // The container moves by the same amount its children move back, so their absolute
    // positions stay put.
    let dx = pad.all + pad.left - bbox.x;
    let dy = pad.all + pad.top - bbox.y;
    let mut geo = geo.clone();
    geo.x = (geo.x - dx).round();
    geo.y = (geo.y - dy).round();
    geo.width = (bbox.width + 2.0 * pad.all + pad.left + pad.right).round();
    geo.height = (bbox.height + 2.0 * pad.all + pad.top + pad.bottom).round();
    model.set_geometry(cell, Some(geo))?;

    if dx == 0.0 && dy == 0.0 {
        return Ok(());
    }
    for child in children {
        if let Some(g) = model.geometry(child) {
            let mut g = g.clone();
            g.translate(dx, dy);
            model.set_geometry(child, Some(g))?;
        }
    }
    Ok(())
}
