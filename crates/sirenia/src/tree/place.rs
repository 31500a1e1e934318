use super::contour::{Contour, Contours};
use super::{NodeId, Pass, bounds};
use crate::error::Result;
use crate::graph::Rect;

impl Pass<'_> {
    /// Tallest node (along the depth axis) on each rank below `root`.
    pub(super) fn find_rank_heights(&self, root: NodeId) -> Vec<f64> {
        let mut heights: Vec<f64> = Vec::new();
        let mut stack = vec![(root, 0usize)];
        while let Some((id, rank)) = stack.pop() {
            let h = self.node(id).height;
            match heights.get_mut(rank) {
                Some(max) => *max = max.max(h),
                None => heights.push(h),
            }
            for c in self.children(id) {
                stack.push((c, rank + 1));
            }
        }
        heights
    }

    pub(super) fn set_cell_heights(&mut self, id: NodeId, heights: &[f64]) {
        self.set_cell_heights_at(id, 0, heights);
    }

    fn set_cell_heights_at(&mut self, id: NodeId, rank: usize, heights: &[f64]) {
        if let Some(&max) = heights.get(rank) {
            let node = self.node_mut(id);
            if max > node.height {
                node.height = max;
            }
        }
        let mut cur = self.node(id).child;
        while let Some(c) = cur {
            self.set_cell_heights_at(c, rank + 1, heights);
            cur = self.node(c).next;
        }
    }

    /// Post-order contour computation. Sets the offsets of every child and returns the contour
    /// of the subtree at `id`.
    pub(super) fn layout(&mut self, id: NodeId, contours: &mut Contours) -> Contour {
        let (width, height, first) = {
            let n = self.node(id);
            (n.width, n.height, n.child)
        };
        let Some(first) = first else {
            return contours.leaf(width, height);
        };

        // Join: the first child's contour absorbs each following sibling in turn. A sibling
        // subtree only touches its own contour lines, so it can be laid out right before its
        // merge.
        let dist = 2.0 * self.options.node_distance;
        let mut joined = self.layout(first, contours);
        let mut h = self.node(first).width + dist;
        let mut span = h;
        let mut cur = self.node(first).next;
        while let Some(c) = cur {
            let other = self.layout(c, contours);
            let d = contours.merge(&mut joined, &other);
            let node = self.node_mut(c);
            node.offset_y = d + h;
            node.offset_x = 0.0;
            h = node.width + dist;
            span += d + h;
            cur = node.next;
        }

        let (ox, oy) = contours.attach_parent(&mut joined, width, height, span);
        let first = self.node_mut(first);
        first.offset_x = ox;
        first.offset_y = oy;
        joined
    }

    pub(super) fn horizontal_layout(
        &mut self,
        id: NodeId,
        x0: f64,
        y0: f64,
        acc: &mut Option<Rect>,
    ) -> Result<()> {
        let (x, y) = {
            let n = self.node_mut(id);
            n.x += x0 + n.offset_x;
            n.y += y0 + n.offset_y;
            (n.x, n.y)
        };
        self.apply(id, Some(&mut *acc))?;

        let Some(child) = self.node(id).child else {
            return Ok(());
        };
        self.horizontal_layout(child, x, y, acc)?;

        let (child_dx, child_dy) = (self.node(child).offset_x, self.node(child).offset_y);
        let mut sibling_offset = y + child_dy;
        let mut s = self.node(child).next;
        while let Some(sib) = s {
            self.horizontal_layout(sib, x + child_dx, sibling_offset, acc)?;
            sibling_offset += self.node(sib).offset_y;
            s = self.node(sib).next;
        }
        Ok(())
    }

    pub(super) fn vertical_layout(
        &mut self,
        id: NodeId,
        x0: f64,
        y0: f64,
        acc: &mut Option<Rect>,
    ) -> Result<()> {
        let (x, y) = {
            let n = self.node_mut(id);
            n.x += x0 + n.offset_y;
            n.y += y0 + n.offset_x;
            (n.x, n.y)
        };
        self.apply(id, Some(&mut *acc))?;

        let Some(child) = self.node(id).child else {
            return Ok(());
        };
        self.vertical_layout(child, x, y, acc)?;

        let (child_dx, child_dy) = (self.node(child).offset_x, self.node(child).offset_y);
        let mut sibling_offset = x + child_dy;
        let mut s = self.node(child).next;
        while let Some(sib) = s {
            self.vertical_layout(sib, sibling_offset, y + child_dx, acc)?;
            sibling_offset += self.node(sib).offset_y;
            s = self.node(sib).next;
        }
        Ok(())
    }

    /// Shifts the subtree at `id` and writes the new positions back.
    pub(super) fn move_node(&mut self, id: NodeId, dx: f64, dy: f64) -> Result<()> {
        {
            let n = self.node_mut(id);
            n.x += dx;
            n.y += dy;
        }
        self.apply(id, None)?;
        let mut cur = self.node(id).child;
        while let Some(c) = cur {
            self.move_node(c, dx, dy)?;
            cur = self.node(c).next;
        }
        Ok(())
    }

    /// Writes the node position to its cell (if movable) and grows `acc` by the cell bounds.
    fn apply(&mut self, id: NodeId, acc: Option<&mut Option<Rect>>) -> Result<()> {
        let (cell, x, y) = {
            let n = self.node(id);
            (n.cell, n.x, n.y)
        };
        if self.model.geometry(cell).is_none() {
            return Ok(());
        }

        let placed = if self.model.is_movable(cell) {
            let placed = bounds::set_vertex_location(self.model, self.parent, cell, x, y)?;
            if self.options.resize_parent {
                if let Some(p) = self.model.parent(cell) {
                    self.parents_changed.entry(self.model.path(p)).or_insert(p);
                }
            }
            placed
        } else {
            bounds::vertex_bounds(self.model, self.parent, cell)
        };

        if let (Some(acc), Some(r)) = (acc, placed) {
            let grown = match *acc {
                Some(b) => b.union(&r),
                None => r,
            };
            *acc = Some(grown);
        }
        Ok(())
    }
}
