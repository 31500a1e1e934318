//! Jetty routing for the edges leaving each tree node.

use super::{NodeId, Pass, bounds};
use crate::error::Result;
use crate::graph::{Point, query};
use std::cmp::Ordering;

/// A child node keyed by its lateral coordinate.
#[derive(Debug, Clone, Copy)]
struct WeightedCellSorter {
    weight: f64,
    node: NodeId,
}

impl WeightedCellSorter {
    fn compare(a: &Self, b: &Self) -> Ordering {
        a.weight.total_cmp(&b.weight)
    }
}

impl Pass<'_> {
    /// Routes the outgoing edges of `id` and of every node below it.
    pub(super) fn local_edge_processing(&mut self, id: NodeId) -> Result<()> {
        self.process_node_outgoing(id)?;
        let mut cur = self.node(id).child;
        while let Some(c) = cur {
            self.local_edge_processing(c)?;
            cur = self.node(c).next;
        }
        Ok(())
    }

    /// Spreads the exits of the edges to each child evenly along the side of the parent that
    /// faces its children. Jetties grow towards the middle children and shrink again after
    /// them, so parallel segments do not overlap.
    fn process_node_outgoing(&mut self, id: NodeId) -> Result<()> {
        let horizontal = self.options.is_horizontal();
        let mut sorted: Vec<WeightedCellSorter> = self
            .children(id)
            .map(|c| {
                let n = self.node(c);
                WeightedCellSorter {
                    weight: if horizontal { n.y } else { n.x },
                    node: c,
                }
            })
            .collect();
        if sorted.is_empty() {
            return Ok(());
        }
        sorted.sort_by(WeightedCellSorter::compare);

        let parent_cell = self.node(id).cell;
        let Some(pb) = bounds::vertex_bounds(self.model, self.parent, parent_cell) else {
            return Ok(());
        };

        let sep = self.options.pref_hoz_edge_sep;
        let step = self.options.pref_vert_edge_off;
        let count = sorted.len() as f64;
        let required = (count + 1.0) * sep;
        let mut available = self.node(id).width;
        let buffered = available > required + 2.0 * sep;
        if buffered {
            available -= 2.0 * sep;
        }

        let spacing = available / count;
        let mut cur_x = spacing / 2.0;
        if buffered {
            cur_x += sep;
        }
        let mut cur_y = self.options.min_edge_jetty - step;

        for (j, s) in sorted.iter().enumerate() {
            let child_cell = self.node(s.node).cell;
            if let Some(cb) = bounds::vertex_bounds(self.model, self.parent, child_cell) {
                for edge in query::edges_between(self.model, parent_cell, child_cell, false) {
                    let points = if horizontal {
                        let x = pb.right();
                        let y = pb.y + cur_x;
                        vec![
                            Point::new(x, y),
                            Point::new(x + cur_y, y),
                            Point::new(x + cur_y, cb.y + cb.height / 2.0),
                        ]
                    } else {
                        let x = pb.x + cur_x;
                        let y = pb.bottom();
                        vec![
                            Point::new(x, y),
                            Point::new(x, y + cur_y),
                            Point::new(cb.x + cb.width / 2.0, y + cur_y),
                        ]
                    };
                    self.model.set_edge_points(edge, Some(points))?;
                }
            }

            // The two middle children share a jetty length when the count is even.
            let j = j as f64;
            if j < count / 2.0 {
                cur_y += step;
            } else if j > count / 2.0 {
                cur_y -= step;
            }
            cur_x += spacing;
        }
        Ok(())
    }
}
