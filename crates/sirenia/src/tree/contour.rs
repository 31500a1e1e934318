//! Subtree silhouettes and the merge that packs sibling subtrees against each other.
//!
//! A contour is two polylines of relative steps in layout space: `dx` runs along the depth axis,
//! `dy` along the lateral axis. The upper polyline starts at the node's origin, the lower one at
//! its far lateral side (node width plus twice the node distance). Lines live in an arena so
//! contours can share tails and be spliced by handle.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LineId(usize);

#[derive(Debug, Clone, Copy)]
struct Line {
    dx: f64,
    dy: f64,
    next: Option<LineId>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Contour {
    upper_head: LineId,
    upper_tail: LineId,
    lower_head: LineId,
    lower_tail: LineId,
}

#[derive(Debug, Default)]
pub(crate) struct Contours {
    lines: Vec<Line>,
    node_distance: f64,
    level_distance: f64,
}

impl Contours {
    pub(crate) fn new(node_distance: f64, level_distance: f64) -> Self {
        Self {
            lines: Vec::new(),
            node_distance,
            level_distance,
        }
    }

    fn line(&mut self, dx: f64, dy: f64, next: Option<LineId>) -> LineId {
        let id = LineId(self.lines.len());
        self.lines.push(Line { dx, dy, next });
        id
    }

    fn get(&self, id: LineId) -> Line {
        self.lines[id.0]
    }

    /// Rectangle of `width` (lateral) by `height` (depth) grown by the node distance on every
    /// side.
    pub(crate) fn leaf(&mut self, width: f64, height: f64) -> Contour {
        let dist = 2.0 * self.node_distance;
        let upper_tail = self.line(height + dist, 0.0, None);
        let lower_tail = self.line(0.0, -width - dist, None);
        let lower_head = self.line(height + dist, 0.0, Some(lower_tail));
        Contour {
            upper_head: upper_tail,
            upper_tail,
            lower_head,
            lower_tail,
        }
    }

    /// Prepends the parent node of `width` by `height` to the joined contour of its children,
    /// centred over their lateral `span`. Returns the offset of the first child relative to the
    /// parent as `(depth, lateral)`.
    pub(crate) fn attach_parent(
        &mut self,
        contour: &mut Contour,
        width: f64,
        height: f64,
        span: f64,
    ) -> (f64, f64) {
        let x = self.node_distance + self.level_distance;
        let y2 = (span - width) / 2.0 - self.node_distance;
        let y1 = y2 + width + 2.0 * self.node_distance - span;

        let upper = self.line(x, y1, Some(contour.upper_head));
        contour.upper_head = self.line(height, 0.0, Some(upper));
        let lower = self.line(x, y2, Some(contour.lower_head));
        contour.lower_head = self.line(height, 0.0, Some(lower));

        (x + height, y1)
    }

    /// Pushes `p2` laterally until it clears the lower side of `p1`, then folds it into `p1`.
    /// Returns the lateral distance `p2` had to move.
    pub(crate) fn merge(&mut self, p1: &mut Contour, p2: &Contour) -> f64 {
        let mut x = 0.0;
        let mut y = 0.0;
        let mut total = 0.0;

        let mut upper = Some(p1.lower_head);
        let mut lower = Some(p2.upper_head);

        while let (Some(u), Some(l)) = (upper, lower) {
            let ul = self.get(u);
            let ll = self.get(l);
            let d = offset(x, y, ll.dx, ll.dy, ul.dx, ul.dy);
            y += d;
            total += d;

            if x + ll.dx <= ul.dx {
                x += ll.dx;
                y += ll.dy;
                lower = ll.next;
            } else {
                x -= ul.dx;
                y -= ul.dy;
                upper = ul.next;
            }
        }

        if let Some(l) = lower {
            let b = self.bridge(p1.upper_tail, 0.0, 0.0, l, x, y);
            p1.upper_tail = if self.get(b).next.is_some() {
                p2.upper_tail
            } else {
                b
            };
            p1.lower_tail = p2.lower_tail;
        } else if let Some(u) = upper {
            let b = self.bridge(p2.lower_tail, x, y, u, 0.0, 0.0);
            if self.get(b).next.is_none() {
                p1.lower_tail = b;
            }
        }

        p1.lower_head = p2.lower_head;
        total
    }

    /// Appends to `line1` (ending at `(x1, y1)`) a step that joins the polyline continuing after
    /// `line2` (which starts at `(x2, y2)`). Returns the new line that takes over `line2`'s tail.
    fn bridge(&mut self, line1: LineId, x1: f64, y1: f64, line2: LineId, x2: f64, y2: f64) -> LineId {
        let l2 = self.get(line2);
        let dx = x2 + l2.dx - x1;
        let dy = if l2.dx == 0.0 {
            l2.dy
        } else {
            dx * l2.dy / l2.dx
        };

        let r = self.line(dx, dy, l2.next);
        let joint = self.line(0.0, y2 + l2.dy - dy - y1, Some(r));
        self.lines[line1.0].next = Some(joint);
        r
    }
}

/// Lateral push needed so that segment `b` (from the origin) does not cross segment `a`
/// starting at `(p1, p2)`. Zero when the two do not overlap along the depth axis.
pub(crate) fn offset(p1: f64, p2: f64, a1: f64, a2: f64, b1: f64, b2: f64) -> f64 {
    if b1 <= p1 || p1 + a1 <= 0.0 {
        return 0.0;
    }

    let t = b1 * a2 - a1 * b2;
    let d = if t > 0.0 {
        if p1 < 0.0 {
            p1 * a2 / a1 - p2
        } else if p1 > 0.0 {
            p1 * b2 / b1 - p2
        } else {
            -p2
        }
    } else if b1 < p1 + a1 {
        b2 - (p2 + (b1 - p1) * a2 / a1)
    } else if b1 > p1 + a1 {
        (a1 + p1) * b2 / b1 - (p2 + a2)
    } else {
        b2 - (p2 + a2)
    };

    d.max(0.0)
}
