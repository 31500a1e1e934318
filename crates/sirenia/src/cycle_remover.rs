//! Break cycles in a [`HierarchyModel`] by inverting back edges found during a DFS.
//!
//! Pass one walks from the requested roots. Pass two walks from every vertex the first pass did
//! not reach, in vertex insertion order, sharing the visited set so no vertex is entered twice.
//! After both passes every vertex has been visited exactly once and no cycle is left.

use crate::hierarchy::{EdgeId, HierarchyModel, VertexId};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleRemoval {
    /// Vertices in the order they were first reached.
    pub visited: Vec<VertexId>,
    /// Edges inverted, in the order they were inverted.
    pub reversed: Vec<EdgeId>,
}

/// Runs both passes. An empty `roots` falls back to the roots stored on the model, if any.
pub fn run(model: &mut HierarchyModel, roots: &[VertexId]) -> CycleRemoval {
    let timing_enabled = std::env::var("SIRENIA_CYCLE_TIMING")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let total_start = timing_enabled.then(std::time::Instant::now);

    let roots: Vec<VertexId> = if roots.is_empty() {
        model.roots().map(<[VertexId]>::to_vec).unwrap_or_default()
    } else {
        roots.to_vec()
    };

    let mut seen: FxHashSet<VertexId> = FxHashSet::default();
    let mut out = CycleRemoval::default();

    let pass1_start = timing_enabled.then(std::time::Instant::now);
    model.visit(&roots, &mut seen, |m, step| {
        on_step(m, step, &mut out);
    });
    let pass1 = pass1_start.map(|s| s.elapsed());

    let pass2_start = timing_enabled.then(std::time::Instant::now);
    let order: Vec<VertexId> = model.vertex_ids().collect();
    for v in order {
        if seen.contains(&v) {
            continue;
        }
        model.visit(&[v], &mut seen, |m, step| {
            on_step(m, step, &mut out);
        });
    }
    let pass2 = pass2_start.map(|s| s.elapsed());

    debug!(
        vertices = model.vertex_count(),
        edges = model.edge_count(),
        roots = roots.len(),
        reversed = out.reversed.len(),
        "cycle removal done"
    );
    if let Some(total_start) = total_start {
        debug!(
            total = ?total_start.elapsed(),
            pass1 = ?pass1.unwrap_or_default(),
            pass2 = ?pass2.unwrap_or_default(),
            "cycle removal timings"
        );
    }
    out
}

fn on_step(
    model: &mut HierarchyModel,
    step: &crate::hierarchy::VisitStep<'_>,
    out: &mut CycleRemoval,
) {
    if let (Some(parent), Some(edge)) = (step.parent, step.edge) {
        if parent != step.vertex && step.path.contains(step.vertex) {
            trace!(
                edge = edge.index(),
                from = parent.index(),
                to = step.vertex.index(),
                "inverting back edge"
            );
            model.invert_edge(edge);
            out.reversed.push(edge);
        }
    }
    if !step.seen {
        out.visited.push(step.vertex);
    }
}
