//! Construction of a [`HierarchyModel`] from the cell model.

use super::{HierarchyModel, VertexId};
use crate::error::{Error, Result};
use crate::graph::{CellId, Model};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

struct EdgeGroup {
    cells: Vec<CellId>,
    first: (VertexId, VertexId),
    forward: usize,
    backward: usize,
}

fn unknown(model: &Model, cell: CellId) -> Error {
    Error::UnknownCell {
        id: model
            .id(cell)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", cell.index())),
    }
}

impl HierarchyModel {
    /// Builds one hierarchy vertex per cell in `vertices` and one hierarchy edge per pair of
    /// distinct vertices joined by at least one real edge.
    ///
    /// All real edges between a pair, whatever their direction, are grouped into a single
    /// hierarchy edge pointing the way most of them point; on a tie the first edge met decides.
    /// Loops and edges leaving the vertex set are dropped.
    pub fn from_graph(model: &Model, vertices: &[CellId], roots: Option<&[CellId]>) -> Result<Self> {
        let mut h = HierarchyModel::new();
        let mut mapper: FxHashMap<CellId, VertexId> = FxHashMap::default();

        for &cell in vertices {
            if !model.is_vertex(cell) {
                return Err(unknown(model, cell));
            }
            if mapper.contains_key(&cell) {
                continue;
            }
            let v = h.add_vertex(vec![cell]);
            mapper.insert(cell, v);
        }

        let mut groups: IndexMap<(VertexId, VertexId), EdgeGroup> = IndexMap::new();
        let mut grouped: FxHashSet<CellId> = FxHashSet::default();
        for &cell in vertices {
            for &edge in model.edges_of(cell) {
                if !grouped.insert(edge) {
                    continue;
                }
                let (Some(s), Some(t)) = (model.terminal(edge, true), model.terminal(edge, false))
                else {
                    continue;
                };
                let (Some(&vs), Some(&vt)) = (mapper.get(&s), mapper.get(&t)) else {
                    continue;
                };
                if vs == vt {
                    continue;
                }

                let key = (vs.min(vt), vs.max(vt));
                let group = groups.entry(key).or_insert_with(|| EdgeGroup {
                    cells: Vec::new(),
                    first: (vs, vt),
                    forward: 0,
                    backward: 0,
                });
                group.cells.push(edge);
                if (vs, vt) == group.first {
                    group.forward += 1;
                } else {
                    group.backward += 1;
                }
            }
        }

        for group in groups.into_values() {
            let (s, t) = if group.backward > group.forward {
                (group.first.1, group.first.0)
            } else {
                group.first
            };
            h.add_edge(s, t, group.cells);
        }

        if let Some(roots) = roots {
            let mut mapped: Vec<VertexId> = Vec::with_capacity(roots.len());
            for &r in roots {
                let Some(&v) = mapper.get(&r) else {
                    return Err(unknown(model, r));
                };
                mapped.push(v);
            }
            h.set_roots(Some(mapped));
        }

        Ok(h)
    }

    /// Looks up the hierarchy vertex that represents `cell`.
    pub fn vertex_for_cell(&self, cell: CellId) -> Option<VertexId> {
        self.vertex_ids()
            .find(|&v| self.vertex(v).cells.contains(&cell))
    }
}
