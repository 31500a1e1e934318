//! Graph checks over a [`HierarchyModel`].

use super::{HierarchyModel, VertexId};
use rustc_hash::FxHashMap;

/// Strongly connected components of two or more vertices. Self loops are not reported; the
/// cycle remover leaves them alone.
pub fn find_cycles(h: &HierarchyModel) -> Vec<Vec<VertexId>> {
    struct Tarjan<'a> {
        h: &'a HierarchyModel,
        index: usize,
        stack: Vec<VertexId>,
        on_stack: Vec<bool>,
        indices: FxHashMap<VertexId, usize>,
        lowlink: FxHashMap<VertexId, usize>,
        sccs: Vec<Vec<VertexId>>,
    }

    impl Tarjan<'_> {
        fn strongconnect(&mut self, v: VertexId) {
            self.indices.insert(v, self.index);
            self.lowlink.insert(v, self.index);
            self.index += 1;
            self.stack.push(v);
            self.on_stack[v.index()] = true;

            let successors: Vec<VertexId> = self.h.successors(v).collect();
            for w in successors {
                if !self.indices.contains_key(&w) {
                    self.strongconnect(w);
                    let (Some(&v_low), Some(&w_low)) = (self.lowlink.get(&v), self.lowlink.get(&w))
                    else {
                        debug_assert!(false, "tarjan lowlink missing");
                        continue;
                    };
                    self.lowlink.insert(v, v_low.min(w_low));
                } else if self.on_stack[w.index()] {
                    let (Some(&v_low), Some(&w_idx)) = (self.lowlink.get(&v), self.indices.get(&w))
                    else {
                        debug_assert!(false, "tarjan index missing");
                        continue;
                    };
                    self.lowlink.insert(v, v_low.min(w_idx));
                }
            }

            if self.lowlink.get(&v) == self.indices.get(&v) {
                let mut scc = Vec::new();
                while let Some(w) = self.stack.pop() {
                    self.on_stack[w.index()] = false;
                    scc.push(w);
                    if w == v {
                        break;
                    }
                }
                self.sccs.push(scc);
            }
        }
    }

    let mut tarjan = Tarjan {
        h,
        index: 0,
        stack: Vec::new(),
        on_stack: vec![false; h.vertex_count()],
        indices: FxHashMap::default(),
        lowlink: FxHashMap::default(),
        sccs: Vec::new(),
    };
    for v in h.vertex_ids() {
        if !tarjan.indices.contains_key(&v) {
            tarjan.strongconnect(v);
        }
    }

    tarjan
        .sccs
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .collect()
}

pub fn is_acyclic(h: &HierarchyModel) -> bool {
    find_cycles(h).is_empty()
}
