use sirenia::graph::{CellId, Model, Point};
use sirenia::{CompactTreeLayout, CompactTreeOptions, Error, Orientation};

fn pos(m: &Model, cell: CellId) -> (f64, f64) {
    let g = m.geometry(cell).unwrap();
    (g.x, g.y)
}

/// Root `r` (40x30 at 10,10) with leaf children 40x20, 40x30, 40x20.
fn three_leaf_tree() -> (Model, CellId, [CellId; 3]) {
    let mut m = Model::new();
    let layer = m.default_parent();
    let r = m.insert_vertex(layer, "r", 10.0, 10.0, 40.0, 30.0).unwrap();
    let a = m.insert_vertex(layer, "a", 0.0, 0.0, 40.0, 20.0).unwrap();
    let b = m.insert_vertex(layer, "b", 0.0, 0.0, 40.0, 30.0).unwrap();
    let c = m.insert_vertex(layer, "c", 0.0, 0.0, 40.0, 20.0).unwrap();
    m.insert_edge(layer, "ra", r, a).unwrap();
    m.insert_edge(layer, "rb", r, b).unwrap();
    m.insert_edge(layer, "rc", r, c).unwrap();
    (m, r, [a, b, c])
}

#[test]
fn compact_tree_horizontal_three_leaves_exact_positions() {
    let (mut m, r, [a, b, c]) = three_leaf_tree();
    let layer = m.default_parent();

    let tree = CompactTreeLayout::default()
        .execute(&mut m, layer, None)
        .unwrap()
        .expect("a root is found");

    // Children are packed 2 * nodeDistance apart; the tree is then moved down so nothing
    // sits above the origin.
    assert_eq!(pos(&m, r), (10.0, 70.0));
    assert_eq!(pos(&m, a), (80.0, 10.0));
    assert_eq!(pos(&m, b), (80.0, 70.0));
    assert_eq!(pos(&m, c), (80.0, 140.0));

    assert_eq!(tree.node(tree.root()).cell, r);
    let kids: Vec<CellId> = tree.children(tree.root()).map(|id| tree.node(id).cell).collect();
    assert_eq!(kids, vec![a, b, c]);

    let bounds = tree.bounds().unwrap();
    assert_eq!((bounds.x, bounds.y), (10.0, 10.0));
    assert_eq!((bounds.right(), bounds.bottom()), (120.0, 160.0));
}

#[test]
fn compact_tree_vertical_three_leaves_exact_positions() {
    let (mut m, r, [a, b, c]) = three_leaf_tree();
    let layer = m.default_parent();

    let layout = CompactTreeLayout::new(CompactTreeOptions {
        orientation: Orientation::Vertical,
        ..Default::default()
    });
    layout.execute(&mut m, layer, None).unwrap().unwrap();

    assert_eq!(pos(&m, r), (90.0, 10.0));
    assert_eq!(pos(&m, a), (10.0, 70.0));
    assert_eq!(pos(&m, b), (90.0, 70.0));
    assert_eq!(pos(&m, c), (170.0, 70.0));
}

#[test]
fn compact_tree_move_tree_starts_at_grid_origin() {
    let (mut m, r, [a, ..]) = three_leaf_tree();
    let layer = m.default_parent();
    // Wherever the root was, the layout is seeded at (gridSize, gridSize).
    m.set_geometry(r, Some(sirenia::graph::Geometry::new(500.0, 400.0, 40.0, 30.0)))
        .unwrap();

    let layout = CompactTreeLayout::new(CompactTreeOptions {
        move_tree: true,
        ..Default::default()
    });
    layout.execute(&mut m, layer, None).unwrap().unwrap();

    assert_eq!(pos(&m, r), (10.0, 70.0));
    assert_eq!(pos(&m, a), (80.0, 10.0));
}

#[test]
fn compact_tree_rerun_is_idempotent() {
    let (mut m, r, kids) = three_leaf_tree();
    let layer = m.default_parent();
    let layout = CompactTreeLayout::default();

    layout.execute(&mut m, layer, None).unwrap().unwrap();
    let first: Vec<(f64, f64)> = std::iter::once(r).chain(kids).map(|c| pos(&m, c)).collect();
    let first_points: Vec<Option<Vec<Point>>> = ["ra", "rb", "rc"]
        .iter()
        .map(|id| m.edge_points(m.cell(id).unwrap()).map(<[Point]>::to_vec))
        .collect();

    layout.execute(&mut m, layer, None).unwrap().unwrap();
    let second: Vec<(f64, f64)> = std::iter::once(r).chain(kids).map(|c| pos(&m, c)).collect();
    let second_points: Vec<Option<Vec<Point>>> = ["ra", "rb", "rc"]
        .iter()
        .map(|id| m.edge_points(m.cell(id).unwrap()).map(<[Point]>::to_vec))
        .collect();

    assert_eq!(first, second);
    assert_eq!(first_points, second_points);
}

#[test]
fn compact_tree_without_root_is_a_no_op() {
    let mut m = Model::new();
    let layer = m.default_parent();
    let a = m.insert_vertex(layer, "a", 3.0, 4.0, 40.0, 30.0).unwrap();
    m.insert_vertex(layer, "b", 5.0, 6.0, 40.0, 30.0).unwrap();
    let revision = m.revision();

    let out = CompactTreeLayout::default().execute(&mut m, layer, None).unwrap();
    assert!(out.is_none());
    assert_eq!(m.revision(), revision);
    assert_eq!(m.update_level(), 0);
    assert_eq!(pos(&m, a), (3.0, 4.0));
}

#[test]
fn compact_tree_prunes_cycles() {
    let mut m = Model::new();
    let layer = m.default_parent();
    let a = m.insert_vertex(layer, "a", 0.0, 0.0, 40.0, 30.0).unwrap();
    let b = m.insert_vertex(layer, "b", 0.0, 0.0, 40.0, 30.0).unwrap();
    let c = m.insert_vertex(layer, "c", 0.0, 0.0, 40.0, 30.0).unwrap();
    m.insert_edge(layer, "ab", a, b).unwrap();
    m.insert_edge(layer, "bc", b, c).unwrap();
    m.insert_edge(layer, "ca", c, a).unwrap();
    m.insert_edge(layer, "ac", a, c).unwrap();

    let tree = CompactTreeLayout::default()
        .execute(&mut m, layer, Some(a))
        .unwrap()
        .unwrap();

    assert_eq!(tree.len(), 3);
    let mut cells: Vec<CellId> = tree.nodes().map(|(_, n)| n.cell).collect();
    cells.sort();
    assert_eq!(cells, vec![a, b, c]);
    // `c` is reached through `b` first; the direct a->c edge does not enter it again.
    let root_kids: Vec<CellId> = tree.children(tree.root()).map(|id| tree.node(id).cell).collect();
    assert_eq!(root_kids, vec![b]);
}

#[test]
fn compact_tree_align_ranks_uses_tallest_node_per_rank() {
    let mut m = Model::new();
    let layer = m.default_parent();
    let r = m.insert_vertex(layer, "r", 10.0, 10.0, 40.0, 30.0).unwrap();
    // In a horizontal layout the depth size of a node is its geometry width.
    for (id, w) in [("a", 10.0), ("b", 30.0), ("c", 10.0)] {
        let v = m.insert_vertex(layer, id, 0.0, 0.0, w, 20.0).unwrap();
        m.insert_edge(layer, format!("r{id}"), r, v).unwrap();
    }

    let layout = CompactTreeLayout::new(CompactTreeOptions {
        align_ranks: true,
        ..Default::default()
    });
    let tree = layout.execute(&mut m, layer, None).unwrap().unwrap();

    let heights: Vec<f64> = tree.children(tree.root()).map(|id| tree.node(id).height).collect();
    assert_eq!(heights, vec![30.0, 30.0, 30.0]);
    let xs: Vec<f64> = tree.children(tree.root()).map(|id| tree.node(id).x).collect();
    assert_eq!(xs, vec![80.0, 80.0, 80.0]);
}

#[test]
fn compact_tree_edge_routing_three_children() {
    let (mut m, _, _) = three_leaf_tree();
    let layer = m.default_parent();
    CompactTreeLayout::default().execute(&mut m, layer, None).unwrap().unwrap();

    let points = |id: &str| m.edge_points(m.cell(id).unwrap()).unwrap().to_vec();
    // Root spans y 70..100 and has no room for an end buffer: exits at 75, 85, 95.
    assert_eq!(
        points("ra"),
        vec![Point::new(50.0, 75.0), Point::new(54.0, 75.0), Point::new(54.0, 20.0)]
    );
    assert_eq!(
        points("rb"),
        vec![Point::new(50.0, 85.0), Point::new(58.0, 85.0), Point::new(58.0, 85.0)]
    );
    assert_eq!(
        points("rc"),
        vec![Point::new(50.0, 95.0), Point::new(62.0, 95.0), Point::new(62.0, 150.0)]
    );
    assert!(!m.is_edge_style_enabled(m.cell("ra").unwrap()));
}

#[test]
fn compact_tree_edge_routing_spreads_four_exits_symmetrically() {
    let mut m = Model::new();
    let layer = m.default_parent();
    let r = m.insert_vertex(layer, "r", 10.0, 10.0, 40.0, 100.0).unwrap();
    let mut edges = Vec::new();
    for i in 0..4 {
        let v = m.insert_vertex(layer, format!("c{i}"), 0.0, 0.0, 40.0, 20.0).unwrap();
        edges.push(m.insert_edge(layer, format!("e{i}"), r, v).unwrap());
    }

    let opts = CompactTreeOptions::default();
    CompactTreeLayout::new(opts.clone())
        .execute(&mut m, layer, None)
        .unwrap()
        .unwrap();

    let rb = m.geometry(r).unwrap().bounds();
    assert_eq!((rb.x, rb.y), (10.0, 60.0));

    let exits: Vec<f64> = edges
        .iter()
        .map(|&e| m.edge_points(e).unwrap()[0].y - rb.y)
        .collect();
    assert_eq!(exits, vec![16.25, 38.75, 61.25, 83.75]);

    let mid = rb.height / 2.0;
    for i in 0..exits.len() {
        let mirrored = exits[exits.len() - 1 - i];
        assert!((mid - exits[i] - (mirrored - mid)).abs() < 1e-9);
    }
    for pair in exits.windows(2) {
        assert!(pair[1] - pair[0] >= opts.pref_hoz_edge_sep);
    }

    // Jetties lengthen towards the middle; the two middle children share one length.
    let jetties: Vec<f64> = edges
        .iter()
        .map(|&e| {
            let p = m.edge_points(e).unwrap();
            p[1].x - p[0].x
        })
        .collect();
    assert_eq!(jetties, vec![4.0, 8.0, 12.0, 12.0]);
}

#[test]
fn compact_tree_resizes_container_around_children() {
    let mut m = Model::new();
    let layer = m.default_parent();
    let g = m.insert_vertex(layer, "g", 100.0, 100.0, 10.0, 10.0).unwrap();
    let a = m.insert_vertex(g, "a", 0.0, 0.0, 40.0, 30.0).unwrap();
    let b = m.insert_vertex(g, "b", 0.0, 0.0, 40.0, 20.0).unwrap();
    let e = m.insert_edge(g, "ab", a, b).unwrap();

    let tree = CompactTreeLayout::default().execute(&mut m, g, None).unwrap().unwrap();
    assert_eq!(tree.node(tree.root()).cell, a);

    // Laid out at a (0,0), b (70,5); the container then wraps them with 10 of padding and
    // moves up-left by the same 10.
    let geo = m.geometry(g).unwrap();
    assert_eq!((geo.x, geo.y, geo.width, geo.height), (90.0, 90.0, 130.0, 50.0));
    assert_eq!(pos(&m, a), (10.0, 10.0));
    assert_eq!(pos(&m, b), (80.0, 15.0));
    assert_eq!(
        m.edge_points(e).unwrap(),
        &[Point::new(50.0, 25.0), Point::new(54.0, 25.0), Point::new(54.0, 25.0)]
    );
}

#[test]
fn compact_tree_resize_keeps_children_in_place_on_the_layer() {
    let mut m = Model::new();
    let layer = m.default_parent();
    let g = m.insert_vertex(layer, "g", 100.0, 100.0, 10.0, 10.0).unwrap();
    let a = m.insert_vertex(g, "a", 50.0, 50.0, 40.0, 30.0).unwrap();
    let b = m.insert_vertex(g, "b", 0.0, 0.0, 40.0, 20.0).unwrap();
    m.insert_edge(g, "ab", a, b).unwrap();

    let absolute = |m: &Model, cell: CellId| {
        let (gx, gy) = pos(m, g);
        let (x, y) = pos(m, cell);
        (gx + x, gy + y)
    };
    assert_eq!(absolute(&m, a), (150.0, 150.0));

    CompactTreeLayout::default().execute(&mut m, g, None).unwrap().unwrap();

    let geo = m.geometry(g).unwrap();
    assert_eq!((geo.x, geo.y, geo.width, geo.height), (140.0, 140.0, 130.0, 50.0));
    assert_eq!(pos(&m, a), (10.0, 10.0));
    assert_eq!(absolute(&m, a), (150.0, 150.0));
    assert_eq!(absolute(&m, b), (220.0, 155.0));
}

#[test]
fn compact_tree_keeps_container_size_without_resize_parent() {
    let mut m = Model::new();
    let layer = m.default_parent();
    let g = m.insert_vertex(layer, "g", 100.0, 100.0, 10.0, 10.0).unwrap();
    let a = m.insert_vertex(g, "a", 0.0, 0.0, 40.0, 30.0).unwrap();
    let b = m.insert_vertex(g, "b", 0.0, 0.0, 40.0, 20.0).unwrap();
    m.insert_edge(g, "ab", a, b).unwrap();

    let layout = CompactTreeLayout::new(CompactTreeOptions {
        resize_parent: false,
        ..Default::default()
    });
    layout.execute(&mut m, g, None).unwrap().unwrap();

    let geo = m.geometry(g).unwrap();
    assert_eq!((geo.width, geo.height), (10.0, 10.0));
    assert_eq!(pos(&m, b), (70.0, 5.0));
}

#[test]
fn compact_tree_wide_fan_keeps_sibling_order_and_spacing() {
    let mut m = Model::new();
    let layer = m.default_parent();
    let r = m.insert_vertex(layer, "r", 10.0, 10.0, 40.0, 20.0).unwrap();
    let leaves: Vec<CellId> = (0..40)
        .map(|i| {
            let leaf = m.insert_vertex(layer, format!("l{i}"), 0.0, 0.0, 40.0, 20.0).unwrap();
            m.insert_edge(layer, format!("e{i}"), r, leaf).unwrap();
            leaf
        })
        .collect();

    let tree = CompactTreeLayout::default().execute(&mut m, layer, None).unwrap().unwrap();

    let kids: Vec<CellId> = tree.children(tree.root()).map(|id| tree.node(id).cell).collect();
    assert_eq!(kids, leaves);
    // Equal leaves sit one height plus twice the node distance apart.
    for pair in leaves.windows(2) {
        let (x0, y0) = pos(&m, pair[0]);
        let (x1, y1) = pos(&m, pair[1]);
        assert_eq!(x0, x1);
        assert_eq!(y1 - y0, 60.0);
    }
    assert_eq!(pos(&m, leaves[0]).1, 10.0);
}

#[test]
fn compact_tree_invert_follows_incoming_edges() {
    let mut m = Model::new();
    let layer = m.default_parent();
    let r = m.insert_vertex(layer, "r", 10.0, 10.0, 40.0, 30.0).unwrap();
    let a = m.insert_vertex(layer, "a", 0.0, 0.0, 40.0, 20.0).unwrap();
    let b = m.insert_vertex(layer, "b", 0.0, 0.0, 40.0, 20.0).unwrap();
    m.insert_edge(layer, "ar", a, r).unwrap();
    m.insert_edge(layer, "br", b, r).unwrap();

    assert!(CompactTreeLayout::default().execute(&mut m, layer, None).unwrap().is_some());

    let layout = CompactTreeLayout::new(CompactTreeOptions {
        invert: true,
        ..Default::default()
    });
    let tree = layout.execute(&mut m, layer, None).unwrap().unwrap();
    assert_eq!(tree.node(tree.root()).cell, r);
    let kids: Vec<CellId> = tree.children(tree.root()).map(|id| tree.node(id).cell).collect();
    assert_eq!(kids, vec![a, b]);
    let (rx, _) = pos(&m, r);
    assert_eq!(pos(&m, a).0, rx + 40.0 + 30.0);
    assert_eq!(pos(&m, b).0, rx + 40.0 + 30.0);
}

#[test]
fn compact_tree_sort_edges_orders_children_by_model_path() {
    let build = || {
        let mut m = Model::new();
        let layer = m.default_parent();
        let r = m.insert_vertex(layer, "r", 10.0, 10.0, 40.0, 30.0).unwrap();
        let first = m.insert_vertex(layer, "first", 0.0, 0.0, 40.0, 20.0).unwrap();
        let second = m.insert_vertex(layer, "second", 0.0, 0.0, 40.0, 20.0).unwrap();
        // Edges are inserted in the opposite order of their targets.
        m.insert_edge(layer, "r2", r, second).unwrap();
        m.insert_edge(layer, "r1", r, first).unwrap();
        (m, first, second)
    };

    let (mut m, first, second) = build();
    let layer = m.default_parent();
    CompactTreeLayout::default().execute(&mut m, layer, None).unwrap();
    assert!(pos(&m, second).1 < pos(&m, first).1);

    let (mut m, first, second) = build();
    let layout = CompactTreeLayout::new(CompactTreeOptions {
        sort_edges: true,
        ..Default::default()
    });
    layout.execute(&mut m, layer, None).unwrap();
    assert!(pos(&m, first).1 < pos(&m, second).1);
}

#[test]
fn compact_tree_reset_edges_clears_waypoints_without_routing() {
    let (mut m, _, _) = three_leaf_tree();
    let layer = m.default_parent();
    let ra = m.cell("ra").unwrap();
    m.set_edge_points(ra, Some(vec![Point::new(1.0, 2.0)])).unwrap();

    let layout = CompactTreeLayout::new(CompactTreeOptions {
        edge_routing: false,
        ..Default::default()
    });
    layout.execute(&mut m, layer, None).unwrap().unwrap();

    assert_eq!(m.edge_points(ra), None);
    assert!(m.is_edge_style_enabled(ra));
}

#[test]
fn compact_tree_leaves_immovable_cells_in_place() {
    let (mut m, r, [a, ..]) = three_leaf_tree();
    let layer = m.default_parent();
    m.set_movable(r, false).unwrap();

    CompactTreeLayout::default().execute(&mut m, layer, None).unwrap().unwrap();
    assert_eq!(pos(&m, r), (10.0, 10.0));
    assert_eq!(pos(&m, a), (80.0, 10.0));
}

#[test]
fn compact_tree_rejects_unknown_cells() {
    let (mut m, _, _) = three_leaf_tree();
    let mut other = Model::new();
    let layer = other.default_parent();
    for i in 0..20 {
        other.insert_vertex(layer, format!("v{i}"), 0.0, 0.0, 1.0, 1.0).unwrap();
    }
    let foreign = other.cell("v19").unwrap();

    let err = CompactTreeLayout::default().execute(&mut m, foreign, None).unwrap_err();
    assert!(matches!(err, Error::UnknownCell { .. }));
}
