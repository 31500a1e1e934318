//! Layout configuration.
//!
//! Options are a flat set of named values. Every field has a default, so a JSON object only needs
//! to carry the keys it wants to override (camelCase, e.g. `{"nodeDistance": 30}`).

use crate::error::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Depth grows along X, siblings spread along Y.
    #[default]
    Horizontal,
    /// Depth grows along Y, siblings spread along X.
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompactTreeOptions {
    pub orientation: Orientation,
    /// Follow incoming instead of outgoing edges.
    pub invert: bool,
    /// Resize containers of moved cells to fit their children.
    pub resize_parent: bool,
    /// Keep the top-left corner of the layout parent where it was.
    pub maintain_parent_location: bool,
    pub group_padding: f64,
    pub group_padding_top: f64,
    pub group_padding_right: f64,
    pub group_padding_bottom: f64,
    pub group_padding_left: f64,
    /// Place the tree at the grid origin instead of keeping the root where it is.
    pub move_tree: bool,
    /// Gap between a parent and its children along the depth axis.
    pub level_distance: f64,
    /// Lateral margin kept on each side of a node.
    pub node_distance: f64,
    /// Clear the waypoints of every traversed edge.
    pub reset_edges: bool,
    /// Preferred distance between edges leaving the same vertex side.
    pub pref_hoz_edge_sep: f64,
    /// Step between the jetty offsets of neighbouring edges.
    pub pref_vert_edge_off: f64,
    /// Minimum length of an edge jetty.
    pub min_edge_jetty: f64,
    /// Reserved buffer in the middle of inter-rank channels. Not used by the router yet.
    pub channel_buffer: f64,
    /// Compute jetty waypoints for tree edges.
    pub edge_routing: bool,
    /// Order outgoing edges by the path of their opposite terminal.
    pub sort_edges: bool,
    /// Give every node of a rank the height of the tallest one.
    pub align_ranks: bool,
    /// Layout origin used when `move_tree` is set or the root has no geometry.
    pub grid_size: f64,
}

impl Default for CompactTreeOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            invert: false,
            resize_parent: true,
            maintain_parent_location: false,
            group_padding: 10.0,
            group_padding_top: 0.0,
            group_padding_right: 0.0,
            group_padding_bottom: 0.0,
            group_padding_left: 0.0,
            move_tree: false,
            level_distance: 10.0,
            node_distance: 20.0,
            reset_edges: true,
            pref_hoz_edge_sep: 5.0,
            pref_vert_edge_off: 4.0,
            min_edge_jetty: 8.0,
            channel_buffer: 4.0,
            edge_routing: true,
            sort_edges: false,
            align_ranks: false,
            grid_size: 10.0,
        }
    }
}

impl CompactTreeOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn is_horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }
}
