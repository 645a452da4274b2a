//! Editor configuration.
//!
//! Pixel thresholds are in screen pixels and divided by the current zoom at
//! hit-test time, so picking feels the same at every zoom level.

use serde::{Deserialize, Serialize};

use crate::transform::ZoomLimits;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorCfg {
    /// Maximum number of history entries kept (including the loaded state).
    pub history_limit: usize,
    pub zoom: ZoomLimits,
    /// Pick radius around vertices.
    pub vertex_hit_px: f64,
    /// Pick distance to polygon edges in View mode.
    pub edge_hit_px: f64,
    /// Radius around the first point that closes a polygon being created.
    pub close_radius_px: f64,
    /// Seed for polygon ids; `None` draws from OS entropy.
    pub id_seed: Option<u64>,
}

impl Default for EditorCfg {
    fn default() -> Self {
        Self {
            history_limit: 50,
            zoom: ZoomLimits::default(),
            vertex_hit_px: 8.0,
            edge_hit_px: 6.0,
            close_radius_px: 10.0,
            id_seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: EditorCfg =
            serde_json::from_str(r#"{"history_limit": 5, "zoom": {"min": 0.5, "max": 2.0}}"#)
                .unwrap();
        assert_eq!(cfg.history_limit, 5);
        assert_eq!(cfg.zoom.max, 2.0);
        assert_eq!(cfg.vertex_hit_px, EditorCfg::default().vertex_hit_px);
        assert_eq!(cfg.id_seed, None);
    }
}
