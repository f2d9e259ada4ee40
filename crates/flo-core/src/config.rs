//! Tunable interaction parameters.

use crate::route::RouteParams;

/// Configuration for snapping, hit testing, and routing.
///
/// Footprint sizes are not part of this: they are fixed constants of the
/// geometry module shared with every renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Maximum pointer-to-port distance for a drop to snap to a port. Default: **50**.
    pub snap_radius: f32,

    /// Radius around a port that counts as pressing on it. Default: **8**.
    pub port_hit_radius: f32,

    /// Distance from a routed connection that counts as hitting it. Default: **8**.
    pub connection_hit_tolerance: f32,

    /// Orthogonal router parameters.
    pub route: RouteParams,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_radius: 50.0,
            port_hit_radius: 8.0,
            connection_hit_tolerance: 8.0,
            route: RouteParams::default(),
        }
    }
}
