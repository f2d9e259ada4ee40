//! Orthogonal connection routing.
//!
//! Produces a Z-shaped polyline `start → bend → bend → end` made only of
//! horizontal and vertical segments. The bend sits at a fixed fraction of
//! the way along the dominant axis of travel. If the bend segment would cut
//! through a node (padded by a margin), it is pushed outside that node on
//! the side facing `start`.
//!
//! This is a best-effort router: only the first obstacle hit is avoided, so
//! crowded diagrams may still produce crossings. The result is a pure
//! function of its inputs and always starts at `start` and ends at `end`.

use crate::geometry::{node_bounds, port_on};
use crate::id::ConnectionId;
use crate::model::*;
use crate::store::Diagram;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Router parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteParams {
    /// Where the bend sits between start and end on the dominant axis,
    /// clamped to `0.0..=1.0`. Default: **0.6**.
    pub bend_fraction: f32,

    /// Clearance kept around obstacle nodes. Default: **20**.
    pub padding: f32,
}

impl Default for RouteParams {
    fn default() -> Self {
        Self {
            bend_fraction: 0.6,
            padding: 20.0,
        }
    }
}

/// Route an orthogonal polyline from `start` to `end` around `obstacles`.
///
/// The result always has four points: `start`, two bend points, `end`.
pub fn route_orthogonal(
    start: Point,
    end: Point,
    obstacles: &[Rect],
    params: &RouteParams,
) -> Vec<Point> {
    let horizontal = (end.x - start.x).abs() >= (end.y - start.y).abs();

    // (main, cross) coordinates: main is the dominant axis.
    let along = |p: Point| if horizontal { (p.x, p.y) } else { (p.y, p.x) };
    let (start_main, start_cross) = along(start);
    let (end_main, end_cross) = along(end);
    let cross_lo = start_cross.min(end_cross);
    let cross_hi = start_cross.max(end_cross);

    let fraction = params.bend_fraction.clamp(0.0, 1.0);
    let mut bend = start_main + (end_main - start_main) * fraction;

    for rect in obstacles {
        let r = rect.inflate(params.padding);
        let (main_lo, main_hi, obs_cross_lo, obs_cross_hi) = if horizontal {
            (r.left(), r.right(), r.top(), r.bottom())
        } else {
            (r.top(), r.bottom(), r.left(), r.right())
        };
        let cuts = bend > main_lo
            && bend < main_hi
            && cross_hi > obs_cross_lo
            && cross_lo < obs_cross_hi;
        if cuts {
            let center = (main_lo + main_hi) / 2.0;
            bend = if start_main < center { main_lo } else { main_hi };
            log::trace!("route bend moved to {bend} around {rect:?}");
            break;
        }
    }

    if horizontal {
        vec![
            start,
            Point::new(bend, start.y),
            Point::new(bend, end.y),
            end,
        ]
    } else {
        vec![
            start,
            Point::new(start.x, bend),
            Point::new(end.x, bend),
            end,
        ]
    }
}

/// Route a committed connection between its ports, treating every other
/// node as an obstacle. A connection without a recorded port attaches to
/// the source's right side and the target's left side.
pub fn route_connection(diagram: &Diagram, id: ConnectionId, params: &RouteParams) -> Option<Vec<Point>> {
    let conn = diagram.connection(id)?;
    let source = diagram.node(conn.source)?;
    let target = diagram.node(conn.target)?;
    let start = anchor(source, conn.source_port.unwrap_or(Side::Right));
    let end = anchor(target, conn.target_port.unwrap_or(Side::Left));
    let obstacles = diagram.obstacles(&[conn.source, conn.target]);
    Some(route_orthogonal(start, end, &obstacles, params))
}

/// Where a connection attaches on `side` of `node`: the port there, or the
/// midpoint of that side of the footprint when the kind has no such port.
pub fn anchor(node: &Node, side: Side) -> Point {
    if let Some(port) = port_on(node, side) {
        return port.position;
    }
    let b = node_bounds(node);
    match side {
        Side::Left => Point::new(b.left(), b.center().y),
        Side::Right => Point::new(b.right(), b.center().y),
        Side::Top => Point::new(b.center().x, b.top()),
        Side::Bottom => Point::new(b.center().x, b.bottom()),
    }
}

/// SVG path data (`M x y L x y ...`) for a polyline.
pub fn svg_path(points: &[Point]) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        if i > 0 {
            d.push(' ');
        }
        let _ = write!(d, "{cmd} {} {}", p.x, p.y);
    }
    d
}

/// Shortest distance from `p` to any segment of the polyline.
/// Returns `f32::INFINITY` for an empty polyline.
pub fn distance_to_polyline(p: Point, points: &[Point]) -> f32 {
    match points {
        [] => f32::INFINITY,
        [only] => p.distance(*only),
        _ => points
            .windows(2)
            .map(|w| distance_to_segment(p, w[0], w[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (vx, vy) = (b.x - a.x, b.y - a.y);
    let len_sq = vx * vx + vy * vy;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * vx + (p.y - a.y) * vy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * vx, a.y + t * vy))
}
