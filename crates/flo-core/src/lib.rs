//! Flowboard core: the flowchart data model and everything that can be
//! computed from it without an input device.
//!
//! - [`geometry`]: node footprints and port placement
//! - [`store`]: the [`Diagram`] entity store
//! - [`snap`]: nearest-port resolution for connection drops
//! - [`route`]: orthogonal connection routing

pub mod config;
pub mod error;
pub mod geometry;
pub mod id;
pub mod model;
pub mod route;
pub mod snap;
pub mod store;

pub use config::EditorConfig;
pub use error::{DiagramError, Result};
pub use geometry::{NODE_HEIGHT, NODE_WIDTH, Shape, node_bounds, node_contains, port_on, ports_for};
pub use id::{ConnectionId, NodeId};
pub use model::*;
pub use route::{RouteParams, distance_to_polyline, route_connection, route_orthogonal, svg_path};
pub use snap::find_nearest_port;
pub use store::{Diagram, DiagramEvent, DiagramMutation, RemovedNode, SubscriptionId};
