//! Dashboard state for polling region latency and rendering it as map markers,
//! a sorted table and traceroute lookups. The terminal and web frontends own the
//! network I/O and drawing; everything they display lives in [`Dashboard`].

pub mod band;
pub mod dashboard;
pub mod error;
pub mod markers;
pub mod model;
pub mod table;
pub mod traceroute;

pub use band::LatencyBand;
pub use dashboard::{Dashboard, Snapshot, POLL_INTERVAL_MS};
pub use error::FetchError;
pub use markers::{Command, Marker, MarkerRegistry, ReconcileSummary, Tooltip};
pub use model::{latency_text, LatencyMap, Region, TracerouteHop};
pub use table::{LatencyTable, SortMode, TableRow};
pub use traceroute::TraceroutePanel;

/// Endpoint paths, relative to the backend root.
pub mod api {
    pub const REGIONS: &str = "/api/regions";
    pub const LATENCY: &str = "/api/latency";

    pub fn traceroute(code: &str) -> String {
        format!("/api/traceroute/{code}")
    }
}
