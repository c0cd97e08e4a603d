use crate::error::FetchError;
use crate::markers::{Marker, MarkerRegistry};
use crate::model::{LatencyMap, Region, TracerouteHop};
use crate::table::LatencyTable;
use crate::traceroute::TraceroutePanel;

/// Time between the starts of two polling cycles.
pub const POLL_INTERVAL_MS: u64 = 2000;

/// Both halves of one polling cycle, fetched together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub regions: Vec<Region>,
    pub latencies: LatencyMap,
}

/// Everything the dashboard displays.
///
/// Frontends own one `Dashboard`, feed it fetch results in the order they arrive and
/// draw from it. Results are never reordered: a slow cycle that lands after a newer one
/// overwrites it.
#[derive(Debug, Default)]
pub struct Dashboard {
    markers: MarkerRegistry,
    table: LatencyTable,
    traceroute: TraceroutePanel,
    error: Option<String>,
    selected: Option<usize>,
    in_flight: usize,
    completed_cycles: u64,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a polling cycle as started. Cycles may overlap.
    pub fn begin_cycle(&mut self) {
        self.in_flight += 1;
    }

    pub fn apply_cycle(&mut self, result: Result<Snapshot, FetchError>) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match result {
            Ok(snapshot) => {
                self.markers.reconcile(&snapshot.regions, &snapshot.latencies);
                self.table.render(&snapshot.latencies);
                self.error = None;
                self.completed_cycles += 1;
                if self.selected.is_none() && !self.markers.is_empty() {
                    self.selected = Some(0);
                }
            }
            Err(error) => {
                tracing::warn!(%error, "polling cycle failed");
                self.error = Some(format!("Error fetching data: {error}"));
            }
        }
    }

    /// Forgets a cycle that ended without a result, e.g. because its task died.
    pub fn abandon_cycle(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Opens the traceroute panel on `code`; the caller issues the request.
    pub fn show_traceroute(&mut self, code: &str) {
        tracing::info!(code, "traceroute requested");
        self.traceroute = TraceroutePanel::Pending {
            code: code.to_string(),
        };
    }

    /// Applies a traceroute response. Whichever response arrives last is shown, even if
    /// another region was clicked in the meantime.
    pub fn apply_traceroute(
        &mut self,
        code: &str,
        result: Result<Option<Vec<TracerouteHop>>, FetchError>,
    ) {
        match result {
            Ok(hops) => {
                self.traceroute = TraceroutePanel::from_hops(code.to_string(), hops);
            }
            Err(error) => {
                tracing::warn!(code, %error, "traceroute failed");
                self.error = Some(format!("Error fetching traceroute data: {error}"));
            }
        }
    }

    pub fn report_uncaught(&mut self, message: &str) {
        tracing::error!(message, "uncaught error");
        self.error = Some(format!("Uncaught error: {message}"));
    }

    pub fn toggle_sort(&mut self) {
        let next = self.table.sort_mode().toggled();
        self.table.set_sort_mode(next);
    }

    pub fn select_next(&mut self) {
        let len = self.markers.len();
        if len == 0 {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |index| (index + 1) % len));
    }

    pub fn select_previous(&mut self) {
        let len = self.markers.len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => len - 1,
            Some(index) => index - 1,
        });
    }

    pub fn select_code(&mut self, code: &str) {
        if let Some(position) = self.markers.iter().position(|marker| marker.code == code) {
            self.selected = Some(position);
        }
    }

    pub fn selected_marker(&self) -> Option<&Marker> {
        self.selected.and_then(|index| self.markers.nth(index))
    }

    pub const fn markers(&self) -> &MarkerRegistry {
        &self.markers
    }

    pub const fn table(&self) -> &LatencyTable {
        &self.table
    }

    pub const fn traceroute(&self) -> &TraceroutePanel {
        &self.traceroute
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub const fn is_fetching(&self) -> bool {
        self.in_flight > 0
    }

    pub const fn completed_cycles(&self) -> u64 {
        self.completed_cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::band::LatencyBand;
    use crate::markers::Command;

    fn snapshot() -> Snapshot {
        Snapshot {
            regions: vec![
                Region {
                    code: "us".to_string(),
                    name: "US".to_string(),
                    lat: 0.0,
                    lon: 0.0,
                },
                Region {
                    code: "eu".to_string(),
                    name: "Europe".to_string(),
                    lat: 50.0,
                    lon: 8.0,
                },
            ],
            latencies: [("us", Some(42.0)), ("eu", None)].into_iter().collect(),
        }
    }

    #[test]
    fn successful_cycle_updates_markers_table_and_clears_error() {
        let mut dashboard = Dashboard::new();
        dashboard.report_uncaught("boom");

        dashboard.begin_cycle();
        assert!(dashboard.is_fetching());
        dashboard.apply_cycle(Ok(snapshot()));

        assert!(!dashboard.is_fetching());
        assert_eq!(dashboard.error(), None);
        assert_eq!(dashboard.markers().len(), 2);
        assert_eq!(dashboard.table().rows()[0].region, "us");
        assert_eq!(dashboard.completed_cycles(), 1);
        assert_eq!(
            dashboard.selected_marker().map(|m| m.code.as_str()),
            Some("us")
        );
    }

    #[test]
    fn failed_cycle_keeps_previous_render() {
        let mut dashboard = Dashboard::new();
        dashboard.begin_cycle();
        dashboard.apply_cycle(Ok(snapshot()));
        let rows = dashboard.table().rows().to_vec();

        dashboard.begin_cycle();
        dashboard.apply_cycle(Err(FetchError::Status(500)));

        assert_eq!(
            dashboard.error(),
            Some("Error fetching data: HTTP error! status: 500")
        );
        assert_eq!(dashboard.table().rows(), rows.as_slice());
        assert_eq!(dashboard.markers().len(), 2);
        assert_eq!(
            dashboard.markers().get("us").map(|m| m.band),
            Some(LatencyBand::Yellow)
        );
    }

    #[test]
    fn failed_first_cycle_creates_nothing() {
        let mut dashboard = Dashboard::new();
        dashboard.begin_cycle();
        dashboard.apply_cycle(Err(FetchError::Status(500)));

        assert!(dashboard.markers().is_empty());
        assert!(dashboard.table().rows().is_empty());
        assert_eq!(dashboard.completed_cycles(), 0);
    }

    #[test]
    fn stale_cycle_landing_last_wins() {
        let mut dashboard = Dashboard::new();
        dashboard.begin_cycle();
        dashboard.begin_cycle();

        let mut fresh = snapshot();
        fresh.latencies = [("us", Some(0.5)), ("eu", Some(0.5))].into_iter().collect();
        dashboard.apply_cycle(Ok(fresh));
        assert!(dashboard.is_fetching());
        dashboard.apply_cycle(Ok(snapshot()));

        assert_eq!(
            dashboard.markers().get("us").map(|m| m.band),
            Some(LatencyBand::Yellow)
        );
        assert!(!dashboard.is_fetching());
    }

    #[test]
    fn traceroute_success_replaces_pending_header() {
        let mut dashboard = Dashboard::new();
        dashboard.show_traceroute("eu");
        assert_eq!(
            dashboard.traceroute().header().as_deref(),
            Some("Traceroute to eu")
        );
        assert!(dashboard.traceroute().rows().is_empty());

        dashboard.apply_traceroute(
            "eu",
            Ok(Some(vec![TracerouteHop {
                hop: 1,
                ip: "10.0.0.1".to_string(),
                rtt: Some(1.234),
            }])),
        );

        assert_eq!(dashboard.traceroute().rows().len(), 1);
    }

    #[test]
    fn traceroute_failure_sets_error_and_keeps_header_only() {
        let mut dashboard = Dashboard::new();
        dashboard.show_traceroute("eu");
        dashboard.apply_traceroute("eu", Err(FetchError::Status(404)));

        assert_eq!(
            dashboard.error(),
            Some("Error fetching traceroute data: HTTP error! status: 404")
        );
        assert_eq!(
            dashboard.traceroute(),
            &TraceroutePanel::Pending {
                code: "eu".to_string()
            }
        );
    }

    #[test]
    fn late_traceroute_response_wins() {
        let mut dashboard = Dashboard::new();
        dashboard.show_traceroute("us");
        dashboard.show_traceroute("eu");
        dashboard.apply_traceroute("eu", Ok(None));
        dashboard.apply_traceroute("us", Ok(Some(Vec::new())));

        assert_eq!(dashboard.traceroute().code(), Some("us"));
    }

    #[test]
    fn selection_wraps_and_resolves_click_command() {
        let mut dashboard = Dashboard::new();
        dashboard.select_next();
        assert!(dashboard.selected_marker().is_none());

        dashboard.apply_cycle(Ok(snapshot()));
        dashboard.select_previous();
        assert_eq!(
            dashboard.selected_marker().map(|m| m.code.as_str()),
            Some("eu")
        );
        dashboard.select_next();
        assert_eq!(
            dashboard.selected_marker().map(|m| m.on_click.clone()),
            Some(Command::ShowTraceroute("us".to_string()))
        );

        dashboard.select_code("eu");
        assert_eq!(
            dashboard.selected_marker().map(|m| m.code.as_str()),
            Some("eu")
        );
    }

    #[test]
    fn uncaught_errors_replace_the_message() {
        let mut dashboard = Dashboard::new();
        dashboard.apply_cycle(Err(FetchError::Transport("offline".to_string())));
        dashboard.report_uncaught("undefined is not a function");

        assert_eq!(
            dashboard.error(),
            Some("Uncaught error: undefined is not a function")
        );
    }
}
