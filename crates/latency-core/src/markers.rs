use std::collections::HashMap;
use std::fmt;

use crate::band::LatencyBand;
use crate::model::{latency_text, LatencyMap, Region};

/// What a frontend should do in response to a user gesture on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ShowTraceroute(String),
}

/// Hover text of a marker: the region name over its latency.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub title: String,
    pub latency: Option<f64>,
}

impl Tooltip {
    pub fn detail(&self) -> String {
        format!("Latency: {}", latency_text(self.latency))
    }
}

impl fmt::Display for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<br>{}", self.title, self.detail())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub code: String,
    pub lat: f64,
    pub lon: f64,
    pub band: LatencyBand,
    pub tooltip: Tooltip,
    pub on_click: Command,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub created: usize,
    pub updated: usize,
}

/// Markers on the map surface, keyed by region code, in creation order.
///
/// Markers are never removed: a region that drops out of the feed keeps its last
/// colour and tooltip.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    markers: Vec<Marker>,
    index: HashMap<String, usize>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reconcile(&mut self, regions: &[Region], latencies: &LatencyMap) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();

        for region in regions {
            let latency = latencies.get(&region.code);
            let band = LatencyBand::classify(latency);
            let tooltip = Tooltip {
                title: region.name.clone(),
                latency,
            };

            if let Some(&slot) = self.index.get(&region.code) {
                let marker = &mut self.markers[slot];
                marker.band = band;
                marker.tooltip = tooltip;
                summary.updated += 1;
            } else {
                self.index.insert(region.code.clone(), self.markers.len());
                self.markers.push(Marker {
                    code: region.code.clone(),
                    lat: region.lat,
                    lon: region.lon,
                    band,
                    tooltip,
                    on_click: Command::ShowTraceroute(region.code.clone()),
                });
                summary.created += 1;
            }
        }

        tracing::debug!(
            created = summary.created,
            updated = summary.updated,
            total = self.markers.len(),
            "reconciled markers"
        );
        summary
    }

    pub fn get(&self, code: &str) -> Option<&Marker> {
        self.index.get(code).map(|&slot| &self.markers[slot])
    }

    /// Marker at `position` in creation order.
    pub fn nth(&self, position: usize) -> Option<&Marker> {
        self.markers.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> + '_ {
        self.markers.iter()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Nearest marker to `(lon, lat)` no further than `tolerance` degrees away.
    pub fn hit_test(&self, lon: f64, lat: f64, tolerance: f64) -> Option<&Marker> {
        self.markers
            .iter()
            .map(|marker| {
                let distance = (marker.lon - lon).hypot(marker.lat - lat);
                (marker, distance)
            })
            .filter(|(_, distance)| *distance <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(marker, _)| marker)
    }
}
