use std::cmp::Ordering;

use crate::band::LatencyBand;
use crate::model::{latency_text, LatencyMap};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    #[default]
    Latency,
    Region,
}

impl SortMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Latency => Self::Region,
            Self::Region => Self::Latency,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Latency => "latency",
            Self::Region => "region",
        }
    }
}

/// Column headings shared by every frontend.
pub const COLUMNS: [&str; 2] = ["Region", "Latency"];

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TableRow {
    pub region: String,
    pub latency: Option<f64>,
}

impl TableRow {
    pub fn latency_text(&self) -> String {
        latency_text(self.latency)
    }

    pub fn band(&self) -> LatencyBand {
        LatencyBand::classify(self.latency)
    }

    /// Display cells in `COLUMNS` order.
    pub fn cells(&self) -> [String; 2] {
        [self.region.clone(), self.latency_text()]
    }
}

/// The region/latency table, rebuilt from scratch on every render.
#[derive(Debug, Default)]
pub struct LatencyTable {
    rows: Vec<TableRow>,
    sort: SortMode,
}

impl LatencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, latencies: &LatencyMap) {
        self.rows.clear();
        self.rows.extend(latencies.iter().map(|(region, latency)| TableRow {
            region: region.to_string(),
            latency,
        }));
        self.sort_rows();

        tracing::debug!(rows = self.rows.len(), sort = self.sort.label(), "rendered latency table");
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn title(&self) -> String {
        format!("Latency (sorted by {})", self.sort.label())
    }

    pub const fn sort_mode(&self) -> SortMode {
        self.sort
    }

    /// Switches the sort mode and reorders the current rows.
    pub fn set_sort_mode(&mut self, sort: SortMode) {
        self.sort = sort;
        self.sort_rows();
    }

    fn sort_rows(&mut self) {
        match self.sort {
            SortMode::Latency => self
                .rows
                .sort_by(|a, b| compare_latency(a.latency, b.latency)),
            SortMode::Region => self.rows.sort_by(|a, b| a.region.cmp(&b.region)),
        }
    }
}

/// Ascending, missing latencies last. `sort_by` is stable, so equal keys keep the
/// backend's order.
fn compare_latency(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
