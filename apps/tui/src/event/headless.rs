use color_eyre::eyre::eyre;
use color_eyre::Result;
use latency_core::traceroute::NO_DATA_MESSAGE;
use latency_core::{Dashboard, LatencyBand, TraceroutePanel, TracerouteHop};
use latency_dashboard::client::ApiClient;
use std::fmt::Write as _;

/// Run the application in headless mode (no UI): one fetch, printed, then exit.
pub async fn run_headless(client: &ApiClient, json: bool, traceroute: Option<&str>) -> Result<()> {
    let output = match traceroute {
        Some(code) => {
            let report = fetch_traceroute(client, code).await?;
            if json {
                serde_json::to_string_pretty(&report)?
            } else {
                format_traceroute(&report)
            }
        }
        None => {
            let report = fetch_report(client).await?;
            if json {
                serde_json::to_string_pretty(&report)?
            } else {
                format_report(&report)
            }
        }
    };

    println!("{output}");
    Ok(())
}

async fn fetch_report(client: &ApiClient) -> Result<HeadlessReport> {
    let mut dashboard = Dashboard::new();
    dashboard.begin_cycle();
    dashboard.apply_cycle(client.snapshot().await);

    if let Some(error) = dashboard.error() {
        return Err(eyre!("{error}"));
    }

    Ok(HeadlessReport::from_dashboard(&dashboard))
}

async fn fetch_traceroute(client: &ApiClient, code: &str) -> Result<HeadlessTraceroute> {
    let mut dashboard = Dashboard::new();
    dashboard.show_traceroute(code);
    dashboard.apply_traceroute(code, client.traceroute(code).await);

    if let Some(error) = dashboard.error() {
        return Err(eyre!("{error}"));
    }

    let hops = match dashboard.traceroute() {
        TraceroutePanel::Hops { hops, .. } => hops.clone(),
        _ => Vec::new(),
    };

    Ok(HeadlessTraceroute {
        code: code.to_string(),
        hops,
    })
}

#[derive(Debug, serde::Serialize)]
struct HeadlessReport {
    total_regions: usize,
    reachable: usize,
    rows: Vec<HeadlessRow>,
    markers: Vec<HeadlessMarker>,
}

#[derive(Debug, serde::Serialize)]
struct HeadlessRow {
    region: String,
    latency: Option<f64>,
    band: LatencyBand,
}

#[derive(Debug, serde::Serialize)]
struct HeadlessMarker {
    code: String,
    lat: f64,
    lon: f64,
    color: &'static str,
    tooltip: String,
}

#[derive(Debug, serde::Serialize)]
struct HeadlessTraceroute {
    code: String,
    hops: Vec<TracerouteHop>,
}

impl HeadlessReport {
    fn from_dashboard(dashboard: &Dashboard) -> Self {
        let rows: Vec<HeadlessRow> = dashboard
            .table()
            .rows()
            .iter()
            .map(|row| HeadlessRow {
                region: row.region.clone(),
                latency: row.latency,
                band: row.band(),
            })
            .collect();

        let markers = dashboard
            .markers()
            .iter()
            .map(|marker| HeadlessMarker {
                code: marker.code.clone(),
                lat: marker.lat,
                lon: marker.lon,
                color: marker.band.hex(),
                tooltip: marker.tooltip.to_string(),
            })
            .collect();

        Self {
            total_regions: dashboard.markers().len(),
            reachable: rows.iter().filter(|row| row.latency.is_some()).count(),
            rows,
            markers,
        }
    }
}

fn format_report(report: &HeadlessReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Region Latency");
    let _ = writeln!(out, "==============");
    let _ = writeln!(
        out,
        "Regions: {}  Reachable: {}",
        report.total_regions, report.reachable
    );
    let _ = writeln!(out, "\nLatency by Region:");
    for row in &report.rows {
        let _ = writeln!(
            out,
            "- {} | {}",
            row.region,
            latency_core::latency_text(row.latency)
        );
    }
    out
}

fn format_traceroute(report: &HeadlessTraceroute) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Traceroute to {}", report.code);
    if report.hops.is_empty() {
        let _ = writeln!(out, "{NO_DATA_MESSAGE}");
        return out;
    }

    let _ = writeln!(out, "Hop | IP | RTT (ms)");
    for hop in &report.hops {
        let _ = writeln!(out, "{} | {} | {}", hop.hop, hop.ip, hop.rtt_text());
    }
    out
}
