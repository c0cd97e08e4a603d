use crate::model::TracerouteHop;

pub const NO_DATA_MESSAGE: &str = "No traceroute data available.";

/// Column headings of the hop table.
pub const HOP_COLUMNS: [&str; 3] = ["Hop", "IP", "RTT (ms)"];

/// Contents of the traceroute panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TraceroutePanel {
    #[default]
    Closed,
    /// A lookup was requested; only the header is shown until data arrives.
    /// A failed lookup leaves the panel here.
    Pending { code: String },
    NoData { code: String },
    Hops { code: String, hops: Vec<TracerouteHop> },
}

impl TraceroutePanel {
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Closed => None,
            Self::Pending { code } | Self::NoData { code } | Self::Hops { code, .. } => {
                Some(code)
            }
        }
    }

    pub fn header(&self) -> Option<String> {
        self.code().map(|code| format!("Traceroute to {code}"))
    }

    /// Panel title: the header once a lookup was requested, a plain label before.
    pub fn title(&self) -> String {
        self.header().unwrap_or_else(|| "Traceroute".to_string())
    }

    /// Panel state for a completed lookup. `None` is what the backend sends as JSON
    /// `null`.
    pub fn from_hops(code: String, hops: Option<Vec<TracerouteHop>>) -> Self {
        match hops {
            Some(hops) if !hops.is_empty() => Self::Hops { code, hops },
            _ => Self::NoData { code },
        }
    }

    /// Rows as `[hop, ip, rtt]` display strings.
    pub fn rows(&self) -> Vec<[String; 3]> {
        match self {
            Self::Hops { hops, .. } => hops
                .iter()
                .map(|hop| [hop.hop.to_string(), hop.ip.clone(), hop.rtt_text()])
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hops_render_as_rows() -> Result<(), serde_json::Error> {
        let hops: Option<Vec<TracerouteHop>> = serde_json::from_str(
            r#"[{"hop":1,"ip":"10.0.0.1","rtt":1.234},{"hop":2,"ip":"10.0.0.2","rtt":null}]"#,
        )?;
        let panel = TraceroutePanel::from_hops("eu".to_string(), hops);

        assert_eq!(panel.header().as_deref(), Some("Traceroute to eu"));
        assert_eq!(
            panel.rows(),
            vec![
                ["1".to_string(), "10.0.0.1".to_string(), "1.23 ms".to_string()],
                ["2".to_string(), "10.0.0.2".to_string(), "*".to_string()],
            ]
        );
        Ok(())
    }

    #[test]
    fn empty_or_null_hops_mean_no_data() -> Result<(), serde_json::Error> {
        let empty: Option<Vec<TracerouteHop>> = serde_json::from_str("[]")?;
        let null: Option<Vec<TracerouteHop>> = serde_json::from_str("null")?;

        for hops in [empty, null] {
            let panel = TraceroutePanel::from_hops("ap".to_string(), hops);
            assert_eq!(panel, TraceroutePanel::NoData { code: "ap".to_string() });
            assert!(panel.rows().is_empty());
        }
        Ok(())
    }

    #[test]
    fn closed_panel_has_no_header() {
        assert_eq!(TraceroutePanel::Closed.header(), None);
        assert_eq!(TraceroutePanel::Closed.title(), "Traceroute");
        assert_eq!(
            TraceroutePanel::Pending { code: "us".to_string() }.title(),
            "Traceroute to us"
        );
    }
}
