use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// A measured location reported by `/api/regions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub code: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// One hop of a traceroute as reported by `/api/traceroute/{code}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracerouteHop {
    pub hop: u32,
    pub ip: String,
    pub rtt: Option<f64>,
}

impl TracerouteHop {
    pub fn rtt_text(&self) -> String {
        self.rtt
            .map_or_else(|| "*".to_string(), |rtt| format!("{rtt:.2} ms"))
    }
}

/// Region code to latency in milliseconds, in the order the backend sent them.
///
/// `None` means the backend could not reach the region. The order matters: the
/// table keeps it as the tie-break between equal latencies.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatencyMap {
    entries: Vec<(String, Option<f64>)>,
}

impl LatencyMap {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts or replaces a latency. A replaced code keeps its original position.
    pub fn insert(&mut self, code: impl Into<String>, latency: Option<f64>) {
        let code = code.into();
        if let Some(entry) = self.entries.iter_mut().find(|(key, _)| *key == code) {
            entry.1 = latency;
        } else {
            self.entries.push((code, latency));
        }
    }

    /// Latency for `code`; an absent code reads the same as an unreachable one.
    pub fn get(&self, code: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(key, _)| key == code)
            .and_then(|(_, latency)| *latency)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> + '_ {
        self.entries
            .iter()
            .map(|(code, latency)| (code.as_str(), *latency))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<f64>)> for LatencyMap {
    fn from_iter<I: IntoIterator<Item = (K, Option<f64>)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (code, latency) in iter {
            map.insert(code, latency);
        }
        map
    }
}

impl<'de> Deserialize<'de> for LatencyMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LatencyMapVisitor;

        impl<'de> Visitor<'de> for LatencyMapVisitor {
            type Value = LatencyMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping region codes to a latency or null")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = LatencyMap::new();
                while let Some((code, latency)) = access.next_entry::<String, Option<f64>>()? {
                    map.insert(code, latency);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(LatencyMapVisitor)
    }
}

/// Formats a latency the way the dashboard prints it everywhere: shortest form,
/// so `42.0` reads `42 ms` and `12.34` reads `12.34 ms`.
///
/// A latency of exactly zero prints as `N/A` like a missing one, while its band
/// stays green.
pub fn latency_text(latency: Option<f64>) -> String {
    match latency {
        Some(value) if value != 0.0 => format!("{value} ms"),
        _ => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latency_map_keeps_document_order() -> Result<(), serde_json::Error> {
        let map: LatencyMap = serde_json::from_str(r#"{"zz": 3.5, "aa": null, "mm": 1}"#)?;

        let codes: Vec<&str> = map.iter().map(|(code, _)| code).collect();
        assert_eq!(codes, vec!["zz", "aa", "mm"]);
        assert_eq!(map.get("zz"), Some(3.5));
        assert_eq!(map.get("aa"), None);
        assert!(map.contains("aa"));
        assert_eq!(map.get("missing"), None);
        assert!(!map.contains("missing"));
        Ok(())
    }

    #[test]
    fn duplicate_code_keeps_position_and_takes_last_value() {
        let mut map = LatencyMap::new();
        map.insert("a", Some(1.0));
        map.insert("b", None);
        map.insert("a", Some(9.0));

        assert_eq!(map.len(), 2);
        assert_eq!(map.iter().next(), Some(("a", Some(9.0))));
    }

    #[test]
    fn latency_map_rejects_non_numeric_values() {
        let result = serde_json::from_str::<LatencyMap>(r#"{"us": "fast"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn region_requires_every_field() {
        let result = serde_json::from_str::<Region>(r#"{"code": "us", "name": "US", "lat": 1.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn hop_rtt_is_rounded_to_two_places() {
        let hop = TracerouteHop {
            hop: 1,
            ip: "10.0.0.1".to_string(),
            rtt: Some(1.234),
        };
        let silent = TracerouteHop {
            hop: 2,
            ip: "10.0.0.2".to_string(),
            rtt: None,
        };

        assert_eq!(hop.rtt_text(), "1.23 ms");
        assert_eq!(silent.rtt_text(), "*");
    }

    #[test]
    fn latency_text_uses_shortest_form() {
        assert_eq!(latency_text(Some(42.0)), "42 ms");
        assert_eq!(latency_text(Some(12.34)), "12.34 ms");
        assert_eq!(latency_text(None), "N/A");
    }

    #[test]
    fn zero_latency_prints_as_not_available() {
        assert_eq!(latency_text(Some(0.0)), "N/A");
        assert_eq!(latency_text(Some(-0.0)), "N/A");
        assert_eq!(latency_text(Some(0.25)), "0.25 ms");
    }
}
