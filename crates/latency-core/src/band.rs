/// Colour band a latency falls into on the map and in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LatencyBand {
    Gray,
    Green,
    YellowGreen,
    Yellow,
    Orange,
    Red,
}

impl LatencyBand {
    /// Every band from fastest to slowest, unreachable last.
    pub const ALL: [Self; 6] = [
        Self::Green,
        Self::YellowGreen,
        Self::Yellow,
        Self::Orange,
        Self::Red,
        Self::Gray,
    ];

    /// Negative values are not rejected; they land in the fastest band.
    pub fn classify(latency: Option<f64>) -> Self {
        match latency {
            None => Self::Gray,
            Some(ms) if ms < 1.0 => Self::Green,
            Some(ms) if ms < 10.0 => Self::YellowGreen,
            Some(ms) if ms < 100.0 => Self::Yellow,
            Some(ms) if ms < 1000.0 => Self::Orange,
            Some(_) => Self::Red,
        }
    }

    pub const fn hex(self) -> &'static str {
        match self {
            Self::Gray => "#808080",
            Self::Green => "#00ff00",
            Self::YellowGreen => "#80ff00",
            Self::Yellow => "#ffff00",
            Self::Orange => "#ffa500",
            Self::Red => "#ff0000",
        }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Gray => (0x80, 0x80, 0x80),
            Self::Green => (0x00, 0xff, 0x00),
            Self::YellowGreen => (0x80, 0xff, 0x00),
            Self::Yellow => (0xff, 0xff, 0x00),
            Self::Orange => (0xff, 0xa5, 0x00),
            Self::Red => (0xff, 0x00, 0x00),
        }
    }

    /// Legend text for the band.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gray => "no data",
            Self::Green => "< 1 ms",
            Self::YellowGreen => "< 10 ms",
            Self::Yellow => "< 100 ms",
            Self::Orange => "< 1000 ms",
            Self::Red => ">= 1000 ms",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LatencyBand;

    #[test]
    fn missing_latency_is_gray() {
        assert_eq!(LatencyBand::classify(None), LatencyBand::Gray);
    }

    #[test]
    fn zero_and_negative_latencies_are_green() {
        assert_eq!(LatencyBand::classify(Some(0.0)), LatencyBand::Green);
        assert_eq!(LatencyBand::classify(Some(-5.0)), LatencyBand::Green);
        assert_eq!(LatencyBand::classify(Some(0.999)), LatencyBand::Green);
    }

    #[test]
    fn boundaries_move_to_the_next_band() {
        assert_eq!(LatencyBand::classify(Some(1.0)), LatencyBand::YellowGreen);
        assert_eq!(LatencyBand::classify(Some(9.99)), LatencyBand::YellowGreen);
        assert_eq!(LatencyBand::classify(Some(10.0)), LatencyBand::Yellow);
        assert_eq!(LatencyBand::classify(Some(99.9)), LatencyBand::Yellow);
        assert_eq!(LatencyBand::classify(Some(100.0)), LatencyBand::Orange);
        assert_eq!(LatencyBand::classify(Some(999.9)), LatencyBand::Orange);
        assert_eq!(LatencyBand::classify(Some(1000.0)), LatencyBand::Red);
        assert_eq!(LatencyBand::classify(Some(25_000.0)), LatencyBand::Red);
    }

    #[test]
    fn hex_tokens_match_rgb() {
        for band in LatencyBand::ALL {
            let (r, g, b) = band.rgb();
            assert_eq!(band.hex(), format!("#{r:02x}{g:02x}{b:02x}"));
        }
    }
}
