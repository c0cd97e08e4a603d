use chrono::{DateTime, Local};
use latency_core::Dashboard;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use throbber_widgets_tui::ThrobberState;

const THROBBER_FRAME: Duration = Duration::from_millis(120);

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub dashboard: Dashboard,
    pub api_label: String,
    pub last_updated: Option<DateTime<Local>>,
    pub throbber: ThrobberState,
    pub last_frame: Instant,
    /// Size of the last drawn frame, used to map mouse clicks onto the map.
    pub viewport: Rect,
}

impl App {
    pub fn new(api_label: impl Into<String>) -> Self {
        Self {
            running: true,
            dashboard: Dashboard::new(),
            api_label: api_label.into(),
            last_updated: None,
            throbber: ThrobberState::default(),
            last_frame: Instant::now(),
            viewport: Rect::default(),
        }
    }

    /// Advances the fetching indicator while a cycle is in flight.
    pub fn update(&mut self) {
        let now = Instant::now();
        if now.duration_since(self.last_frame) < THROBBER_FRAME {
            return;
        }
        self.last_frame = now;

        if self.dashboard.is_fetching() {
            self.throbber.calc_next();
        }
    }

    /// Stamps a successful cycle.
    pub fn mark_updated(&mut self, before: u64) {
        if self.dashboard.completed_cycles() > before {
            self.last_updated = Some(Local::now());
        }
    }
}
