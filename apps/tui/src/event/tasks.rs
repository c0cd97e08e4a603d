use std::future::Future;
use std::time::Duration;

use latency_core::{FetchError, Snapshot, TracerouteHop};
use latency_dashboard::client::ApiClient;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinError;
use tokio::time::{interval, MissedTickBehavior};

/// Results delivered from background fetches to the UI loop, in arrival order.
#[derive(Debug)]
pub enum DashboardEvent {
    CycleStarted,
    Cycle(Result<Snapshot, FetchError>),
    /// A polling task panicked before producing a result.
    CycleAborted(String),
    Traceroute {
        code: String,
        result: Result<Option<Vec<TracerouteHop>>, FetchError>,
    },
    Uncaught(String),
}

/// Starts a cycle immediately and then every `period`, without waiting for earlier
/// cycles to finish.
pub fn spawn_poller(client: ApiClient, period: Duration, events: UnboundedSender<DashboardEvent>) {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if events.send(DashboardEvent::CycleStarted).is_err() {
                break;
            }

            tracing::debug!("polling cycle started");
            let client = client.clone();
            spawn_supervised(
                events.clone(),
                async move { DashboardEvent::Cycle(client.snapshot().await) },
                DashboardEvent::CycleAborted,
            );
        }
    });
}

pub fn spawn_traceroute(client: ApiClient, code: String, events: UnboundedSender<DashboardEvent>) {
    spawn_supervised(
        events,
        async move {
            let result = client.traceroute(&code).await;
            DashboardEvent::Traceroute { code, result }
        },
        DashboardEvent::Uncaught,
    );
}

/// Runs `task` and forwards its event; a panic inside it is reported through
/// `on_panic` instead of tearing down the dashboard.
fn spawn_supervised<F>(
    events: UnboundedSender<DashboardEvent>,
    task: F,
    on_panic: fn(String) -> DashboardEvent,
) where
    F: Future<Output = DashboardEvent> + Send + 'static,
{
    let handle = tokio::spawn(task);
    tokio::spawn(async move {
        let event = match handle.await {
            Ok(event) => event,
            Err(error) => on_panic(join_error_message(error)),
        };
        // The receiver is gone only once the UI has quit.
        let _ = events.send(event);
    });
}

fn join_error_message(error: JoinError) -> String {
    if !error.is_panic() {
        return error.to_string();
    }

    let payload = error.into_panic();
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "task panicked".to_string())
}
