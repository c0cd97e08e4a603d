use std::future::Future;

use futures::future::try_join;
use latency_core::{api, FetchError, LatencyMap, Region, Snapshot, TracerouteHop};
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// Issues a same-origin GET right away; the returned future resolves to the response.
fn request(path: &str) -> Result<JsFuture, FetchError> {
    let window = web_sys::window().ok_or_else(|| FetchError::Transport("no window".to_string()))?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(path, &opts).map_err(js_error)?;
    Ok(JsFuture::from(window.fetch_with_request(&request)))
}

async fn read_json<T: DeserializeOwned>(pending: JsFuture) -> Result<T, FetchError> {
    let response: Response = pending.await.map_err(js_error)?.dyn_into().map_err(js_error)?;
    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    let json = JsFuture::from(response.json().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    serde_wasm_bindgen::from_value(json).map_err(|error| FetchError::Decode(error.to_string()))
}

/// Both cycle requests are in flight before either is awaited.
pub async fn fetch_snapshot() -> Result<Snapshot, FetchError> {
    let regions = request(api::REGIONS)?;
    let latencies = request(api::LATENCY)?;

    join_snapshot(read_json(regions), read_json(latencies)).await
}

/// Waits for both halves of a cycle. The first failure ends the wait, even while the
/// other half is still pending.
async fn join_snapshot(
    regions: impl Future<Output = Result<Vec<Region>, FetchError>>,
    latencies: impl Future<Output = Result<LatencyMap, FetchError>>,
) -> Result<Snapshot, FetchError> {
    let (regions, latencies) = try_join(regions, latencies).await?;
    Ok(Snapshot { regions, latencies })
}

pub async fn fetch_traceroute(code: &str) -> Result<Option<Vec<TracerouteHop>>, FetchError> {
    read_json(request(&api::traceroute(code))?).await
}

fn js_error(value: JsValue) -> FetchError {
    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|error| String::from(error.message()))
        .or_else(|| value.as_string());
    transport_error(message, || format!("{value:?}"))
}

/// `message` is the thrown error's text when it had one.
fn transport_error(message: Option<String>, describe: impl FnOnce() -> String) -> FetchError {
    FetchError::Transport(message.unwrap_or_else(describe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::future::{pending, ready};

    fn regions() -> Vec<Region> {
        vec![Region {
            code: "us".to_string(),
            name: "US".to_string(),
            lat: 38.9,
            lon: -77.0,
        }]
    }

    #[test]
    fn joined_cycle_carries_both_halves() {
        let latencies: LatencyMap = [("us", Some(12.0))].into_iter().collect();
        let snapshot = block_on(join_snapshot(
            ready(Ok(regions())),
            ready(Ok(latencies.clone())),
        ));

        assert_eq!(
            snapshot,
            Ok(Snapshot {
                regions: regions(),
                latencies,
            })
        );
    }

    #[test]
    fn latency_failure_surfaces_while_regions_hang() {
        let result = block_on(join_snapshot(
            pending::<Result<Vec<Region>, FetchError>>(),
            ready(Err(FetchError::Status(503))),
        ));

        assert_eq!(result, Err(FetchError::Status(503)));
    }

    #[test]
    fn regions_failure_surfaces_while_latency_hangs() {
        let result = block_on(join_snapshot(
            ready(Err(FetchError::Decode("missing field `lat`".to_string()))),
            pending::<Result<LatencyMap, FetchError>>(),
        ));

        assert_eq!(
            result,
            Err(FetchError::Decode("missing field `lat`".to_string()))
        );
    }

    #[test]
    fn transport_error_prefers_the_thrown_message() {
        assert_eq!(
            transport_error(Some("Failed to fetch".to_string()), || "JsValue(..)".to_string()),
            FetchError::Transport("Failed to fetch".to_string())
        );
        assert_eq!(
            transport_error(None, || "JsValue(Object)".to_string()),
            FetchError::Transport("JsValue(Object)".to_string())
        );
    }
}
