use latency_core::{api, FetchError, LatencyMap, Region, Snapshot, TracerouteHop};
use reqwest::Url;
use serde::de::DeserializeOwned;

/// Read-only client for the latency backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    /// Joins `path` onto the base URL, keeping any path prefix the base carries.
    pub fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        let joined = format!("{}{path}", self.base.as_str().trim_end_matches('/'));
        Url::parse(&joined).map_err(|error| FetchError::Transport(error.to_string()))
    }

    pub async fn regions(&self) -> Result<Vec<Region>, FetchError> {
        self.get_json(api::REGIONS).await
    }

    pub async fn latency(&self) -> Result<LatencyMap, FetchError> {
        self.get_json(api::LATENCY).await
    }

    /// Both requests of a polling cycle, issued together. The first failure wins.
    pub async fn snapshot(&self) -> Result<Snapshot, FetchError> {
        let (regions, latencies) = tokio::try_join!(self.regions(), self.latency())?;
        Ok(Snapshot { regions, latencies })
    }

    pub async fn traceroute(&self, code: &str) -> Result<Option<Vec<TracerouteHop>>, FetchError> {
        self.get_json(&api::traceroute(code)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "GET");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|error| FetchError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|error| FetchError::Transport(error.to_string()))?;
        serde_json::from_slice(&body).map_err(FetchError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves canned responses keyed by request path until the test ends.
    async fn serve(routes: Vec<(&'static str, u16, &'static str)>) -> std::io::Result<Url> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let routes = routes.clone();
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buffer = [0_u8; 1024];
                    while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                        match socket.read(&mut buffer).await {
                            Ok(0) | Err(_) => return,
                            Ok(read) => request.extend_from_slice(&buffer[..read]),
                        }
                    }

                    let request = String::from_utf8_lossy(&request);
                    let path = request.split_whitespace().nth(1).unwrap_or("/");
                    let (status, body) = routes
                        .iter()
                        .find(|(route, _, _)| *route == path)
                        .map_or((404, ""), |(_, status, body)| (*status, *body));

                    let response = format!(
                        "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Ok(Url::parse(&format!("http://{address}/"))
            .map_err(|error| std::io::Error::new(std::io::ErrorKind::Other, error))?)
    }

    #[test]
    fn endpoint_keeps_base_prefix() -> Result<(), Box<dyn std::error::Error>> {
        let client = ApiClient::new(Url::parse("http://example.test/dash/")?);
        assert_eq!(
            client.endpoint("/api/latency")?.as_str(),
            "http://example.test/dash/api/latency"
        );

        let client = ApiClient::new(Url::parse("http://example.test")?);
        assert_eq!(
            client.endpoint("/api/traceroute/eu")?.as_str(),
            "http://example.test/api/traceroute/eu"
        );
        Ok(())
    }

    #[tokio::test]
    async fn snapshot_decodes_both_endpoints() -> Result<(), Box<dyn std::error::Error>> {
        let base = serve(vec![
            (
                "/api/regions",
                200,
                r#"[{"code":"us","name":"US","lat":0,"lon":0}]"#,
            ),
            ("/api/latency", 200, r#"{"us":42,"eu":null}"#),
        ])
        .await?;

        let snapshot = ApiClient::new(base).snapshot().await?;
        assert_eq!(snapshot.regions.len(), 1);
        assert_eq!(snapshot.regions[0].code, "us");
        assert_eq!(snapshot.latencies.get("us"), Some(42.0));
        assert!(snapshot.latencies.contains("eu"));
        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_is_a_status_error() -> Result<(), Box<dyn std::error::Error>> {
        let base = serve(vec![
            ("/api/regions", 500, ""),
            ("/api/latency", 200, "{}"),
        ])
        .await?;

        let error = ApiClient::new(base)
            .snapshot()
            .await
            .expect_err("regions returned 500");
        assert_eq!(error, FetchError::Status(500));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() -> Result<(), Box<dyn std::error::Error>> {
        let base = serve(vec![("/api/traceroute/eu", 200, r#"[{"hop":"one"}]"#)]).await?;

        let error = ApiClient::new(base)
            .traceroute("eu")
            .await
            .expect_err("hop is not a number");
        assert!(matches!(error, FetchError::Decode(_)));
        Ok(())
    }

    #[tokio::test]
    async fn null_traceroute_body_means_no_hops() -> Result<(), Box<dyn std::error::Error>> {
        let base = serve(vec![("/api/traceroute/ap", 200, "null")]).await?;

        let hops = ApiClient::new(base).traceroute("ap").await?;
        assert_eq!(hops, None);
        Ok(())
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_error() -> Result<(), Box<dyn std::error::Error>> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;
        drop(listener);

        let client = ApiClient::new(Url::parse(&format!("http://{address}/"))?);
        let error = client.regions().await.expect_err("nothing listening");
        assert!(matches!(error, FetchError::Transport(_)));
        Ok(())
    }
}
