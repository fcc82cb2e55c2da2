use serde::Deserialize;
use std::time::Duration;

const NGROK_API_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Deserialize)]
struct TunnelsResponse {
    #[serde(default)]
    tunnels: Vec<Tunnel>,
}

#[derive(Debug, Deserialize)]
struct Tunnel {
    #[serde(default)]
    public_url: String,
}

/// Ask a local ngrok agent for its public URL.
///
/// Prefers the first `https://` tunnel, then the last `http://` one. Any
/// failure yields `None`; the configured base URL stays in effect.
pub async fn detect_public_url(api_base: &str) -> Option<String> {
    let url = format!("{}/api/tunnels", api_base.trim_end_matches('/'));

    let client = reqwest::Client::builder()
        .timeout(NGROK_API_TIMEOUT)
        .build()
        .ok()?;

    let response = match client.get(&url).send().await {
        Ok(response) if response.status().is_success() => response,
        Ok(response) => {
            tracing::warn!("ngrok API returned HTTP {}", response.status());
            return None;
        }
        Err(e) => {
            tracing::warn!("Could not reach ngrok API at {}: {}", url, e);
            return None;
        }
    };

    let body: TunnelsResponse = response.json().await.ok()?;
    pick_public_url(&body.tunnels)
}

fn pick_public_url(tunnels: &[Tunnel]) -> Option<String> {
    let mut http_url = None;
    for tunnel in tunnels {
        if tunnel.public_url.starts_with("https://") {
            return Some(tunnel.public_url.clone());
        }
        if tunnel.public_url.starts_with("http://") {
            http_url = Some(tunnel.public_url.clone());
        }
    }
    http_url
}
