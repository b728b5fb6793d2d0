// REST client for the greenhouse backend.
//
// Wraps `reqwest::Client` with base-URL construction, bearer auth, and
// central HTTP-status mapping. The backend returns bare JSON bodies
// (no envelope), so responses decode directly into the wire types.

use chrono::NaiveDate;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{
    CameraRecord, GreenhouseDetail, GreenhouseSummary, LiveFeed, OverviewRecord, RecordingRecord,
    SensorRecord,
};
use crate::transport::TransportConfig;

/// HTTP client for the backend's REST API.
///
/// Every request carries the bearer credential as an `Authorization`
/// header. Status mapping happens in one place: 401/403 become
/// [`Error::Unauthorized`], 404 becomes [`Error::NotFound`], any other
/// non-2xx becomes [`Error::Server`].
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for `base_url` (the server root, e.g.
    /// `https://farm.example.com`) authenticated with `token`.
    pub fn new(
        base_url: Url,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::Unauthorized {
                message: "token contains characters that cannot be sent in a header".into(),
            })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self { http, base_url })
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`.
    fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    /// Derive the live-channel URL for a greenhouse from the base URL:
    /// `ws(s)://{host}/ws/greenhouses/{id}/data/`.
    pub fn ws_url(&self, greenhouse_id: i64) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        let scheme = if matches!(url.scheme(), "https" | "wss") { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|()| Error::ChannelConnect(format!("cannot derive ws URL from {}", self.base_url)))?;
        url.set_path(&format!("/ws/greenhouses/{greenhouse_id}/data/"));
        url.set_query(None);
        Ok(url)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// List the caller's greenhouses.
    pub async fn list_greenhouses(&self) -> Result<Vec<GreenhouseSummary>, Error> {
        self.get(self.api_url("greenhouses/")?).await
    }

    /// Fetch one greenhouse with its alert thresholds.
    pub async fn get_greenhouse(&self, greenhouse_id: i64) -> Result<GreenhouseDetail, Error> {
        self.get(self.api_url(&format!("greenhouses/{greenhouse_id}/"))?)
            .await
    }

    /// List all sensors of a greenhouse with their latest readings.
    pub async fn list_sensors(&self, greenhouse_id: i64) -> Result<Vec<SensorRecord>, Error> {
        self.get(self.api_url(&format!("greenhouses/{greenhouse_id}/sensors/"))?)
            .await
    }

    /// List the cameras installed in a greenhouse.
    pub async fn list_cameras(&self, greenhouse_id: i64) -> Result<Vec<CameraRecord>, Error> {
        self.get(self.api_url(&format!("greenhouses/{greenhouse_id}/cameras/"))?)
            .await
    }

    /// Fetch the overview card data: actuator states and active alerts.
    pub async fn get_overview(&self, greenhouse_id: i64) -> Result<OverviewRecord, Error> {
        self.get(self.api_url(&format!("greenhouses/{greenhouse_id}/overview/"))?)
            .await
    }

    /// Resolve the live stream URL for one camera.
    pub async fn get_live_feed(
        &self,
        greenhouse_id: i64,
        camera_id: i64,
    ) -> Result<LiveFeed, Error> {
        let mut url = self.api_url(&format!("greenhouses/{greenhouse_id}/live-feed/"))?;
        url.query_pairs_mut()
            .append_pair("camera_id", &camera_id.to_string());
        self.get(url).await
    }

    /// List recorded footage for one camera, optionally from a start date.
    pub async fn list_recordings(
        &self,
        greenhouse_id: i64,
        camera_id: i64,
        start_date: Option<NaiveDate>,
    ) -> Result<Vec<RecordingRecord>, Error> {
        let mut url = self.api_url(&format!("greenhouses/{greenhouse_id}/recorded-footage/"))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("camera_id", &camera_id.to_string());
            if let Some(date) = start_date {
                pairs.append_pair("start_date", &date.format("%Y-%m-%d").to_string());
            }
        }
        self.get(url).await
    }

    // ── Request helper ───────────────────────────────────────────────

    /// Send a GET request and decode the JSON body, mapping HTTP status
    /// codes into the crate error taxonomy.
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Unauthorized {
                message: format!("HTTP {status}: credential missing, expired, or rejected"),
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                resource: resp.url().path().to_owned(),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Server {
                status: status.as_u16(),
                message: preview(&body).to_owned(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}

/// First 200 characters of a body, for error messages.
fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
