//! HTTP client for the Keymote server API.
//!
//! One method per endpoint. Every call goes through [`RemoteClient::parse_response`]
//! so server error bodies surface as [`RemoteError::Api`] with the server's
//! own message.

use std::collections::VecDeque;

use futures::{Stream, StreamExt};
use keymote_core::library::Listing;
use keymote_core::presenter::PresenterEvent;
use keymote_core::timings::{Presentation, ScheduleStatus, SlideTimingStatus, TimingsDocument};
use log::debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::RemoteConfig;
use crate::error::{RemoteError, Result};
use crate::sse::{SseDecoder, SseFrame};

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SlideNumberResponse {
    slide_number: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SlideCountResponse {
    slide_count: u32,
}

#[derive(Debug, Deserialize)]
struct OpenPresentationResponse {
    current_slide_number: u32,
}

#[derive(Debug, Deserialize)]
struct UpdateTimingResponse {
    presentation: Option<Presentation>,
}

/// Schedule and slide assessment for one slide.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimingStatus {
    pub slide_number: Option<u32>,
    pub schedule: Option<ScheduleStatus>,
    pub slide: Option<SlideTimingStatus>,
}

#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: reqwest::Client,
    /// No overall timeout: the event stream stays open indefinitely.
    stream_client: reqwest::Client,
    base_url: String,
}

impl RemoteClient {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let stream_client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            stream_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Method::GET, path, None).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: Option<Value>) -> Result<T> {
        self.send(Method::POST, path, body).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T> {
        let url = self.url(path);
        debug!("[RemoteApi] {} {}", method, url);

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_string());
        }
        let response = request.send().await?;
        Self::parse_response(response).await
    }

    /// Parse an HTTP response, turning error bodies into [`RemoteError::Api`].
    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .and_then(|err| err.message)
                .unwrap_or_else(|| body.chars().take(200).collect());
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| RemoteError::Decode(format!("{e} - {body}")))
    }

    pub async fn healthz(&self) -> Result<()> {
        let url = self.url("/api/healthz");
        debug!("[RemoteApi] GET {}", url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() && body.trim() == "ok" {
            Ok(())
        } else {
            Err(RemoteError::Api {
                status: status.as_u16(),
                message: body,
            })
        }
    }

    // Presentation control

    pub async fn start_presentation(&self) -> Result<()> {
        self.post::<Value>("/api/start_presentation", None)
            .await
            .map(|_| ())
    }

    pub async fn stop_presentation(&self) -> Result<()> {
        self.post::<Value>("/api/stop_presentation", None)
            .await
            .map(|_| ())
    }

    pub async fn close_presentation(&self) -> Result<()> {
        self.post::<Value>("/api/close_presentation", None)
            .await
            .map(|_| ())
    }

    /// Returns the slide the presentation application landed on.
    pub async fn goto_slide(&self, slide_number: u32) -> Result<u32> {
        let response: SlideNumberResponse = self
            .post(&format!("/api/goto_slide/{slide_number}"), None)
            .await?;
        Ok(response.slide_number.unwrap_or(slide_number))
    }

    pub async fn next_slide(&self) -> Result<Option<u32>> {
        let response: SlideNumberResponse = self.post("/api/next_slide", None).await?;
        Ok(response.slide_number)
    }

    pub async fn previous_slide(&self) -> Result<Option<u32>> {
        let response: SlideNumberResponse = self.post("/api/previous_slide", None).await?;
        Ok(response.slide_number)
    }

    /// `None` when nothing is open.
    pub async fn current_slide_number(&self) -> Result<Option<u32>> {
        let response: SlideNumberResponse = self.get("/api/current_slide_number").await?;
        Ok(response.slide_number)
    }

    pub async fn slide_count(&self) -> Result<u32> {
        let response: SlideCountResponse = self.get("/api/slide_count").await?;
        Ok(response.slide_count)
    }

    // Library

    pub async fn list_presentations(&self, path: &str) -> Result<Listing> {
        self.get(&format!(
            "/api/list_presentations?path={}",
            urlencoding::encode(path)
        ))
        .await
    }

    /// Opens `filename` (library-relative) and returns the current slide.
    pub async fn open_presentation(&self, filename: &str) -> Result<u32> {
        let response: OpenPresentationResponse = self
            .post(
                "/api/open_presentation",
                Some(json!({ "filename": filename })),
            )
            .await?;
        Ok(response.current_slide_number)
    }

    // Timings

    pub async fn timings_document(&self) -> Result<TimingsDocument> {
        self.get("/static/slide_timings.json").await
    }

    pub async fn save_timings(&self, document: &TimingsDocument) -> Result<()> {
        let body = serde_json::to_value(document)
            .map_err(|e| RemoteError::Decode(format!("Failed to encode timings: {e}")))?;
        self.post::<Value>("/api/save_timings", Some(body))
            .await
            .map(|_| ())
    }

    pub async fn save_elapsed_time(&self, elapsed_seconds: u64) -> Result<()> {
        self.post::<Value>(
            "/api/save_elapsed_time",
            Some(json!({ "elapsed_seconds": elapsed_seconds })),
        )
        .await
        .map(|_| ())
    }

    /// Updates one planned time and returns the presentation as stored.
    pub async fn update_slide_timing(
        &self,
        index: usize,
        estimated_time_seconds: u64,
    ) -> Result<Option<Presentation>> {
        let response: UpdateTimingResponse = self
            .send(
                Method::PUT,
                &format!("/api/slide_timings/{index}"),
                Some(json!({ "estimated_time_seconds": estimated_time_seconds })),
            )
            .await?;
        Ok(response.presentation)
    }

    /// Status for `slide_number`, or for the presenter's current slide.
    pub async fn timing_status(&self, slide_number: Option<u32>) -> Result<TimingStatus> {
        let path = match slide_number {
            Some(n) => format!("/api/timing_status?slide_number={n}"),
            None => "/api/timing_status".to_string(),
        };
        self.get(&path).await
    }

    pub async fn schedule_status(&self) -> Result<Option<ScheduleStatus>> {
        Ok(self.timing_status(None).await?.schedule)
    }

    // Events

    /// Follows the server's event stream.
    ///
    /// Keep-alive comments and unknown event names are skipped. The stream
    /// ends when the server closes the connection.
    pub async fn events(&self) -> Result<impl Stream<Item = Result<PresenterEvent>>> {
        let url = self.url("/api/events/stream");
        debug!("[RemoteApi] GET {} (stream)", url);

        let response = self
            .stream_client
            .get(&url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let chunks = Box::pin(response.bytes_stream());
        let state = (chunks, SseDecoder::default(), VecDeque::new());
        Ok(futures::stream::unfold(
            state,
            |(mut chunks, mut decoder, mut pending)| async move {
                loop {
                    if let Some(event) = pending.pop_front() {
                        return Some((Ok(event), (chunks, decoder, pending)));
                    }
                    match chunks.next().await {
                        Some(Ok(chunk)) => pending.extend(
                            decoder
                                .push(&chunk)
                                .into_iter()
                                .filter_map(SseFrame::into_presenter_event),
                        ),
                        Some(Err(err)) => {
                            return Some((Err(RemoteError::from(err)), (chunks, decoder, pending)))
                        }
                        None => return None,
                    }
                }
            },
        ))
    }
}
