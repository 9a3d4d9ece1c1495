use crate::config::Surface;
use crate::domain::auth::{LoginRequest, TokenResponse};
use crate::domain::classify::ClassifyResponse;
use crate::domain::health::HealthResponse;
use crate::domain::inference::{InferenceConfig, InferenceConfigUpdate};
use crate::domain::lenient::Envelope;
use crate::domain::location::{City, LocationStats};
use crate::domain::stats::{
    BatchCacheStats, BatchClassifyStats, BoundUsers, CacheEfficiency, CategoryShare, CoreMetrics, DownloadCounts,
    ImageEditStats, InferenceMethodStats, Members, TodayStats,
};
use crate::error::{ClientError, Result};
use crate::services::gateway::{ApiGateway, RequestConfig};
use crate::validation::{Coordinates, ImageUpload, NearbyQuery};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response, Url};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

/// Window used by the batch and image-edit reports.
pub const REPORT_WINDOW_DAYS: u32 = 7;

const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// Never carries credentials.
    Open,
    /// Carries credentials on the admin surface.
    Protected,
}

/// A classification result together with what the console needs to display it.
#[derive(Debug, Clone)]
pub struct ClassifyOutcome {
    pub response: ClassifyResponse,
    pub raw: serde_json::Value,
    pub round_trip: Duration,
}

/// Typed helpers for every endpoint the console consumes.
#[derive(Clone, Debug)]
pub struct ClassifierApi {
    gateway: ApiGateway,
    base_url: String,
    surface: Surface,
}

impl ClassifierApi {
    #[must_use]
    pub fn new(gateway: ApiGateway, base_url: impl Into<String>, surface: Surface) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { gateway, base_url, surface }
    }

    #[must_use]
    pub const fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn surface(&self) -> Surface {
        self.surface
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        self.get_json(Access::Open, "/api/v1/health", &[]).await
    }

    pub async fn today_stats(&self) -> Result<TodayStats> {
        self.get_data(Access::Protected, "/api/v1/stats/today", &[]).await
    }

    pub async fn cache_efficiency(&self) -> Result<CacheEfficiency> {
        self.get_data(Access::Protected, "/api/v1/stats/cache-efficiency", &[]).await
    }

    pub async fn category_distribution(&self) -> Result<Vec<CategoryShare>> {
        self.get_data(Access::Protected, "/api/v1/stats/category-distribution", &[]).await
    }

    pub async fn inference_method_stats(&self) -> Result<InferenceMethodStats> {
        self.admin_only("Inference method statistics")?;
        self.get_data(Access::Protected, "/api/v1/stats/inference-method", &[]).await
    }

    /// Fetches the three headline counters concurrently; any failure fails the set.
    pub async fn core_metrics(&self) -> Result<CoreMetrics> {
        self.admin_only("Core metrics")?;
        let (downloads, bound, members) = tokio::try_join!(
            self.get_data::<DownloadCounts>(Access::Protected, "/api/v1/stats/download-count", &[]),
            self.get_data::<BoundUsers>(Access::Protected, "/api/v1/stats/bound-users-count", &[]),
            self.get_data::<Members>(Access::Protected, "/api/v1/stats/member-count", &[]),
        )?;

        Ok(CoreMetrics { downloads, bound_users: bound.bound_users_count, members: members.member_count })
    }

    pub async fn batch_cache_stats(&self, days: u32) -> Result<BatchCacheStats> {
        self.admin_only("Batch cache statistics")?;
        self.get_data(Access::Protected, "/api/v1/stats/batch-cache", &[("days", days.to_string())]).await
    }

    pub async fn batch_classify_stats(&self, days: u32) -> Result<BatchClassifyStats> {
        self.admin_only("Batch classification statistics")?;
        self.get_data(Access::Protected, "/api/v1/stats/batch-classify", &[("days", days.to_string())]).await
    }

    pub async fn image_edit_stats(&self, days: u32) -> Result<ImageEditStats> {
        self.admin_only("Image edit statistics")?;
        self.get_data(Access::Protected, "/api/v1/stats/image-edit", &[("days", days.to_string())]).await
    }

    pub async fn inference_config(&self) -> Result<InferenceConfig> {
        self.admin_only("Inference configuration")?;
        self.get_json(Access::Protected, "/api/v1/config/inference", &[]).await
    }

    pub async fn update_inference_config(&self, update: InferenceConfigUpdate) -> Result<InferenceConfig> {
        self.admin_only("Inference configuration")?;
        let url = self.endpoint("/api/v1/config/inference", &[])?;
        let body = serde_json::to_value(update)?;
        let response = self.send(Access::Protected, &url, RequestConfig::json(Method::PUT, body)).await?;
        read_json(response).await
    }

    pub async fn reset_inference_config(&self) -> Result<InferenceConfig> {
        self.admin_only("Inference configuration")?;
        let url = self.endpoint("/api/v1/config/inference/reset", &[])?;
        let config = RequestConfig { method: Method::POST, ..RequestConfig::default() };
        let response = self.send(Access::Protected, &url, config).await?;

        // The reset endpoint answers with a message, not the config; read it back.
        ensure_success(response).await?;
        self.inference_config().await
    }

    /// Uploads an already validated image as multipart field `image`.
    ///
    /// # Errors
    /// Returns `Status` for a non-2xx answer and `Rejected` when the server reports `success: false`.
    pub async fn classify(&self, upload: &ImageUpload) -> Result<ClassifyOutcome> {
        let part = Part::bytes(upload.content.to_vec()).file_name(upload.file_name.clone()).mime_str(upload.mime)?;
        let form = Form::new().part("image", part);
        let url = self.endpoint("/api/v1/classify", &[])?;

        let started = Instant::now();
        let response = self.send(Access::Open, &url, RequestConfig::multipart(form)).await?;
        let raw: serde_json::Value = read_json(response).await?;
        let round_trip = started.elapsed();

        let response: ClassifyResponse = serde_json::from_value(raw.clone())?;
        if !response.success || response.data.is_none() {
            let reason = response.error.clone().unwrap_or_else(|| "分类失败".to_string());
            tracing::warn!(reason = %reason, "Classification rejected");
            return Err(ClientError::Rejected(reason));
        }

        tracing::info!(
            request_id = response.request_id.as_deref().unwrap_or_default(),
            from_cache = response.from_cache,
            elapsed_ms = round_trip.as_millis(),
            "Image classified"
        );
        Ok(ClassifyOutcome { response, raw, round_trip })
    }

    pub async fn location_stats(&self) -> Result<LocationStats> {
        self.admin_only("Location statistics")?;
        self.get_json(Access::Protected, "/api/v1/location/stats", &[]).await
    }

    pub async fn nearest_city(&self, at: Coordinates) -> Result<City> {
        let params = [("latitude", at.latitude.to_string()), ("longitude", at.longitude.to_string())];
        self.get_json(Access::Open, "/api/v1/location/nearest-city", &params).await
    }

    pub async fn nearby_cities(&self, query: NearbyQuery) -> Result<Vec<City>> {
        let mut params = vec![
            ("latitude", query.at.latitude.to_string()),
            ("longitude", query.at.longitude.to_string()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(max) = query.max_distance_km {
            params.push(("max_distance_km", max.to_string()));
        }
        let cities: Option<Vec<City>> =
            self.get_json(Access::Open, "/api/v1/location/nearby-cities", &params).await?;
        Ok(cities.unwrap_or_default())
    }

    /// Exchanges credentials for a token and records the session.
    ///
    /// # Errors
    /// Returns `Status` for rejected credentials (no forced logout) and `Storage` if the session cannot be saved.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let url = self.endpoint("/api/v1/auth/login", &[])?;
        let body = serde_json::to_value(LoginRequest { username: username.to_string(), password: password.to_string() })?;
        let response = self.send(Access::Open, &url, RequestConfig::json(Method::POST, body)).await?;
        let token: TokenResponse = read_json(response).await?;

        self.gateway.session().establish(&token.access_token, token.expires_in, username)?;
        Ok(token)
    }

    fn admin_only(&self, operation: &'static str) -> Result<()> {
        if self.surface.requires_auth() {
            Ok(())
        } else {
            Err(ClientError::Unsupported { operation, surface: self.surface.as_str() })
        }
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let raw = format!("{}{path}", self.base_url);
        let mut url = Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{raw}: {e}")))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    async fn send(&self, access: Access, url: &Url, config: RequestConfig) -> Result<Response> {
        if access == Access::Protected && self.surface.requires_auth() {
            self.gateway.authenticated_request(url.as_str(), config).await
        } else {
            self.gateway.request(url.as_str(), config).await
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, access: Access, path: &str, params: &[(&str, String)]) -> Result<T> {
        let url = self.endpoint(path, params)?;
        let response = self.send(access, &url, RequestConfig::get()).await?;
        read_json(response).await
    }

    async fn get_data<T: DeserializeOwned + Default>(
        &self,
        access: Access,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let envelope: Envelope<T> = self.get_json(access, path, params).await?;
        Ok(envelope.data)
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    tracing::debug!(%status, message = %message, "API returned an error status");
    Err(ClientError::Status { status, message })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = ensure_success(response).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Pulls the human-readable reason out of an error body (`detail` or `error`), else a trimmed excerpt.
fn error_message(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "error", "message"] {
            if let Some(text) = value.get(key).and_then(serde_json::Value::as_str) {
                return Some(text.to_string());
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect())
}
