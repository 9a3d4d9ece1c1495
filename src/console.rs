use crate::config::{Config, DisplayConfig, Surface, UploadConfig};
use crate::domain::inference::InferenceConfigUpdate;
use crate::domain::session::SessionState;
use crate::domain::settings::SettingsPatch;
use crate::error::Result;
use crate::render::{self, classification, config as config_view, dashboard, location, widgets};
use crate::services::api_client::{ClassifierApi, REPORT_WINDOW_DAYS};
use crate::services::gateway::ApiGateway;
use crate::services::labels::ImageNetLabels;
use crate::services::session_service::SessionService;
use crate::services::settings_service::SettingsService;
use crate::validation::{Coordinates, ImageUpload, NearbyQuery};
use clap::ValueEnum;
use futures::future::join_all;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// One block of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Section {
    Health,
    Core,
    Today,
    Cache,
    Distribution,
    InferenceMethod,
    BatchCache,
    BatchClassify,
    ImageEdit,
    InferenceConfig,
    Location,
}

impl Section {
    /// Dashboard order.
    pub const ALL: [Self; 11] = [
        Self::Health,
        Self::Core,
        Self::Today,
        Self::Cache,
        Self::Distribution,
        Self::InferenceMethod,
        Self::BatchCache,
        Self::BatchClassify,
        Self::ImageEdit,
        Self::InferenceConfig,
        Self::Location,
    ];

    #[must_use]
    pub const fn admin_only(self) -> bool {
        !matches!(self, Self::Health | Self::Today | Self::Cache | Self::Distribution)
    }

    #[must_use]
    pub fn for_surface(surface: Surface) -> Vec<Self> {
        Self::ALL.into_iter().filter(|s| surface.requires_auth() || !s.admin_only()).collect()
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Health => "系统状态",
            Self::Core => "核心指标",
            Self::Today => "今日统计",
            Self::Cache => "缓存效率",
            Self::Distribution => "分类分布",
            Self::InferenceMethod => "推理方式统计",
            Self::BatchCache => "批量缓存查询",
            Self::BatchClassify => "批量分类",
            Self::ImageEdit => "图片编辑",
            Self::InferenceConfig => "推理配置",
            Self::Location => "城市数据",
        }
    }
}

/// The console "page": every user-facing action, parameterized by [`Surface`].
#[derive(Debug)]
pub struct Console {
    api: ClassifierApi,
    labels: Arc<ImageNetLabels>,
    settings: SettingsService,
    display: DisplayConfig,
    upload: UploadConfig,
    api_url_override: Option<String>,
}

impl Console {
    /// Wires the console from configuration. The base URL comes from the flag,
    /// then the stored settings, then the built-in default.
    ///
    /// # Errors
    /// Returns `Transport` if the HTTP client cannot be built.
    pub fn new(config: &Config, session: SessionService) -> Result<Self> {
        let settings = SettingsService::new(Arc::clone(session.store()));
        let base_url = settings.load().resolve_base_url(config.api_url.as_deref(), crate::config::DEFAULT_API_URL);

        let http = reqwest::Client::builder().user_agent(concat!("classifier-console/", env!("CARGO_PKG_VERSION"))).build()?;
        let labels = ImageNetLabels::new(
            ImageNetLabels::source_for(config.display.imagenet_classes.clone(), &base_url),
            http.clone(),
        );
        let api = ClassifierApi::new(ApiGateway::new(http, session), base_url, config.surface);

        tracing::debug!(base_url = api.base_url(), surface = config.surface.as_str(), "Console ready");
        Ok(Self {
            api,
            labels: Arc::new(labels),
            settings,
            display: config.display.clone(),
            upload: config.upload.clone(),
            api_url_override: config.api_url.clone(),
        })
    }

    #[must_use]
    pub const fn api(&self) -> &ClassifierApi {
        &self.api
    }

    #[must_use]
    pub const fn session(&self) -> &SessionService {
        self.api.gateway().session()
    }

    /// Page guard: on the admin surface a missing or expired session
    /// redirects to login and returns `false`.
    #[must_use]
    pub fn open(&self) -> bool {
        !self.api.surface().requires_auth() || self.session().require_session()
    }

    #[must_use]
    pub fn header(&self) -> String {
        match self.api.surface() {
            Surface::Admin => format!("管理后台 | 当前用户: {} | {}\n", self.session().username(), self.api.base_url()),
            Surface::Public => format!("图片分类控制台 | {}\n", self.api.base_url()),
        }
    }

    /// Loads every section for the surface concurrently and renders them in
    /// [`Section::ALL`] order. A failed section renders inline.
    ///
    /// # Errors
    /// Returns `SessionExpired` if any section was rejected; the page is abandoned.
    pub async fn dashboard(&self) -> Result<String> {
        let sections = Section::for_surface(self.api.surface());
        let results = join_all(sections.iter().map(|&s| self.section(s))).await;

        let mut out = self.header();
        for (section, result) in sections.into_iter().zip(results) {
            out.push('\n');
            match result {
                Ok(text) => out.push_str(&text),
                Err(e) if e.is_terminal() => return Err(e),
                Err(e) => {
                    tracing::warn!(section = section.title(), error = %e, "Dashboard section failed to load");
                    if section == Section::Health {
                        out.push_str(&dashboard::unreachable(&e.to_string()));
                    } else {
                        out.push_str(&widgets::heading(section.title()));
                        out.push_str(&render::load_failed(&e));
                    }
                }
            }
        }
        Ok(out)
    }

    /// Re-renders the dashboard every refresh interval until `shutdown` resolves.
    ///
    /// # Errors
    /// Returns `SessionExpired` if the session is rejected mid-watch, or an I/O error from `out`.
    pub async fn watch<W, F>(&self, out: &mut W, shutdown: F) -> anyhow::Result<()>
    where
        W: std::io::Write,
        F: Future<Output = ()>,
    {
        let period = Duration::from_secs(self.display.refresh_interval_secs.max(1));
        let mut ticker = tokio::time::interval(period);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::debug!("Watch stopped");
                    return Ok(());
                }
                _ = ticker.tick() => {
                    let frame = self.dashboard().await?;
                    write!(out, "\x1b[2J\x1b[H{frame}")?;
                    writeln!(out, "\n每 {} 秒自动刷新, Ctrl+C 退出", period.as_secs())?;
                    out.flush()?;
                }
            }
        }
    }

    /// One dashboard section on its own. Errors propagate instead of rendering inline.
    ///
    /// # Errors
    /// Returns whatever the underlying request failed with.
    pub async fn section(&self, section: Section) -> Result<String> {
        let lang = self.display.labels;
        let days = REPORT_WINDOW_DAYS;
        Ok(match section {
            Section::Health => dashboard::health(&self.api.health().await?),
            Section::Core => dashboard::core_metrics(&self.api.core_metrics().await?),
            Section::Today => dashboard::today(&self.api.today_stats().await?),
            Section::Cache => dashboard::cache(&self.api.cache_efficiency().await?),
            Section::Distribution => dashboard::distribution(&self.api.category_distribution().await?, lang),
            Section::InferenceMethod => dashboard::inference_method(&self.api.inference_method_stats().await?),
            Section::BatchCache => dashboard::batch_cache(&self.api.batch_cache_stats(days).await?, days),
            Section::BatchClassify => dashboard::batch_classify(&self.api.batch_classify_stats(days).await?, days),
            Section::ImageEdit => dashboard::image_edit(&self.api.image_edit_stats(days).await?, days),
            Section::InferenceConfig => config_view::inference_config(&self.api.inference_config().await?),
            Section::Location => location::location_stats(&self.api.location_stats().await?),
        })
    }

    /// Validates and uploads one image. Nothing is sent if validation fails.
    /// With `show_raw` the full response body follows the result card.
    ///
    /// # Errors
    /// Returns `Validation` for a bad file, `Rejected` if the server could not classify it.
    pub async fn classify(&self, path: &Path, show_raw: bool) -> Result<String> {
        let upload = ImageUpload::from_path(path, self.upload.max_upload_bytes).await?;
        let outcome = self.api.classify(&upload).await?;

        let wants_labels = outcome
            .response
            .data
            .as_ref()
            .and_then(|d| d.local_inference_result.as_ref())
            .and_then(|l| l.mobilenet.as_ref())
            .is_some_and(|m| !m.predictions.is_empty());
        if wants_labels {
            self.labels.ensure_loaded().await;
        }

        let mut out = classification::classification(&outcome, &self.labels, self.display.labels, self.display.bar_width);
        if show_raw {
            out.push_str(&classification::raw_response(&outcome));
        }
        Ok(out)
    }

    /// # Errors
    /// Returns `Validation` for out-of-range coordinates before any request is made.
    pub async fn nearest_city(&self, latitude: f64, longitude: f64) -> Result<String> {
        let at = Coordinates::new(latitude, longitude)?;
        Ok(location::city(&self.api.nearest_city(at).await?))
    }

    /// # Errors
    /// Returns `Validation` for bad coordinates or distance before any request is made.
    pub async fn nearby_cities(
        &self,
        latitude: f64,
        longitude: f64,
        limit: Option<u32>,
        max_distance_km: Option<f64>,
    ) -> Result<String> {
        let query = NearbyQuery::new(Coordinates::new(latitude, longitude)?, limit, max_distance_km)?;
        Ok(location::cities(&self.api.nearby_cities(query).await?))
    }

    /// # Errors
    /// Returns the request failure.
    pub async fn update_inference(&self, update: InferenceConfigUpdate) -> Result<String> {
        let config = self.api.update_inference_config(update).await?;
        tracing::info!(
            use_local_inference = config.use_local_inference,
            local_inference_fallback = config.local_inference_fallback,
            "Inference configuration updated"
        );
        let mut out = widgets::alert(widgets::AlertKind::Success, "推理配置已更新");
        out.push_str(&config_view::inference_config(&config));
        Ok(out)
    }

    /// # Errors
    /// Returns the request failure.
    pub async fn reset_inference(&self) -> Result<String> {
        let config = self.api.reset_inference_config().await?;
        let mut out = widgets::alert(widgets::AlertKind::Success, "推理配置已恢复默认");
        out.push_str(&config_view::inference_config(&config));
        Ok(out)
    }

    #[must_use]
    pub fn show_settings(&self) -> String {
        config_view::settings(&self.settings.load(), self.api.base_url())
    }

    /// Saves the patched settings locally, then re-checks the server the way a save does.
    ///
    /// # Errors
    /// Returns `Storage` if the settings cannot be persisted.
    pub async fn update_settings(&self, patch: SettingsPatch) -> Result<String> {
        let mut settings = self.settings.load();
        patch.apply(&mut settings);
        self.settings.save(&settings)?;

        let effective =
            settings.resolve_base_url(self.api_url_override.as_deref(), crate::config::DEFAULT_API_URL);
        let mut out = widgets::alert(
            widgets::AlertKind::Success,
            "配置已保存到本地 (提示词需要在服务器环境变量中配置才能生效)",
        );
        out.push_str(&config_view::settings(&settings, &effective));
        out.push('\n');
        out.push_str(&self.status().await);
        Ok(out)
    }

    /// # Errors
    /// Returns `Storage` if the settings cannot be persisted.
    pub fn reset_prompt(&self) -> Result<String> {
        let settings = self.settings.reset_prompt()?;
        let mut out = widgets::alert(widgets::AlertKind::Info, "提示词已恢复为默认值");
        out.push_str(&config_view::settings(&settings, self.api.base_url()));
        Ok(out)
    }

    /// Health card, or the unreachable notice.
    pub async fn status(&self) -> String {
        match self.api.health().await {
            Ok(h) => dashboard::health(&h),
            Err(e) => {
                tracing::warn!(error = %e, "Health check failed");
                dashboard::unreachable(&e.to_string())
            }
        }
    }

    /// # Errors
    /// Returns `Status` for rejected credentials, `Storage` if the session cannot be saved.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let token = self.api.login(username, password).await?;
        Ok(widgets::alert(
            widgets::AlertKind::Success,
            &format!("登录成功: {username} (有效期 {} 小时)", token.expires_in / 3600),
        ))
    }

    /// # Errors
    /// Returns `Storage` if the session cannot be cleared.
    pub fn logout(&self) -> Result<String> {
        if self.session().logout()? {
            Ok(widgets::alert(widgets::AlertKind::Success, "已退出登录"))
        } else {
            Ok(widgets::alert(widgets::AlertKind::Info, "已取消"))
        }
    }

    #[must_use]
    pub fn whoami(&self) -> String {
        let session = self.session();
        match session.state() {
            SessionState::Authenticated => format!("{}\n", session.username()),
            SessionState::Unauthenticated => widgets::alert(widgets::AlertKind::Warning, "未登录或登录已过期"),
        }
    }
}
