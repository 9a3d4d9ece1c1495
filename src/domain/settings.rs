use serde::{Deserialize, Serialize};

pub const SETTINGS_KEY: &str = "image_classifier_config";

pub const DEFAULT_PROVIDER: &str = "aliyun";
pub const DEFAULT_MODEL: &str = "qwen-vl-plus";

pub const DEFAULT_PROMPT: &str = r#"请对这张图片进行分类。你必须从以下8个类别中选择一个：

1. social_activities - 社交活动（聚会、合影、多人互动场景）
2. pets - 宠物萌照（猫、狗等宠物照片）
3. single_person - 单人照片（个人照、自拍、肖像）
4. foods - 美食记录（食物、餐饮、烹饪相关）
5. travel_scenery - 旅行风景（旅游景点、自然风光、城市风景）
6. screenshot - 手机截图（手机屏幕截图、应用界面）
7. idcard - 证件照（身份证、护照、驾照等证件）
8. other - 其它（无法归类到上述类别）

请以JSON格式返回结果：
{
    "category": "类别key（必须是上述8个之一）",
    "confidence": 0.95,
    "description": "简短描述图片内容（可选，中文，30字以内）"
}

只返回JSON，不要有其他文字。"#;

/// User-editable console settings, persisted as one JSON blob.
///
/// The prompt is informational only: the server reads its own prompt from its environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsoleSettings {
    pub api_url: String,
    pub llm_provider: String,
    pub llm_api_key: String,
    pub llm_model: String,
    pub prompt: String,
    pub use_local_inference: bool,
    pub local_inference_fallback: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            llm_provider: DEFAULT_PROVIDER.to_string(),
            llm_api_key: String::new(),
            llm_model: DEFAULT_MODEL.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            use_local_inference: false,
            local_inference_fallback: false,
        }
    }
}

impl ConsoleSettings {
    /// Fills in anything a stored blob left blank.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.prompt.trim().is_empty() {
            self.prompt = DEFAULT_PROMPT.to_string();
        }
        if self.llm_provider.trim().is_empty() {
            self.llm_provider = DEFAULT_PROVIDER.to_string();
        }
        if self.llm_model.trim().is_empty() {
            self.llm_model = DEFAULT_MODEL.to_string();
        }
        self
    }

    /// Base URL precedence: explicit override, then the stored value, then `fallback`.
    #[must_use]
    pub fn resolve_base_url(&self, explicit: Option<&str>, fallback: &str) -> String {
        let chosen = explicit
            .filter(|u| !u.trim().is_empty())
            .or_else(|| Some(self.api_url.as_str()).filter(|u| !u.trim().is_empty()))
            .unwrap_or(fallback);
        chosen.trim().trim_end_matches('/').to_string()
    }

    pub fn reset_prompt(&mut self) {
        self.prompt = DEFAULT_PROMPT.to_string();
    }

    /// The API key with everything but the last four characters masked.
    #[must_use]
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.llm_api_key.chars().collect();
        if chars.is_empty() {
            return String::new();
        }
        let visible = chars.len().min(4);
        let hidden = chars.len() - visible;
        let tail: String = chars[hidden..].iter().collect();
        format!("{}{tail}", "*".repeat(hidden))
    }
}

/// Fields to overwrite in the stored settings; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub api_url: Option<String>,
    pub llm_provider: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_model: Option<String>,
    pub prompt: Option<String>,
    pub use_local_inference: Option<bool>,
    pub local_inference_fallback: Option<bool>,
}

impl SettingsPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.api_url.is_none()
            && self.llm_provider.is_none()
            && self.llm_api_key.is_none()
            && self.llm_model.is_none()
            && self.prompt.is_none()
            && self.use_local_inference.is_none()
            && self.local_inference_fallback.is_none()
    }

    pub fn apply(self, settings: &mut ConsoleSettings) {
        if let Some(v) = self.api_url {
            settings.api_url = v.trim().trim_end_matches('/').to_string();
        }
        if let Some(v) = self.llm_provider {
            settings.llm_provider = v;
        }
        if let Some(v) = self.llm_api_key {
            settings.llm_api_key = v;
        }
        if let Some(v) = self.llm_model {
            settings.llm_model = v;
        }
        if let Some(v) = self.prompt {
            settings.prompt = v;
        }
        if let Some(v) = self.use_local_inference {
            settings.use_local_inference = v;
        }
        if let Some(v) = self.local_inference_fallback {
            settings.local_inference_fallback = v;
        }
    }
}
