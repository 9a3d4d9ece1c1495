use crate::domain::inference::InferenceConfig;
use crate::domain::settings::ConsoleSettings;
use crate::render::widgets::{StatCard, cards, heading};
use std::fmt::Write;

const fn switch(on: bool) -> &'static str {
    if on { "开启" } else { "关闭" }
}

#[must_use]
pub fn inference_config(c: &InferenceConfig) -> String {
    let mut out = heading("推理配置");
    out.push_str(&cards(&[
        StatCard::new("本地推理", switch(c.use_local_inference)).sub("跳过大模型，直接使用本地模型"),
        StatCard::new("本地推理降级", switch(c.local_inference_fallback)).sub("大模型失败时使用本地模型"),
    ]));
    out
}

/// Settings view; the API key is masked.
#[must_use]
pub fn settings(s: &ConsoleSettings, effective_base_url: &str) -> String {
    let mut out = heading("系统设置");
    let stored = if s.api_url.is_empty() { "(未设置)" } else { s.api_url.as_str() };
    let key = if s.llm_api_key.is_empty() { "(未设置)".to_string() } else { s.masked_api_key() };
    out.push_str(&cards(&[
        StatCard::new("API地址", stored).sub(format!("当前使用: {effective_base_url}")),
        StatCard::new("大模型提供商", s.llm_provider.as_str()),
        StatCard::new("模型", s.llm_model.as_str()),
        StatCard::new("API密钥", key),
        StatCard::new("本地推理", switch(s.use_local_inference)),
        StatCard::new("本地推理降级", switch(s.local_inference_fallback)),
    ]));
    out.push_str("  提示词 (仅供参考，服务端使用自身环境变量中的提示词):\n");
    for line in s.prompt.lines() {
        let _ = writeln!(out, "    {line}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_mask_key() {
        let s = ConsoleSettings { llm_api_key: "sk-abcdef".into(), ..ConsoleSettings::default() };
        let out = settings(&s, "http://127.0.0.1:8000");
        assert!(out.contains("*****cdef"));
        assert!(!out.contains("sk-abcdef"));
        assert!(out.contains("qwen-vl-plus"));
        assert!(out.contains("当前使用: http://127.0.0.1:8000"));
    }

    #[test]
    fn test_inference_switches() {
        let out = inference_config(&InferenceConfig { use_local_inference: true, local_inference_fallback: false });
        assert!(out.lines().any(|l| l.contains("本地推理 ") && l.contains("开启")));
        assert!(out.lines().any(|l| l.contains("本地推理降级") && l.contains("关闭")));
    }
}
