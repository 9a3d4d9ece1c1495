use crate::config::LabelLanguage;
use crate::domain::category;
use crate::domain::classify::{Detection, LocalInference};
use crate::render::format::{fixed, number};
use crate::render::widgets::{AlertKind, alert, confidence_bar, heading, table};
use crate::services::api_client::ClassifyOutcome;
use crate::services::labels::ImageNetLabels;
use std::fmt::Write;

const MAX_GENERAL_DETECTIONS: usize = 10;
const MAX_MOBILENET_PREDICTIONS: usize = 5;

/// Result card for one classified image. `labels` should already be loaded if
/// MobileNet predictions are present.
#[must_use]
pub fn classification(
    outcome: &ClassifyOutcome,
    labels: &ImageNetLabels,
    language: LabelLanguage,
    bar_width: usize,
) -> String {
    let response = &outcome.response;
    let Some(data) = response.data.as_ref() else {
        return alert(AlertKind::Error, response.error.as_deref().unwrap_or("分类失败"));
    };

    let mut out = heading("分类结果");
    let _ = writeln!(out, "  类别: {} ({})", category::display_label(&data.category, language), data.category);
    let _ = writeln!(out, "  置信度: {}%", fixed(data.confidence * 100.0, 2));
    let _ = writeln!(out, "  {}", confidence_bar(data.confidence, bar_width));
    if let Some(description) = data.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let _ = writeln!(out, "  描述: {description}");
    }
    let _ = writeln!(out, "  来源: {}", if response.from_cache { "缓存" } else { "实时分析" });
    let _ = writeln!(
        out,
        "  处理耗时: {}ms (往返 {}ms)",
        number(response.processing_time_ms),
        outcome.round_trip.as_millis()
    );
    if let Some(id) = response.request_id.as_deref() {
        let _ = writeln!(out, "  请求ID: {id}");
    }

    if let Some(local) = data.local_inference_result.as_ref() {
        out.push_str(&local_inference(local, labels));
    }
    out
}

/// The full response body, pretty-printed.
#[must_use]
pub fn raw_response(outcome: &ClassifyOutcome) -> String {
    let mut out = heading("完整响应");
    let body = serde_json::to_string_pretty(&outcome.raw).unwrap_or_else(|_| outcome.raw.to_string());
    for line in body.lines() {
        let _ = writeln!(out, "  {line}");
    }
    out
}

fn local_inference(local: &LocalInference, labels: &ImageNetLabels) -> String {
    let mut out = heading("本地推理详情");

    if !local.id_card_detections.is_empty() {
        out.push_str("  证件检测:\n");
        out.push_str(&detections(&local.id_card_detections, local.id_card_detections.len()));
    }

    if !local.general_detections.is_empty() {
        out.push_str("  通用目标检测:\n");
        out.push_str(&detections(&local.general_detections, MAX_GENERAL_DETECTIONS));
        let hidden = local.general_detections.len().saturating_sub(MAX_GENERAL_DETECTIONS);
        if hidden > 0 {
            let _ = writeln!(out, "  ... 还有 {hidden} 个");
        }
    }

    if let Some(mobilenet) = local.mobilenet.as_ref().filter(|m| !m.predictions.is_empty()) {
        out.push_str("  MobileNet 分类 (Top 5):\n");
        let rows: Vec<Vec<String>> = mobilenet
            .predictions
            .iter()
            .take(MAX_MOBILENET_PREDICTIONS)
            .enumerate()
            .map(|(rank, p)| {
                vec![
                    (rank + 1).to_string(),
                    labels.class_name(p.index),
                    p.index.to_string(),
                    format!("{}%", fixed(p.probability * 100.0, 1)),
                ]
            })
            .collect();
        out.push_str(&table(&["#", "类别", "索引", "概率"], &rows));
    }

    if local.id_card_detections.is_empty()
        && local.general_detections.is_empty()
        && local.mobilenet.as_ref().is_none_or(|m| m.predictions.is_empty())
    {
        out.push_str(&alert(AlertKind::Info, "无检测结果"));
    }
    out
}

fn detections(items: &[Detection], limit: usize) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .take(limit)
        .map(|d| vec![d.class_name.clone(), format!("{}%", fixed(d.confidence * 100.0, 1))])
        .collect();
    table(&["类别", "置信度"], &rows)
}
