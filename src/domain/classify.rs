use crate::domain::lenient;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Classification>,
    #[serde(default)]
    pub from_cache: bool,
    #[serde(default, deserialize_with = "lenient::number")]
    pub processing_time_ms: f64,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Classification {
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: String,
    /// In `[0, 1]`.
    #[serde(default, deserialize_with = "lenient::number")]
    pub confidence: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub local_inference_result: Option<LocalInference>,
}

/// Detector output attached when the server fell back to (or was told to use) on-device models.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalInference {
    #[serde(rename = "idCardDetections", default)]
    pub id_card_detections: Vec<Detection>,
    #[serde(rename = "generalDetections", default)]
    pub general_detections: Vec<Detection>,
    #[serde(rename = "mobileNetV3Detections", default)]
    pub mobilenet: Option<MobileNetDetections>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Detection {
    #[serde(rename = "className", default, deserialize_with = "lenient::text")]
    pub class_name: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MobileNetDetections {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Prediction {
    /// ImageNet class index.
    #[serde(default, deserialize_with = "lenient::integer")]
    pub index: u32,
    #[serde(default, deserialize_with = "lenient::number")]
    pub probability: f64,
}
