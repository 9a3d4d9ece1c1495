use crate::domain::lenient;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodayStats {
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_requests: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cache_hits: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cache_hit_rate: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub unique_users: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub unique_ips: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub avg_processing_time: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub estimated_cost: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cost_saved: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheEfficiency {
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_cached_images: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_hits: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub times_saved: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub avg_hit_per_image: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub max_hits: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cost_saved: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryShare {
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub count: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub percentage: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub avg_confidence: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InferenceMethodStats {
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_requests: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub from_cache: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub llm_success: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub local_direct: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub local_fallback_success: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub local_test: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub llm_fail_count: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub local_total: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadCounts {
    #[serde(default, deserialize_with = "lenient::number")]
    pub android: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub windows: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoundUsers {
    #[serde(default, deserialize_with = "lenient::number")]
    pub bound_users_count: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Members {
    #[serde(default, deserialize_with = "lenient::number")]
    pub member_count: f64,
}

/// The three headline counters, fetched concurrently.
#[derive(Debug, Clone, Default)]
pub struct CoreMetrics {
    pub downloads: DownloadCounts,
    pub bound_users: f64,
    pub members: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchCacheStats {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub overall: BatchCacheOverall,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub daily: Vec<BatchCacheDay>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchCacheOverall {
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_queries: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_hashes: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_cached: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_miss: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub avg_batch_size: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub hit_rate: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchCacheDay {
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub queries: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub hashes: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cached: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub hit_rate: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchClassifyStats {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub overall: BatchClassifyOverall,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub daily: Vec<BatchClassifyDay>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchClassifyOverall {
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_batches: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_images: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_success: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_fail: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub avg_batch_size: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub avg_time_per_image: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub success_rate: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchClassifyDay {
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub batches: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub images: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub success: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub fail: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub success_rate: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub avg_time: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageEditStats {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub overall: ImageEditOverall,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub cache: ImageEditCache,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub daily: Vec<ImageEditDay>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageEditOverall {
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_tasks: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_images: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub completed_tasks: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub avg_images_per_task: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageEditCache {
    #[serde(default, deserialize_with = "lenient::number")]
    pub cache_hits: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cache_misses: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_calls: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub hit_rate: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageEditDay {
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub tasks: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub images: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub completed: f64,
}
