use crate::domain::lenient;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationStats {
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_cities: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cities_with_chinese: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cities_above_100k: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cities_queryable: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub chinese_coverage_percent: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub queryable_coverage_percent: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_queries_today: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub nearest_queries_today: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub nearby_queries_today: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_queries_all: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct City {
    #[serde(default, deserialize_with = "lenient::integer")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub geoname_id: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default)]
    pub name_zh: Option<String>,
    #[serde(default)]
    pub ascii_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub longitude: f64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub country_code: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub population: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub distance_km: f64,
}

impl City {
    /// Chinese name when the server has one, else the English name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name_zh.as_deref().filter(|n| !n.is_empty()).unwrap_or(&self.name)
    }
}
