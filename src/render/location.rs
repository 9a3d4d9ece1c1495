use crate::domain::location::{City, LocationStats};
use crate::render::format::{fixed, number};
use crate::render::widgets::{AlertKind, StatCard, alert, cards, heading, table};
use std::fmt::Write;

#[must_use]
pub fn location_stats(s: &LocationStats) -> String {
    let mut out = heading("城市数据");
    out.push_str(&cards(&[
        StatCard::new("城市总数", number(s.total_cities)),
        StatCard::new("中文名覆盖", number(s.cities_with_chinese)).sub(format!("{}%", fixed(s.chinese_coverage_percent, 1))),
        StatCard::new("人口10万以上", number(s.cities_above_100k)),
        StatCard::new("可查询城市", number(s.cities_queryable)).sub(format!("{}%", fixed(s.queryable_coverage_percent, 1))),
        StatCard::new("今日查询", number(s.total_queries_today)).sub(format!(
            "最近城市: {} | 附近城市: {}",
            number(s.nearest_queries_today),
            number(s.nearby_queries_today)
        )),
        StatCard::new("累计查询", number(s.total_queries_all)),
    ]));
    out
}

#[must_use]
pub fn city(c: &City) -> String {
    let mut out = heading("最近城市");
    if c.name.is_empty() || c.name == c.display_name() {
        let _ = writeln!(out, "  {}", c.display_name());
    } else {
        let _ = writeln!(out, "  {} ({})", c.display_name(), c.name);
    }
    let _ = writeln!(out, "  国家: {}", c.country_code);
    let _ = writeln!(out, "  坐标: {}, {}", fixed(c.latitude, 4), fixed(c.longitude, 4));
    let _ = writeln!(out, "  人口: {}", number(c.population));
    let _ = writeln!(out, "  距离: {} km", fixed(c.distance_km, 2));
    out
}

#[must_use]
pub fn cities(list: &[City]) -> String {
    let mut out = heading("附近城市");
    if list.is_empty() {
        out.push_str(&alert(AlertKind::Warning, "未找到附近城市"));
        return out;
    }
    let rows: Vec<Vec<String>> = list
        .iter()
        .enumerate()
        .map(|(i, c)| {
            vec![
                (i + 1).to_string(),
                c.display_name().to_string(),
                c.country_code.clone(),
                number(c.population),
                format!("{} km", fixed(c.distance_km, 2)),
            ]
        })
        .collect();
    out.push_str(&table(&["#", "城市", "国家", "人口", "距离"], &rows));
    out
}
