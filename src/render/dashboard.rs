use crate::config::LabelLanguage;
use crate::domain::category;
use crate::domain::health::HealthResponse;
use crate::domain::stats::{
    BatchCacheStats, BatchClassifyStats, CacheEfficiency, CategoryShare, CoreMetrics, ImageEditStats,
    InferenceMethodStats, TodayStats,
};
use crate::render::format::{currency, fixed, number, percent, share, time_of_day};
use crate::render::widgets::{AlertKind, StatCard, alert, cards, heading, table};

const NO_DATA: &str = "暂无数据";

#[must_use]
pub fn health(h: &HealthResponse) -> String {
    let dot = |ok: bool| if ok { "🟢" } else { "🔴" };
    let updated = h.timestamp.as_deref().map_or_else(|| "-".to_string(), time_of_day);

    let mut out = heading("系统状态");
    out.push_str(&cards(&[
        StatCard::new("服务状态", format!("{} {}", dot(h.is_healthy()), if h.is_healthy() { "正常" } else { "异常" })),
        StatCard::new(
            "数据库",
            format!("{} {}", dot(h.database_connected()), if h.database_connected() { "已连接" } else { "未连接" }),
        ),
        StatCard::new(
            "大模型API",
            format!("{} {}", dot(h.model_available()), if h.model_available() { "可用" } else { "未配置" }),
        ),
        StatCard::new("最后更新", updated),
    ]));
    out
}

/// Shown in place of the status cards when the health check itself fails.
#[must_use]
pub fn unreachable(reason: &str) -> String {
    let mut out = heading("系统状态");
    out.push_str(&alert(AlertKind::Error, &format!("无法连接到服务器: {reason}")));
    out
}

#[must_use]
pub fn core_metrics(m: &CoreMetrics) -> String {
    let mut out = heading("核心指标");
    out.push_str(&cards(&[
        StatCard::new("下载量 (Android)", number(m.downloads.android)),
        StatCard::new("下载量 (Windows)", number(m.downloads.windows)),
        StatCard::new("已绑定用户", number(m.bound_users)),
        StatCard::new("会员数量", number(m.members)),
    ]));
    out
}

#[must_use]
pub fn today(s: &TodayStats) -> String {
    let mut out = heading("今日统计");
    out.push_str(&cards(&[
        StatCard::new("总请求数", number(s.total_requests)).sub("今日累计"),
        StatCard::new("缓存命中", number(s.cache_hits)).sub(format!("命中率: {}", percent(s.cache_hit_rate))),
        StatCard::new("独立用户", number(s.unique_users)).sub(format!("独立IP: {}", number(s.unique_ips))),
        StatCard::new("平均耗时", number(s.avg_processing_time)).sub("毫秒"),
        StatCard::new("预估成本", currency(s.estimated_cost)).sub("API调用成本"),
        StatCard::new("节省成本", currency(s.cost_saved)).sub("缓存节省"),
    ]));
    out
}

#[must_use]
pub fn cache(s: &CacheEfficiency) -> String {
    let mut out = heading("缓存效率");
    out.push_str(&cards(&[
        StatCard::new("缓存图片数", number(s.total_cached_images)).sub("总缓存"),
        StatCard::new("总命中次数", number(s.total_hits)).sub("累计命中"),
        StatCard::new("节省调用", number(s.times_saved)).sub("次数"),
        StatCard::new("平均命中", fixed(s.avg_hit_per_image, 2)).sub("次/图片"),
        StatCard::new("最高命中", number(s.max_hits)).sub("单图片最高"),
        StatCard::new("累计节省", currency(s.cost_saved)).sub("总成本节省"),
    ]));
    out
}

#[must_use]
pub fn distribution(entries: &[CategoryShare], language: LabelLanguage) -> String {
    let mut out = heading("分类分布");
    if entries.is_empty() {
        out.push_str(&alert(AlertKind::Info, NO_DATA));
        return out;
    }

    let items: Vec<StatCard> = entries
        .iter()
        .map(|e| {
            StatCard::new(category::display_label(&e.category, language), number(e.count))
                .sub(format!("{} | 置信度: {}", percent(e.percentage), fixed(e.avg_confidence, 2)))
        })
        .collect();
    out.push_str(&cards(&items));
    out
}

#[must_use]
pub fn inference_method(s: &InferenceMethodStats) -> String {
    let mut out = heading("推理方式统计");
    out.push_str(&cards(&[
        StatCard::new("今日总请求", number(s.total_requests)),
        StatCard::new("缓存命中", number(s.from_cache)).sub(format!("{}%", share(s.from_cache, s.total_requests))),
        StatCard::new("大模型调用成功", number(s.llm_success)),
        StatCard::new("本地推理总次数", number(s.local_total)).sub(format!(
            "直接: {} | 降级: {} | 测试: {}",
            number(s.local_direct),
            number(s.local_fallback_success),
            number(s.local_test)
        )),
        StatCard::new("大模型调用失败", number(s.llm_fail_count)).sub("已降级到本地推理"),
        StatCard::new("本地推理降级成功", number(s.local_fallback_success)).sub("保障服务可用性"),
        StatCard::new("本地推理直接调用", number(s.local_direct)).sub("开关开启"),
        StatCard::new("本地模型测试", number(s.local_test)).sub("管理后台测试"),
    ]));
    out
}

#[must_use]
pub fn batch_cache(s: &BatchCacheStats, days: u32) -> String {
    let o = &s.overall;
    let mut out = heading("批量缓存查询");
    out.push_str(&cards(&[
        StatCard::new("批量查询次数", number(o.total_queries)).sub(format!("最近{days}天")),
        StatCard::new("查询哈希总数", number(o.total_hashes)),
        StatCard::new("缓存命中", number(o.total_cached)).sub(format!("{}%", fixed(o.hit_rate, 1))),
        StatCard::new("缓存未命中", number(o.total_miss)),
        StatCard::new("平均批次大小", fixed(o.avg_batch_size, 1)).sub("个/次"),
    ]));

    if s.daily.is_empty() {
        out.push_str(&alert(AlertKind::Info, NO_DATA));
        return out;
    }
    let rows: Vec<Vec<String>> = s
        .daily
        .iter()
        .map(|d| vec![d.date.clone(), number(d.queries), number(d.hashes), number(d.cached), format!("{}%", fixed(d.hit_rate, 1))])
        .collect();
    out.push_str(&table(&["日期", "查询次数", "哈希数", "命中数", "命中率"], &rows));
    out
}

#[must_use]
pub fn batch_classify(s: &BatchClassifyStats, days: u32) -> String {
    let o = &s.overall;
    let mut out = heading("批量分类");
    out.push_str(&cards(&[
        StatCard::new("批量分类次数", number(o.total_batches)).sub(format!("最近{days}天")),
        StatCard::new("分类图片总数", number(o.total_images)),
        StatCard::new("成功", number(o.total_success)).sub(format!("{}%", fixed(o.success_rate, 1))),
        StatCard::new("平均耗时", fixed(o.avg_time_per_image, 0)).sub("ms/张"),
        StatCard::new("平均批次大小", fixed(o.avg_batch_size, 1)).sub("张/次"),
        StatCard::new("失败数", number(o.total_fail)).sub(format!("{}%", share(o.total_fail, o.total_images))),
    ]));

    if s.daily.is_empty() {
        out.push_str(&alert(AlertKind::Info, NO_DATA));
        return out;
    }
    let rows: Vec<Vec<String>> = s
        .daily
        .iter()
        .map(|d| {
            vec![
                d.date.clone(),
                number(d.batches),
                number(d.images),
                number(d.success),
                number(d.fail),
                format!("{}%", fixed(d.success_rate, 1)),
                format!("{}ms", fixed(d.avg_time, 0)),
            ]
        })
        .collect();
    out.push_str(&table(&["日期", "批次", "图片数", "成功", "失败", "成功率", "平均耗时"], &rows));
    out
}

#[must_use]
pub fn image_edit(s: &ImageEditStats, days: u32) -> String {
    let o = &s.overall;
    let c = &s.cache;
    let mut out = heading("图片编辑");
    out.push_str(&cards(&[
        StatCard::new("编辑任务总数", number(o.total_tasks)).sub(format!("最近{days}天")),
        StatCard::new("编辑图片总数", number(o.total_images)),
        StatCard::new("已完成任务", number(o.completed_tasks)).sub(format!("{}%", share(o.completed_tasks, o.total_tasks))),
        StatCard::new("平均图片数", fixed(o.avg_images_per_task, 1)).sub("张/任务"),
        StatCard::new("缓存命中", number(c.cache_hits)).sub(format!("{}%", fixed(c.hit_rate, 1))),
        StatCard::new("缓存未命中", number(c.cache_misses)).sub(format!("{}%", share(c.cache_misses, c.total_calls))),
        StatCard::new("API调用总数", number(c.total_calls)),
    ]));

    if s.daily.is_empty() {
        out.push_str(&alert(AlertKind::Info, NO_DATA));
        return out;
    }
    let rows: Vec<Vec<String>> =
        s.daily.iter().map(|d| vec![d.date.clone(), number(d.tasks), number(d.images), number(d.completed)]).collect();
    out.push_str(&table(&["日期", "任务数", "图片数", "已完成"], &rows));
    out
}
