//! Renders an [`AnalysisResult`] as the chat report text.

use chrono::{Duration, NaiveDate, Utc};
use foodtrend_core::{AnalysisResult, TrendEntry};

const JST_OFFSET_HOURS: i64 = 9;

/// Lines are joined with this separator; the segmenter splits on it.
pub const LINE_SEPARATOR: &str = "\n";

/// Today's date in Japan, which is the report's audience.
pub fn today_jst() -> NaiveDate {
    (Utc::now() + Duration::hours(JST_OFFSET_HOURS)).date_naive()
}

/// Render the full report: header, one section per trend in rank order,
/// then the footer.
pub fn format_message(result: &AnalysisResult, date: NaiveDate) -> String {
    let rule = "=".repeat(25);
    let mut lines = vec![
        "🌏 海外フードトレンド速報".to_string(),
        format!("📅 {}", date.format("%Y/%m/%d")),
        String::new(),
        format!("📊 {}", result.summary()),
        String::new(),
        rule,
    ];

    for trend in result.trends() {
        push_trend(&mut lines, trend);
    }

    lines.extend([
        String::new(),
        "━━━━━━━━━━━━━".to_string(),
        "🤖 AI フードトレンド分析".to_string(),
        "　 powered by Gemini + YouTube + Reddit + TikTok".to_string(),
    ]);

    lines.join(LINE_SEPARATOR)
}

fn push_trend(lines: &mut Vec<String>, trend: &TrendEntry) {
    lines.extend([
        String::new(),
        format!("【{}位】{}", trend.rank, trend.product_name_en),
        format!("　　（{}）", trend.product_name_ja),
        format!("🌍 発祥: {}", trend.origin_country),
        format!("📱 検出: {}", trend.platforms.join(", ")),
        format!("📈 数値: {}", trend.metrics),
        format!("🎯 ターゲット: {}", trend.target_audience),
        format!("💡 流行理由: {}", trend.why_trending),
        format!("🇯🇵 日本予測: {}", trend.japan_forecast),
    ]);
    if let Some(url) = trend.reference_urls.first() {
        lines.push(format!("🔗 参照: {url}"));
    }
    lines.push("-".repeat(25));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trend(rank: u32, name: &str, urls: &[&str]) -> TrendEntry {
        TrendEntry {
            rank,
            product_name_en: name.to_string(),
            product_name_ja: "ドバイチョコ".to_string(),
            origin_country: "UAE".to_string(),
            platforms: vec!["TikTok".to_string(), "Instagram".to_string()],
            metrics: "120M views".to_string(),
            target_audience: "20-30代女性".to_string(),
            why_trending: "断面映え".to_string(),
            japan_forecast: "半年以内".to_string(),
            reference_urls: urls.iter().map(|u| (*u).to_string()).collect(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn header_carries_date_and_summary() {
        let result =
            AnalysisResult::from_ranked(vec![trend(1, "Dubai chocolate", &[])], "甘い一週間", 5)
                .unwrap();
        let text = format_message(&result, date());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "🌏 海外フードトレンド速報");
        assert_eq!(lines[1], "📅 2026/10/19");
        assert_eq!(lines[3], "📊 甘い一週間");
    }

    #[test]
    fn sections_follow_rank_order() {
        let result = AnalysisResult::from_ranked(
            vec![trend(2, "Second", &[]), trend(1, "First", &[])],
            "",
            5,
        )
        .unwrap();
        let text = format_message(&result, date());
        let first = text.find("【1位】First").unwrap();
        let second = text.find("【2位】Second").unwrap();
        assert!(first < second);
        assert!(text.contains("📱 検出: TikTok, Instagram"));
    }

    #[test]
    fn only_first_reference_url_is_shown() {
        let result = AnalysisResult::from_ranked(
            vec![trend(1, "Kunafa", &["https://a.example", "https://b.example"])],
            "",
            5,
        )
        .unwrap();
        let text = format_message(&result, date());
        assert!(text.contains("🔗 参照: https://a.example"));
        assert!(!text.contains("https://b.example"));
    }

    #[test]
    fn missing_reference_url_omits_line() {
        let result =
            AnalysisResult::from_ranked(vec![trend(1, "Kunafa", &[])], "", 5).unwrap();
        assert!(!format_message(&result, date()).contains("🔗"));
    }
}
