//! Fixed instruction text sent with every synthesis request.

/// Tag for the response schema requested from the backend.
pub const SCHEMA_TAG: &str = "food_trend_report.v1";

/// Upper bound on trend entries accepted from the backend.
pub const MAX_TRENDS: usize = 5;

/// System-level framing: who the model is and what a hit looks like.
pub const SYSTEM_INSTRUCTION: &str = "\
あなたは海外の食品トレンドを分析する専門家です。
日本の食品卸会社の営業担当者向けに、海外で話題になっている食品・ドリンク・スイーツから
「これから日本で流行する可能性が高いもの」だけを選んで報告してください。

海外から日本に上陸して大きく流行した過去の例:
- タピオカミルクティー（台湾）
- マリトッツォ（イタリア）
- ドバイチョコレート（UAE）
- 台湾カステラ（台湾）
- チーズタッカルビ（韓国）
";

const ANALYSIS_HEADER: &str = "\
以下は海外のYouTube・Reddit・TikTok・Instagram・Google Trends・食メディアRSSから収集した食品関連データです。
データを分析し、日本の食品卸会社が注目すべきトレンドを3〜5件に絞り込んでください。

## 選定基準
1. 食品フィルタ: 食品・ドリンク・スイーツに直接関係するものに限る
2. 急上昇: 直近1週間で注目度が急に高まっている
3. 日本未上陸: 日本ではまだ広く知られていない（既に流行済みのものは除外）
4. 再現性: 日本の飲食店や食品メーカーで再現できる
5. 商機: 食品卸会社としてビジネスにつながる

## 収集データ
";

const ANALYSIS_FOOTER: &str = r#"

## 出力形式
次のJSONだけを出力してください。trendsは必ず3〜5件、各フィールドは簡潔に。

{
  "trends": [
    {
      "rank": 1,
      "product_name_en": "English name",
      "product_name_ja": "日本語名（推定）",
      "origin_country": "発祥国",
      "platforms": ["検出されたプラットフォーム"],
      "metrics": "具体的な数値（再生数・スコアなど）",
      "target_audience": "想定ターゲット層",
      "why_trending": "流行している理由（1〜2文）",
      "japan_forecast": "日本上陸の予測（時期・可能性・展開方法）",
      "reference_urls": ["参照URL"]
    }
  ],
  "summary": "今週のトレンド総括（2〜3文）"
}
"#;

/// Wrap the serialized corpus in the analysis instructions and schema.
pub fn build_prompt(payload: &str) -> String {
    let mut prompt =
        String::with_capacity(ANALYSIS_HEADER.len() + payload.len() + ANALYSIS_FOOTER.len());
    prompt.push_str(ANALYSIS_HEADER);
    prompt.push_str(payload);
    prompt.push_str(ANALYSIS_FOOTER);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_sits_between_criteria_and_schema() {
        let prompt = build_prompt("{\"reddit\":[]}");
        let data_at = prompt.find("{\"reddit\":[]}").unwrap();
        assert!(prompt.find("選定基準").unwrap() < data_at);
        assert!(prompt.find("\"product_name_ja\"").unwrap() > data_at);
    }
}
