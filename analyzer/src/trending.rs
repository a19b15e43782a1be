// Standard library imports
use std::collections::HashMap;

// Third party imports
use chrono::{DateTime, Utc};

// Internal imports
use crate::types::{ParsedMessage, SentimentLabel};

/// Số topic tối đa trả về
const MAX_TRENDING: usize = 5;
/// Độ dài hashtag bắt đầu được cộng thêm trọng số
const LONG_TAG_LEN: usize = 8;

/// Trọng số tích lũy của một hashtag
#[derive(Debug, Clone, Copy, Default)]
struct TagStats {
    weight: f64,
    count: u64,
    sentiment: f64,
}

/// Hệ số sentiment cho trọng số trending
fn sentiment_modifier(label: SentimentLabel) -> f64 {
    match label {
        SentimentLabel::Positive => 1.2,
        SentimentLabel::Negative => 0.8,
        _ => 1.0,
    }
}

/// Tính danh sách trending topics của batch đã lọc
///
/// Mỗi hashtag tích lũy: trọng số theo độ mới (1 + 1/phút, phút chặn
/// dưới ở 1.0) nhân hệ số sentiment, nhân thêm log10(len)/log10(8) cho
/// tag dài hơn 8 ký tự. Xếp hạng: trọng số giảm dần, số lần xuất hiện
/// giảm dần, tổng hệ số sentiment giảm dần, rồi tên tag tăng dần.
pub fn compute_trending(
    messages: &[ParsedMessage],
    now_utc: DateTime<Utc>,
    sentiments: &HashMap<String, SentimentLabel>,
) -> Vec<String> {
    let mut trending: HashMap<String, TagStats> = HashMap::new();

    for msg in messages {
        if msg.hashtags.is_empty() {
            continue;
        }
        let minutes_since = ((now_utc - msg.timestamp).num_seconds() as f64 / 60.0).max(1.0);
        let weight_time = 1.0 + 1.0 / minutes_since;
        let modifier = sentiments
            .get(&msg.msg_id)
            .copied()
            .map(sentiment_modifier)
            .unwrap_or(1.0);

        for tag in &msg.hashtags {
            let mut weight = weight_time * modifier;
            let tag_len = tag.chars().count();
            if tag_len > LONG_TAG_LEN {
                weight *= (tag_len as f64).log10() / (LONG_TAG_LEN as f64).log10();
            }
            let stats = trending.entry(tag.clone()).or_default();
            stats.weight += weight;
            stats.count += 1;
            stats.sentiment += modifier;
        }
    }

    let mut ranked: Vec<(String, TagStats)> = trending.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.weight
            .total_cmp(&a.1.weight)
            .then_with(|| b.1.count.cmp(&a.1.count))
            .then_with(|| b.1.sentiment.total_cmp(&a.1.sentiment))
            .then_with(|| a.0.cmp(&b.0))
    });

    ranked
        .into_iter()
        .take(MAX_TRENDING)
        .map(|(tag, _)| tag)
        .collect()
}
