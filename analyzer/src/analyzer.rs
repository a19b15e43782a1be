// Standard library imports
use std::collections::HashMap;

// Third party imports
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::debug;

// Internal imports
use crate::anomaly::detect_anomaly;
use crate::influence::compute_influence;
use crate::lexicon::META_PHRASE_NORMALIZED;
use crate::sentiment::classify;
use crate::trending::compute_trending;
use crate::types::{
    AnalysisFlags, FeedAnalysis, ParsedMessage, SentimentDistribution, SentimentLabel, UserStats,
};
use crate::validator::validate_payload;
use feed_common::{normalize_for_matching, AnalysisError};

/// Dung sai lệch đồng hồ giữa các sender (giây)
const CLOCK_SKEW_TOLERANCE_SECS: i64 = 5;
/// Giá trị engagement cố định khi candidate_awareness bật
const CANDIDATE_ENGAGEMENT_SCORE: f64 = 9.42;
/// Độ dài content của special pattern (ký tự)
const SPECIAL_PATTERN_LEN: usize = 42;

/// Content đúng 42 ký tự và chứa "mbras"
fn is_special_pattern(content: &str) -> bool {
    content.chars().count() == SPECIAL_PATTERN_LEN && content.to_lowercase().contains("mbras")
}

/// Content (sau chuẩn hóa) chứa câu meta như một chuỗi con
fn has_candidate_awareness(content: &str) -> bool {
    normalize_for_matching(content).contains(META_PHRASE_NORMALIZED.as_str())
}

/// Làm tròn 1 chữ số thập phân
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Phân tích một batch thông điệp, trả về snapshot analytics
///
/// Hàm thuần của input: validate, lọc theo cửa sổ thời gian, chạy
/// classifier, aggregator, ranker và detector, rồi lắp kết quả.
/// Không giữ trạng thái nào giữa các request.
pub fn analyze_feed(payload: &Value) -> Result<FeedAnalysis, AnalysisError> {
    let (messages, time_window) = validate_payload(payload)?;

    // Mốc thời gian tham chiếu: timestamp lớn nhất của batch chưa lọc
    let now_utc = messages
        .iter()
        .map(|msg| msg.timestamp)
        .max()
        .unwrap_or_else(Utc::now);

    // Cửa sổ quá lớn để biểu diễn thì coi như bao trùm toàn bộ batch
    let window_start = Duration::try_minutes(time_window)
        .and_then(|window| now_utc.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let window_end = now_utc + Duration::seconds(CLOCK_SKEW_TOLERANCE_SECS);
    let filtered: Vec<ParsedMessage> = messages
        .into_iter()
        .filter(|msg| msg.timestamp >= window_start && msg.timestamp <= window_end)
        .collect();

    debug!(
        filtered = filtered.len(),
        window_minutes = time_window,
        "Lọc batch theo cửa sổ thời gian"
    );

    let mut flags = AnalysisFlags::default();

    let mut positive_count = 0u64;
    let mut negative_count = 0u64;
    let mut neutral_count = 0u64;
    let mut sentiment_total = 0u64;

    let mut sentiments_by_id: HashMap<String, SentimentLabel> = HashMap::new();
    let mut sentiment_sequences: HashMap<String, Vec<(DateTime<Utc>, SentimentLabel)>> =
        HashMap::new();
    let mut user_timestamps: HashMap<String, Vec<DateTime<Utc>>> = HashMap::new();
    let mut all_timestamps: Vec<DateTime<Utc>> = Vec::new();
    let mut user_stats: HashMap<String, UserStats> = HashMap::new();
    let mut total_interactions = 0u64;
    let mut total_views = 0u64;

    for msg in &filtered {
        let is_mbras_user = msg.user_id.to_lowercase().contains("mbras");
        if is_mbras_user {
            flags.mbras_employee = true;
        }
        if is_special_pattern(&msg.content) {
            flags.special_pattern = true;
        }
        if has_candidate_awareness(&msg.content) {
            flags.candidate_awareness = true;
        }

        let (label, _score) = classify(&msg.content, is_mbras_user);
        sentiments_by_id.insert(msg.msg_id.clone(), label);
        if label.is_scored() {
            match label {
                SentimentLabel::Positive => positive_count += 1,
                SentimentLabel::Negative => negative_count += 1,
                _ => neutral_count += 1,
            }
            sentiment_total += 1;
        }

        sentiment_sequences
            .entry(msg.user_id.clone())
            .or_default()
            .push((msg.timestamp, label));
        user_timestamps
            .entry(msg.user_id.clone())
            .or_default()
            .push(msg.timestamp);
        all_timestamps.push(msg.timestamp);

        let stats = user_stats.entry(msg.user_id.clone()).or_default();
        stats.reactions = stats.reactions.saturating_add(msg.reactions);
        stats.shares = stats.shares.saturating_add(msg.shares);
        stats.views = stats.views.saturating_add(msg.views);
        stats.mbras = stats.mbras || is_mbras_user;

        total_interactions = total_interactions
            .saturating_add(msg.reactions)
            .saturating_add(msg.shares);
        total_views = total_views.saturating_add(msg.views);
    }

    let sentiment_distribution = if sentiment_total == 0 {
        SentimentDistribution::default()
    } else {
        let total = sentiment_total as f64;
        SentimentDistribution {
            positive: round1(positive_count as f64 / total * 100.0),
            negative: round1(negative_count as f64 / total * 100.0),
            neutral: round1(neutral_count as f64 / total * 100.0),
        }
    };

    let trending_topics = compute_trending(&filtered, now_utc, &sentiments_by_id);
    let influence_ranking = compute_influence(&user_stats);
    let anomaly_type = detect_anomaly(&user_timestamps, &sentiment_sequences, &all_timestamps);

    let engagement_score = if flags.candidate_awareness {
        CANDIDATE_ENGAGEMENT_SCORE
    } else if total_views > 0 {
        total_interactions as f64 / total_views as f64
    } else {
        0.0
    };

    Ok(FeedAnalysis {
        sentiment_distribution,
        engagement_score,
        trending_topics,
        influence_ranking,
        anomaly_detected: anomaly_type.is_some(),
        anomaly_type,
        flags,
    })
}

/// Module tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnomalyType;
    use serde_json::json;

    fn message(id: &str, user: &str, content: &str, timestamp: &str) -> Value {
        json!({
            "id": id,
            "content": content,
            "timestamp": timestamp,
            "user_id": user
        })
    }

    /// Test batch rỗng: mọi giá trị về 0, không cờ, không anomaly
    #[test]
    fn test_empty_feed() {
        let analysis = analyze_feed(&json!({
            "time_window_minutes": 60,
            "messages": []
        }))
        .unwrap();

        assert_eq!(analysis.sentiment_distribution, SentimentDistribution::default());
        assert_eq!(analysis.engagement_score, 0.0);
        assert!(analysis.trending_topics.is_empty());
        assert!(analysis.influence_ranking.is_empty());
        assert!(!analysis.anomaly_detected);
        assert_eq!(analysis.anomaly_type, None);
        assert_eq!(analysis.flags, AnalysisFlags::default());
    }

    /// Test messages vắng mặt tương đương batch rỗng
    #[test]
    fn test_missing_messages() {
        let analysis = analyze_feed(&json!({ "time_window_minutes": 60 })).unwrap();
        assert!(analysis.influence_ranking.is_empty());
    }

    /// Test phân phối sentiment cộng về ~100
    #[test]
    fn test_distribution_sums_to_hundred() {
        let analysis = analyze_feed(&json!({
            "time_window_minutes": 60,
            "messages": [
                message("m1", "user_teste", "adorei muito bom", "2024-05-01T12:00:00Z"),
                message("m2", "user_teste", "odiei pessimo ruim", "2024-05-01T12:01:00Z"),
                message("m3", "user_teste", "sem opiniao hoje", "2024-05-01T12:02:00Z"),
            ]
        }))
        .unwrap();

        let d = analysis.sentiment_distribution;
        assert_eq!(d.positive, 33.3);
        assert_eq!(d.negative, 33.3);
        assert_eq!(d.neutral, 33.3);
        assert!((d.positive + d.negative + d.neutral - 100.0).abs() < 0.5);
    }

    /// Test thông điệp meta bị loại khỏi phân phối
    #[test]
    fn test_single_meta_message() {
        let analysis = analyze_feed(&json!({
            "time_window_minutes": 60,
            "messages": [
                message("m1", "user_teste", "Teste Técnico MBRAS", "2024-05-01T12:00:00Z"),
            ]
        }))
        .unwrap();

        // Mẫu số 0: phân phối toàn 0
        assert_eq!(analysis.sentiment_distribution, SentimentDistribution::default());
        // Nhưng thông điệp vẫn đi qua cờ candidate_awareness
        assert!(analysis.flags.candidate_awareness);
        assert_eq!(analysis.engagement_score, 9.42);
        // Và user vẫn có mặt trong xếp hạng
        assert_eq!(analysis.influence_ranking.len(), 1);
    }

    /// Test cờ candidate_awareness ép engagement về 9.42
    #[test]
    fn test_candidate_awareness_override() {
        let analysis = analyze_feed(&json!({
            "time_window_minutes": 60,
            "messages": [
                message(
                    "m1",
                    "user_teste",
                    "ontem fiz o Teste Técnico MBRAS e gostei",
                    "2024-05-01T12:00:00Z"
                ),
                {
                    "id": "m2",
                    "content": "nada de especial",
                    "timestamp": "2024-05-01T12:01:00Z",
                    "user_id": "user_outro",
                    "reactions": 10,
                    "views": 100
                },
            ]
        }))
        .unwrap();

        assert!(analysis.flags.candidate_awareness);
        // Tỷ lệ thực là 10/100 = 0.1, nhưng giá trị bị ghi đè
        assert_eq!(analysis.engagement_score, 9.42);
    }

    /// Test engagement score là tổng interaction chia tổng view
    #[test]
    fn test_engagement_score_ratio() {
        let analysis = analyze_feed(&json!({
            "time_window_minutes": 60,
            "messages": [
                {
                    "id": "m1",
                    "content": "primeira mensagem",
                    "timestamp": "2024-05-01T12:00:00Z",
                    "user_id": "user_teste",
                    "reactions": 6,
                    "shares": 4,
                    "views": 40
                },
                {
                    "id": "m2",
                    "content": "segunda mensagem",
                    "timestamp": "2024-05-01T12:01:00Z",
                    "user_id": "user_outro",
                    "views": 10
                },
            ]
        }))
        .unwrap();

        // (6 + 4) / (40 + 10) = 0.2
        assert!((analysis.engagement_score - 0.2).abs() < 1e-9);
    }

    /// Test cờ mbras_employee và ảnh hưởng lên sentiment
    #[test]
    fn test_employee_flag() {
        let analysis = analyze_feed(&json!({
            "time_window_minutes": 60,
            "messages": [
                message("m1", "user_mbras_x1", "bom produto aqui", "2024-05-01T12:00:00Z"),
            ]
        }))
        .unwrap();

        assert!(analysis.flags.mbras_employee);
        // bom: +1 dobrado = 2, / 3 tokens = 0.667 -> positive
        assert_eq!(analysis.sentiment_distribution.positive, 100.0);
    }

    /// Test cờ special_pattern: 42 ký tự chứa mbras
    #[test]
    fn test_special_pattern_flag() {
        let content = "anotacao mbras de exatamente 42 caracteres";
        assert_eq!(content.chars().count(), 42);

        let analysis = analyze_feed(&json!({
            "time_window_minutes": 60,
            "messages": [
                message("m1", "user_teste", content, "2024-05-01T12:00:00Z"),
            ]
        }))
        .unwrap();
        assert!(analysis.flags.special_pattern);
        assert!(!analysis.flags.mbras_employee);
    }

    /// Test lọc theo cửa sổ thời gian với mốc là timestamp lớn nhất
    #[test]
    fn test_window_filtering() {
        let analysis = analyze_feed(&json!({
            "time_window_minutes": 10,
            "messages": [
                message("m1", "user_velho_1", "mensagem antiga", "2024-05-01T11:00:00Z"),
                message("m2", "user_novo_01", "mensagem nova", "2024-05-01T12:00:00Z"),
            ]
        }))
        .unwrap();

        // Somente o user dentro da janela aparece no ranking
        assert_eq!(analysis.influence_ranking.len(), 1);
        assert_eq!(analysis.influence_ranking[0].user_id, "user_novo_01");
    }

    /// Test 11 thông điệp của một user trong 4 phút: burst
    #[test]
    fn test_burst_scenario() {
        let messages: Vec<Value> = (0..11)
            .map(|i| {
                message(
                    &format!("m{}", i),
                    "user_rapido",
                    "mais uma mensagem",
                    &format!("2024-05-01T12:00:{:02}Z", i * 5),
                )
            })
            .collect();

        let analysis = analyze_feed(&json!({
            "time_window_minutes": 60,
            "messages": messages
        }))
        .unwrap();

        assert!(analysis.anomaly_detected);
        assert_eq!(analysis.anomaly_type, Some(AnomalyType::Burst));
    }

    /// Test 3 user đăng trong cùng 4 giây: synchronized
    #[test]
    fn test_synchronized_scenario() {
        let analysis = analyze_feed(&json!({
            "time_window_minutes": 60,
            "messages": [
                message("m1", "user_um_aaa", "ola", "2024-05-01T12:00:00Z"),
                message("m2", "user_dois_a", "oi", "2024-05-01T12:00:02Z"),
                message("m3", "user_tres_a", "eai", "2024-05-01T12:00:03Z"),
            ]
        }))
        .unwrap();

        assert_eq!(analysis.anomaly_type, Some(AnomalyType::SynchronizedPosting));
    }

    /// Test trending chỉ chứa hashtag của batch đã lọc
    #[test]
    fn test_trending_subset_of_hashtags() {
        let analysis = analyze_feed(&json!({
            "time_window_minutes": 60,
            "messages": [
                {
                    "id": "m1",
                    "content": "adorei demais",
                    "timestamp": "2024-05-01T12:00:00Z",
                    "user_id": "user_teste",
                    "hashtags": ["#adorei", "#compras"]
                },
            ]
        }))
        .unwrap();

        assert_eq!(analysis.trending_topics.len(), 2);
        for tag in &analysis.trending_topics {
            assert!(["#adorei", "#compras"].contains(&tag.as_str()));
        }
    }

    /// Test cửa sổ cực lớn không panic và giữ lại toàn bộ batch
    #[test]
    fn test_huge_time_window_keeps_everything() {
        let analysis = analyze_feed(&json!({
            "time_window_minutes": i64::MAX,
            "messages": [
                message("m1", "user_velho_1", "mensagem antiga", "2024-05-01T11:00:00Z"),
                message("m2", "user_novo_01", "mensagem nova", "2024-05-01T12:00:00Z"),
            ]
        }))
        .unwrap();

        assert_eq!(analysis.influence_ranking.len(), 2);
    }

    /// Test counter gần u64::MAX không panic, engagement bão hòa hữu hạn
    #[test]
    fn test_counter_saturation() {
        let analysis = analyze_feed(&json!({
            "time_window_minutes": 60,
            "messages": [
                {
                    "id": "m1",
                    "content": "primeira mensagem",
                    "timestamp": "2024-05-01T12:00:00Z",
                    "user_id": "user_grande_1",
                    "reactions": u64::MAX,
                    "shares": 1,
                    "views": 10
                },
            ]
        }))
        .unwrap();

        // u64::MAX / 10, không wraparound về gần 0
        assert!(analysis.engagement_score.is_finite());
        assert!(analysis.engagement_score > 1e18);
    }

    /// Test lỗi business rule truyền qua nguyên vẹn
    #[test]
    fn test_reserved_window_propagates() {
        let err = analyze_feed(&json!({
            "time_window_minutes": 123,
            "messages": [
                message("m1", "user_teste", "qualquer coisa", "2024-05-01T12:00:00Z"),
            ]
        }))
        .unwrap_err();
        assert!(err.is_business_rule());
    }

    /// Test special pattern helper
    #[test]
    fn test_is_special_pattern() {
        let content = "anotacao mbras de exatamente 42 caracteres";
        assert!(is_special_pattern(content));
        assert!(!is_special_pattern("mbras curto"));
        assert!(!is_special_pattern(&"a".repeat(42)));
    }

    /// Test candidate awareness helper áp dụng chuẩn hóa
    #[test]
    fn test_has_candidate_awareness() {
        assert!(has_candidate_awareness("fiz o TESTE TÉCNICO MBRAS ontem"));
        assert!(!has_candidate_awareness("teste tecnico de outra empresa"));
    }
}
