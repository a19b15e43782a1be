// Third party imports
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Thông điệp đã qua kiểm tra và chuẩn hóa
///
/// Mọi trường đều đã hợp lệ: timestamp ở UTC, hashtags đều bắt đầu
/// bằng `#`, các bộ đếm không âm.
#[derive(Debug, Clone)]
pub struct ParsedMessage {
    /// ID thông điệp
    pub msg_id: String,
    /// Nội dung (tối đa 280 ký tự)
    pub content: String,
    /// Thời điểm đăng (UTC)
    pub timestamp: DateTime<Utc>,
    /// ID người đăng
    pub user_id: String,
    /// Danh sách hashtag, giữ nguyên thứ tự
    pub hashtags: Vec<String>,
    /// Số reaction
    pub reactions: u64,
    /// Số share
    pub shares: u64,
    /// Số view
    pub views: u64,
}

/// Nhãn sentiment của một thông điệp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    /// Tích cực (score > 0.1)
    Positive,
    /// Tiêu cực (score < -0.1)
    Negative,
    /// Trung tính
    Neutral,
    /// Thông điệp meta, loại khỏi mọi thống kê phân phối
    Meta,
}

impl SentimentLabel {
    /// Nhãn có tính vào phân phối sentiment hay không
    pub fn is_scored(&self) -> bool {
        !matches!(self, SentimentLabel::Meta)
    }
}

/// Loại anomaly phát hiện được
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    /// Một user đăng dồn dập trong cửa sổ 5 phút
    Burst,
    /// Sentiment của một user đảo chiều liên tục
    AlternatingSentiment,
    /// Nhiều thông điệp đăng gần như đồng thời
    SynchronizedPosting,
}

/// Các cờ nội dung, OR qua toàn bộ batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisFlags {
    /// Có thông điệp từ user chứa "mbras" trong id
    pub mbras_employee: bool,
    /// Có content đúng 42 ký tự chứa "mbras"
    pub special_pattern: bool,
    /// Có content chứa câu meta sau chuẩn hóa
    pub candidate_awareness: bool,
}

/// Phân phối sentiment theo phần trăm (1 chữ số thập phân)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    /// Phần trăm positive
    pub positive: f64,
    /// Phần trăm negative
    pub negative: f64,
    /// Phần trăm neutral
    pub neutral: f64,
}

/// Một dòng trong bảng xếp hạng ảnh hưởng
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluenceEntry {
    /// ID user
    pub user_id: String,
    /// Điểm ảnh hưởng, làm tròn 4 chữ số thập phân
    pub influence_score: f64,
}

/// Thống kê tích lũy theo user trong một request
#[derive(Debug, Clone, Copy, Default)]
pub struct UserStats {
    /// Tổng reaction
    pub reactions: u64,
    /// Tổng share
    pub shares: u64,
    /// Tổng view
    pub views: u64,
    /// User từng bị gắn cờ employee
    pub mbras: bool,
}

/// Kết quả phân tích một batch thông điệp
#[derive(Debug, Clone, Serialize)]
pub struct FeedAnalysis {
    /// Phân phối sentiment của các thông điệp không phải meta
    pub sentiment_distribution: SentimentDistribution,
    /// Tổng interaction chia tổng view (hoặc 9.42 khi candidate_awareness)
    pub engagement_score: f64,
    /// Tối đa 5 hashtag trending
    pub trending_topics: Vec<String>,
    /// Xếp hạng ảnh hưởng, score giảm dần
    pub influence_ranking: Vec<InfluenceEntry>,
    /// Có anomaly hay không
    pub anomaly_detected: bool,
    /// Loại anomaly, null nếu không có
    pub anomaly_type: Option<AnomalyType>,
    /// Các cờ nội dung
    pub flags: AnalysisFlags,
}
