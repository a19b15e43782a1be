// Standard library imports
use std::collections::HashMap;

// Third party imports
use chrono::{DateTime, Duration, Utc};

// Internal imports
use crate::types::{AnomalyType, SentimentLabel};

/// Cửa sổ burst (giây)
const BURST_WINDOW_SECS: i64 = 300;
/// Một user phải có hơn 10 thông điệp trong cửa sổ mới tính burst
const BURST_THRESHOLD: usize = 10;
/// Độ dài chuỗi đảo chiều sentiment
const ALTERNATING_STREAK: usize = 10;
/// Cửa sổ đăng đồng thời (giây)
const SYNC_WINDOW_SECS: i64 = 4;
/// Số thông điệp tối thiểu trong cửa sổ đồng thời
const SYNC_THRESHOLD: usize = 3;

/// Một user có hơn 10 thông điệp trong một cửa sổ 5 phút
pub fn detect_burst(user_timestamps: &HashMap<String, Vec<DateTime<Utc>>>) -> bool {
    let window = Duration::seconds(BURST_WINDOW_SECS);
    for timestamps in user_timestamps.values() {
        if timestamps.len() <= BURST_THRESHOLD {
            continue;
        }
        let mut sorted = timestamps.clone();
        sorted.sort();

        let mut start = 0;
        for end in 0..sorted.len() {
            while sorted[end] - sorted[start] > window {
                start += 1;
            }
            if end - start + 1 > BURST_THRESHOLD {
                return true;
            }
        }
    }
    false
}

/// Một user có chuỗi positive/negative đảo chiều 10 lần liên tiếp
///
/// Nhãn neutral/meta, hoặc nhãn lặp lại, đặt lại chuỗi về 1;
/// neutral/meta còn xóa cả nhãn trước đó.
pub fn detect_alternating(
    sequences: &HashMap<String, Vec<(DateTime<Utc>, SentimentLabel)>>,
) -> bool {
    for sequence in sequences.values() {
        if sequence.len() < ALTERNATING_STREAK {
            continue;
        }
        let mut sorted = sequence.clone();
        sorted.sort_by_key(|(timestamp, _)| *timestamp);

        let mut streak = 1usize;
        let mut last_label: Option<SentimentLabel> = None;
        for (_, label) in sorted {
            if label != SentimentLabel::Positive && label != SentimentLabel::Negative {
                streak = 1;
                last_label = None;
                continue;
            }
            match last_label {
                None => {
                    last_label = Some(label);
                    streak = 1;
                    continue;
                }
                Some(previous) => {
                    if label != previous {
                        streak += 1;
                    } else {
                        streak = 1;
                    }
                    last_label = Some(label);
                }
            }
            if streak >= ALTERNATING_STREAK {
                return true;
            }
        }
    }
    false
}

/// Ba thông điệp trở lên (bất kể user) trong một cửa sổ 4 giây
pub fn detect_synchronized(timestamps: &[DateTime<Utc>]) -> bool {
    if timestamps.len() < SYNC_THRESHOLD {
        return false;
    }
    let mut sorted = timestamps.to_vec();
    sorted.sort();

    let window = Duration::seconds(SYNC_WINDOW_SECS);
    let mut start = 0;
    for end in 0..sorted.len() {
        while sorted[end] - sorted[start] > window {
            start += 1;
        }
        if end - start + 1 >= SYNC_THRESHOLD {
            return true;
        }
    }
    false
}

/// Chạy ba detector theo thứ tự ưu tiên, kết quả dương đầu tiên thắng
pub fn detect_anomaly(
    user_timestamps: &HashMap<String, Vec<DateTime<Utc>>>,
    sentiment_sequences: &HashMap<String, Vec<(DateTime<Utc>, SentimentLabel)>>,
    all_timestamps: &[DateTime<Utc>],
) -> Option<AnomalyType> {
    if detect_burst(user_timestamps) {
        return Some(AnomalyType::Burst);
    }
    if detect_alternating(sentiment_sequences) {
        return Some(AnomalyType::AlternatingSentiment);
    }
    if detect_synchronized(all_timestamps) {
        return Some(AnomalyType::SynchronizedPosting);
    }
    None
}
