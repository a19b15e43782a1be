// Standard library imports
use std::collections::HashMap;

// Third party imports
use sha2::{Digest, Sha256};

// Internal imports
use crate::types::{InfluenceEntry, UserStats};
use feed_common::strip_diacritics;

/// Follower cố định cho user id dài đúng 13 ký tự
const THIRTEEN_CHAR_FOLLOWERS: u64 = 233;
/// Follower cố định cho user id chứa ký tự có dấu
const ACCENTED_FOLLOWERS: u64 = 4242;
/// Modulo rút gọn digest về khoảng follower
const FOLLOWER_MODULO: u64 = 10_000;
/// Cộng thêm vào follower sau rút gọn
const FOLLOWER_OFFSET: u64 = 100;

/// Kiểm tra số nguyên tố bằng trial division 6k±1
fn is_prime(number: u64) -> bool {
    if number <= 1 {
        return false;
    }
    if number <= 3 {
        return true;
    }
    if number % 2 == 0 || number % 3 == 0 {
        return false;
    }
    let mut i = 5u64;
    while i * i <= number {
        if number % i == 0 || number % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Số nguyên tố nhỏ nhất >= number
fn next_prime(number: u64) -> u64 {
    let mut candidate = number.max(2);
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

/// Suy ra số follower ổn định từ user id
///
/// Quy tắc theo thứ tự, quy tắc khớp đầu tiên thắng:
/// 1. id dài đúng 13 ký tự -> 233
/// 2. id chứa ký tự có dấu (NFKD thay đổi chuỗi) -> 4242
/// 3. SHA-256(id) mod 10000 + 100; nếu id kết thúc bằng `_prime`,
///    nhảy tới số nguyên tố kế tiếp
pub fn followers_from_user_id(user_id: &str) -> u64 {
    if user_id.chars().count() == 13 {
        return THIRTEEN_CHAR_FOLLOWERS;
    }

    if strip_diacritics(user_id) != user_id {
        return ACCENTED_FOLLOWERS;
    }

    let digest = Sha256::digest(user_id.as_bytes());
    // Gấp từng byte: tương đương lấy toàn bộ digest (big-endian) mod 10000
    let mut remainder: u64 = 0;
    for byte in digest.iter() {
        remainder = (remainder * 256 + u64::from(*byte)) % FOLLOWER_MODULO;
    }
    let mut followers = remainder + FOLLOWER_OFFSET;

    if user_id.ends_with("_prime") {
        followers = next_prime(followers);
    }

    followers
}

/// Làm tròn 4 chữ số thập phân
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Tính bảng xếp hạng ảnh hưởng từ thống kê theo user
///
/// Score = followers * 0.4 + engagement rate * 0.6, với các điều chỉnh:
/// interactions là bội của 7 nhân rate với (1 + 1/φ); id kết thúc "007"
/// chia đôi score; user employee cộng 2.0. Sắp xếp score giảm dần,
/// tie-break theo user id tăng dần.
pub fn compute_influence(user_stats: &HashMap<String, UserStats>) -> Vec<InfluenceEntry> {
    let phi = (1.0 + 5.0f64.sqrt()) / 2.0;

    let mut ranking: Vec<InfluenceEntry> = user_stats
        .iter()
        .map(|(user_id, stats)| {
            let followers = followers_from_user_id(user_id);
            let interactions = stats.reactions.saturating_add(stats.shares);
            let mut engagement_rate = if stats.views > 0 {
                interactions as f64 / stats.views as f64
            } else {
                0.0
            };
            if interactions > 0 && interactions % 7 == 0 {
                engagement_rate *= 1.0 + 1.0 / phi;
            }

            let mut influence_score = followers as f64 * 0.4 + engagement_rate * 0.6;
            if user_id.to_lowercase().ends_with("007") {
                influence_score *= 0.5;
            }
            if stats.mbras {
                influence_score += 2.0;
            }

            InfluenceEntry {
                user_id: user_id.clone(),
                influence_score: round4(influence_score),
            }
        })
        .collect();

    ranking.sort_by(|a, b| {
        b.influence_score
            .total_cmp(&a.influence_score)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    ranking
}
