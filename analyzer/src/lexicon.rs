// Standard library imports
use std::collections::HashSet;

// Third party imports
use once_cell::sync::Lazy;

// Internal imports
use feed_common::normalize_for_matching;

/// Câu meta: khớp chính xác thì thông điệp bị loại khỏi thống kê sentiment
pub const META_PHRASE: &str = "teste tecnico mbras";

/// Dạng chuẩn hóa của câu meta
///
/// Hằng số duy nhất dùng chung giữa các request: tính một lần khi
/// process khởi động, chỉ đọc, không có đường ghi lại.
pub static META_PHRASE_NORMALIZED: Lazy<String> =
    Lazy::new(|| normalize_for_matching(META_PHRASE));

/// Từ vựng tích cực (tiếng Bồ Đào Nha, đã bỏ dấu)
pub static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "adorei",
        "gostei",
        "bom",
        "otimo",
        "excelente",
        "perfeito",
        "maravilhoso",
        "incrivel",
        "fantastico",
        "positivo",
        "top",
    ]
    .into_iter()
    .collect()
});

/// Từ vựng tiêu cực
pub static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "ruim",
        "terrivel",
        "pessimo",
        "horrivel",
        "odiei",
        "detestei",
        "negativo",
        "pior",
    ]
    .into_iter()
    .collect()
});

/// Từ tăng cường: nhân 1.5 vào token sentiment tiếp theo
pub static INTENSIFIERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["muito", "super", "mega", "ultra", "extremamente", "bem", "bastante"]
        .into_iter()
        .collect()
});

/// Từ phủ định: đảo dấu trong cửa sổ 3 token
pub static NEGATIONS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["nao", "nunca", "jamais", "nem"].into_iter().collect());

/// Module tests
#[cfg(test)]
mod tests {
    use super::*;

    /// Test câu meta đã ở dạng chuẩn
    #[test]
    fn test_meta_phrase_normalized() {
        assert_eq!(META_PHRASE_NORMALIZED.as_str(), META_PHRASE);
    }

    /// Test các lexicon không giao nhau
    #[test]
    fn test_lexicons_disjoint() {
        assert!(POSITIVE_WORDS.is_disjoint(&NEGATIVE_WORDS));
        assert!(POSITIVE_WORDS.is_disjoint(&INTENSIFIERS));
        assert!(NEGATIVE_WORDS.is_disjoint(&NEGATIONS));
        assert!(INTENSIFIERS.is_disjoint(&NEGATIONS));
    }
}
