// Third party imports
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Đưa văn bản về dạng chuẩn để so sánh: chữ thường, phân rã NFKD, bỏ dấu
///
/// Dùng cho so khớp câu meta, kiểm tra candidate awareness và tra cứu
/// lexicon sentiment. Hàm thuần, idempotent.
pub fn normalize_for_matching(text: &str) -> String {
    text.to_lowercase()
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .collect()
}

/// Bỏ dấu khỏi chuỗi nhưng giữ nguyên chữ hoa/chữ thường
///
/// Khác với [`normalize_for_matching`], hàm này dùng để phát hiện user id
/// có chứa ký tự có dấu hay không.
pub fn strip_diacritics(text: &str) -> String {
    text.nfkd().filter(|ch| !is_combining_mark(*ch)).collect()
}
