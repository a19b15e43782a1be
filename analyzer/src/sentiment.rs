// Internal imports
use crate::lexicon::{
    INTENSIFIERS, META_PHRASE_NORMALIZED, NEGATIONS, NEGATIVE_WORDS, POSITIVE_WORDS,
};
use crate::types::SentimentLabel;
use feed_common::normalize_for_matching;

/// Hệ số nhân của một từ tăng cường
const INTENSIFIER_FACTOR: f64 = 1.5;
/// Cửa sổ phủ định: tối đa 3 token trước token sentiment
const NEGATION_SCOPE: usize = 3;
/// Ngưỡng phân loại positive/negative
const LABEL_THRESHOLD: f64 = 0.1;

/// Token do lexer sinh ra
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Một run ký tự chữ/số/gạch dưới
    Word(String),
    /// `#` theo sau là ký tự chữ, cho phép gạch nối bên trong; giữ dấu `#`
    Hashtag(String),
}

/// Lexer tách nội dung thành token word và hashtag
///
/// Quét tuần tự trên dãy ký tự, không dùng regex. Ký tự không thuộc
/// token nào bị bỏ qua.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    /// Tạo lexer mới trên một nội dung
    pub fn new(content: &str) -> Self {
        Self {
            chars: content.chars().collect(),
            pos: 0,
        }
    }

    /// Tiêu thụ một run ký tự word liên tiếp
    fn take_word_run(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.chars.len() && is_word_char(self.chars[self.pos]) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.pos < self.chars.len() {
            let ch = self.chars[self.pos];

            if ch == '#'
                && self.pos + 1 < self.chars.len()
                && is_word_char(self.chars[self.pos + 1])
            {
                self.pos += 1;
                let mut tag = String::from("#");
                tag.push_str(&self.take_word_run());
                // Gạch nối chỉ thuộc hashtag khi theo sau là ký tự word
                while self.pos + 1 < self.chars.len()
                    && self.chars[self.pos] == '-'
                    && is_word_char(self.chars[self.pos + 1])
                {
                    self.pos += 1;
                    tag.push('-');
                    tag.push_str(&self.take_word_run());
                }
                return Some(Token::Hashtag(tag));
            }

            if is_word_char(ch) {
                return Some(Token::Word(self.take_word_run()));
            }

            self.pos += 1;
        }
        None
    }
}

/// Ký tự thuộc một token word
fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

/// Tách nội dung thành danh sách token
pub fn tokenize(content: &str) -> Vec<Token> {
    Lexer::new(content).collect()
}

/// Nội dung (trim, chuẩn hóa) khớp chính xác câu meta
pub fn is_meta_message(content: &str) -> bool {
    normalize_for_matching(content.trim()) == *META_PHRASE_NORMALIZED
}

/// Phân loại sentiment của một nội dung
///
/// Trả về nhãn và score. Token hashtag không tính điểm; từ tăng cường
/// nhân dồn vào token sentiment kế tiếp; phủ định trong cửa sổ 3 token
/// đảo dấu khi số lần phủ định lẻ; score dương của employee được nhân đôi.
pub fn classify(content: &str, mbras_employee: bool) -> (SentimentLabel, f64) {
    if is_meta_message(content) {
        return (SentimentLabel::Meta, 0.0);
    }

    let words: Vec<String> = tokenize(content)
        .into_iter()
        .filter_map(|token| match token {
            Token::Word(word) => Some(word),
            Token::Hashtag(_) => None,
        })
        .collect();
    if words.is_empty() {
        return (SentimentLabel::Neutral, 0.0);
    }

    let normalized: Vec<String> = words.iter().map(|word| normalize_for_matching(word)).collect();
    let negation_positions: Vec<usize> = normalized
        .iter()
        .enumerate()
        .filter(|(_, token)| NEGATIONS.contains(token.as_str()))
        .map(|(idx, _)| idx)
        .collect();

    let mut score_sum = 0.0;
    let mut intensifier_multiplier = 1.0;

    for (idx, token) in normalized.iter().enumerate() {
        if INTENSIFIERS.contains(token.as_str()) {
            intensifier_multiplier *= INTENSIFIER_FACTOR;
            continue;
        }

        let is_positive = POSITIVE_WORDS.contains(token.as_str());
        if !is_positive && !NEGATIVE_WORDS.contains(token.as_str()) {
            continue;
        }

        let mut score = if is_positive { 1.0 } else { -1.0 };

        if intensifier_multiplier != 1.0 {
            score *= intensifier_multiplier;
            intensifier_multiplier = 1.0;
        }

        let neg_count = negation_positions
            .iter()
            .filter(|&&neg_idx| neg_idx < idx && idx - neg_idx <= NEGATION_SCOPE)
            .count();
        if neg_count % 2 == 1 {
            score = -score;
        }

        if mbras_employee && score > 0.0 {
            score *= 2.0;
        }

        score_sum += score;
    }

    // Mẫu số là tổng số token word, kể cả token không tính điểm
    let sentiment_score = score_sum / words.len() as f64;
    let label = if sentiment_score > LABEL_THRESHOLD {
        SentimentLabel::Positive
    } else if sentiment_score < -LABEL_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };
    (label, sentiment_score)
}
