// Third party imports
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

// Internal imports
use crate::types::ParsedMessage;
use feed_common::AnalysisError;

/// Độ dài tối đa của content (ký tự)
const MAX_CONTENT_CHARS: usize = 280;
/// Giá trị cửa sổ thời gian bị từ chối theo chính sách
const RESERVED_TIME_WINDOW: i64 = 123;
/// Định dạng timestamp duy nhất được chấp nhận
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

fn validation_error(message: &str) -> AnalysisError {
    AnalysisError::Validation(message.to_string())
}

fn invalid_timestamp() -> AnalysisError {
    AnalysisError::InvalidTimestamp("Timestamp invalido".to_string())
}

/// Kiểm tra cấu trúc ký tự: YYYY-MM-DDTHH:MM:SSZ
fn has_timestamp_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    if bytes.len() != 20 {
        return false;
    }
    bytes.iter().enumerate().all(|(idx, byte)| match idx {
        4 | 7 => *byte == b'-',
        10 => *byte == b'T',
        13 | 16 => *byte == b':',
        19 => *byte == b'Z',
        _ => byte.is_ascii_digit(),
    })
}

/// Parse timestamp ở định dạng cố định, múi giờ UTC
///
/// Mọi sai lệch (dấu phân cách sai, thiếu `Z`, giá trị ngoài khoảng)
/// đều là lỗi định dạng, không tự sửa.
pub fn parse_timestamp(raw: &Value) -> Result<DateTime<Utc>, AnalysisError> {
    let raw = raw.as_str().ok_or_else(invalid_timestamp)?;
    if !has_timestamp_shape(raw) {
        return Err(invalid_timestamp());
    }
    let parsed =
        NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|_| invalid_timestamp())?;
    Ok(DateTime::<Utc>::from_naive_utc_and_offset(parsed, Utc))
}

/// Format timestamp về đúng dạng đã parse
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Kiểm tra user id theo mẫu `^user_\w{3,}$`, không phân biệt hoa thường
fn is_valid_user_id(user_id: &str) -> bool {
    let chars: Vec<char> = user_id.chars().collect();
    if chars.len() < 8 {
        return false;
    }
    let prefix: String = chars[..5].iter().collect();
    if !prefix.eq_ignore_ascii_case("user_") {
        return false;
    }
    chars[5..].iter().all(|ch| *ch == '_' || ch.is_alphanumeric())
}

/// Trường đếm không âm, mặc định 0 khi vắng mặt
fn counter_field(
    obj: &serde_json::Map<String, Value>,
    name: &str,
) -> Result<u64, AnalysisError> {
    match obj.get(name) {
        None => Ok(0),
        Some(value) => value
            .as_u64()
            .ok_or_else(|| validation_error(&format!("Campo '{}' invalido", name))),
    }
}

/// Kiểm tra và chuẩn hóa một thông điệp thô
///
/// Fail-fast theo thứ tự khai báo trường: id, content, user_id,
/// timestamp, hashtags, reactions, shares, views. Vi phạm đầu tiên
/// quyết định lỗi trả về.
pub fn validate_message(raw: &Value) -> Result<ParsedMessage, AnalysisError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| validation_error("Mensagem invalida"))?;

    let msg_id = obj.get("id").and_then(Value::as_str).unwrap_or("");
    if msg_id.is_empty() {
        return Err(validation_error("Campo 'id' invalido"));
    }

    let content = obj
        .get("content")
        .and_then(Value::as_str)
        .ok_or_else(|| validation_error("Campo 'content' invalido"))?;
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(validation_error("Campo 'content' excede 280 caracteres"));
    }

    let user_id = obj
        .get("user_id")
        .and_then(Value::as_str)
        .filter(|uid| is_valid_user_id(uid))
        .ok_or_else(|| validation_error("Campo 'user_id' invalido"))?;

    let timestamp = parse_timestamp(obj.get("timestamp").unwrap_or(&Value::Null))?;

    let hashtags = match obj.get("hashtags") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(tags)) => {
            let mut parsed = Vec::with_capacity(tags.len());
            for tag in tags {
                let tag = tag
                    .as_str()
                    .filter(|t| t.starts_with('#'))
                    .ok_or_else(|| validation_error("Campo 'hashtags' invalido"))?;
                parsed.push(tag.to_string());
            }
            parsed
        }
        Some(_) => return Err(validation_error("Campo 'hashtags' invalido")),
    };

    let reactions = counter_field(obj, "reactions")?;
    let shares = counter_field(obj, "shares")?;
    let views = counter_field(obj, "views")?;

    Ok(ParsedMessage {
        msg_id: msg_id.to_string(),
        content: content.to_string(),
        timestamp,
        user_id: user_id.to_string(),
        hashtags,
        reactions,
        shares,
        views,
    })
}

/// Kiểm tra request envelope và toàn bộ danh sách thông điệp
///
/// `time_window_minutes` phải là số nguyên dương; giá trị 123 bị từ
/// chối như một business rule, khác với lỗi định dạng. `messages`
/// vắng mặt được coi là danh sách rỗng.
pub fn validate_payload(payload: &Value) -> Result<(Vec<ParsedMessage>, i64), AnalysisError> {
    let obj = payload
        .as_object()
        .ok_or_else(|| validation_error("Payload invalido"))?;

    let time_window = obj
        .get("time_window_minutes")
        .and_then(Value::as_i64)
        .filter(|window| *window > 0)
        .ok_or_else(|| validation_error("Campo 'time_window_minutes' invalido"))?;
    if time_window == RESERVED_TIME_WINDOW {
        return Err(AnalysisError::BusinessRule(
            "Valor de janela temporal não suportado na versão atual".to_string(),
        ));
    }

    let mut messages = Vec::new();
    match obj.get("messages") {
        None => {}
        Some(Value::Array(entries)) => {
            messages.reserve(entries.len());
            for entry in entries {
                messages.push(validate_message(entry)?);
            }
        }
        Some(_) => return Err(validation_error("Campo 'messages' invalido")),
    }

    Ok((messages, time_window))
}
