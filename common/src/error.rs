// Third party imports
use thiserror::Error;

/// Lỗi của engine phân tích feed
///
/// Hai loại lỗi terminal cho một request: validation (dữ liệu đầu vào
/// sai định dạng) và business rule (dữ liệu hợp lệ nhưng bị từ chối
/// theo chính sách). Boundary layer ánh xạ loại lỗi sang status code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Lỗi dữ liệu đầu vào không hợp lệ
    #[error("{0}")]
    Validation(String),
    /// Lỗi timestamp không đúng định dạng
    #[error("{0}")]
    InvalidTimestamp(String),
    /// Lỗi business rule
    #[error("{0}")]
    BusinessRule(String),
}

impl AnalysisError {
    /// Mã lỗi máy đọc được trả về cho client
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::Validation(_) => "INVALID_INPUT",
            AnalysisError::InvalidTimestamp(_) => "INVALID_TIMESTAMP",
            AnalysisError::BusinessRule(_) => "UNSUPPORTED_TIME_WINDOW",
        }
    }

    /// Kiểm tra lỗi business rule
    pub fn is_business_rule(&self) -> bool {
        matches!(self, AnalysisError::BusinessRule(_))
    }
}
