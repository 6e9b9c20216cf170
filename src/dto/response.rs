use serde::{Deserialize, Serialize};

/// Uniform envelope every endpoint answers with, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub errors: Vec<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: vec![],
        }
    }

    pub fn error(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors,
        }
    }
}

/// `{data, page, size, total}` shape used by every list endpoint.
/// `page` and `size` are 1-based; `total` is the full matching count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationResponse<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Normalizes a 1-based page request into `(page, size, offset)`.
/// Query parameters are attacker-chosen, so the offset saturates instead
/// of overflowing; an absurd page number yields an empty slice.
pub fn page_slice(page: i64, size: i64) -> (i64, i64, i64) {
    let page = page.max(1);
    let size = size.max(1);
    let offset = page.saturating_sub(1).saturating_mul(size);
    (page, size, offset)
}
