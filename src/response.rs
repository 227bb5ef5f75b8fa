use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub total: Option<i64>,
    pub limit: Option<i64>,
}

impl Meta {
    pub fn count(total: usize) -> Self {
        Self {
            total: Some(total as i64),
            limit: None,
        }
    }

    pub fn limited(limit: i64, total: usize) -> Self {
        Self {
            total: Some(total as i64),
            limit: Some(limit),
        }
    }

    pub fn empty() -> Self {
        Self {
            total: None,
            limit: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}
