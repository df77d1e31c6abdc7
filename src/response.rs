use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub total: Option<i64>,
    /// Catalog revision the payload was built from, when it came from the feed.
    pub revision: Option<u64>,
}

impl Meta {
    pub fn new(total: i64) -> Self {
        Self {
            total: Some(total),
            revision: None,
        }
    }

    pub fn with_revision(total: i64, revision: u64) -> Self {
        Self {
            total: Some(total),
            revision: Some(revision),
        }
    }

    pub fn empty() -> Self {
        Self {
            total: None,
            revision: None,
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
