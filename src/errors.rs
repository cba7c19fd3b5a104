use std::fmt;

use actix_web::http::StatusCode;
use actix_web::HttpResponse;

/// Crate-wide error taxonomy.
///
/// `Validation`, `Unauthorized`, `PermissionDenied`, `NotFound`, `Gone` and
/// `AllocationExhausted` are caller-visible and map to HTTP statuses via
/// [`actix_web::ResponseError`]. `DuplicateCode` is internal: the create path
/// converts it into another allocation attempt and it only escapes as
/// `AllocationExhausted` once the retry budget is spent.
#[derive(Debug, Clone)]
pub enum LinkletError {
    Validation(String),
    Unauthorized(String),
    PermissionDenied(String),
    NotFound(String),
    Gone(String),
    AllocationExhausted(String),
    DuplicateCode(String),
    DatabaseOperation(String),
    CacheConnection(String),
    Serialization(String),
    Configuration(String),
}

impl LinkletError {
    pub fn code(&self) -> &'static str {
        match self {
            LinkletError::Validation(_) => "E001",
            LinkletError::Unauthorized(_) => "E002",
            LinkletError::PermissionDenied(_) => "E003",
            LinkletError::NotFound(_) => "E004",
            LinkletError::Gone(_) => "E005",
            LinkletError::AllocationExhausted(_) => "E006",
            LinkletError::DuplicateCode(_) => "E007",
            LinkletError::DatabaseOperation(_) => "E008",
            LinkletError::CacheConnection(_) => "E009",
            LinkletError::Serialization(_) => "E010",
            LinkletError::Configuration(_) => "E011",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            LinkletError::Validation(_) => "Validation Error",
            LinkletError::Unauthorized(_) => "Unauthorized",
            LinkletError::PermissionDenied(_) => "Permission Denied",
            LinkletError::NotFound(_) => "Resource Not Found",
            LinkletError::Gone(_) => "Resource Gone",
            LinkletError::AllocationExhausted(_) => "Code Allocation Exhausted",
            LinkletError::DuplicateCode(_) => "Duplicate Short Code",
            LinkletError::DatabaseOperation(_) => "Database Operation Error",
            LinkletError::CacheConnection(_) => "Cache Connection Error",
            LinkletError::Serialization(_) => "Serialization Error",
            LinkletError::Configuration(_) => "Configuration Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            LinkletError::Validation(msg)
            | LinkletError::Unauthorized(msg)
            | LinkletError::PermissionDenied(msg)
            | LinkletError::NotFound(msg)
            | LinkletError::Gone(msg)
            | LinkletError::AllocationExhausted(msg)
            | LinkletError::DuplicateCode(msg)
            | LinkletError::DatabaseOperation(msg)
            | LinkletError::CacheConnection(msg)
            | LinkletError::Serialization(msg)
            | LinkletError::Configuration(msg) => msg,
        }
    }
}

impl fmt::Display for LinkletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for LinkletError {}

// 便捷的构造函数
impl LinkletError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkletError::Validation(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        LinkletError::Unauthorized(msg.into())
    }

    pub fn permission_denied<T: Into<String>>(msg: T) -> Self {
        LinkletError::PermissionDenied(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkletError::NotFound(msg.into())
    }

    pub fn gone<T: Into<String>>(msg: T) -> Self {
        LinkletError::Gone(msg.into())
    }

    pub fn allocation_exhausted<T: Into<String>>(msg: T) -> Self {
        LinkletError::AllocationExhausted(msg.into())
    }

    pub fn duplicate_code<T: Into<String>>(msg: T) -> Self {
        LinkletError::DuplicateCode(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinkletError::DatabaseOperation(msg.into())
    }

    pub fn cache_connection<T: Into<String>>(msg: T) -> Self {
        LinkletError::CacheConnection(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinkletError::Serialization(msg.into())
    }

    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        LinkletError::Configuration(msg.into())
    }
}

impl From<serde_json::Error> for LinkletError {
    fn from(err: serde_json::Error) -> Self {
        LinkletError::Serialization(err.to_string())
    }
}

impl actix_web::ResponseError for LinkletError {
    fn status_code(&self) -> StatusCode {
        match self {
            LinkletError::Validation(_) => StatusCode::BAD_REQUEST,
            LinkletError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            LinkletError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            LinkletError::NotFound(_) => StatusCode::NOT_FOUND,
            LinkletError::Gone(_) => StatusCode::GONE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "code": self.code(),
            "error": self.error_type(),
            "message": self.message(),
        }))
    }
}

pub type Result<T> = std::result::Result<T, LinkletError>;
