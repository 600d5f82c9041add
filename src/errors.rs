use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

#[derive(Debug, Clone)]
pub enum DeckError {
    Config(String),
    FileOperation(String),
    InvalidFilename(String),
    Parse(String),
    NotFound(String),
    Validation(String),
    Serialization(String),
    Template(String),
    LogSink(String),
    HttpClient(String),
}

impl DeckError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            DeckError::Config(_) => "E001",
            DeckError::FileOperation(_) => "E002",
            DeckError::InvalidFilename(_) => "E003",
            DeckError::Parse(_) => "E004",
            DeckError::NotFound(_) => "E005",
            DeckError::Validation(_) => "E006",
            DeckError::Serialization(_) => "E007",
            DeckError::Template(_) => "E008",
            DeckError::LogSink(_) => "E009",
            DeckError::HttpClient(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            DeckError::Config(_) => "Configuration Error",
            DeckError::FileOperation(_) => "File Operation Error",
            DeckError::InvalidFilename(_) => "Invalid Filename",
            DeckError::Parse(_) => "Parse Error",
            DeckError::NotFound(_) => "Resource Not Found",
            DeckError::Validation(_) => "Validation Error",
            DeckError::Serialization(_) => "Serialization Error",
            DeckError::Template(_) => "Template Error",
            DeckError::LogSink(_) => "Log Sink Error",
            DeckError::HttpClient(_) => "HTTP Client Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            DeckError::Config(msg)
            | DeckError::FileOperation(msg)
            | DeckError::InvalidFilename(msg)
            | DeckError::Parse(msg)
            | DeckError::NotFound(msg)
            | DeckError::Validation(msg)
            | DeckError::Serialization(msg)
            | DeckError::Template(msg)
            | DeckError::LogSink(msg)
            | DeckError::HttpClient(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for DeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for DeckError {}

// 便捷的构造函数
impl DeckError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        DeckError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        DeckError::FileOperation(msg.into())
    }

    pub fn invalid_filename<T: Into<String>>(msg: T) -> Self {
        DeckError::InvalidFilename(msg.into())
    }

    pub fn parse<T: Into<String>>(msg: T) -> Self {
        DeckError::Parse(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        DeckError::NotFound(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        DeckError::Validation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        DeckError::Serialization(msg.into())
    }

    pub fn template<T: Into<String>>(msg: T) -> Self {
        DeckError::Template(msg.into())
    }

    pub fn log_sink<T: Into<String>>(msg: T) -> Self {
        DeckError::LogSink(msg.into())
    }

    pub fn http_client<T: Into<String>>(msg: T) -> Self {
        DeckError::HttpClient(msg.into())
    }
}

impl From<std::io::Error> for DeckError {
    fn from(err: std::io::Error) -> Self {
        DeckError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for DeckError {
    fn from(err: serde_json::Error) -> Self {
        DeckError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for DeckError {
    fn from(err: serde_yaml::Error) -> Self {
        DeckError::Parse(err.to_string())
    }
}

impl From<askama::Error> for DeckError {
    fn from(err: askama::Error) -> Self {
        DeckError::Template(err.to_string())
    }
}

impl ResponseError for DeckError {
    fn status_code(&self) -> StatusCode {
        match self {
            DeckError::NotFound(_) => StatusCode::NOT_FOUND,
            DeckError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self.format_simple());
        }
        HttpResponse::build(status)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body(status.canonical_reason().unwrap_or("Error"))
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
