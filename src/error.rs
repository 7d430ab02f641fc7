use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 学习方向编号格式不正确
    #[error("'{input}' is not a valid direction of study")]
    InvalidInput { input: String },

    /// 网络错误（HTTP 状态码或传输层失败）
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// 时间字段无法解析
    #[error("malformed {field} date '{value}': {source}")]
    MalformedDate {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// XML 文档无法解析
    #[error("malformed XML document ({url}): {source}")]
    MalformedXml {
        url: String,
        #[source]
        source: roxmltree::Error,
    },

    /// 配置错误
    #[error("config error: {0}")]
    Config(String),

    /// 抓取任务异常退出
    #[error("fetch task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

/// 网络错误
///
/// 底层传输错误统一包装成这一种，调用方只需处理一类网络故障
#[derive(Debug, Error)]
pub enum NetworkError {
    /// 非 2xx 响应
    #[error("HTTP Error: {status} {reason} ({url})")]
    HttpStatus {
        status: u16,
        reason: String,
        url: String,
    },

    /// 连接、超时、读取响应体失败等
    #[error("IO Error (Network): {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    pub fn invalid_input(input: impl Into<String>) -> Self {
        AppError::InvalidInput {
            input: input.into(),
        }
    }

    pub fn malformed_date(field: &'static str, value: impl Into<String>, source: chrono::ParseError) -> Self {
        AppError::MalformedDate {
            field,
            value: value.into(),
            source,
        }
    }

    /// 网络类错误会让整批抓取任务失败
    pub fn is_network(&self) -> bool {
        matches!(self, AppError::Network(_))
    }
}

impl NetworkError {
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        NetworkError::Transport {
            url: url.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
