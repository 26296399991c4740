/// clash-select 错误类型
#[derive(Debug, thiserror::Error)]
pub enum ClashError {
    #[error("can't find a port that a Clash controller instance runs on")]
    PortNotFound,

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("decoding error: {0}")]
    Decode(String),

    /// 控制器返回了非预期的状态码, `message` 为服务端附带的说明 (若有)
    #[error("{context}, got HTTP status code {status}{}", message_suffix(.message))]
    HttpStatus {
        status: u16,
        context: String,
        message: Option<String>,
    },

    #[error("no input group names match those from Clash controller")]
    NoMatchingGroups,

    #[error("no selection made: input closed")]
    NoSelection,

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(", message \"{m}\""),
        _ => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, ClashError>;
