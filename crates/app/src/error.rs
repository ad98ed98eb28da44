use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    MiniApp(#[from] mini_app::MiniAppError),
    #[error("invalid timezone: {0}")]
    Timezone(String),
    #[error("invalid month `{0}`, expected YYYY-MM")]
    Month(String),
}
