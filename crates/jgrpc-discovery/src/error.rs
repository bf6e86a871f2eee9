#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("lost the coordinator session: {0}")]
    SessionLost(String),

    #[error("coordinator session expired")]
    SessionExpired,

    #[error("coordinator request failed: {0}")]
    Request(String),
}
