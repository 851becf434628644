use jsonrpsee::core::Error as JsonRpseeError;

/// Transport level failures, surfaced to the caller without retry.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The jsonrpsee client failed: endpoint unreachable, call rejected, or the response could
    /// not be parsed.
    #[error(transparent)]
    Client(#[from] JsonRpseeError),

    /// The node reports it is still importing blocks.
    #[error("node is still syncing, at block {current} of {highest}")]
    Syncing { current: u64, highest: u64 },

    /// The endpoint url is malformed.
    #[error("invalid node url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The endpoint answered, but not with what the request needs.
    #[error("node unavailable: {0}")]
    Unavailable(String),
}
