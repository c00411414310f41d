pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Error(String),
    #[error("Connection Error: {0}")]
    ConnectionError(String),
    #[error("RPC Error {code}: {message}")]
    RpcError { code: i64, message: String },
    #[error("Unauthorized: check the RPC user and password")]
    Unauthorized,
    #[error("Invalid Response Error: {0}")]
    InvalidResponseError(String),
    #[error("{0}")]
    IoError(String),
    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),
    #[error("Output Not Found: the listed output of {txid} does not pay {address}")]
    OutputNotFound { txid: String, address: String },
    #[error("Insufficient Funds: output worth {value} cannot cover a fee of {fee}")]
    InsufficientFunds { value: String, fee: String },
    #[error("Incomplete Signature: ran out of keys signing a spend of {txid} ({errors})")]
    IncompleteSignature { txid: String, errors: String },
    #[error("bitcoind exited during startup ({0})")]
    DaemonExited(String),
    #[error("bitcoind did not become ready in time")]
    StartupTimeout,
    #[error("Wrong Network: expected {expected}, node is on {actual}")]
    WrongNetwork { expected: String, actual: String },
}

impl Error {
    /// Errors a node produces while it is still starting up.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::ConnectionError(_) | Error::RpcError { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // A node still bringing up its HTTP server may accept and then drop
        // the connection, which surfaces as a request or body error.
        if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
            Error::ConnectionError(err.to_string())
        } else if err.is_decode() {
            Error::InvalidResponseError(err.to_string())
        } else {
            Error::Error(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidResponseError(err.to_string())
    }
}

impl From<bitcoin::network::ParseNetworkError> for Error {
    fn from(err: bitcoin::network::ParseNetworkError) -> Self {
        Error::InvalidResponseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_connection_and_rpc_errors_are_transient() {
        assert!(Error::ConnectionError("refused".to_string()).is_transient());
        assert!(Error::RpcError {
            code: -28,
            message: "Loading block index...".to_string()
        }
        .is_transient());
        assert!(!Error::Unauthorized.is_transient());
        assert!(!Error::InvalidResponseError("bad".to_string()).is_transient());
        assert!(!Error::DaemonExited("exit status: 1".to_string()).is_transient());
    }
}
