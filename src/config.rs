use crate::constants::{
    BITCOIND_BIN, BITCOIND_DATADIR, BITCOIND_HOST, BITCOIND_RPC_PASSWORD, BITCOIND_RPC_PORT,
    BITCOIND_RPC_USER, BITCOIND_STARTUP_TIMEOUT,
};
use std::{path::PathBuf, time::Duration};

/// Where the node listens, how to authenticate, and how to launch it.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub rpc_port: u16,
    pub rpc_user: String,
    pub rpc_password: String,
    pub bitcoind: PathBuf,
    pub datadir: PathBuf,
    /// `None` waits for the node indefinitely.
    pub startup_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: BITCOIND_HOST.clone(),
            rpc_port: *BITCOIND_RPC_PORT,
            rpc_user: BITCOIND_RPC_USER.clone(),
            rpc_password: BITCOIND_RPC_PASSWORD.clone(),
            bitcoind: BITCOIND_BIN.clone(),
            datadir: BITCOIND_DATADIR.clone(),
            startup_timeout: *BITCOIND_STARTUP_TIMEOUT,
        }
    }
}

impl Config {
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.rpc_port)
    }

    pub fn daemon_args(&self) -> Vec<String> {
        vec![
            "-regtest".to_string(),
            format!("-datadir={}", self.datadir.display()),
            format!("-rpcuser={}", self.rpc_user),
            format!("-rpcpassword={}", self.rpc_password),
            format!("-rpcport={}", self.rpc_port),
        ]
    }

    /// Chain state a regtest node keeps under its datadir.
    pub fn regtest_dir(&self) -> PathBuf {
        self.datadir.join("regtest")
    }
}
