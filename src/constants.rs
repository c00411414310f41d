use lazy_static::lazy_static;
use rust_decimal::Decimal;
use std::{env, path::PathBuf, time::Duration};

pub const JSONRPC_VERSION: &str = "1.0";
pub const JSONRPC_ID: &str = "btcmgr";
pub const STARTUP_POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(10);
/// Upper bound of `listunspent`'s confirmation window.
pub const MAX_CONFIRMATIONS: u32 = 999_999_999;

lazy_static! {
    pub static ref DEFAULT_FEE: Decimal = Decimal::new(5000, 8);
    pub static ref BITCOIND_HOST: String =
        env::var("BITCOIND_HOST").unwrap_or("127.0.0.1".to_string());
    pub static ref BITCOIND_RPC_PORT: u16 = env::var("BITCOIND_RPC_PORT")
        .ok()
        .and_then(|port_str| port_str.parse::<u16>().ok())
        .unwrap_or(18332);
    pub static ref BITCOIND_RPC_USER: String =
        env::var("BITCOIND_RPC_USER").unwrap_or("btcapi".to_string());
    pub static ref BITCOIND_RPC_PASSWORD: String =
        env::var("BITCOIND_RPC_PASSWORD").unwrap_or("btcapipwd".to_string());
    pub static ref BITCOIND_BIN: PathBuf =
        PathBuf::from(env::var("BITCOIND_BIN").unwrap_or("bitcoind".to_string()));
    pub static ref BITCOIND_DATADIR: PathBuf =
        PathBuf::from(env::var("BITCOIND_DATADIR").unwrap_or(".".to_string()));
    pub static ref BITCOIND_STARTUP_TIMEOUT: Option<Duration> =
        env::var("BITCOIND_STARTUP_TIMEOUT_SECS")
            .ok()
            .and_then(|secs| secs.parse::<u64>().ok())
            .map(Duration::from_secs);
}
