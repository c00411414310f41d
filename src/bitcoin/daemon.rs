use super::rpc::Client;
use crate::config::Config;
use crate::constants::{SHUTDOWN_GRACE_PERIOD, STARTUP_POLL_INTERVAL};
use crate::error::{Error, Result};
use log::{debug, info, warn};
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::time::{self, Instant};

/// A `bitcoind -regtest` child process.
///
/// The process is killed if the handle is dropped without [`Daemon::shutdown`].
#[derive(Debug)]
pub struct Daemon {
    child: Child,
}

impl Daemon {
    pub fn spawn(config: &Config) -> Result<Self> {
        info!(
            "Starting {} -regtest in {}",
            config.bitcoind.display(),
            config.datadir.display()
        );
        let child = Command::new(&config.bitcoind)
            .args(config.daemon_args())
            .kill_on_drop(true)
            .spawn()?;
        Ok(Self { child })
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Fails if the process has already exited.
    pub fn check_running(&mut self) -> Result<()> {
        match self.child.try_wait()? {
            Some(status) => Err(Error::DaemonExited(status.to_string())),
            None => Ok(()),
        }
    }

    /// Asks the node to stop over RPC and waits for it, killing the process
    /// if it does not exit within the grace period.
    pub async fn shutdown(mut self, client: &Client) -> Result<()> {
        if let Err(err) = client.stop().await {
            warn!("bitcoind refused to stop ({}), killing it", err);
            return Ok(self.child.kill().await?);
        }
        match time::timeout(SHUTDOWN_GRACE_PERIOD, self.child.wait()).await {
            Ok(status) => {
                info!("bitcoind exited with {}", status?);
                Ok(())
            }
            Err(_) => {
                warn!(
                    "bitcoind still running after {:?}, killing it",
                    SHUTDOWN_GRACE_PERIOD
                );
                Ok(self.child.kill().await?)
            }
        }
    }
}

/// Polls the node until it answers `listaccounts`.
///
/// Connection and RPC errors mean the node is still starting and are retried.
pub async fn wait_until_ready(
    client: &Client,
    mut daemon: Option<&mut Daemon>,
    timeout: Option<Duration>,
) -> Result<()> {
    let started = Instant::now();
    loop {
        match client.list_accounts().await {
            Ok(_) => {
                info!("bitcoind ready at {}", client.url());
                return Ok(());
            }
            Err(err) if err.is_transient() => debug!("Waiting for bitcoind: {}", err),
            Err(err) => return Err(err),
        }
        if let Some(daemon) = daemon.as_deref_mut() {
            daemon.check_running()?;
        }
        if timeout.is_some_and(|timeout| started.elapsed() >= timeout) {
            return Err(Error::StartupTimeout);
        }
        time::sleep(STARTUP_POLL_INTERVAL).await;
    }
}
