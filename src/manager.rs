use crate::bitcoin::daemon::{self, Daemon};
use crate::bitcoin::rpc::Client;
use crate::bitcoin::{multi_sig, MultisigAddress, WalletTransaction};
use crate::config::Config;
use crate::error::{Error, Result};
use bitcoin::{BlockHash, Network, PublicKey, Txid};
use log::info;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// One payment out of a named wallet account.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub account: String,
    pub to: String,
    pub amount: Decimal,
}

impl Payment {
    pub fn new(account: &str, to: &str, amount: Decimal) -> Self {
        Self {
            account: account.to_string(),
            to: to.to_string(),
            amount,
        }
    }
}

/// Drives a regtest node through its RPC interface.
pub struct Manager {
    client: Client,
    daemon: Option<Daemon>,
}

impl Manager {
    /// Launches bitcoind and waits until it serves RPC requests.
    pub async fn start(config: &Config) -> Result<Self> {
        let mut daemon = Daemon::spawn(config)?;
        info!("bitcoind running as pid {:?}", daemon.id());
        let client = Client::new(config);
        daemon::wait_until_ready(&client, Some(&mut daemon), config.startup_timeout).await?;
        Ok(Self {
            client,
            daemon: Some(daemon),
        })
    }

    /// Uses a node that is already running.
    pub async fn connect(config: &Config) -> Result<Self> {
        let client = Client::new(config);
        daemon::wait_until_ready(&client, None, config.startup_timeout).await?;
        Ok(Self {
            client,
            daemon: None,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Stops a node this manager started. Nodes it merely connected to are
    /// left running.
    pub async fn shutdown(mut self) -> Result<()> {
        match self.daemon.take() {
            Some(daemon) => daemon.shutdown(&self.client).await,
            None => Ok(()),
        }
    }

    pub async fn network(&self) -> Result<Network> {
        self.client.get_network().await
    }

    pub async fn require_network(&self, expected: Network) -> Result<()> {
        let actual = self.network().await?;
        if actual != expected {
            return Err(Error::WrongNetwork {
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(())
    }

    /// Generates `amount` wallet keys and returns their public halves.
    pub async fn new_public_keys(&self, amount: usize) -> Result<Vec<PublicKey>> {
        let mut addresses = Vec::with_capacity(amount);
        for _ in 0..amount {
            addresses.push(self.client.get_new_address(None).await?);
        }
        let mut public_keys = Vec::with_capacity(amount);
        for address in addresses {
            let info = self.client.validate_address(&address).await?;
            public_keys.push(info.pubkey.ok_or_else(|| {
                Error::InvalidResponseError(format!("no public key for {}", address))
            })?);
        }
        Ok(public_keys)
    }

    pub async fn make_address(&self, account: &str) -> Result<String> {
        self.client.get_new_address(Some(account)).await
    }

    pub async fn get_balance(&self) -> Result<BTreeMap<String, Decimal>> {
        self.client.list_accounts().await
    }

    /// Sends each payment in order, stopping at the first failure.
    pub async fn send_to(&self, payments: &[Payment]) -> Result<Vec<Txid>> {
        let mut txids = Vec::with_capacity(payments.len());
        for payment in payments {
            let txid = self
                .client
                .send_from(&payment.account, &payment.to, payment.amount)
                .await?;
            info!(
                "Sent {} from {:?} to {} in {}",
                payment.amount, payment.account, payment.to, txid
            );
            txids.push(txid);
        }
        Ok(txids)
    }

    pub async fn make_multisig(
        &self,
        min_signs: u32,
        total_signs: u32,
        public_keys: &[PublicKey],
        account: &str,
    ) -> Result<MultisigAddress> {
        multi_sig::create(&self.client, min_signs, total_signs, public_keys, account).await
    }

    pub async fn withdraw_multisig(&self, address: &str, fee: Decimal) -> Result<Vec<Txid>> {
        multi_sig::withdraw(&self.client, address, fee).await
    }

    pub async fn get_transactions(&self) -> Result<Vec<WalletTransaction>> {
        self.client.list_transactions().await
    }

    pub async fn generate(&self, blocks: u32) -> Result<Vec<BlockHash>> {
        self.client.generate(blocks).await
    }
}
