use crate::config::Config;
use crate::constants::DEFAULT_FEE;
use crate::error::Result;
use crate::manager::{Manager, Payment};
use bitcoin::Network;
use log::info;
use rust_decimal::Decimal;
use std::io::ErrorKind;

/// Walks a fresh regtest chain through funding, payments between accounts,
/// a 2-of-4 multisig deposit and its withdrawal, then prints the wallet.
pub async fn run(config: &Config) -> Result<()> {
    let regtest_dir = config.regtest_dir();
    match tokio::fs::remove_dir_all(&regtest_dir).await {
        Ok(()) => info!("Removed {}", regtest_dir.display()),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }

    let manager = Manager::start(config).await?;
    let result = scenario(&manager).await;
    manager.shutdown().await?;
    result
}

async fn scenario(manager: &Manager) -> Result<()> {
    manager.require_network(Network::Regtest).await?;

    manager.generate(101).await?;
    let acc1 = manager.make_address("acc1").await?;
    let acc2 = manager.make_address("acc2").await?;

    manager
        .send_to(&[Payment::new("", &acc1, Decimal::new(5, 0))])
        .await?;
    manager.generate(1).await?;
    manager
        .send_to(&[Payment::new("acc1", &acc2, Decimal::new(21, 1))])
        .await?;
    manager.generate(1).await?;

    let external_keys = manager.new_public_keys(2).await?;
    let multisig = manager
        .make_multisig(2, 4, &external_keys, "acc3")
        .await?;

    manager
        .send_to(&[Payment::new("acc2", multisig.address(), Decimal::new(55, 2))])
        .await?;
    manager.generate(1).await?;

    manager
        .withdraw_multisig(multisig.address(), *DEFAULT_FEE)
        .await?;
    manager.generate(1).await?;

    println!("{}", serde_json::to_string_pretty(&manager.get_balance().await?)?);
    println!(
        "{}",
        serde_json::to_string_pretty(&manager.get_transactions().await?)?
    );
    Ok(())
}
