use bitcoin::PublicKey;
use btcmgr::constants::DEFAULT_FEE;
use btcmgr::{demo, Config, Manager, Payment};
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "btcmgr")]
#[command(about = "Drive a regtest bitcoind through its JSON-RPC interface", long_about = None)]
struct Cli {
    #[command(flatten)]
    node: NodeArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct NodeArgs {
    /// RPC host
    #[arg(long, global = true)]
    host: Option<String>,

    /// RPC port
    #[arg(long, global = true)]
    rpc_port: Option<u16>,

    #[arg(long, global = true)]
    rpc_user: Option<String>,

    #[arg(long, global = true)]
    rpc_password: Option<String>,

    /// Path of the bitcoind binary
    #[arg(long, global = true)]
    bitcoind: Option<PathBuf>,

    /// Data directory handed to bitcoind
    #[arg(long, global = true)]
    datadir: Option<PathBuf>,

    /// Seconds to wait for the node before giving up
    #[arg(long, global = true)]
    startup_timeout: Option<u64>,

    /// Start bitcoind for this command instead of using a running node
    #[arg(long, global = true)]
    spawn: bool,
}

impl NodeArgs {
    fn config(&self) -> Config {
        let defaults = Config::default();
        Config {
            host: self.host.clone().unwrap_or(defaults.host),
            rpc_port: self.rpc_port.unwrap_or(defaults.rpc_port),
            rpc_user: self.rpc_user.clone().unwrap_or(defaults.rpc_user),
            rpc_password: self.rpc_password.clone().unwrap_or(defaults.rpc_password),
            bitcoind: self.bitcoind.clone().unwrap_or(defaults.bitcoind),
            datadir: self.datadir.clone().unwrap_or(defaults.datadir),
            startup_timeout: self
                .startup_timeout
                .map(Duration::from_secs)
                .or(defaults.startup_timeout),
        }
    }
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Run the full scenario on a fresh regtest chain
    Demo,

    #[command(flatten)]
    Node(NodeCommands),
}

/// Commands run against a single node.
#[derive(Subcommand, Debug, PartialEq)]
enum NodeCommands {
    /// Create a new address in an account
    Address {
        #[arg(default_value = "")]
        account: String,
    },

    /// Show balances per account
    Balance,

    /// Send from an account to an address
    Send {
        #[arg(short, long, default_value = "")]
        from: String,

        #[arg(short, long)]
        to: String,

        /// Amount in BTC
        #[arg(short, long)]
        amount: Decimal,
    },

    /// Create a multisig address
    Multisig {
        /// Signatures required to spend
        #[arg(short, long)]
        min_signs: u32,

        /// Total number of signers
        #[arg(short, long)]
        total_signs: u32,

        /// External signer public key (repeatable)
        #[arg(short, long = "pubkey")]
        pubkeys: Vec<PublicKey>,

        #[arg(long, default_value = "")]
        account: String,
    },

    /// Withdraw everything held by a multisig address back into its account
    Withdraw {
        address: String,

        /// Fee in BTC per withdrawn output
        #[arg(short, long)]
        fee: Option<Decimal>,
    },

    /// Create wallet keys and print their public keys
    Pubkeys {
        #[arg(default_value = "1")]
        amount: usize,
    },

    /// Mine blocks
    Generate {
        #[arg(default_value = "1")]
        blocks: u32,
    },

    /// List wallet transactions
    Transactions,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.node.config();

    let command = match cli.command {
        Commands::Demo => return Ok(demo::run(&config).await?),
        Commands::Node(command) => command,
    };

    let manager = if cli.node.spawn {
        Manager::start(&config).await?
    } else {
        Manager::connect(&config).await?
    };
    let result = execute(&manager, command).await;
    manager.shutdown().await?;
    Ok(result?)
}

async fn execute(manager: &Manager, command: NodeCommands) -> btcmgr::Result<()> {
    match command {
        NodeCommands::Address { account } => print(&manager.make_address(&account).await?),
        NodeCommands::Balance => print(&manager.get_balance().await?),
        NodeCommands::Send { from, to, amount } => {
            print(&manager.send_to(&[Payment::new(&from, &to, amount)]).await?)
        }
        NodeCommands::Multisig {
            min_signs,
            total_signs,
            pubkeys,
            account,
        } => {
            let multisig = manager
                .make_multisig(min_signs, total_signs, &pubkeys, &account)
                .await?;
            print(&serde_json::json!({
                "address": multisig.address(),
                "redeemScript": multisig.redeem_script(),
            }))
        }
        NodeCommands::Withdraw { address, fee } => print(
            &manager
                .withdraw_multisig(&address, fee.unwrap_or(*DEFAULT_FEE))
                .await?,
        ),
        NodeCommands::Pubkeys { amount } => print(&manager.new_public_keys(amount).await?),
        NodeCommands::Generate { blocks } => print(&manager.generate(blocks).await?),
        NodeCommands::Transactions => print(&manager.get_transactions().await?),
    }
}

fn print<T: Serialize>(value: &T) -> btcmgr::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_send() {
        let cli = Cli::try_parse_from([
            "btcmgr", "send", "--from", "acc1", "--to", "mzBc4XEFSdzCDcTxAgf6EZXgsZWpztRhef",
            "--amount", "2.1",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Commands::Node(NodeCommands::Send {
                from: "acc1".to_string(),
                to: "mzBc4XEFSdzCDcTxAgf6EZXgsZWpztRhef".to_string(),
                amount: Decimal::new(21, 1),
            })
        );
        assert!(!cli.node.spawn);
    }

    #[test]
    fn test_parse_multisig_with_pubkeys() {
        let key = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
        let cli = Cli::try_parse_from([
            "btcmgr", "multisig", "-m", "2", "-t", "4", "--pubkey", key, "--pubkey", key,
            "--account", "acc3",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Commands::Node(NodeCommands::Multisig {
                min_signs: 2,
                total_signs: 4,
                pubkeys: vec![PublicKey::from_str(key).unwrap(); 2],
                account: "acc3".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_demo() {
        let cli = Cli::try_parse_from(["btcmgr", "demo", "--datadir", "/tmp/node"]).unwrap();
        assert_eq!(cli.command, Commands::Demo);
        assert_eq!(cli.node.config().datadir, PathBuf::from("/tmp/node"));
    }

    #[test]
    fn test_rejects_bad_pubkey() {
        assert!(Cli::try_parse_from(["btcmgr", "multisig", "-m", "1", "-t", "1", "--pubkey", "zz"])
            .is_err());
    }

    #[test]
    fn test_node_args_override_defaults() {
        let cli = Cli::try_parse_from([
            "btcmgr",
            "balance",
            "--rpc-port",
            "18443",
            "--datadir",
            "/tmp/node",
            "--startup-timeout",
            "5",
            "--spawn",
        ])
        .unwrap();
        let config = cli.node.config();
        assert_eq!(config.rpc_port, 18443);
        assert_eq!(config.datadir, PathBuf::from("/tmp/node"));
        assert_eq!(config.startup_timeout, Some(Duration::from_secs(5)));
        assert!(cli.node.spawn);
    }

    #[test]
    fn test_withdraw_fee_is_optional() {
        let cli =
            Cli::try_parse_from(["btcmgr", "withdraw", "2MzQwSSnBHWHqSAqtTVQ6v47XtaisrJa1Vc"])
                .unwrap();
        assert_eq!(
            cli.command,
            Commands::Node(NodeCommands::Withdraw {
                address: "2MzQwSSnBHWHqSAqtTVQ6v47XtaisrJa1Vc".to_string(),
                fee: None,
            })
        );
    }
}
