use super::rpc::Client;
use super::{Input, MultisigAddress, PrevOut, RawTransaction, TxOut};
use crate::constants::MAX_CONFIRMATIONS;
use crate::error::{Error, Result};
use bitcoin::{PublicKey, Txid};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;

/// Creates a `min_signs`-of-`total_signs` multisig address in `account`.
///
/// The node generates fresh keys for every signer not covered by `public_keys`.
pub async fn create(
    client: &Client,
    min_signs: u32,
    total_signs: u32,
    public_keys: &[PublicKey],
    account: &str,
) -> Result<MultisigAddress> {
    if min_signs == 0 || min_signs > total_signs {
        return Err(Error::InvalidArgument(format!(
            "cannot require {} of {} signatures",
            min_signs, total_signs
        )));
    }
    if public_keys.len() > total_signs as usize {
        return Err(Error::InvalidArgument(format!(
            "{} public keys given for {} signers",
            public_keys.len(),
            total_signs
        )));
    }

    let mut keys = Vec::with_capacity(total_signs as usize);
    for _ in 0..total_signs as usize - public_keys.len() {
        keys.push(client.get_new_address(None).await?);
    }
    keys.extend(public_keys.iter().map(PublicKey::to_string));

    let multisig = client
        .add_multisig_address(min_signs, &keys, account)
        .await?;
    info!(
        "Created {}-of-{} multisig {} in account {:?}",
        min_signs,
        total_signs,
        multisig.address(),
        account
    );
    Ok(multisig)
}

/// Moves every confirmed output paying `address` back into the wallet, one
/// transaction per output, signing with whichever participant keys the
/// wallet owns.
pub async fn withdraw(client: &Client, address: &str, fee: Decimal) -> Result<Vec<Txid>> {
    let address_info = client.validate_address(address).await?;
    let account = address_info.account.clone().unwrap_or_default();

    let mut signers = Vec::new();
    for participant in &address_info.addresses {
        if client.validate_address(participant).await?.is_mine {
            signers.push(participant.clone());
        }
    }
    debug!("{} of {} signers are ours", signers.len(), address_info.addresses.len());

    let withdraw_address = client.get_new_address(Some(account.as_str())).await?;
    let utxos = client
        .list_unspent(1, MAX_CONFIRMATIONS, &[address])
        .await?;
    if utxos.is_empty() {
        warn!("No confirmed outputs pay {}", address);
    }

    let mut txids = Vec::with_capacity(utxos.len());
    for utxo in utxos {
        let funding = client.get_raw_transaction(&utxo.txid).await?;
        let output = unspent_output(&funding, utxo.vout, address).ok_or_else(|| {
            Error::OutputNotFound {
                txid: utxo.txid.to_string(),
                address: address.to_string(),
            }
        })?;
        if output.value <= fee {
            return Err(Error::InsufficientFunds {
                value: output.value.to_string(),
                fee: fee.to_string(),
            });
        }

        let prev_out = PrevOut {
            txid: utxo.txid,
            vout: output.n,
            script_pub_key: output.script_pub_key.hex.clone(),
            redeem_script: utxo.redeem_script.clone(),
        };
        let unsigned = client
            .create_raw_transaction(
                &[Input {
                    txid: utxo.txid,
                    vout: output.n,
                }],
                &BTreeMap::from([(withdraw_address.clone(), output.value - fee)]),
            )
            .await?;
        let signed = sign_until_complete(client, unsigned, &prev_out, &signers).await?;

        let txid = client.send_raw_transaction(&signed).await?;
        info!(
            "Withdrew {} from {} to {} in {}",
            output.value - fee,
            address,
            withdraw_address,
            txid
        );
        txids.push(txid);
    }
    Ok(txids)
}

/// The output `listunspent` reported, provided it really pays `address`.
fn unspent_output<'a>(
    transaction: &'a RawTransaction,
    vout: u32,
    address: &str,
) -> Option<&'a TxOut> {
    transaction
        .vout
        .iter()
        .find(|output| output.n == vout)
        .filter(|output| output.script_pub_key.pays(address))
}

/// Applies one signer's key at a time until the node reports the
/// transaction complete. Keys are dumped lazily.
async fn sign_until_complete(
    client: &Client,
    mut hex: String,
    prev_out: &PrevOut,
    signers: &[String],
) -> Result<String> {
    let mut errors = Vec::new();
    for signer in signers {
        let private_key = client.dump_priv_key(signer).await?;
        let signed = client
            .sign_raw_transaction(&hex, std::slice::from_ref(prev_out), &[private_key])
            .await?;
        hex = signed.hex;
        if signed.complete {
            return Ok(hex);
        }
        errors = signed.errors;
        debug!("Signed spend of {} with {}, more signatures needed", prev_out.txid, signer);
    }
    let errors = Value::Array(errors).to_string();
    warn!("Spend of {} still incomplete: {}", prev_out.txid, errors);
    Err(Error::IncompleteSignature {
        txid: prev_out.txid.to_string(),
        errors,
    })
}
