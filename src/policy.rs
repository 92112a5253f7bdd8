use std::collections::BTreeSet;

use alloy::primitives::{Address, U256};
use tracing::{debug, info, warn};

use crate::{chains::ChainClient, codec::TransferEvent};

/// Outcome of evaluating one transfer against the whitelist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Forward {
        target: Address,
        token: Address,
        amount: U256,
    },
    Skip,
}

/// Forward iff the transfer recipient is whitelisted.
pub fn evaluate(transfer: &TransferEvent, whitelist: &BTreeSet<Address>) -> Action {
    if whitelist.contains(&transfer.to) {
        Action::Forward {
            target: transfer.to,
            token: transfer.token,
            amount: transfer.value,
        }
    } else {
        Action::Skip
    }
}

/// Evaluates a transfer and executes a resulting `Forward` through the chain
/// client. A failed submission is logged with the target address and is
/// non-fatal: forwarding is best-effort, and one bad forward must not block
/// the rest of the range or the checkpoint.
pub async fn apply(
    client: &impl ChainClient,
    transfer: &TransferEvent,
    whitelist: &BTreeSet<Address>,
) {
    match evaluate(transfer, whitelist) {
        Action::Forward {
            target,
            token,
            amount,
        } => {
            info!(target_wallet = %target, %amount, "Recipient is whitelisted, calling forwardTransfer");
            match client.submit_forwarding_transaction(target, token, amount).await {
                Ok(Some(tx_hash)) => {
                    info!(target_wallet = %target, %tx_hash, "Sent forwardTransfer transaction");
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(target_wallet = %target, error = %e, "Failed to call forwardTransfer");
                }
            }
        }
        Action::Skip => {
            debug!(to = %transfer.to, "Recipient not whitelisted, skipping forwardTransfer");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    fn transfer(to: Address) -> TransferEvent {
        TransferEvent {
            token: address!("5425890298aed601595a70ab815c96711a31bc65"),
            to,
            value: U256::from(1_000u64),
        }
    }

    #[test]
    fn forwards_whitelisted_recipient() {
        let wallet = address!("C19f768a7f77D93148d91a915c40980444D66339");
        let whitelist = BTreeSet::from([wallet]);

        let action = evaluate(&transfer(wallet), &whitelist);
        assert_eq!(
            action,
            Action::Forward {
                target: wallet,
                token: address!("5425890298aed601595a70ab815c96711a31bc65"),
                amount: U256::from(1_000u64),
            }
        );
    }

    #[test]
    fn skips_unknown_recipient() {
        let wallet = address!("C19f768a7f77D93148d91a915c40980444D66339");
        let stranger = address!("0000000000000000000000000000000000000bad");
        let whitelist = BTreeSet::from([wallet]);

        assert_eq!(evaluate(&transfer(stranger), &whitelist), Action::Skip);
    }

    #[test]
    fn skips_everything_on_empty_whitelist() {
        let wallet = address!("C19f768a7f77D93148d91a915c40980444D66339");
        assert_eq!(evaluate(&transfer(wallet), &BTreeSet::new()), Action::Skip);
    }
}
