//! `stakegate estimate --tx <hash>`.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::evm::EvmTransaction;
use crate::domain::{format_duration, TxHash};
use crate::error::Result;
use crate::infrastructure::bootstrap::Runtime;

/// Estimate the confirmation time of `hash` at the current gas price.
pub async fn execute(runtime: &Runtime, hash: TxHash) -> Result<()> {
    let chain = runtime.config.chain();
    let pb = output::spinner("Estimating confirmation time...");
    let transaction = EvmTransaction::submitted(runtime.client.provider(), hash).await;
    let estimate = runtime.estimator.estimate(&transaction, chain).await;
    match estimate {
        Some(_) => output::spinner_success(&pb, "Estimated"),
        None => output::spinner_fail(&pb, "No estimate available"),
    }

    if output::is_json() {
        output::json_output(json!({
            "command": "estimate",
            "transaction": hash,
            "chain": chain.name(),
            "gas_price": transaction.gas_price().map(|p| p.to_string()),
            "estimate_ms": estimate.map(|d| d.as_millis()),
        }));
        return Ok(());
    }

    output::transaction("Transaction", hash, chain.explorer_tx_url(&hash));
    output::field("Chain", chain.name());
    if let Some(price) = transaction.gas_price() {
        output::field("Gas price", format!("{price} wei"));
    }
    match estimate {
        Some(duration) => output::field("Estimate", format_duration(duration)),
        None => output::hint("the gas tracker could not price this transaction"),
    }
    Ok(())
}
