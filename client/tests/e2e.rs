//! Needs a running dev node: `HARNESS_NODE_URL=http://127.0.0.1:9944 cargo test -- --ignored`
use harness_client::{
    config::{config, DEV_ACCOUNTS},
    tx::{EnvelopeType, TransactionRequest},
    types::U256,
    Harness,
};

#[tokio::test]
#[ignore = "requires a fresh dev node"]
async fn legacy_transfer_is_accepted() -> anyhow::Result<()> {
    env_logger::try_init().ok();
    let config = config("dev")?;
    let keystore = config.keystore()?;
    let harness = Harness::connect(config, keystore).await?;

    let alith = DEV_ACCOUNTS[0].address;
    let baltathar = DEV_ACCOUNTS[1].address;
    let request = TransactionRequest::new(alith)
        .to(baltathar)
        .nonce(0)
        .gas_limit(21_000)
        .gas_price(1_000_000_000_000u64)
        .value(U256::zero())
        .envelope(EnvelopeType::Legacy);
    let result = harness.send(request, "alith").await?;
    assert!(result.succeeded());

    let tx = harness.transaction(result.tx_hash).await?.expect("transaction not found");
    assert_eq!(tx.nonce, 0);
    assert_eq!(tx.from, alith);
    assert_eq!(tx.to, Some(baltathar));
    Ok(())
}
