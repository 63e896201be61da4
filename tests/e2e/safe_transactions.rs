//! Safe transaction E2E tests

use alloy::primitives::{address, Bytes, U256};

use crate::common::TestHarness;
use crate::skip_if_no_rpc;
use safe_kit::{Operation, SafeTransactionData, SigningMethod};

const ONE_ETH: u128 = 1_000_000_000_000_000_000;

/// Test executing a single ETH transfer from the Safe
#[tokio::test(flavor = "multi_thread")]
async fn test_execute_eth_transfer() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();

    let safe = harness
        .deploy_safe(vec![owner], 1, U256::from(3001))
        .await
        .expect("Failed to deploy Safe");

    // Fund the Safe with 10 ETH
    harness
        .mint_eth(safe.address(), U256::from(10 * ONE_ETH))
        .await
        .expect("Failed to fund Safe");

    let recipient = address!("0x4444444444444444444444444444444444444444");
    let amount = U256::from(ONE_ETH);
    let balance_before = harness.get_balance(recipient).await.unwrap();

    let mut tx = safe
        .create_native_transfer_transaction(recipient, amount)
        .await
        .unwrap();
    safe.sign_transaction(&mut tx, SigningMethod::Eip712)
        .await
        .unwrap();

    let result = safe.execute_transaction(&tx).await.unwrap();
    assert!(result.success, "Transaction should succeed");

    let balance_after = harness.get_balance(recipient).await.unwrap();
    assert_eq!(balance_after, balance_before + amount);

    // Nonce advances after execution
    assert_eq!(safe.nonce().await.unwrap(), U256::from(1));
}

/// Test the eth_sign signing method (v shifted by 4)
#[tokio::test(flavor = "multi_thread")]
async fn test_execute_with_eth_sign() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();

    let safe = harness
        .deploy_safe(vec![owner], 1, U256::from(3002))
        .await
        .expect("Failed to deploy Safe");

    harness
        .mint_eth(safe.address(), U256::from(ONE_ETH))
        .await
        .unwrap();

    let mut tx = safe
        .create_native_transfer_transaction(
            address!("0x4444444444444444444444444444444444444444"),
            U256::from(ONE_ETH / 100),
        )
        .await
        .unwrap();
    safe.sign_transaction(&mut tx, SigningMethod::EthSign)
        .await
        .unwrap();

    // Recovery byte must carry the eth_sign marker
    let signature = tx.signature_for(owner).unwrap();
    assert!(signature[64] == 31 || signature[64] == 32);

    let result = safe.execute_transaction(&tx).await.unwrap();
    assert!(result.success);
}

/// Test the pre-validated signature path: approve the hash on-chain, then
/// execute with a v=1 signature from the approving owner
#[tokio::test(flavor = "multi_thread")]
async fn test_execute_with_approved_hash() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();

    let safe = harness
        .deploy_safe(vec![owner], 1, U256::from(3003))
        .await
        .expect("Failed to deploy Safe");

    harness
        .mint_eth(safe.address(), U256::from(ONE_ETH))
        .await
        .unwrap();

    let mut tx = safe
        .create_native_transfer_transaction(
            address!("0x4444444444444444444444444444444444444444"),
            U256::from(ONE_ETH / 100),
        )
        .await
        .unwrap();

    let hash = safe.transaction_hash(&tx).await.unwrap();
    safe.approve_hash(hash).await.unwrap();
    tx.add_prevalidated_signature(owner);

    let result = safe.execute_transaction(&tx).await.unwrap();
    assert!(result.success);
}

/// Test executing a MultiSend batch of ETH transfers atomically
#[tokio::test(flavor = "multi_thread")]
async fn test_execute_multisend_batch() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();

    let safe = harness
        .deploy_safe(vec![owner], 1, U256::from(3004))
        .await
        .expect("Failed to deploy Safe");

    harness
        .mint_eth(safe.address(), U256::from(10 * ONE_ETH))
        .await
        .unwrap();

    let first = address!("0x4444444444444444444444444444444444444444");
    let second = address!("0x5555555555555555555555555555555555555555");
    let amount = U256::from(ONE_ETH);

    let first_before = harness.get_balance(first).await.unwrap();
    let second_before = harness.get_balance(second).await.unwrap();

    let batch = vec![
        SafeTransactionData::new(first, amount, Bytes::new(), Operation::Call),
        SafeTransactionData::new(second, amount, Bytes::new(), Operation::Call),
    ];

    let mut tx = safe.create_multi_send_transaction(&batch).await.unwrap();
    safe.sign_transaction(&mut tx, SigningMethod::Eip712)
        .await
        .unwrap();

    let result = safe.execute_transaction(&tx).await.unwrap();
    assert!(result.success);

    assert_eq!(harness.get_balance(first).await.unwrap(), first_before + amount);
    assert_eq!(
        harness.get_balance(second).await.unwrap(),
        second_before + amount
    );

    // The batch spends exactly one Safe nonce
    assert_eq!(safe.nonce().await.unwrap(), U256::from(1));
}

/// Test that a rejection transaction burns the targeted nonce
#[tokio::test(flavor = "multi_thread")]
async fn test_rejection_spends_nonce() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();

    let safe = harness
        .deploy_safe(vec![owner], 1, U256::from(3005))
        .await
        .expect("Failed to deploy Safe");

    let nonce = safe.nonce().await.unwrap();
    let mut rejection = safe.create_rejection_transaction(nonce).await.unwrap();
    safe.sign_transaction(&mut rejection, SigningMethod::Eip712)
        .await
        .unwrap();

    let result = safe.execute_transaction(&rejection).await.unwrap();
    assert!(result.success);
    assert_eq!(safe.nonce().await.unwrap(), nonce + U256::from(1));
}

/// Test that simulation reports success without moving funds
#[tokio::test(flavor = "multi_thread")]
async fn test_simulate_does_not_execute() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();

    let safe = harness
        .deploy_safe(vec![owner], 1, U256::from(3006))
        .await
        .expect("Failed to deploy Safe");

    harness
        .mint_eth(safe.address(), U256::from(10 * ONE_ETH))
        .await
        .unwrap();

    let recipient = address!("0x7777777777777777777777777777777777777777");
    let mut tx = safe
        .create_native_transfer_transaction(recipient, U256::from(ONE_ETH))
        .await
        .unwrap();
    safe.sign_transaction(&mut tx, SigningMethod::Eip712)
        .await
        .unwrap();

    assert!(safe.simulate_transaction(&tx).await);

    // Nothing moved and the nonce is untouched
    assert_eq!(harness.get_balance(recipient).await.unwrap(), U256::ZERO);
    assert_eq!(safe.nonce().await.unwrap(), U256::ZERO);
}

/// Test that simulating an over-balance transfer reports failure
#[tokio::test(flavor = "multi_thread")]
async fn test_simulate_insufficient_balance() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();

    let safe = harness
        .deploy_safe(vec![owner], 1, U256::from(3007))
        .await
        .expect("Failed to deploy Safe");

    // Safe holds nothing; sending 1 ETH must fail
    let mut tx = safe
        .create_native_transfer_transaction(
            address!("0x7777777777777777777777777777777777777777"),
            U256::from(ONE_ETH),
        )
        .await
        .unwrap();
    safe.sign_transaction(&mut tx, SigningMethod::Eip712)
        .await
        .unwrap();

    assert!(!safe.simulate_transaction(&tx).await);
}

/// Test EIP-1271 validation of an owner signature over a Safe message
#[tokio::test(flavor = "multi_thread")]
async fn test_eip1271_message_validation() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();

    let safe = harness
        .deploy_safe(vec![owner], 1, U256::from(3008))
        .await
        .expect("Failed to deploy Safe");

    let message = b"safe-kit e2e message";
    let raw_hash = alloy::primitives::keccak256(message);

    // Sign the Safe-wrapped message hash directly (ECDSA over the hash,
    // v in {27, 28})
    let safe_message_hash = safe.message_hash(message).await.unwrap();
    let signature = safe_kit::signing::sign_hash(&harness.signer, safe_message_hash)
        .await
        .unwrap();

    assert!(safe.is_valid_signature(raw_hash, &signature).await);

    // A garbage signature must not validate (and must not error)
    let garbage = alloy::primitives::Bytes::from(vec![0u8; 65]);
    assert!(!safe.is_valid_signature(raw_hash, &garbage).await);
}
