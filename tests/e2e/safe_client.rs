//! Safe client construction and query method tests

use alloy::primitives::{address, Address, U256};

use crate::common::TestHarness;
use crate::skip_if_no_rpc;
use safe_kit::{Error, Safe};

/// Test connecting to a Safe that does not exist
#[tokio::test(flavor = "multi_thread")]
async fn test_connect_to_undeployed_address() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let empty = address!("0x00000000000000000000000000000000DeaDBeef");

    let result = Safe::connect(harness.provider.clone(), None, empty).await;

    assert!(matches!(result, Err(Error::SafeNotDeployed(addr)) if addr == empty));
}

/// Test that a chain id mismatch is rejected at connect time
#[tokio::test(flavor = "multi_thread")]
async fn test_connect_rejects_wrong_chain() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();

    let safe = harness
        .deploy_safe(vec![owner], 1, U256::from(2001))
        .await
        .expect("Failed to deploy Safe");

    // 999999 is not the forked chain
    let result = Safe::connect_expecting_chain(
        harness.provider.clone(),
        None,
        safe.address(),
        999_999,
    )
    .await;

    assert!(matches!(result, Err(Error::ChainIdMismatch { .. })));
}

/// Test the read accessors against a fresh deployment
#[tokio::test(flavor = "multi_thread")]
async fn test_safe_accessors() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();

    let safe = harness
        .deploy_safe(vec![owner], 1, U256::from(2002))
        .await
        .expect("Failed to deploy Safe");

    assert_eq!(safe.nonce().await.unwrap(), U256::ZERO);
    assert_eq!(safe.version().await.unwrap(), "1.4.1");
    assert_eq!(safe.balance().await.unwrap(), U256::ZERO);

    // No modules or guard on a fresh Safe
    assert!(safe.modules().await.unwrap().is_empty());
    assert_eq!(safe.guard().await.unwrap(), Address::ZERO);

    // The fallback handler was set during setup
    assert_eq!(
        safe.fallback_handler().await.unwrap(),
        harness.config.addresses.fallback_handler
    );

    // The on-chain domain separator must match the local computation
    let expected = safe_kit::compute_domain_separator(
        harness.config.chain_id,
        safe.address(),
    );
    assert_eq!(safe.domain_separator().await.unwrap(), expected);
}

/// Test the transaction hash from the contract against the local EIP-712
/// computation
#[tokio::test(flavor = "multi_thread")]
async fn test_transaction_hash_matches_local_computation() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();

    let safe = harness
        .deploy_safe(vec![owner], 1, U256::from(2003))
        .await
        .expect("Failed to deploy Safe");

    let tx = safe
        .create_native_transfer_transaction(
            address!("0x4444444444444444444444444444444444444444"),
            U256::from(1),
        )
        .await
        .unwrap();

    let on_chain = safe.transaction_hash(&tx).await.unwrap();
    let local = safe_kit::compute_safe_transaction_hash(
        harness.config.chain_id,
        safe.address(),
        &tx.data,
    );

    assert_eq!(on_chain, local);
}

/// Test owner management through a full propose/sign/execute round
#[tokio::test(flavor = "multi_thread")]
async fn test_add_and_remove_owner() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();
    let new_owner = address!("0x5555555555555555555555555555555555555555");

    let safe = harness
        .deploy_safe(vec![owner], 1, U256::from(2004))
        .await
        .expect("Failed to deploy Safe");

    // Add a second owner, keeping threshold 1
    let mut tx = safe
        .create_add_owner_transaction(new_owner, Some(1))
        .await
        .unwrap();
    safe.sign_transaction(&mut tx, Default::default())
        .await
        .unwrap();
    let result = safe.execute_transaction(&tx).await.unwrap();
    assert!(result.success);
    assert!(safe.is_owner(new_owner).await.unwrap());

    // Remove it again
    let mut tx = safe
        .create_remove_owner_transaction(new_owner, Some(1))
        .await
        .unwrap();
    safe.sign_transaction(&mut tx, Default::default())
        .await
        .unwrap();
    let result = safe.execute_transaction(&tx).await.unwrap();
    assert!(result.success);
    assert!(!safe.is_owner(new_owner).await.unwrap());
    assert_eq!(safe.owners().await.unwrap(), vec![owner]);
}

/// Test enabling and disabling a module
#[tokio::test(flavor = "multi_thread")]
async fn test_enable_and_disable_module() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();
    // Any contract address works as a module for enable/disable bookkeeping
    let module = harness.config.addresses.multi_send;

    let safe = harness
        .deploy_safe(vec![owner], 1, U256::from(2005))
        .await
        .expect("Failed to deploy Safe");

    assert!(!safe.is_module_enabled(module).await.unwrap());

    let mut tx = safe.create_enable_module_transaction(module).await.unwrap();
    safe.sign_transaction(&mut tx, Default::default())
        .await
        .unwrap();
    assert!(safe.execute_transaction(&tx).await.unwrap().success);

    assert!(safe.is_module_enabled(module).await.unwrap());
    assert_eq!(safe.modules().await.unwrap(), vec![module]);

    let mut tx = safe
        .create_disable_module_transaction(module)
        .await
        .unwrap();
    safe.sign_transaction(&mut tx, Default::default())
        .await
        .unwrap();
    assert!(safe.execute_transaction(&tx).await.unwrap().success);

    assert!(!safe.is_module_enabled(module).await.unwrap());
    assert!(safe.modules().await.unwrap().is_empty());
}

/// Test that the module walk crosses page boundaries: the list is read ten
/// entries per request, so twelve modules take two pages
#[tokio::test(flavor = "multi_thread")]
async fn test_modules_paginated_walk() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();

    let safe = harness
        .deploy_safe(vec![owner], 1, U256::from(2007))
        .await
        .expect("Failed to deploy Safe");

    // Twelve distinct module addresses, forcing a second page
    let modules: Vec<Address> = (1u8..=12)
        .map(|i| {
            let mut bytes = [0u8; 20];
            bytes[18] = 0xf0;
            bytes[19] = i;
            Address::from(bytes)
        })
        .collect();

    for module in &modules {
        let mut tx = safe
            .create_enable_module_transaction(*module)
            .await
            .unwrap();
        safe.sign_transaction(&mut tx, Default::default())
            .await
            .unwrap();
        assert!(safe.execute_transaction(&tx).await.unwrap().success);
    }

    let listed = safe.modules().await.unwrap();
    assert_eq!(listed.len(), modules.len());
    for module in &modules {
        assert!(listed.contains(module), "module {module} missing from walk");
        assert!(safe.is_module_enabled(*module).await.unwrap());
    }
}

/// Test changing the threshold on a multi-owner Safe
#[tokio::test(flavor = "multi_thread")]
async fn test_change_threshold() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();
    let second = address!("0x6666666666666666666666666666666666666666");

    let safe = harness
        .deploy_safe(vec![owner, second], 1, U256::from(2006))
        .await
        .expect("Failed to deploy Safe");

    let mut tx = safe.create_change_threshold_transaction(2).await.unwrap();
    safe.sign_transaction(&mut tx, Default::default())
        .await
        .unwrap();
    assert!(safe.execute_transaction(&tx).await.unwrap().success);

    assert_eq!(safe.threshold().await.unwrap(), 2);
}
