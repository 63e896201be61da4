//! Safe deployment E2E tests

use alloy::primitives::U256;
use alloy::providers::Provider;

use crate::common::TestHarness;
use crate::skip_if_no_rpc;
use safe_kit::SafeAccountConfig;

/// Test deploying a 1-of-1 Safe through the factory
#[tokio::test(flavor = "multi_thread")]
async fn test_deploy_single_owner_safe() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();

    let safe = harness
        .deploy_safe(vec![owner], 1, U256::from(1001))
        .await
        .expect("Failed to deploy Safe");

    // The deployed proxy must have code
    let code = harness
        .provider
        .get_code_at(safe.address())
        .await
        .expect("Failed to get code");
    assert!(!code.is_empty(), "Safe should have code after deployment");

    // Setup parameters must be reflected on-chain
    assert_eq!(safe.owners().await.unwrap(), vec![owner]);
    assert_eq!(safe.threshold().await.unwrap(), 1);
    assert!(safe.is_owner(owner).await.unwrap());
}

/// Test that the predicted address matches the deployed address
#[tokio::test(flavor = "multi_thread")]
async fn test_predicted_address_matches_deployment() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();

    let config = SafeAccountConfig::new(vec![owner], 1)
        .unwrap()
        .with_fallback_handler(harness.config.addresses.fallback_handler);

    let factory = harness.factory();
    let predicted = factory
        .predict_address(&config, U256::from(1002))
        .await
        .expect("Failed to predict address");

    // Nothing deployed yet at the predicted address
    let code = harness.provider.get_code_at(predicted).await.unwrap();
    assert!(code.is_empty(), "Predicted address should be empty before deploy");

    let safe = factory
        .deploy(&config, U256::from(1002))
        .await
        .expect("Failed to deploy Safe");

    assert_eq!(safe.address(), predicted);
}

/// Test that different salt nonces yield different addresses
#[tokio::test(flavor = "multi_thread")]
async fn test_salt_nonce_changes_address() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();

    let config = SafeAccountConfig::new(vec![owner], 1)
        .unwrap()
        .with_fallback_handler(harness.config.addresses.fallback_handler);

    let factory = harness.factory();
    let addr1 = factory
        .predict_address(&config, U256::from(1))
        .await
        .unwrap();
    let addr2 = factory
        .predict_address(&config, U256::from(2))
        .await
        .unwrap();

    assert_ne!(addr1, addr2);
}

/// Test that the local CREATE2 computation agrees with the factory's own
/// answer via eth_call, for both salt derivations
#[tokio::test(flavor = "multi_thread")]
async fn test_local_prediction_matches_factory_call() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();

    let config = SafeAccountConfig::new(vec![owner], 1)
        .unwrap()
        .with_fallback_handler(harness.config.addresses.fallback_handler);

    let factory = harness.factory();
    let salt_nonce = U256::from(1004);

    let local = factory.predict_address(&config, salt_nonce).await.unwrap();
    let via_call = factory
        .predict_address_via_call(&config, salt_nonce)
        .await
        .unwrap();
    assert_eq!(local, via_call);

    let local = factory
        .predict_address_chain_specific(&config, salt_nonce)
        .await
        .unwrap();
    let via_call = factory
        .predict_address_chain_specific_via_call(&config, salt_nonce)
        .await
        .unwrap();
    assert_eq!(local, via_call);
}

/// Test deploying a 2-of-3 Safe
#[tokio::test(flavor = "multi_thread")]
async fn test_deploy_multi_owner_safe() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();
    let second = alloy::primitives::address!("0x2222222222222222222222222222222222222222");
    let third = alloy::primitives::address!("0x3333333333333333333333333333333333333333");

    let safe = harness
        .deploy_safe(vec![owner, second, third], 2, U256::from(1003))
        .await
        .expect("Failed to deploy Safe");

    assert_eq!(safe.threshold().await.unwrap(), 2);
    let owners = safe.owners().await.unwrap();
    assert_eq!(owners.len(), 3);
    assert!(owners.contains(&second));
}

/// Test that the chain-specific prediction differs from the standard one
#[tokio::test(flavor = "multi_thread")]
async fn test_chain_specific_prediction_differs() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();

    let config = SafeAccountConfig::new(vec![owner], 1)
        .unwrap()
        .with_fallback_handler(harness.config.addresses.fallback_handler);

    let factory = harness.factory();
    let standard = factory
        .predict_address(&config, U256::from(7))
        .await
        .unwrap();
    let chain_specific = factory
        .predict_address_chain_specific(&config, U256::from(7))
        .await
        .unwrap();

    assert_ne!(standard, chain_specific);
}
