//! Deterministic Safe deployment through the proxy factory
//!
//! The factory deploys Safe proxies via CREATE2, so the address of a Safe is
//! a pure function of its configuration and salt nonce. Prediction is done
//! locally with the factory's derivation formula; the deployed Safe is bound
//! to the predicted address rather than read back from the receipt.

use alloy::network::AnyNetwork;
use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use alloy::providers::Provider;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolCall;
use tracing::{debug, info};

use crate::chain::ChainConfig;
use crate::contracts::{ISafe, ISafeProxyFactory};
use crate::error::{translate_contract_error, Error, Result};
use crate::safe::Safe;
use crate::types::SafeAccountConfig;

/// Computes the CREATE2 salt used by `createProxyWithNonce`:
/// `keccak256(keccak256(initializer) ++ saltNonce)`
pub fn proxy_salt(initializer: &[u8], salt_nonce: U256) -> B256 {
    let initializer_hash = keccak256(initializer);

    let mut salt_input = [0u8; 64];
    salt_input[..32].copy_from_slice(initializer_hash.as_slice());
    salt_input[32..].copy_from_slice(&salt_nonce.to_be_bytes::<32>());

    keccak256(salt_input)
}

/// Computes the CREATE2 salt used by `createChainSpecificProxyWithNonce`,
/// which additionally mixes the chain id:
/// `keccak256(keccak256(initializer) ++ saltNonce ++ chainId)`
pub fn proxy_salt_chain_specific(initializer: &[u8], salt_nonce: U256, chain_id: u64) -> B256 {
    let initializer_hash = keccak256(initializer);

    let mut salt_input = [0u8; 96];
    salt_input[..32].copy_from_slice(initializer_hash.as_slice());
    salt_input[32..64].copy_from_slice(&salt_nonce.to_be_bytes::<32>());
    salt_input[64..].copy_from_slice(&U256::from(chain_id).to_be_bytes::<32>());

    keccak256(salt_input)
}

/// Computes the CREATE2 address for a Safe proxy:
/// ```text
/// init_code = proxyCreationCode ++ singleton_address_padded
/// address = keccak256(0xff ++ factory ++ salt ++ keccak256(init_code))[12:]
/// ```
pub fn compute_proxy_address(
    factory: Address,
    singleton: Address,
    creation_code: &[u8],
    salt: B256,
) -> Address {
    // init code is the creation bytecode with the singleton appended as the
    // single 32-byte-padded constructor argument
    let mut init_code = creation_code.to_vec();
    let mut singleton_padded = [0u8; 32];
    singleton_padded[12..].copy_from_slice(singleton.as_slice());
    init_code.extend_from_slice(&singleton_padded);

    let init_code_hash = keccak256(&init_code);

    let mut create2_input = Vec::with_capacity(1 + 20 + 32 + 32);
    create2_input.push(0xff);
    create2_input.extend_from_slice(factory.as_slice());
    create2_input.extend_from_slice(salt.as_slice());
    create2_input.extend_from_slice(init_code_hash.as_slice());

    let hash = keccak256(&create2_input);

    Address::from_slice(&hash[12..])
}

/// Encodes the `setup` call that initializes a freshly deployed proxy
pub fn encode_setup_call(config: &SafeAccountConfig) -> Bytes {
    let setup_call = ISafe::setupCall {
        _owners: config.owners.clone(),
        _threshold: U256::from(config.threshold),
        to: config.to,
        data: config.data.clone(),
        fallbackHandler: config.fallback_handler,
        paymentToken: config.payment_token,
        payment: config.payment,
        paymentReceiver: config.payment_receiver,
    };

    Bytes::from(setup_call.abi_encode())
}

/// Deploys new Safes through the chain's proxy factory.
pub struct SafeFactory<P> {
    /// The provider for RPC calls
    provider: P,
    /// Optional signer handed to Safes bound after deployment
    signer: Option<PrivateKeySigner>,
    /// Chain configuration
    config: ChainConfig,
}

impl<P> SafeFactory<P>
where
    P: Provider<AnyNetwork> + Clone + 'static,
{
    /// Creates a factory, auto-detecting the chain configuration
    pub async fn connect(provider: P, signer: Option<PrivateKeySigner>) -> Result<Self> {
        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| Error::Provider(e.to_string()))?;

        Ok(Self::with_config(provider, signer, ChainConfig::new(chain_id)))
    }

    /// Creates a factory with an explicit chain configuration
    pub fn with_config(provider: P, signer: Option<PrivateKeySigner>, config: ChainConfig) -> Self {
        Self {
            provider,
            signer,
            config,
        }
    }

    fn contract(&self) -> ISafeProxyFactory::ISafeProxyFactoryInstance<&P, AnyNetwork> {
        ISafeProxyFactory::new(self.config.addresses.proxy_factory, &self.provider)
    }

    async fn creation_code(&self) -> Result<Bytes> {
        self.contract()
            .proxyCreationCode()
            .call()
            .await
            .map_err(|e| Error::Fetch {
                what: "proxy creation code",
                reason: e.to_string(),
            })
    }

    /// Predicts the address of the Safe that `deploy` would produce for the
    /// given configuration and salt nonce.
    ///
    /// The prediction is computed locally with the factory's CREATE2
    /// derivation; only the proxy creation bytecode is fetched from chain.
    pub async fn predict_address(
        &self,
        config: &SafeAccountConfig,
        salt_nonce: U256,
    ) -> Result<Address> {
        let initializer = encode_setup_call(config);
        let creation_code = self.creation_code().await?;
        let salt = proxy_salt(&initializer, salt_nonce);

        Ok(compute_proxy_address(
            self.config.addresses.proxy_factory,
            self.config.addresses.safe_singleton,
            &creation_code,
            salt,
        ))
    }

    /// Predicts the chain-specific deployment address, matching
    /// `createChainSpecificProxyWithNonce`'s salt derivation
    pub async fn predict_address_chain_specific(
        &self,
        config: &SafeAccountConfig,
        salt_nonce: U256,
    ) -> Result<Address> {
        let initializer = encode_setup_call(config);
        let creation_code = self.creation_code().await?;
        let salt = proxy_salt_chain_specific(&initializer, salt_nonce, self.config.chain_id);

        Ok(compute_proxy_address(
            self.config.addresses.proxy_factory,
            self.config.addresses.safe_singleton,
            &creation_code,
            salt,
        ))
    }

    /// Predicts the deployment address by eth_calling
    /// `createProxyWithNonce` on the factory instead of computing CREATE2
    /// locally.
    ///
    /// Slower than [`predict_address`](SafeFactory::predict_address) but
    /// independent of the local derivation; useful as a cross-check against
    /// a factory whose formula is not known to match.
    pub async fn predict_address_via_call(
        &self,
        config: &SafeAccountConfig,
        salt_nonce: U256,
    ) -> Result<Address> {
        let initializer = encode_setup_call(config);

        self.contract()
            .createProxyWithNonce(
                self.config.addresses.safe_singleton,
                initializer,
                salt_nonce,
            )
            .call()
            .await
            .map_err(|e| Error::Fetch {
                what: "predicted proxy address",
                reason: e.to_string(),
            })
    }

    /// Call-based variant of
    /// [`predict_address_chain_specific`](SafeFactory::predict_address_chain_specific)
    pub async fn predict_address_chain_specific_via_call(
        &self,
        config: &SafeAccountConfig,
        salt_nonce: U256,
    ) -> Result<Address> {
        let initializer = encode_setup_call(config);

        self.contract()
            .createChainSpecificProxyWithNonce(
                self.config.addresses.safe_singleton,
                initializer,
                salt_nonce,
            )
            .call()
            .await
            .map_err(|e| Error::Fetch {
                what: "predicted proxy address",
                reason: e.to_string(),
            })
    }

    /// Deploys a new Safe via `createProxyWithNonce` and binds a [`Safe`]
    /// client to the predicted address
    pub async fn deploy(
        &self,
        config: &SafeAccountConfig,
        salt_nonce: U256,
    ) -> Result<Safe<P>> {
        let initializer = encode_setup_call(config);
        let predicted = self.predict_address(config, salt_nonce).await?;

        debug!(address = %predicted, owners = config.owners.len(), "deploying Safe");

        let pending = self
            .contract()
            .createProxyWithNonce(
                self.config.addresses.safe_singleton,
                initializer,
                salt_nonce,
            )
            .send()
            .await
            .map_err(translate_contract_error)?;

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| Error::Provider(e.to_string()))?;

        info!(address = %predicted, tx_hash = %receipt.transaction_hash, "Safe deployed");

        Safe::with_config(
            self.provider.clone(),
            self.signer.clone(),
            predicted,
            self.config.clone(),
        )
        .await
    }

    /// Deploys via `createChainSpecificProxyWithNonce`, producing an address
    /// unique to this chain
    pub async fn deploy_chain_specific(
        &self,
        config: &SafeAccountConfig,
        salt_nonce: U256,
    ) -> Result<Safe<P>> {
        let initializer = encode_setup_call(config);
        let predicted = self
            .predict_address_chain_specific(config, salt_nonce)
            .await?;

        debug!(address = %predicted, owners = config.owners.len(), "deploying chain-specific Safe");

        let pending = self
            .contract()
            .createChainSpecificProxyWithNonce(
                self.config.addresses.safe_singleton,
                initializer,
                salt_nonce,
            )
            .send()
            .await
            .map_err(translate_contract_error)?;

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| Error::Provider(e.to_string()))?;

        info!(address = %predicted, tx_hash = %receipt.transaction_hash, "Safe deployed");

        Safe::with_config(
            self.provider.clone(),
            self.signer.clone(),
            predicted,
            self.config.clone(),
        )
        .await
    }
}
