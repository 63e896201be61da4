//! Safe client: accessors, transaction builders, signing and execution

use alloy::network::primitives::ReceiptResponse;
use alloy::network::AnyNetwork;
use alloy::primitives::{keccak256, Address, Bytes, TxHash, B256, U256};
use alloy::providers::Provider;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use alloy::sol_types::SolCall;
use tracing::debug;

use crate::chain::ChainConfig;
use crate::contracts::{
    IMultiSend, ISafe, IERC20, IERC721, EIP1271_MAGIC_VALUE, SENTINEL_ADDRESS,
};
use crate::contracts::{FALLBACK_HANDLER_STORAGE_SLOT, GUARD_STORAGE_SLOT};
use crate::encoding::{build_typed_data, encode_multisend};
use crate::error::{translate_contract_error, Error, Result};
use crate::signing::{eth_sign_adjust_v, sign_hash, SigningMethod};
use crate::types::{Operation, SafeTransaction, SafeTransactionData};

/// Page size used when walking the module linked list
const MODULE_PAGE_SIZE: u64 = 10;

/// Result of executing a Safe transaction
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Transaction hash
    pub tx_hash: TxHash,
    /// Whether the Safe transaction succeeded (not just inclusion)
    pub success: bool,
}

/// Resolves the predecessor of `target` in an on-chain singly-linked list
/// (owners or modules), given the full list in chain order.
///
/// Returns the sentinel address when the target is the list head.
pub fn previous_element(
    list: &[Address],
    target: Address,
    kind: &'static str,
) -> Result<Address> {
    let index = list
        .iter()
        .position(|&a| a == target)
        .ok_or(Error::NotFound {
            kind,
            address: target,
        })?;

    if index == 0 {
        Ok(SENTINEL_ADDRESS)
    } else {
        Ok(list[index - 1])
    }
}

/// Client bound to one deployed Safe smart account.
///
/// Every accessor performs one round trip to the chain; nothing is cached
/// between calls. Builder methods return an unsigned [`SafeTransaction`] and
/// never submit anything themselves; only
/// [`execute_transaction`](Safe::execute_transaction) and
/// [`approve_hash`](Safe::approve_hash) mutate chain state.
pub struct Safe<P> {
    /// The provider for RPC calls
    provider: P,
    /// Optional signer for Safe signatures
    signer: Option<PrivateKeySigner>,
    /// The Safe contract address
    address: Address,
    /// Chain configuration
    config: ChainConfig,
}

impl<P> Safe<P>
where
    P: Provider<AnyNetwork> + Clone + 'static,
{
    /// Connects to a deployed Safe, auto-detecting the chain configuration.
    ///
    /// Fails with [`Error::SafeNotDeployed`] if the target address hosts no
    /// contract code.
    pub async fn connect(
        provider: P,
        signer: Option<PrivateKeySigner>,
        address: Address,
    ) -> Result<Self> {
        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| Error::Provider(e.to_string()))?;

        Self::with_config(provider, signer, address, ChainConfig::new(chain_id)).await
    }

    /// Connects to a deployed Safe, verifying the provider is on the
    /// expected chain.
    pub async fn connect_expecting_chain(
        provider: P,
        signer: Option<PrivateKeySigner>,
        address: Address,
        expected_chain_id: u64,
    ) -> Result<Self> {
        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| Error::Provider(e.to_string()))?;

        if chain_id != expected_chain_id {
            return Err(Error::ChainIdMismatch {
                expected: expected_chain_id,
                actual: chain_id,
            });
        }

        Self::with_config(provider, signer, address, ChainConfig::new(chain_id)).await
    }

    /// Connects with an explicit chain configuration (custom contract
    /// addresses)
    pub async fn with_config(
        provider: P,
        signer: Option<PrivateKeySigner>,
        address: Address,
        config: ChainConfig,
    ) -> Result<Self> {
        let code = provider
            .get_code_at(address)
            .await
            .map_err(|e| Error::Fetch {
                what: "contract code",
                reason: e.to_string(),
            })?;
        if code.is_empty() {
            return Err(Error::SafeNotDeployed(address));
        }

        Ok(Self {
            provider,
            signer,
            address,
            config,
        })
    }

    /// Returns the Safe contract address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Returns the chain configuration
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Returns the configured signer address, if any
    pub fn signer_address(&self) -> Option<Address> {
        self.signer.as_ref().map(|s| s.address())
    }

    fn signer(&self) -> Result<&PrivateKeySigner> {
        self.signer.as_ref().ok_or(Error::NoSigner)
    }

    fn contract(&self) -> ISafe::ISafeInstance<&P, AnyNetwork> {
        ISafe::new(self.address, &self.provider)
    }

    /// Gets the ETH balance of the Safe
    pub async fn balance(&self) -> Result<U256> {
        self.provider
            .get_balance(self.address)
            .await
            .map_err(|e| Error::Fetch {
                what: "balance",
                reason: e.to_string(),
            })
    }

    /// Gets the current nonce of the Safe
    pub async fn nonce(&self) -> Result<U256> {
        self.contract().nonce().call().await.map_err(|e| Error::Fetch {
            what: "nonce",
            reason: e.to_string(),
        })
    }

    /// Gets the signature threshold of the Safe
    pub async fn threshold(&self) -> Result<u64> {
        let threshold = self
            .contract()
            .getThreshold()
            .call()
            .await
            .map_err(|e| Error::Fetch {
                what: "threshold",
                reason: e.to_string(),
            })?;
        Ok(threshold.to::<u64>())
    }

    /// Gets the owners of the Safe
    pub async fn owners(&self) -> Result<Vec<Address>> {
        self.contract()
            .getOwners()
            .call()
            .await
            .map_err(|e| Error::Fetch {
                what: "owners",
                reason: e.to_string(),
            })
    }

    /// Gets the contract version string
    pub async fn version(&self) -> Result<String> {
        self.contract()
            .VERSION()
            .call()
            .await
            .map_err(|e| Error::Fetch {
                what: "version",
                reason: e.to_string(),
            })
    }

    /// Checks if an address is an owner of the Safe
    pub async fn is_owner(&self, address: Address) -> Result<bool> {
        self.contract()
            .isOwner(address)
            .call()
            .await
            .map_err(|e| Error::Fetch {
                what: "is_owner",
                reason: e.to_string(),
            })
    }

    /// Gets all enabled modules by walking the paginated linked list.
    ///
    /// Traversal starts at the sentinel and stops when the returned cursor
    /// is the sentinel or the zero address.
    pub async fn modules(&self) -> Result<Vec<Address>> {
        let mut modules = Vec::new();
        let mut cursor = SENTINEL_ADDRESS;

        loop {
            let page = self
                .contract()
                .getModulesPaginated(cursor, U256::from(MODULE_PAGE_SIZE))
                .call()
                .await
                .map_err(|e| Error::Fetch {
                    what: "modules",
                    reason: e.to_string(),
                })?;

            modules.extend(page.array);

            if page.next == SENTINEL_ADDRESS || page.next == Address::ZERO {
                break;
            }
            cursor = page.next;
        }

        Ok(modules)
    }

    /// Checks if a module is enabled on the Safe
    pub async fn is_module_enabled(&self, module: Address) -> Result<bool> {
        self.contract()
            .isModuleEnabled(module)
            .call()
            .await
            .map_err(|e| Error::Fetch {
                what: "is_module_enabled",
                reason: e.to_string(),
            })
    }

    /// Gets the guard address, read from its reserved storage slot.
    ///
    /// Returns the zero address when no guard is set.
    pub async fn guard(&self) -> Result<Address> {
        self.read_address_slot(GUARD_STORAGE_SLOT, "guard").await
    }

    /// Gets the fallback handler address, read from its reserved storage slot
    pub async fn fallback_handler(&self) -> Result<Address> {
        self.read_address_slot(FALLBACK_HANDLER_STORAGE_SLOT, "fallback handler")
            .await
    }

    async fn read_address_slot(&self, slot: B256, what: &'static str) -> Result<Address> {
        let value = self
            .provider
            .get_storage_at(self.address, slot.into())
            .await
            .map_err(|e| Error::Fetch {
                what,
                reason: e.to_string(),
            })?;

        // Address occupies the low 20 bytes of the 32-byte slot
        Ok(Address::from_slice(&value.to_be_bytes::<32>()[12..]))
    }

    /// Gets the EIP-712 domain separator of the Safe
    pub async fn domain_separator(&self) -> Result<B256> {
        self.contract()
            .domainSeparator()
            .call()
            .await
            .map_err(|e| Error::Fetch {
                what: "domain separator",
                reason: e.to_string(),
            })
    }

    /// Wraps transaction data into a signable [`SafeTransaction`], resolving
    /// the nonce from the chain when unset.
    ///
    /// With an explicit nonce this completes without touching the network.
    pub async fn create_transaction(
        &self,
        mut data: SafeTransactionData,
    ) -> Result<SafeTransaction> {
        if data.nonce.is_none() {
            data.nonce = Some(self.nonce().await?);
        }
        Ok(SafeTransaction::new(data))
    }

    async fn create_self_call(&self, data: Vec<u8>) -> Result<SafeTransaction> {
        self.create_transaction(SafeTransactionData::new(
            self.address,
            U256::ZERO,
            data,
            Operation::Call,
        ))
        .await
    }

    /// Builds a transaction adding a new owner. Threshold defaults to the
    /// current on-chain threshold.
    pub async fn create_add_owner_transaction(
        &self,
        owner: Address,
        threshold: Option<u64>,
    ) -> Result<SafeTransaction> {
        let threshold = match threshold {
            Some(t) => t,
            None => self.threshold().await?,
        };

        let data = ISafe::addOwnerWithThresholdCall {
            owner,
            _threshold: U256::from(threshold),
        }
        .abi_encode();

        self.create_self_call(data).await
    }

    /// Builds a transaction removing an owner, resolving its predecessor in
    /// the on-chain owner list. Threshold defaults to the current on-chain
    /// threshold.
    pub async fn create_remove_owner_transaction(
        &self,
        owner: Address,
        threshold: Option<u64>,
    ) -> Result<SafeTransaction> {
        let threshold = match threshold {
            Some(t) => t,
            None => self.threshold().await?,
        };

        let owners = self.owners().await?;
        let prev_owner = previous_element(&owners, owner, "Owner")?;

        let data = ISafe::removeOwnerCall {
            prevOwner: prev_owner,
            owner,
            _threshold: U256::from(threshold),
        }
        .abi_encode();

        self.create_self_call(data).await
    }

    /// Builds a transaction replacing an existing owner with a new one
    pub async fn create_swap_owner_transaction(
        &self,
        old_owner: Address,
        new_owner: Address,
    ) -> Result<SafeTransaction> {
        let owners = self.owners().await?;
        let prev_owner = previous_element(&owners, old_owner, "Owner")?;

        let data = ISafe::swapOwnerCall {
            prevOwner: prev_owner,
            oldOwner: old_owner,
            newOwner: new_owner,
        }
        .abi_encode();

        self.create_self_call(data).await
    }

    /// Builds a transaction changing the signature threshold
    pub async fn create_change_threshold_transaction(
        &self,
        threshold: u64,
    ) -> Result<SafeTransaction> {
        let data = ISafe::changeThresholdCall {
            _threshold: U256::from(threshold),
        }
        .abi_encode();

        self.create_self_call(data).await
    }

    /// Builds a transaction enabling a module
    pub async fn create_enable_module_transaction(
        &self,
        module: Address,
    ) -> Result<SafeTransaction> {
        let data = ISafe::enableModuleCall { module }.abi_encode();
        self.create_self_call(data).await
    }

    /// Builds a transaction disabling a module, resolving its predecessor in
    /// the on-chain module list
    pub async fn create_disable_module_transaction(
        &self,
        module: Address,
    ) -> Result<SafeTransaction> {
        let modules = self.modules().await?;
        let prev_module = previous_element(&modules, module, "Module")?;

        let data = ISafe::disableModuleCall {
            prevModule: prev_module,
            module,
        }
        .abi_encode();

        self.create_self_call(data).await
    }

    /// Builds a transaction setting the guard
    pub async fn create_set_guard_transaction(&self, guard: Address) -> Result<SafeTransaction> {
        let data = ISafe::setGuardCall { guard }.abi_encode();
        self.create_self_call(data).await
    }

    /// Builds a transaction setting the fallback handler
    pub async fn create_set_fallback_handler_transaction(
        &self,
        handler: Address,
    ) -> Result<SafeTransaction> {
        let data = ISafe::setFallbackHandlerCall { handler }.abi_encode();
        self.create_self_call(data).await
    }

    /// Builds an ERC20 transfer from the Safe
    pub async fn create_erc20_transfer_transaction(
        &self,
        token: Address,
        to: Address,
        amount: U256,
    ) -> Result<SafeTransaction> {
        let data = IERC20::transferCall { to, amount }.abi_encode();

        self.create_transaction(SafeTransactionData::new(
            token,
            U256::ZERO,
            data,
            Operation::Call,
        ))
        .await
    }

    /// Builds an ERC721 transfer from the Safe (`safeTransferFrom`)
    pub async fn create_erc721_transfer_transaction(
        &self,
        token: Address,
        to: Address,
        token_id: U256,
    ) -> Result<SafeTransaction> {
        let data = IERC721::safeTransferFromCall {
            from: self.address,
            to,
            tokenId: token_id,
        }
        .abi_encode();

        self.create_transaction(SafeTransactionData::new(
            token,
            U256::ZERO,
            data,
            Operation::Call,
        ))
        .await
    }

    /// Builds a native ETH transfer from the Safe
    pub async fn create_native_transfer_transaction(
        &self,
        to: Address,
        amount: U256,
    ) -> Result<SafeTransaction> {
        self.create_transaction(SafeTransactionData::new(
            to,
            amount,
            Bytes::new(),
            Operation::Call,
        ))
        .await
    }

    /// Builds a rejection: an empty self-call pinned to the given nonce,
    /// spending it to invalidate a pending transaction
    pub async fn create_rejection_transaction(&self, nonce: U256) -> Result<SafeTransaction> {
        self.create_transaction(
            SafeTransactionData::new(self.address, U256::ZERO, Bytes::new(), Operation::Call)
                .with_nonce(nonce),
        )
        .await
    }

    /// Builds a MultiSend batch: the sub-calls are packed into one blob and
    /// executed atomically via a DelegateCall to the MultiSend contract.
    ///
    /// Each sub-call keeps its own operation flag, independent of the
    /// DelegateCall on this wrapping transaction.
    pub async fn create_multi_send_transaction(
        &self,
        transactions: &[SafeTransactionData],
    ) -> Result<SafeTransaction> {
        let encoded = encode_multisend(transactions);
        let data = IMultiSend::multiSendCall {
            transactions: encoded,
        }
        .abi_encode();

        self.create_transaction(SafeTransactionData::new(
            self.config.addresses.multi_send,
            U256::ZERO,
            data,
            Operation::DelegateCall,
        ))
        .await
    }

    /// Signs a Safe transaction with the configured signer and stores the
    /// signature on the transaction.
    ///
    /// `Eip712` signs the locally computed typed-data hash; `EthSign` signs
    /// the contract-reported transaction hash as a personal message and
    /// shifts the recovery id by 4.
    pub async fn sign_transaction(
        &self,
        transaction: &mut SafeTransaction,
        method: SigningMethod,
    ) -> Result<()> {
        let signer = self.signer()?;

        let signature = match method {
            SigningMethod::Eip712 => {
                let (message, domain) =
                    build_typed_data(&transaction.data, self.config.chain_id, self.address);
                let hash = alloy::sol_types::SolStruct::eip712_signing_hash(&message, &domain);
                sign_hash(signer, hash).await?
            }
            SigningMethod::EthSign => {
                let hash = self.transaction_hash(transaction).await?;
                let signature = signer
                    .sign_message(hash.as_slice())
                    .await
                    .map_err(|e| Error::Signing(e.to_string()))?;
                eth_sign_adjust_v(&signature.as_bytes())?
            }
        };

        transaction.add_signature(signer.address(), signature);
        Ok(())
    }

    /// Gets the transaction hash as computed by the Safe contract itself
    pub async fn transaction_hash(&self, transaction: &SafeTransaction) -> Result<B256> {
        let data = &transaction.data;
        self.contract()
            .getTransactionHash(
                data.to,
                data.value,
                data.data.clone(),
                data.operation.as_u8(),
                data.safe_tx_gas,
                data.base_gas,
                data.gas_price,
                data.gas_token,
                data.refund_receiver,
                data.nonce_or_zero(),
            )
            .call()
            .await
            .map_err(|e| Error::Fetch {
                what: "transaction hash",
                reason: e.to_string(),
            })
    }

    /// Approves a transaction hash on-chain, enabling the pre-validated
    /// signature convention for the sending owner
    pub async fn approve_hash(&self, hash: B256) -> Result<TxHash> {
        let pending = self
            .contract()
            .approveHash(hash)
            .send()
            .await
            .map_err(translate_contract_error)?;

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| Error::Provider(e.to_string()))?;

        debug!(tx_hash = %receipt.transaction_hash, %hash, "approved Safe transaction hash");
        Ok(receipt.transaction_hash)
    }

    /// Executes a Safe transaction with its collected signatures.
    ///
    /// Signatures are concatenated in ascending owner-address order as the
    /// contract requires. Revert reasons matching a known GS code are
    /// translated to readable messages.
    pub async fn execute_transaction(
        &self,
        transaction: &SafeTransaction,
    ) -> Result<ExecutionResult> {
        let data = &transaction.data;
        let signatures = transaction.sorted_signatures();

        debug!(
            to = %data.to,
            value = %data.value,
            signatures = transaction.signature_count(),
            "executing Safe transaction"
        );

        let pending = self
            .contract()
            .execTransaction(
                data.to,
                data.value,
                data.data.clone(),
                data.operation.as_u8(),
                data.safe_tx_gas,
                data.base_gas,
                data.gas_price,
                data.gas_token,
                data.refund_receiver,
                signatures,
            )
            .send()
            .await
            .map_err(translate_contract_error)?;

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| Error::Provider(e.to_string()))?;

        Ok(ExecutionResult {
            tx_hash: receipt.transaction_hash,
            success: receipt.status(),
        })
    }

    /// Dry-runs a Safe transaction via eth_call.
    ///
    /// Advisory check: any failure, including a simulated revert, collapses
    /// to `false` rather than an error.
    pub async fn simulate_transaction(&self, transaction: &SafeTransaction) -> bool {
        let data = &transaction.data;

        match self
            .contract()
            .execTransaction(
                data.to,
                data.value,
                data.data.clone(),
                data.operation.as_u8(),
                data.safe_tx_gas,
                data.base_gas,
                data.gas_price,
                data.gas_token,
                data.refund_receiver,
                transaction.sorted_signatures(),
            )
            .call()
            .await
        {
            Ok(success) => success,
            Err(e) => {
                debug!(reason = %e, "Safe transaction simulation failed");
                false
            }
        }
    }

    /// Estimates the gas consumed by the inner Safe transaction
    pub async fn estimate_transaction_gas(&self, transaction: &SafeTransaction) -> Result<U256> {
        let data = &transaction.data;
        self.contract()
            .requiredTxGas(
                data.to,
                data.value,
                data.data.clone(),
                data.operation.as_u8(),
            )
            .call()
            .await
            .map_err(|e| Error::Fetch {
                what: "gas estimate",
                reason: e.to_string(),
            })
    }

    /// Asks the contract to validate the collected signatures against the
    /// transaction hash; errors if they do not meet the threshold
    pub async fn check_signatures(&self, transaction: &SafeTransaction) -> Result<()> {
        let hash = self.transaction_hash(transaction).await?;

        self.contract()
            .checkSignatures(
                hash,
                transaction.data.data.clone(),
                transaction.sorted_signatures(),
            )
            .call()
            .await
            .map_err(translate_contract_error)?;

        Ok(())
    }

    /// Computes the Safe-specific message hash: keccak of the raw message
    /// wrapped by the contract's `getMessageHash`
    pub async fn message_hash(&self, message: impl AsRef<[u8]>) -> Result<B256> {
        let raw_hash = keccak256(message.as_ref());

        self.contract()
            .getMessageHash(Bytes::from(raw_hash.to_vec()))
            .call()
            .await
            .map_err(|e| Error::Fetch {
                what: "message hash",
                reason: e.to_string(),
            })
    }

    /// Signs a message (EIP-191 personal sign of the Safe message hash)
    pub async fn sign_message(&self, message: impl AsRef<[u8]>) -> Result<Bytes> {
        let signer = self.signer()?;
        let hash = self.message_hash(message).await?;

        let signature = signer
            .sign_message(hash.as_slice())
            .await
            .map_err(|e| Error::Signing(e.to_string()))?;

        Ok(Bytes::from(signature.as_bytes().to_vec()))
    }

    /// Checks a signature against the Safe via EIP-1271.
    ///
    /// Returns `true` only when the contract replies with the magic value;
    /// any other reply or call failure yields `false`.
    pub async fn is_valid_signature(&self, message_hash: B256, signature: &Bytes) -> bool {
        match self
            .contract()
            .isValidSignature(message_hash, signature.clone())
            .call()
            .await
        {
            Ok(magic) => magic.as_slice() == EIP1271_MAGIC_VALUE,
            Err(e) => {
                debug!(reason = %e, "isValidSignature call failed");
                false
            }
        }
    }
}
