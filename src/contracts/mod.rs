//! Contract ABI definitions for Safe v1.4.1

use alloy::primitives::{address, b256, Address, B256};
use alloy::sol;

sol! {
    /// Safe v1.4.1 interface
    #[sol(rpc)]
    interface ISafe {
        /// Execute a transaction (requires threshold-of-N valid signatures)
        function execTransaction(
            address to,
            uint256 value,
            bytes calldata data,
            uint8 operation,
            uint256 safeTxGas,
            uint256 baseGas,
            uint256 gasPrice,
            address gasToken,
            address payable refundReceiver,
            bytes memory signatures
        ) external payable returns (bool success);

        /// Returns the current nonce of the Safe
        function nonce() external view returns (uint256 nonce);

        /// Returns the threshold (number of required signatures)
        function getThreshold() external view returns (uint256 threshold);

        /// Returns array of owners
        function getOwners() external view returns (address[] memory owners);

        /// Checks if an address is an owner
        function isOwner(address owner) external view returns (bool isOwner);

        /// Returns the contract version string
        function VERSION() external view returns (string memory);

        /// Returns the domain separator for EIP-712 signing
        function domainSeparator() external view returns (bytes32);

        /// Computes the hash of a Safe transaction
        function getTransactionHash(
            address to,
            uint256 value,
            bytes calldata data,
            uint8 operation,
            uint256 safeTxGas,
            uint256 baseGas,
            uint256 gasPrice,
            address gasToken,
            address refundReceiver,
            uint256 _nonce
        ) external view returns (bytes32);

        /// Reverts if the signatures are not valid for the given data hash
        function checkSignatures(
            bytes32 dataHash,
            bytes memory data,
            bytes memory signatures
        ) external view;

        /// Estimates the gas consumed by the inner Safe transaction
        function requiredTxGas(
            address to,
            uint256 value,
            bytes calldata data,
            uint8 operation
        ) external returns (uint256);

        /// Marks a transaction hash as approved by the calling owner
        function approveHash(bytes32 hashToApprove) external;

        /// Owner management
        function addOwnerWithThreshold(address owner, uint256 _threshold) external;
        function removeOwner(address prevOwner, address owner, uint256 _threshold) external;
        function swapOwner(address prevOwner, address oldOwner, address newOwner) external;
        function changeThreshold(uint256 _threshold) external;

        /// Module management
        function enableModule(address module) external;
        function disableModule(address prevModule, address module) external;
        function isModuleEnabled(address module) external view returns (bool);
        function getModulesPaginated(address start, uint256 pageSize)
            external view returns (address[] memory array, address next);

        /// Guard and fallback handler management
        function setGuard(address guard) external;
        function setFallbackHandler(address handler) external;

        /// Wraps a message hash into the Safe-specific EIP-712 message hash
        function getMessageHash(bytes memory message) external view returns (bytes32);

        /// EIP-1271 signature validation
        function isValidSignature(bytes32 _dataHash, bytes calldata _signature)
            external view returns (bytes4);

        /// Proxy initializer
        function setup(
            address[] calldata _owners,
            uint256 _threshold,
            address to,
            bytes calldata data,
            address fallbackHandler,
            address paymentToken,
            uint256 payment,
            address payable paymentReceiver
        ) external;

        /// Events
        event ExecutionSuccess(bytes32 indexed txHash, uint256 payment);
        event ExecutionFailure(bytes32 indexed txHash, uint256 payment);
        event SafeReceived(address indexed sender, uint256 value);
    }

    /// MultiSend interface for batching multiple calls
    #[sol(rpc)]
    interface IMultiSend {
        /// Sends multiple transactions in a single call
        /// @param transactions Packed encoding of transactions:
        ///        operation (1 byte) | to (20 bytes) | value (32 bytes) | data length (32 bytes) | data
        function multiSend(bytes memory transactions) external payable;
    }

    /// Safe proxy factory for deterministic deployments
    #[sol(rpc)]
    interface ISafeProxyFactory {
        /// Deploys a proxy at a CREATE2 address derived from the initializer and nonce
        function createProxyWithNonce(
            address _singleton,
            bytes memory initializer,
            uint256 saltNonce
        ) external returns (address proxy);

        /// Same derivation but additionally mixes the chain ID into the salt
        function createChainSpecificProxyWithNonce(
            address _singleton,
            bytes memory initializer,
            uint256 saltNonce
        ) external returns (address proxy);

        /// Returns the proxy creation bytecode
        function proxyCreationCode() external pure returns (bytes memory);

        event ProxyCreation(address indexed proxy, address singleton);
    }

    /// ERC20 interface for common token operations
    #[sol(rpc)]
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);

        event Transfer(address indexed from, address indexed to, uint256 value);
        event Approval(address indexed owner, address indexed spender, uint256 value);
    }

    /// ERC721 interface for NFT transfers
    #[sol(rpc)]
    interface IERC721 {
        function safeTransferFrom(address from, address to, uint256 tokenId) external;
        function ownerOf(uint256 tokenId) external view returns (address);
        function balanceOf(address owner) external view returns (uint256);

        event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);
    }
}

/// EIP-712 type hash for SafeTx struct
/// keccak256("SafeTx(address to,uint256 value,bytes data,uint8 operation,uint256 safeTxGas,uint256 baseGas,uint256 gasPrice,address gasToken,address refundReceiver,uint256 nonce)")
pub const SAFE_TX_TYPEHASH: B256 =
    b256!("bb8310d486368db6bd6f849402fdd73ad53d316b5a4b2644ad6efe0f941286d8");

/// EIP-712 domain type hash for Safe
/// keccak256("EIP712Domain(uint256 chainId,address verifyingContract)")
pub const DOMAIN_SEPARATOR_TYPEHASH: B256 =
    b256!("47e79534a245952e8b16893a336b85a3d9ea9fa8c573f3d803afb92a79469218");

/// Head and tail marker of the on-chain owners/modules linked lists
pub const SENTINEL_ADDRESS: Address = address!("0000000000000000000000000000000000000001");

/// Storage slot holding the guard address
/// keccak256("guard_manager.guard.address")
pub const GUARD_STORAGE_SLOT: B256 =
    b256!("4a204f620c8c5ccdca3fd54d003b6d13435454a733a569f8e4a6426ea62bf7a0");

/// Storage slot holding the fallback handler address
/// keccak256("fallback_manager.handler.address")
pub const FALLBACK_HANDLER_STORAGE_SLOT: B256 =
    b256!("6c9a6c4a39284e37ed1cf53d337577d14212a4870fb976a4366c693b939918d5");

/// Magic value returned by `isValidSignature` for valid EIP-1271 signatures
pub const EIP1271_MAGIC_VALUE: [u8; 4] = [0x16, 0x26, 0xba, 0x7e];
