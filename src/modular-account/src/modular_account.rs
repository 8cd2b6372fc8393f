//! Stylus entrypoint: an ERC-7579 style modular account execution core.
//!
//! Validation and execution are separate calls, the way an ERC-4337 entry point drives an
//! account:
//! - `validateNonce` decodes a request and admits its nonce on the stream of the validator
//!   encoded in the key. It is the validation phase and commits on its own; a request that does
//!   not decode never touches the stream.
//! - `execute` runs a request admitted earlier in the same block. A strict failure reverts this
//!   call only, so the nonce admitted during validation stays consumed.
//!
//! Executor modules call `executeFromExecutor` directly and are gated by the registry.
//! Entry point and registry are fixed by the constructor at deployment.

use alloc::{string::String, vec::Vec};

use alloy_sol_types::sol;
use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{Address, FixedBytes, U256},
    prelude::*,
    stylus_proc::SolidityError,
};

use modular_account_types::{pack_nonce, unpack_nonce, ModeCode, ReplayKey};

use crate::{
    capability::supports_mode_code,
    dispatcher::CallResult,
    erc7579::constants::ACCOUNT_ID,
    errors::{ExecutionError, ReplayError, RequestError},
    host::onchain::{OnchainCallHost, OnchainRegistry},
    replay::NonceStore,
    request::Account,
};

sol! {
    error AlreadyInitialized(address account);
    error NotInitialized(address account);
    error InvalidConfiguration();
    error Unauthorized(address caller);
    error InvalidNonceKey(uint256 key);
    error UnsupportedExecutionMode(bytes32 mode);
    error MalformedExecutionCalldata();
    error ExecutionFailed(uint256 index, bytes reason);
    error NonceReused(uint256 key, uint64 expected, uint64 presented);
    error NonceOutOfOrder(uint256 key, uint64 expected, uint64 presented);
    error NonceExhausted(uint256 key);
    error ValidatorNotEnabled(address validator);
    error ExecutorNotEnabled(address executor);
    error RequestNotAdmitted(bytes32 digest);
}

#[derive(SolidityError)]
pub enum AccountError {
    AlreadyInitialized(AlreadyInitialized),
    NotInitialized(NotInitialized),
    InvalidConfiguration(InvalidConfiguration),
    Unauthorized(Unauthorized),
    InvalidNonceKey(InvalidNonceKey),
    UnsupportedExecutionMode(UnsupportedExecutionMode),
    MalformedExecutionCalldata(MalformedExecutionCalldata),
    ExecutionFailed(ExecutionFailed),
    NonceReused(NonceReused),
    NonceOutOfOrder(NonceOutOfOrder),
    NonceExhausted(NonceExhausted),
    ValidatorNotEnabled(ValidatorNotEnabled),
    ExecutorNotEnabled(ExecutorNotEnabled),
    RequestNotAdmitted(RequestNotAdmitted),
}

/// Map a dispatch failure to its revert. Unsupported modes echo the mode word back.
fn execution_error(mode: ModeCode, err: ExecutionError) -> AccountError {
    match err {
        ExecutionError::UnsupportedMode { .. } => {
            AccountError::UnsupportedExecutionMode(UnsupportedExecutionMode { mode: mode.0 })
        }
        ExecutionError::MalformedPayload(_) => {
            AccountError::MalformedExecutionCalldata(MalformedExecutionCalldata {})
        }
        ExecutionError::CallFailure { index, revert_data } => {
            AccountError::ExecutionFailed(ExecutionFailed {
                index: U256::from(index),
                reason: revert_data.into(),
            })
        }
    }
}

fn request_error(mode: ModeCode, err: RequestError) -> AccountError {
    match err {
        RequestError::Execution(err) => execution_error(mode, err),
        RequestError::Replay(err) => err.into(),
        RequestError::ExecutorNotEnabled(executor) => {
            AccountError::ExecutorNotEnabled(ExecutorNotEnabled { executor })
        }
    }
}

impl From<ReplayError> for AccountError {
    fn from(err: ReplayError) -> Self {
        match err {
            ReplayError::ValidatorNotEnabled(validator) => {
                Self::ValidatorNotEnabled(ValidatorNotEnabled { validator })
            }
            ReplayError::NonceReused {
                key,
                expected,
                presented,
            } => Self::NonceReused(NonceReused {
                key: key.to_u256(),
                expected,
                presented,
            }),
            ReplayError::NonceOutOfOrder {
                key,
                expected,
                presented,
            } => Self::NonceOutOfOrder(NonceOutOfOrder {
                key: key.to_u256(),
                expected,
                presented,
            }),
            ReplayError::NonceExhausted { key } => {
                Self::NonceExhausted(NonceExhausted { key: key.to_u256() })
            }
        }
    }
}

/// Pending admissions are stored as `block << 64 | count`; a count from an earlier block is stale.
const PENDING_COUNT_BITS: usize = 64;

fn pending_word(block: u64, count: u64) -> U256 {
    (U256::from(block) << PENDING_COUNT_BITS) | U256::from(count)
}

fn pending_count(word: U256, block: u64) -> u64 {
    if word >> PENDING_COUNT_BITS == U256::from(block) {
        word.as_limbs()[0]
    } else {
        0
    }
}

sol_storage! {
    /// Trusted relay and module registry, fixed at deployment.
    pub struct AccountConfig {
        address entry_point;
        address registry;
    }

    /// Next expected sequence per replay key (`uint192` key, stored widened).
    pub struct NonceBook {
        mapping(uint256 => uint256) sequences;
    }

    #[entrypoint]
    pub struct ModularAccount {
        AccountConfig config;
        NonceBook nonces;

        /// Requests admitted by `validateNonce` and not yet executed, by request digest.
        mapping(bytes32 => uint256) pending;
    }
}

#[public]
impl ModularAccount {
    #[constructor]
    pub fn constructor(
        &mut self,
        entry_point: Address,
        registry: Address,
    ) -> Result<(), AccountError> {
        if self.config.entry_point.get() != Address::ZERO {
            return Err(AccountError::AlreadyInitialized(AlreadyInitialized {
                account: self.vm().contract_address(),
            }));
        }
        if entry_point == Address::ZERO || registry == Address::ZERO {
            return Err(AccountError::InvalidConfiguration(InvalidConfiguration {}));
        }
        self.config.entry_point.set(entry_point);
        self.config.registry.set(registry);
        Ok(())
    }

    pub fn entry_point(&self) -> Address {
        self.config.entry_point.get()
    }

    pub fn registry(&self) -> Address {
        self.config.registry.get()
    }

    /// ERC-7579 account identifier.
    pub fn account_id(&self) -> String {
        String::from(ACCOUNT_ID)
    }

    /// ERC-7579 `supportsExecutionMode`.
    pub fn supports_execution_mode(&self, mode: FixedBytes<32>) -> bool {
        supports_mode_code(&ModeCode::from(mode))
    }

    /// Full nonce (`key || sequence`) the next request on `key` must present.
    pub fn get_nonce(&self, key: U256) -> Result<U256, AccountError> {
        let key = ReplayKey::from_u256(key)
            .ok_or(AccountError::InvalidNonceKey(InvalidNonceKey { key }))?;
        Ok(pack_nonce(key, self.nonces.sequence_of(key)))
    }

    /// Validation phase for one request. Entry point only.
    ///
    /// The request is decoded first; only a decodable request with a supported mode gets its
    /// nonce admitted and becomes executable in this block.
    pub fn validate_nonce(
        &mut self,
        nonce: U256,
        mode: FixedBytes<32>,
        execution_calldata: Bytes,
    ) -> Result<(), AccountError> {
        self.only_entry_point()?;
        let mode = ModeCode::from(mode);

        self.account()?
            .validate(mode, &execution_calldata, nonce)
            .map_err(|err| request_error(mode, err))?;
        self.record_admission(mode, &execution_calldata);

        let (key, sequence) = unpack_nonce(nonce);
        stylus_sdk::console!("admitted sequence {} on {}", sequence, key);
        Ok(())
    }

    /// ERC-7579 `execute`.
    ///
    /// The entry point may only run requests it validated in this block, once per admission.
    /// The account itself may call freely.
    #[payable]
    pub fn execute(
        &mut self,
        mode: FixedBytes<32>,
        execution_calldata: Bytes,
    ) -> Result<(Vec<bool>, Vec<Bytes>), AccountError> {
        let caller = self.vm().msg_sender();
        let mode = ModeCode::from(mode);

        if caller != self.vm().contract_address() {
            if caller != self.config.entry_point.get() {
                return Err(AccountError::Unauthorized(Unauthorized { caller }));
            }
            self.consume_admission(mode, &execution_calldata)?;
        }

        let results = self
            .account()?
            .execute(mode, &execution_calldata)
            .map_err(|err| request_error(mode, err))?;
        Ok(split_results(results))
    }

    /// ERC-7579 `executeFromExecutor`. Callable by executors the registry has enabled.
    #[payable]
    pub fn execute_from_executor(
        &mut self,
        mode: FixedBytes<32>,
        execution_calldata: Bytes,
    ) -> Result<(Vec<bool>, Vec<Bytes>), AccountError> {
        let executor = self.vm().msg_sender();
        let mode = ModeCode::from(mode);

        let results = self
            .account()?
            .execute_from_executor(executor, mode, &execution_calldata)
            .map_err(|err| request_error(mode, err))?;
        Ok(split_results(results))
    }
}

impl ModularAccount {
    fn only_entry_point(&self) -> Result<(), AccountError> {
        let caller = self.vm().msg_sender();
        if caller != self.config.entry_point.get() {
            return Err(AccountError::Unauthorized(Unauthorized { caller }));
        }
        Ok(())
    }

    /// The execution core over this account's storage and host.
    fn account(
        &mut self,
    ) -> Result<Account<OnchainCallHost<'_>, OnchainRegistry<'_>, &mut NonceBook>, AccountError> {
        let registry = self.config.onchain_registry()?;
        let host = OnchainCallHost::new(self.config.vm());
        Ok(Account::new(host, registry, &mut self.nonces))
    }

    fn request_digest(&self, mode: ModeCode, execution_calldata: &[u8]) -> FixedBytes<32> {
        let mut preimage = Vec::with_capacity(32 + execution_calldata.len());
        preimage.extend_from_slice(mode.as_bytes());
        preimage.extend_from_slice(execution_calldata);
        self.vm().native_keccak256(&preimage)
    }

    fn record_admission(&mut self, mode: ModeCode, execution_calldata: &[u8]) {
        let digest = self.request_digest(mode, execution_calldata);
        let block = self.vm().block_number();
        let count = pending_count(self.pending.get(digest), block);
        self.pending
            .insert(digest, pending_word(block, count.saturating_add(1)));
    }

    fn consume_admission(
        &mut self,
        mode: ModeCode,
        execution_calldata: &[u8],
    ) -> Result<(), AccountError> {
        let digest = self.request_digest(mode, execution_calldata);
        let block = self.vm().block_number();
        let count = pending_count(self.pending.get(digest), block);
        if count == 0 {
            return Err(AccountError::RequestNotAdmitted(RequestNotAdmitted { digest }));
        }
        self.pending.insert(digest, pending_word(block, count - 1));
        Ok(())
    }
}

impl AccountConfig {
    fn onchain_registry(&self) -> Result<OnchainRegistry<'_>, AccountError> {
        let registry = self.registry.get();
        if registry == Address::ZERO {
            return Err(AccountError::NotInitialized(NotInitialized {
                account: self.vm().contract_address(),
            }));
        }
        Ok(OnchainRegistry::new(self.vm(), registry))
    }
}

impl NonceStore for NonceBook {
    fn sequence_of(&self, key: ReplayKey) -> u64 {
        self.sequences.get(key.to_u256()).saturating_to::<u64>()
    }

    fn set_sequence(&mut self, key: ReplayKey, next: u64) {
        self.sequences.insert(key.to_u256(), U256::from(next));
    }
}

fn split_results(results: Vec<CallResult>) -> (Vec<bool>, Vec<Bytes>) {
    results
        .into_iter()
        .map(|r| (r.success, Bytes::from(r.return_data)))
        .unzip()
}

#[cfg(test)]
mod tests {
    use alloy_sol_types::{SolCall, SolValue};
    use modular_account_types::{
        encode_batch, encode_single, CallType, ExecType, Execution, ModeContext,
    };
    use stylus_sdk::testing::*;

    use super::*;
    use crate::{erc7579::interfaces::IModuleRegistry, test_support::set_value};

    const ACCOUNT: Address = Address::new([0xac; 20]);
    const ENTRY_POINT: Address = Address::new([0xe1; 20]);
    const REGISTRY: Address = Address::new([0x7e; 20]);
    const VALIDATOR: Address = Address::new([0xaa; 20]);
    const EXECUTOR: Address = Address::new([0xee; 20]);
    const TARGET: Address = Address::new([0x10; 20]);

    fn deployed(vm: &TestVM) -> ModularAccount {
        vm.set_contract_address(ACCOUNT);
        vm.set_block_number(100);
        let mut account = ModularAccount::from(vm);
        assert!(account.constructor(ENTRY_POINT, REGISTRY).is_ok());
        vm.set_sender(ENTRY_POINT);
        account
    }

    fn enable_validator(vm: &TestVM, validator: Address) {
        let query = IModuleRegistry::isValidatorEnabledCall { validator }.abi_encode();
        vm.mock_static_call(REGISTRY, query, Ok(true.abi_encode()));
    }

    fn enable_executor(vm: &TestVM, executor: Address) {
        let query = IModuleRegistry::isExecutorEnabledCall { executor }.abi_encode();
        vm.mock_static_call(REGISTRY, query, Ok(true.abi_encode()));
    }

    fn mode(call_type: CallType, exec_type: ExecType) -> FixedBytes<32> {
        ModeCode::encode(call_type, exec_type, ModeContext::ZERO).into()
    }

    fn key() -> ReplayKey {
        ReplayKey::new(VALIDATOR, 0)
    }

    fn next_sequence(account: &ModularAccount) -> u64 {
        match account.get_nonce(key().to_u256()) {
            Ok(nonce) => unpack_nonce(nonce).1,
            Err(_) => panic!("getNonce reverted"),
        }
    }

    fn expect_ok<T>(result: Result<T, AccountError>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => panic!("reverted with 0x{}", stylus_sdk::hex::encode(Vec::<u8>::from(err))),
        }
    }

    fn single(target: Address, data: Vec<u8>) -> Bytes {
        Bytes::from(encode_single(&Execution::new(target, U256::ZERO, data)))
    }

    #[test]
    fn constructor_is_one_shot() {
        let vm = TestVM::default();
        let mut account = deployed(&vm);

        assert_eq!(account.entry_point(), ENTRY_POINT);
        assert_eq!(account.registry(), REGISTRY);
        assert!(matches!(
            account.constructor(Address::new([0x66; 20]), Address::new([0x66; 20])),
            Err(AccountError::AlreadyInitialized(_))
        ));
        assert_eq!(account.entry_point(), ENTRY_POINT);
    }

    #[test]
    fn constructor_rejects_zero_addresses() {
        let vm = TestVM::default();
        let mut account = ModularAccount::from(&vm);

        assert!(matches!(
            account.constructor(Address::ZERO, REGISTRY),
            Err(AccountError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            account.constructor(ENTRY_POINT, Address::ZERO),
            Err(AccountError::InvalidConfiguration(_))
        ));
        assert_eq!(account.entry_point(), Address::ZERO);
    }

    #[test]
    fn unconfigured_account_cannot_validate() {
        let vm = TestVM::default();
        let mut account = ModularAccount::from(&vm);
        vm.set_sender(Address::ZERO);

        assert!(matches!(
            account.validate_nonce(
                pack_nonce(key(), 0),
                mode(CallType::SINGLE, ExecType::EXEC),
                single(TARGET, Vec::new())
            ),
            Err(AccountError::NotInitialized(_))
        ));
    }

    #[test]
    fn supports_execution_mode_follows_the_strategy_table() {
        let vm = TestVM::default();
        let account = ModularAccount::from(&vm);

        let mut word = [0u8; 32];
        word[0] = 0x02;
        word[1] = 0x02;
        word[31] = 0xff;
        assert!(account.supports_execution_mode(FixedBytes(word)));

        word[0] = 0x04;
        assert!(!account.supports_execution_mode(FixedBytes(word)));
    }

    #[test]
    fn get_nonce_reports_next_sequence_per_key() {
        let vm = TestVM::default();
        let mut account = deployed(&vm);

        assert!(matches!(account.get_nonce(key().to_u256()), Ok(n) if n == pack_nonce(key(), 0)));

        account.nonces.set_sequence(key(), 9);
        assert!(matches!(account.get_nonce(key().to_u256()), Ok(n) if n == pack_nonce(key(), 9)));

        let other = ReplayKey::new(Address::new([0xbb; 20]), 1);
        assert!(matches!(account.get_nonce(other.to_u256()), Ok(n) if n == pack_nonce(other, 0)));
    }

    #[test]
    fn get_nonce_rejects_oversized_key() {
        let vm = TestVM::default();
        let account = ModularAccount::from(&vm);
        assert!(matches!(
            account.get_nonce(U256::MAX),
            Err(AccountError::InvalidNonceKey(_))
        ));
    }

    #[test]
    fn only_entry_point_may_validate_or_execute() {
        let vm = TestVM::default();
        let mut account = deployed(&vm);
        enable_validator(&vm, VALIDATOR);
        let stranger = Address::new([0x55; 20]);
        vm.set_sender(stranger);

        assert!(matches!(
            account.validate_nonce(
                pack_nonce(key(), 0),
                mode(CallType::SINGLE, ExecType::EXEC),
                single(TARGET, Vec::new())
            ),
            Err(AccountError::Unauthorized(Unauthorized { caller })) if caller == stranger
        ));
        assert!(matches!(
            account.execute(mode(CallType::SINGLE, ExecType::EXEC), single(TARGET, Vec::new())),
            Err(AccountError::Unauthorized(_))
        ));
        assert_eq!(next_sequence(&account), 0);
    }

    #[test]
    fn validated_request_executes_once() {
        let vm = TestVM::default();
        let mut account = deployed(&vm);
        enable_validator(&vm, VALIDATOR);
        vm.mock_call(TARGET, set_value(7), Ok(vec![0x2a]));
        let m = mode(CallType::SINGLE, ExecType::EXEC);
        let payload = single(TARGET, set_value(7));

        expect_ok(account.validate_nonce(pack_nonce(key(), 0), m, payload.clone()));
        assert_eq!(next_sequence(&account), 1);

        let (success, data) = expect_ok(account.execute(m, payload.clone()));
        assert_eq!(success, vec![true]);
        assert_eq!(data, vec![Bytes::from(vec![0x2a])]);

        assert!(matches!(
            account.execute(m, payload),
            Err(AccountError::RequestNotAdmitted(_))
        ));
    }

    #[test]
    fn execute_without_admission_is_rejected() {
        let vm = TestVM::default();
        let mut account = deployed(&vm);
        enable_validator(&vm, VALIDATOR);
        let m = mode(CallType::SINGLE, ExecType::EXEC);

        expect_ok(account.validate_nonce(pack_nonce(key(), 0), m, single(TARGET, set_value(1))));

        // A different payload was never admitted.
        assert!(matches!(
            account.execute(m, single(TARGET, set_value(2))),
            Err(AccountError::RequestNotAdmitted(_))
        ));
    }

    #[test]
    fn admission_expires_with_its_block() {
        let vm = TestVM::default();
        let mut account = deployed(&vm);
        enable_validator(&vm, VALIDATOR);
        let m = mode(CallType::SINGLE, ExecType::EXEC);
        let payload = single(TARGET, set_value(1));

        expect_ok(account.validate_nonce(pack_nonce(key(), 0), m, payload.clone()));
        vm.set_block_number(101);

        assert!(matches!(
            account.execute(m, payload),
            Err(AccountError::RequestNotAdmitted(_))
        ));
    }

    #[test]
    fn identical_requests_admit_one_execution_each() {
        let vm = TestVM::default();
        let mut account = deployed(&vm);
        enable_validator(&vm, VALIDATOR);
        let m = mode(CallType::SINGLE, ExecType::EXEC);
        let payload = single(TARGET, set_value(3));

        expect_ok(account.validate_nonce(pack_nonce(key(), 0), m, payload.clone()));
        expect_ok(account.validate_nonce(pack_nonce(key(), 1), m, payload.clone()));

        expect_ok(account.execute(m, payload.clone()));
        expect_ok(account.execute(m, payload.clone()));
        assert!(account.execute(m, payload).is_err());
    }

    #[test]
    fn malformed_request_leaves_nonce_untouched() {
        let vm = TestVM::default();
        let mut account = deployed(&vm);
        enable_validator(&vm, VALIDATOR);

        assert!(matches!(
            account.validate_nonce(
                pack_nonce(key(), 0),
                mode(CallType::SINGLE, ExecType::EXEC),
                Bytes::from(vec![0u8; 5])
            ),
            Err(AccountError::MalformedExecutionCalldata(_))
        ));
        assert_eq!(next_sequence(&account), 0);
    }

    #[test]
    fn unsupported_mode_is_rejected_at_validation_with_the_mode_word() {
        let vm = TestVM::default();
        let mut account = deployed(&vm);
        enable_validator(&vm, VALIDATOR);

        let word = FixedBytes([0x09; 32]);
        assert!(matches!(
            account.validate_nonce(pack_nonce(key(), 0), word, single(TARGET, Vec::new())),
            Err(AccountError::UnsupportedExecutionMode(UnsupportedExecutionMode { mode })) if mode == word
        ));
        assert_eq!(next_sequence(&account), 0);
    }

    #[test]
    fn replayed_nonce_is_rejected() {
        let vm = TestVM::default();
        let mut account = deployed(&vm);
        enable_validator(&vm, VALIDATOR);
        let m = mode(CallType::SINGLE, ExecType::EXEC);

        expect_ok(account.validate_nonce(pack_nonce(key(), 0), m, single(TARGET, Vec::new())));

        assert!(matches!(
            account.validate_nonce(pack_nonce(key(), 0), m, single(TARGET, Vec::new())),
            Err(AccountError::NonceReused(NonceReused { expected: 1, presented: 0, .. }))
        ));
        assert!(matches!(
            account.validate_nonce(pack_nonce(key(), 5), m, single(TARGET, Vec::new())),
            Err(AccountError::NonceOutOfOrder(NonceOutOfOrder { expected: 1, presented: 5, .. }))
        ));
    }

    #[test]
    fn disabled_or_failing_registry_rejects_the_validator() {
        let vm = TestVM::default();
        let mut account = deployed(&vm);
        let m = mode(CallType::SINGLE, ExecType::EXEC);

        // No answer from the registry.
        assert!(matches!(
            account.validate_nonce(pack_nonce(key(), 0), m, single(TARGET, Vec::new())),
            Err(AccountError::ValidatorNotEnabled(ValidatorNotEnabled { validator })) if validator == VALIDATOR
        ));

        let query = IModuleRegistry::isValidatorEnabledCall { validator: VALIDATOR }.abi_encode();
        vm.mock_static_call(REGISTRY, query, Err(b"registry down".to_vec()));
        assert!(matches!(
            account.validate_nonce(pack_nonce(key(), 0), m, single(TARGET, Vec::new())),
            Err(AccountError::ValidatorNotEnabled(_))
        ));
        assert_eq!(next_sequence(&account), 0);
    }

    #[test]
    fn strict_failure_reports_index_and_reason() {
        let vm = TestVM::default();
        let mut account = deployed(&vm);
        enable_validator(&vm, VALIDATOR);
        vm.mock_call(TARGET, set_value(9), Err(b"no".to_vec()));
        let m = mode(CallType::SINGLE, ExecType::EXEC);
        let payload = single(TARGET, set_value(9));

        expect_ok(account.validate_nonce(pack_nonce(key(), 0), m, payload.clone()));

        assert!(matches!(
            account.execute(m, payload),
            Err(AccountError::ExecutionFailed(ExecutionFailed { index, reason }))
                if index == U256::ZERO && reason.to_vec() == b"no".to_vec()
        ));
        assert_eq!(next_sequence(&account), 1);
    }

    #[test]
    fn best_effort_batch_reports_every_call() {
        let vm = TestVM::default();
        let mut account = deployed(&vm);
        enable_validator(&vm, VALIDATOR);
        let reverter = Address::new([0x66; 20]);
        vm.mock_call(reverter, set_value(1), Err(b"no".to_vec()));
        vm.mock_call(TARGET, set_value(2), Ok(vec![0x01]));
        let m = mode(CallType::BATCH, ExecType::TRY_EXEC);
        let payload = Bytes::from(encode_batch(&[
            Execution::new(reverter, U256::ZERO, set_value(1)),
            Execution::new(TARGET, U256::ZERO, set_value(2)),
        ]));

        expect_ok(account.validate_nonce(pack_nonce(key(), 0), m, payload.clone()));
        let (success, data) = expect_ok(account.execute(m, payload));

        assert_eq!(success, vec![false, true]);
        assert_eq!(data[0].to_vec(), b"no".to_vec());
        assert_eq!(data[1].to_vec(), vec![0x01]);
    }

    #[test]
    fn account_may_execute_on_itself_without_admission() {
        let vm = TestVM::default();
        let mut account = deployed(&vm);
        vm.set_sender(ACCOUNT);

        let (success, _) =
            expect_ok(account.execute(mode(CallType::SINGLE, ExecType::EXEC), single(TARGET, Vec::new())));
        assert_eq!(success, vec![true]);
    }

    #[test]
    fn executor_path_is_gated_by_the_registry() {
        let vm = TestVM::default();
        let mut account = deployed(&vm);
        vm.mock_call(TARGET, set_value(4), Ok(vec![0x04]));
        let m = mode(CallType::SINGLE, ExecType::EXEC);
        vm.set_sender(EXECUTOR);

        assert!(matches!(
            account.execute_from_executor(m, single(TARGET, set_value(4))),
            Err(AccountError::ExecutorNotEnabled(ExecutorNotEnabled { executor })) if executor == EXECUTOR
        ));

        enable_executor(&vm, EXECUTOR);
        let (success, data) = expect_ok(account.execute_from_executor(m, single(TARGET, set_value(4))));
        assert_eq!(success, vec![true]);
        assert_eq!(data, vec![Bytes::from(vec![0x04])]);
    }

    #[test]
    fn pending_counts_go_stale_with_the_block() {
        let word = pending_word(7, 3);
        assert_eq!(pending_count(word, 7), 3);
        assert_eq!(pending_count(word, 8), 0);
        assert_eq!(pending_count(U256::ZERO, 0), 0);
        assert_eq!(pending_count(pending_word(u64::MAX, u64::MAX), u64::MAX), u64::MAX);
    }

    #[test]
    fn account_id_is_static() {
        let vm = TestVM::default();
        let account = ModularAccount::from(&vm);
        assert_eq!(account.account_id(), ACCOUNT_ID);
    }
}
