//! Per-validator replay protection.
//!
//! Every [`ReplayKey`] owns an independent sequence stream. A request is admitted only when the
//! validator embedded in its key is enabled and its sequence equals the next expected value for
//! that key; admission advances the stream by exactly one. Streams are never rolled back by this
//! module, whatever happens to the request afterwards.

use alloc::collections::BTreeMap;
use core::cmp::Ordering;
use std::sync::{Mutex, PoisonError};

use alloy_primitives::U256;
use modular_account_types::{unpack_nonce, ModuleRegistry, ReplayKey};

use crate::errors::ReplayError;

/// Storage of the next expected sequence per key. Unknown keys start at zero.
pub trait NonceStore {
    fn sequence_of(&self, key: ReplayKey) -> u64;

    fn set_sequence(&mut self, key: ReplayKey, next: u64);
}

impl<T: NonceStore + ?Sized> NonceStore for &mut T {
    fn sequence_of(&self, key: ReplayKey) -> u64 {
        (**self).sequence_of(key)
    }

    fn set_sequence(&mut self, key: ReplayKey, next: u64) {
        (**self).set_sequence(key, next)
    }
}

/// Result of a successful admission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Admission {
    pub key: ReplayKey,
    pub sequence: u64,
}

/// Compare a presented sequence with the expected one and return the next expected value.
fn next_sequence(key: ReplayKey, expected: u64, presented: u64) -> Result<u64, ReplayError> {
    match presented.cmp(&expected) {
        Ordering::Less => Err(ReplayError::NonceReused {
            key,
            expected,
            presented,
        }),
        Ordering::Greater => Err(ReplayError::NonceOutOfOrder {
            key,
            expected,
            presented,
        }),
        Ordering::Equal => expected
            .checked_add(1)
            .ok_or(ReplayError::NonceExhausted { key }),
    }
}

/// Admit `presented` on `key`, advancing the stream on success.
pub fn admit<S, R>(
    store: &mut S,
    registry: &R,
    key: ReplayKey,
    presented: u64,
) -> Result<Admission, ReplayError>
where
    S: NonceStore + ?Sized,
    R: ModuleRegistry + ?Sized,
{
    let validator = key.validator();
    if !registry.is_validator_enabled(validator) {
        return Err(ReplayError::ValidatorNotEnabled(validator));
    }

    let expected = store.sequence_of(key);
    let next = next_sequence(key, expected, presented)?;
    store.set_sequence(key, next);

    Ok(Admission {
        key,
        sequence: presented,
    })
}

/// [`admit`] for a packed 256-bit nonce.
pub fn admit_nonce<S, R>(store: &mut S, registry: &R, nonce: U256) -> Result<Admission, ReplayError>
where
    S: NonceStore + ?Sized,
    R: ModuleRegistry + ?Sized,
{
    let (key, sequence) = unpack_nonce(nonce);
    admit(store, registry, key, sequence)
}

/// Nonce streams held in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryNonceStore {
    streams: BTreeMap<ReplayKey, u64>,
}

impl MemoryNonceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

impl NonceStore for MemoryNonceStore {
    fn sequence_of(&self, key: ReplayKey) -> u64 {
        self.streams.get(&key).copied().unwrap_or_default()
    }

    fn set_sequence(&mut self, key: ReplayKey, next: u64) {
        self.streams.insert(key, next);
    }
}

/// Replay gate that can be shared between threads.
///
/// The lookup, comparison and advance for an admission all happen under one lock, so two
/// admissions presenting the same sequence on the same key cannot both succeed.
#[derive(Debug, Default)]
pub struct SharedReplayGate {
    store: Mutex<MemoryNonceStore>,
}

impl SharedReplayGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admit<R: ModuleRegistry + ?Sized>(
        &self,
        registry: &R,
        key: ReplayKey,
        presented: u64,
    ) -> Result<Admission, ReplayError> {
        // `admit` writes at most once, after every check, so a poisoned map is still consistent.
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        admit(&mut *store, registry, key, presented)
    }

    pub fn sequence_of(&self, key: ReplayKey) -> u64 {
        self.store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .sequence_of(key)
    }
}
