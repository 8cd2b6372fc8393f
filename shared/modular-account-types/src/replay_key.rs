//! Replay key and 2D nonce packing.
//!
//! A presented nonce is `key (192 bits) || sequence (64 bits)`. The key itself is
//! `validator (20 bytes) || discriminator (4 bytes)`, so every validator module owns its own
//! family of sequence streams and the owning validator can be read back from any nonce.

use core::fmt;

use alloy_primitives::{Address, U256};

pub const VALIDATOR_LEN: usize = 20;
pub const DISCRIMINATOR_LEN: usize = 4;
pub const KEY_LEN: usize = VALIDATOR_LEN + DISCRIMINATOR_LEN;
pub const SEQUENCE_BITS: usize = 64;

/// Identifier of one independent nonce stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReplayKey([u8; KEY_LEN]);

impl ReplayKey {
    pub fn new(validator: Address, discriminator: u32) -> Self {
        let mut key = [0u8; KEY_LEN];
        key[..VALIDATOR_LEN].copy_from_slice(validator.as_slice());
        key[VALIDATOR_LEN..].copy_from_slice(&discriminator.to_be_bytes());
        Self(key)
    }

    /// The validator module that owns this stream.
    pub fn validator(&self) -> Address {
        Address::from_slice(&self.0[..VALIDATOR_LEN])
    }

    pub fn discriminator(&self) -> u32 {
        let mut buf = [0u8; DISCRIMINATOR_LEN];
        buf.copy_from_slice(&self.0[VALIDATOR_LEN..]);
        u32::from_be_bytes(buf)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// The key as an integer (fits in the low 192 bits).
    pub fn to_u256(&self) -> U256 {
        U256::from_be_slice(&self.0)
    }

    /// Read a key from an integer. Returns `None` when bits above 192 are set.
    pub fn from_u256(value: U256) -> Option<Self> {
        if value >> (KEY_LEN * 8) != U256::ZERO {
            return None;
        }
        let word = value.to_be_bytes::<32>();
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&word[32 - KEY_LEN..]);
        Some(Self(key))
    }
}

impl fmt::Display for ReplayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.validator(), self.discriminator())
    }
}

/// Compose the 256-bit nonce a request presents.
pub fn pack_nonce(key: ReplayKey, sequence: u64) -> U256 {
    (key.to_u256() << SEQUENCE_BITS) | U256::from(sequence)
}

/// Split a presented nonce into its stream key and sequence number.
pub fn unpack_nonce(nonce: U256) -> (ReplayKey, u64) {
    let sequence = nonce.as_limbs()[0];
    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&nonce.to_be_bytes::<32>()[..KEY_LEN]);
    (ReplayKey(key), sequence)
}
