//! Public key → owner EVM address.

use tracing::debug;

use crate::error::TransferError;
use crate::types::OwnerAddress;

pub use chain_eth::PUBLIC_KEY_LEN;

/// Derives the owner EVM address for a raw 64-byte secp256k1 public key.
///
/// The address is `keccak256(public_key)[12..]`, byte for byte what the EVM
/// side recovers from the owner's signatures. Keys of any other length fail
/// with [`TransferError::InvalidKeyLength`].
pub fn derive(public_key: &[u8]) -> Result<OwnerAddress, TransferError> {
    let owner = OwnerAddress::from_public_key(public_key)?;
    debug!(owner = %owner, "derived owner address");
    Ok(owner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{KeyGenerator, KeyPair, OsKeyGenerator};

    fn scalar_one() -> KeyPair {
        let mut private_key = [0u8; 32];
        private_key[31] = 1;
        KeyPair::from_private_key(&private_key).unwrap()
    }

    #[test]
    fn known_vector() {
        let owner = derive(scalar_one().public_key()).unwrap();
        assert_eq!(
            owner.to_string(),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
    }

    #[test]
    fn deterministic() {
        let pair = OsKeyGenerator.generate().unwrap();
        let first = derive(pair.public_key()).unwrap();
        for _ in 0..3 {
            assert_eq!(derive(pair.public_key()).unwrap(), first);
        }
    }

    #[test]
    fn distinct_key_pairs_give_distinct_owners() {
        let a = OsKeyGenerator.generate().unwrap();
        let b = OsKeyGenerator.generate().unwrap();
        assert_ne!(
            derive(a.public_key()).unwrap(),
            derive(b.public_key()).unwrap()
        );
    }

    #[test]
    fn wrong_lengths_are_rejected() {
        for len in [31usize, 33, 65] {
            match derive(&vec![0x02; len]) {
                Err(TransferError::InvalidKeyLength { expected, actual }) => {
                    assert_eq!(expected, PUBLIC_KEY_LEN);
                    assert_eq!(actual, len);
                }
                other => panic!("expected InvalidKeyLength for {len}, got {:?}", other),
            }
        }
    }
}
