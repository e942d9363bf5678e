//! The hash chain underlying every [`MerkleList`](crate::MerkleList) and
//! [`MerkleListIterator`](crate::MerkleListIterator).
//!
//! The commitment to a sequence `[e_0, e_1, …, e_{n-1}]` is built from the
//! back:
//!
//! ```text
//! next_hash(…next_hash(next_hash(EMPTY_HASH, e_{n-1}), e_{n-2})…, e_0)
//! ```
//!
//! so that a commitment always stands for "everything from the current
//! position to the end".

use itertools::Itertools;
use triton_vm::prelude::*;

use crate::VmHasher;
use crate::EMPTY_HASH;

/// One step of a hash chain, together with the commitment it extends.
///
/// `previous_hash` is the commitment that existed before `element` was
/// chained in. Holding both lets a single step be re-verified with one hash
/// evaluation, without the rest of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WithHash<T> {
    pub previous_hash: Digest,
    pub element: T,
}

/// The strategy that extends a running commitment by one element.
///
/// Must be deterministic and collision-resistant. Any `Fn(Digest, &T) -> Digest`
/// is a valid strategy.
pub trait NextHash<T> {
    fn next_hash(&self, hash: Digest, value: &T) -> Digest;

    /// The commitment to the empty sequence.
    fn empty_hash(&self) -> Digest {
        EMPTY_HASH
    }
}

impl<T, F> NextHash<T> for F
where
    F: Fn(Digest, &T) -> Digest,
{
    fn next_hash(&self, hash: Digest, value: &T) -> Digest {
        self(hash, value)
    }
}

/// The default hash-chain step:
/// `Tip5::hash_varlen(prefix ‖ hash ‖ encode(value))`.
///
/// The prefix is a digest derived from a caller-chosen string. Lists with
/// different prefixes never share commitments, even over identical data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MerkleListHash {
    prefix: Digest,
}

impl MerkleListHash {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix_digest(prefix),
        }
    }

    pub fn prefix(&self) -> Digest {
        self.prefix
    }
}

impl Default for MerkleListHash {
    fn default() -> Self {
        Self::with_prefix("")
    }
}

impl<T: BFieldCodec> NextHash<T> for MerkleListHash {
    fn next_hash(&self, hash: Digest, value: &T) -> Digest {
        let preimage = [
            self.prefix.values().to_vec(),
            hash.values().to_vec(),
            value.encode(),
        ]
        .concat();
        VmHasher::hash_varlen(&preimage)
    }
}

/// Map a domain-separation string to a digest.
pub fn prefix_digest(prefix: &str) -> Digest {
    let preimage = prefix
        .bytes()
        .map(|byte| BFieldElement::new(u64::from(byte)))
        .collect_vec();
    VmHasher::hash_varlen(&preimage)
}

/// Hash a single value under a domain-separation prefix, with no running
/// commitment involved.
pub fn generic_hash<T: BFieldCodec>(prefix: &str, value: &T) -> Digest {
    let preimage = [prefix_digest(prefix).values().to_vec(), value.encode()].concat();
    VmHasher::hash_varlen(&preimage)
}

/// Fold `next_hash` over `elements`, right to left.
///
/// Returns the backing data, where entry `i` holds `elements[i]` together with
/// the commitment to `elements[i+1..]`, and the commitment to all of
/// `elements`. The fold runs on the prover's side; nothing here is asserted.
pub fn with_hashes<T, H>(elements: Vec<T>, hasher: &H) -> (Vec<WithHash<T>>, Digest)
where
    H: NextHash<T> + ?Sized,
{
    let mut current_hash = hasher.empty_hash();
    let mut data = Vec::with_capacity(elements.len());
    for element in elements.into_iter().rev() {
        let previous_hash = current_hash;
        current_hash = hasher.next_hash(previous_hash, &element);
        data.push(WithHash {
            previous_hash,
            element,
        });
    }
    data.reverse();

    (data, current_hash)
}
