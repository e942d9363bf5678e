use std::cell::Cell;

use arbitrary::Arbitrary;

use crate::prelude::*;

/// A struct element with a derived [`ListElement`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, BFieldCodec, ListElement, Arbitrary)]
pub(crate) struct Payment {
    pub recipient: Digest,
    pub amount: u64,
    pub memo: BFieldElement,
}

/// The default hashing strategy that additionally counts its invocations.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CountingHash<'a> {
    calls: &'a Cell<usize>,
}

impl<'a> CountingHash<'a> {
    pub fn new(calls: &'a Cell<usize>) -> Self {
        Self { calls }
    }
}

impl<T: BFieldCodec> NextHash<T> for CountingHash<'_> {
    fn next_hash(&self, hash: Digest, value: &T) -> Digest {
        self.calls.set(self.calls.get() + 1);
        MerkleListHash::default().next_hash(hash, value)
    }
}

/// The default hashing strategy, but anchored at a non-zero empty hash.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AnchoredHash {
    anchor: Digest,
}

impl AnchoredHash {
    pub fn new(anchor: Digest) -> Self {
        Self { anchor }
    }
}

impl<T: BFieldCodec> NextHash<T> for AnchoredHash {
    fn next_hash(&self, hash: Digest, value: &T) -> Digest {
        MerkleListHash::default().next_hash(hash, value)
    }

    fn empty_hash(&self) -> Digest {
        self.anchor
    }
}
