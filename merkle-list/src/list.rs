//! Lists whose only constrained state is a single hash-chain commitment.
//!
//! [`MerkleList`](merkle_list::MerkleList) supports stack-like mutation at
//! the front. [`MerkleListIterator`](merkle_list_iterator::MerkleListIterator)
//! walks a fixed sequence front to back without consuming it.

pub mod merkle_list;
pub mod merkle_list_iterator;
