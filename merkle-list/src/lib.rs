//! Dynamic-length lists for provable programs, committed to by a single
//! hash chain.
//!
//! A [`MerkleList`] keeps exactly one constrained value, its commitment
//! [`Digest`]. The elements themselves live in prover-only storage (see
//! [`Unconstrained`][provable::Unconstrained]) and are pulled back into the
//! constrained world one at a time, each read being checked against the
//! commitment. A [`MerkleListIterator`] replays a committed sequence front to
//! back without consuming it.
//!
//! ```
//! use merkle_list::prelude::*;
//!
//! let mut list = MerkleList::<BFieldElement>::empty();
//! list.push(bfe!(1));
//! list.push(bfe!(2));
//!
//! assert_eq!(bfe!(2), list.pop().unwrap());
//! assert_eq!(bfe!(1), list.pop().unwrap());
//! assert!(list.is_empty());
//! ```

use num_traits::ConstZero;
use triton_vm::prelude::*;

pub mod error;
pub mod hash_chain;
pub mod list;
pub mod prelude;
pub mod provable;

#[cfg(test)]
pub mod test_helpers;

// re-exports for types exposed in our public API
pub use triton_vm;
pub use triton_vm::twenty_first;

pub use crate::error::ConstraintResult;
pub use crate::error::ConstraintViolation;
pub use crate::list::merkle_list::MerkleList;
pub use crate::list::merkle_list_iterator::MerkleListIterator;

// The hasher type must match whatever algebraic hasher the VM is using
pub type VmHasher = Tip5;

/// The commitment to the empty sequence.
///
/// No honest hash-chain step produces the all-zero digest, so it can never be
/// confused with the commitment to a non-empty sequence.
pub const EMPTY_HASH: Digest = Digest([BFieldElement::ZERO; Digest::LEN]);

// This is needed for `#[derive(ListElement)]` macro to work consistently across crates.
// From inside the `merkle-list` crate, we need to refer to `merkle-list` by `crate`.
// However, from outside the `merkle-list` crate, we need to refer to it by `merkle_list`.
// The re-export below allows using identifier `merkle_list` even from inside `merkle-list`.
//
// See also:
// https://github.com/bkchr/proc-macro-crate/issues/2#issuecomment-572914520
extern crate self as merkle_list;
