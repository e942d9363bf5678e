//! The only way a provable list operation can fail: a witnessed value that
//! does not hash-chain to the commitment it is checked against.
//!
//! Such a failure means the circuit cannot be satisfied with the given
//! witness. Either the prover-only backing store was tampered with, or the
//! caller broke a precondition, _e.g._, by calling
//! [`pop_exn`](crate::MerkleList::pop_exn) on an empty list.

use std::error::Error;
use std::fmt::Display;

use triton_vm::prelude::Digest;

/// A failed equality assertion between two digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintViolation {
    /// Names the assertion that failed.
    pub context: &'static str,
    pub expected: Digest,
    pub actual: Digest,
}

/// The result type of every operation that asserts a constraint.
pub type ConstraintResult<T> = Result<T, ConstraintViolation>;

impl Display for ConstraintViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "constraint violated in `{}`: expected digest {}, got {}",
            self.context, self.expected, self.actual
        )
    }
}

impl Error for ConstraintViolation {}
