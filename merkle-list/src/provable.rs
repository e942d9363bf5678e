//! The circuit-building primitives the provable lists are written against.
//!
//! Circuit code has no native branching on values that are unknown at
//! circuit-construction time. Every conditional is expressed with [`select`],
//! which receives both fully-evaluated alternatives. Values that only the
//! prover knows enter through [`witness`] and must be checked by an explicit
//! assertion, _e.g._, [`assert_digest_eq`], before anything may rely on them.

use log::trace;
use log::warn;
use triton_vm::prelude::*;

use crate::error::ConstraintResult;
use crate::error::ConstraintViolation;

mod element;
mod unconstrained;

pub use element::ListElement;
pub use unconstrained::Unconstrained;

/// Pull a prover-supplied value into the constrained world.
///
/// Nothing about the returned value is proven. Callers must follow up with an
/// assertion that binds it to already-constrained data.
pub fn witness<T>(compute: impl FnOnce() -> T) -> T {
    trace!("witnessing {}", std::any::type_name::<T>());
    compute()
}

/// Branch-free selection: `if_true` if `condition` holds, else `if_false`.
pub fn select<T: ListElement>(condition: bool, if_true: T, if_false: T) -> T {
    T::select(condition, if_true, if_false)
}

/// Assert that two digests are equal.
///
/// The returned error is fatal to the current proof attempt.
pub fn assert_digest_eq(
    actual: Digest,
    expected: Digest,
    context: &'static str,
) -> ConstraintResult<()> {
    if actual == expected {
        return Ok(());
    }

    let violation = ConstraintViolation {
        context,
        expected,
        actual,
    };
    warn!("{violation}");
    Err(violation)
}
