//! Re-exports the most commonly-needed APIs of this crate.
//!
//! This module is intended to be wildcard-imported, _i.e._, `use merkle_list::prelude::*;`.
//! You might also want to consider wildcard-importing the prelude of Triton VM, _i.e._,
//! `use merkle_list::triton_vm::prelude::*;`.

pub use triton_vm;
pub use triton_vm::twenty_first;

pub use crate::error::ConstraintResult;
pub use crate::error::ConstraintViolation;
pub use crate::hash_chain::MerkleListHash;
pub use crate::hash_chain::NextHash;
pub use crate::hash_chain::WithHash;
pub use crate::list::merkle_list::MerkleList;
pub use crate::list::merkle_list_iterator::MerkleListIterator;
pub use crate::provable::ListElement;
pub use crate::provable::Unconstrained;
pub use crate::triton_vm::prelude::bfe;
pub use crate::triton_vm::prelude::BFieldCodec;
pub use crate::triton_vm::prelude::BFieldElement;
pub use crate::triton_vm::prelude::Digest;
pub use crate::triton_vm::prelude::Tip5;
pub use crate::triton_vm::prelude::XFieldElement;
pub use crate::EMPTY_HASH;
