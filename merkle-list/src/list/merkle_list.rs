use std::collections::VecDeque;

use log::debug;
use triton_vm::prelude::*;

use crate::error::ConstraintResult;
use crate::hash_chain::with_hashes;
use crate::hash_chain::MerkleListHash;
use crate::hash_chain::NextHash;
use crate::hash_chain::WithHash;
use crate::list::merkle_list_iterator::MerkleListIterator;
use crate::provable::assert_digest_eq;
use crate::provable::select;
use crate::provable::witness;
use crate::provable::ListElement;
use crate::provable::Unconstrained;

/// Dynamic-length list which is represented by a single hash.
///
/// Supported operations are [`push`](Self::push) and [`pop`](Self::pop) and
/// some variants thereof. Both act on the _front_ of the list: the element
/// popped next is always the one pushed last. This keeps the commitment equal
/// to the hash chain over "everything not yet popped", which is also what a
/// [`MerkleListIterator`] expects, so a list can be replayed with
/// [`start_iterating`](Self::start_iterating), starting from the last pushed
/// element.
///
/// The elements are kept in prover-only storage. Every element that leaves
/// the list is checked against the commitment.
///
/// ```
/// use merkle_list::prelude::*;
///
/// let mut list = MerkleList::<u64>::empty_with(MerkleListHash::with_prefix("deposits"));
/// list.push(100);
/// list.push_if(false, 200);
///
/// assert_eq!(100, list.pop_exn().unwrap());
/// assert!(list.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct MerkleList<T, H = MerkleListHash> {
    hash: Digest,
    data: Unconstrained<VecDeque<WithHash<T>>>,
    hasher: H,
}

impl<T: ListElement> MerkleList<T> {
    pub fn empty() -> Self {
        Self::empty_with(MerkleListHash::default())
    }

    /// A list whose first element is `elements[0]`.
    pub fn from_elements(elements: Vec<T>) -> Self {
        Self::from_elements_with(elements, MerkleListHash::default())
    }

    /// A list whose first element is the last of `elements`, _i.e._, the list
    /// obtained by pushing `elements` in order.
    pub fn from_reverse(elements: Vec<T>) -> Self {
        Self::from_reverse_with(elements, MerkleListHash::default())
    }
}

impl<T: ListElement, H: NextHash<T>> MerkleList<T, H> {
    pub fn empty_with(hasher: H) -> Self {
        Self {
            hash: hasher.empty_hash(),
            data: Unconstrained::default(),
            hasher,
        }
    }

    pub fn from_elements_with(elements: Vec<T>, hasher: H) -> Self {
        debug!("committing to list of {} elements", elements.len());
        let (data, hash) = with_hashes(elements, &hasher);
        Self {
            hash,
            data: Unconstrained::new(data.into()),
            hasher,
        }
    }

    pub fn from_reverse_with(mut elements: Vec<T>, hasher: H) -> Self {
        elements.reverse();
        Self::from_elements_with(elements, hasher)
    }

    /// The commitment to the list's content.
    pub fn hash(&self) -> Digest {
        self.hash
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn is_empty(&self) -> bool {
        self.hash == self.hasher.empty_hash()
    }

    /// The number of elements the prover believes are in the list. Not
    /// constrained.
    pub fn len_hint(&self) -> usize {
        self.data.as_prover(VecDeque::len)
    }

    /// Push a new element to the front of the list.
    pub fn push(&mut self, element: T) {
        let previous_hash = self.hash;
        self.hash = self.hasher.next_hash(previous_hash, &element);
        self.data.update_as_prover(|data| {
            data.push_front(WithHash {
                previous_hash,
                element,
            })
        });
    }

    /// Push a new element to the front of the list if `condition` holds.
    pub fn push_if(&mut self, condition: bool, element: T) {
        let previous_hash = self.hash;
        let pushed_hash = self.hasher.next_hash(previous_hash, &element);
        self.hash = select(condition, pushed_hash, previous_hash);
        self.data.update_as_prover(|data| {
            if condition {
                data.push_front(WithHash {
                    previous_hash,
                    element,
                });
            }
        });
    }

    /// The prover's claim about the first entry. The backing store is left
    /// untouched until the claim has been checked.
    fn head_witness(&self) -> WithHash<T> {
        let empty_hash = self.hasher.empty_hash();
        witness(|| {
            self.data
                .as_prover(|data| data.front().cloned())
                .unwrap_or_else(|| WithHash {
                    previous_hash: empty_hash,
                    element: T::dummy(),
                })
        })
    }

    fn drop_head_as_prover(&mut self) {
        self.data.update_as_prover(|data| {
            data.pop_front();
        });
    }

    /// Check the witnessed head against the commitment, tolerating an empty
    /// list. Returns the head (or a dummy) and the commitment after removing
    /// it.
    fn checked_head(&self, context: &'static str) -> ConstraintResult<(T, Digest)> {
        let WithHash {
            previous_hash,
            element,
        } = self.head_witness();
        let is_empty = self.is_empty();
        let empty_hash = self.hasher.empty_hash();

        let current_hash = self.hasher.next_hash(previous_hash, &element);
        let required_hash = select(is_empty, empty_hash, current_hash);
        assert_digest_eq(self.hash, required_hash, context)?;

        let remaining_hash = select(is_empty, empty_hash, previous_hash);
        Ok((select(is_empty, T::dummy(), element), remaining_hash))
    }

    /// Remove the first element from the list and return it.
    ///
    /// This proves that the list is non-empty, and fails otherwise. On failure,
    /// the list is left as it was.
    pub fn pop_exn(&mut self) -> ConstraintResult<T> {
        let WithHash {
            previous_hash,
            element,
        } = self.head_witness();

        let current_hash = self.hasher.next_hash(previous_hash, &element);
        assert_digest_eq(self.hash, current_hash, "MerkleList::pop_exn")?;

        self.hash = previous_hash;
        self.drop_head_as_prover();
        Ok(element)
    }

    /// Remove the first element from the list and return it.
    ///
    /// If the list is empty, returns a dummy element. Use
    /// [`is_empty`](Self::is_empty) beforehand if it matters whether the
    /// returned element is real. On failure, the list is left as it was.
    pub fn pop(&mut self) -> ConstraintResult<T> {
        let (element, remaining_hash) = self.checked_head("MerkleList::pop")?;
        self.hash = remaining_hash;
        self.drop_head_as_prover();
        Ok(element)
    }

    /// Return the first element, but only remove it if `condition` holds.
    ///
    /// If the list is empty, returns a dummy element. On failure, the list is
    /// left as it was.
    pub fn pop_if(&mut self, condition: bool) -> ConstraintResult<T> {
        let (element, remaining_hash) = self.checked_head("MerkleList::pop_if")?;
        self.hash = select(condition, remaining_hash, self.hash);
        self.data.update_as_prover(|data| {
            if condition {
                data.pop_front();
            }
        });
        Ok(element)
    }

    /// Start a traversal from the first element, leaving the list untouched.
    pub fn start_iterating(&self) -> MerkleListIterator<T, H>
    where
        H: Clone,
    {
        MerkleListIterator::start_iterating(self)
    }

    /// Start a traversal from past the last element, for walking the list
    /// backwards with [`previous`](MerkleListIterator::previous).
    pub fn start_iterating_from_last(&self) -> MerkleListIterator<T, H>
    where
        H: Clone,
    {
        MerkleListIterator::start_iterating_from_last(self)
    }

    /// Iterate through the list in exactly `length` steps and apply `callback`
    /// to each element and its index.
    ///
    /// Proves that the iteration traverses the entire list. Once past the last
    /// element, dummy elements are passed to the callback.
    pub fn iterate(
        &self,
        length: usize,
        mut callback: impl FnMut(T, usize),
    ) -> ConstraintResult<()>
    where
        H: Clone,
    {
        let mut iterator = self.start_iterating();
        for i in 0..length {
            callback(iterator.next()?, i);
        }
        iterator.assert_at_end()
    }

    pub(crate) fn backing_data(&self) -> &Unconstrained<VecDeque<WithHash<T>>> {
        &self.data
    }

    /// Direct access to the prover-only storage. Only meant for simulating a
    /// dishonest prover.
    #[cfg(test)]
    pub(crate) fn backing_data_mut(&mut self) -> &mut Unconstrained<VecDeque<WithHash<T>>> {
        &mut self.data
    }
}

/// Two lists are equal if their commitments are. The prover-only backing
/// data plays no part.
impl<T, H> PartialEq for MerkleList<T, H> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl<T, H> Eq for MerkleList<T, H> {}

impl<T: ListElement> From<Vec<T>> for MerkleList<T> {
    fn from(elements: Vec<T>) -> Self {
        Self::from_elements(elements)
    }
}

impl<T: ListElement> FromIterator<T> for MerkleList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_elements(iter.into_iter().collect())
    }
}

impl<T: ListElement> Default for MerkleList<T> {
    fn default() -> Self {
        Self::empty()
    }
}
