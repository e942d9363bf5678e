use triton_vm::prelude::*;

use crate::error::ConstraintResult;
use crate::hash_chain::with_hashes;
use crate::hash_chain::MerkleListHash;
use crate::hash_chain::NextHash;
use crate::hash_chain::WithHash;
use crate::list::merkle_list::MerkleList;
use crate::provable::assert_digest_eq;
use crate::provable::select;
use crate::provable::witness;
use crate::provable::ListElement;
use crate::provable::Unconstrained;

/// Read-only traversal of a fixed, committed sequence, front to back or back
/// to front.
///
/// Two commitments are maintained:
/// - one to the entire sequence, to be able to prove where iteration starts,
///   and
/// - one to the sequence from the current position until the end, to
///   efficiently step forward.
///
/// If the current position is the start, the second commitment equals the
/// first. Once the iterator is exhausted, it equals the
/// [empty hash](NextHash::empty_hash).
///
/// Calling [`next`](Self::next) past the end is safe and keeps returning
/// dummy elements, so circuits of fixed shape can iterate a fixed number of
/// times regardless of the actual length. To prove that the whole sequence
/// was visited, finish with [`assert_at_end`](Self::assert_at_end).
#[derive(Debug, Clone)]
pub struct MerkleListIterator<T, H = MerkleListHash> {
    data: Unconstrained<Vec<WithHash<T>>>,
    hash: Digest,

    current_hash: Digest,

    /// The index of the element returned by the next call to `next()`.
    current_index: Unconstrained<usize>,

    hasher: H,
}

impl<T: ListElement> MerkleListIterator<T> {
    pub fn from_elements(elements: Vec<T>) -> Self {
        Self::from_elements_with(elements, MerkleListHash::default())
    }

    pub fn empty() -> Self {
        Self::from_elements(vec![])
    }
}

impl<T: ListElement, H: NextHash<T>> MerkleListIterator<T, H> {
    pub fn from_elements_with(elements: Vec<T>, hasher: H) -> Self {
        let (data, hash) = with_hashes(elements, &hasher);
        Self {
            data: Unconstrained::new(data),
            hash,
            current_hash: hash,
            current_index: Unconstrained::new(0),
            hasher,
        }
    }

    pub fn empty_with(hasher: H) -> Self {
        Self::from_elements_with(vec![], hasher)
    }

    /// An iterator positioned at the first element of `list`.
    pub fn start_iterating(list: &MerkleList<T, H>) -> Self
    where
        H: Clone,
    {
        let data = list
            .backing_data()
            .as_prover(|data| data.iter().cloned().collect());

        Self {
            data: Unconstrained::new(data),
            hash: list.hash(),
            current_hash: list.hash(),
            current_index: Unconstrained::new(0),
            hasher: list.hasher().clone(),
        }
    }

    /// An iterator positioned past the last element of `list`, for walking it
    /// backwards with [`previous`](Self::previous).
    pub fn start_iterating_from_last(list: &MerkleList<T, H>) -> Self
    where
        H: Clone,
    {
        let mut iterator = Self::start_iterating(list);
        iterator.jump_to_end();
        iterator
    }

    /// The commitment to the entire sequence.
    pub fn hash(&self) -> Digest {
        self.hash
    }

    /// The commitment to the not-yet-visited rest of the sequence.
    pub fn current_hash(&self) -> Digest {
        self.current_hash
    }

    /// The prover's view of the current position. Not constrained.
    pub fn position_hint(&self) -> usize {
        self.current_index.as_prover(|&index| index)
    }

    fn len_hint(&self) -> usize {
        self.data.as_prover(Vec::len)
    }

    pub fn is_at_start(&self) -> bool {
        self.current_hash == self.hash
    }

    pub fn assert_at_start(&self) -> ConstraintResult<()> {
        assert_digest_eq(
            self.current_hash,
            self.hash,
            "MerkleListIterator::assert_at_start",
        )
    }

    pub fn is_at_end(&self) -> bool {
        self.current_hash == self.hasher.empty_hash()
    }

    pub fn assert_at_end(&self) -> ConstraintResult<()> {
        assert_digest_eq(
            self.current_hash,
            self.hasher.empty_hash(),
            "MerkleListIterator::assert_at_end",
        )
    }

    pub fn jump_to_end(&mut self) {
        let length = self.len_hint();
        self.current_index.set(length);
        self.current_hash = self.hasher.empty_hash();
    }

    pub fn jump_to_end_if(&mut self, condition: bool) {
        let length = self.len_hint();
        self.current_index.update_as_prover(|index| {
            if condition {
                *index = length;
            }
        });
        self.current_hash = select(condition, self.hasher.empty_hash(), self.current_hash);
    }

    pub fn jump_to_start(&mut self) {
        self.current_index.set(0);
        self.current_hash = self.hash;
    }

    pub fn jump_to_start_if(&mut self, condition: bool) {
        self.current_index.update_as_prover(|index| {
            if condition {
                *index = 0;
            }
        });
        self.current_hash = select(condition, self.hash, self.current_hash);
    }

    /// Return the current element and move forward by one step.
    ///
    /// A dummy element is returned if the iterator is past the end.
    pub fn next(&mut self) -> ConstraintResult<T> {
        let (element, is_dummy) = self.next_with_dummy_flag()?;
        Ok(select(is_dummy, T::dummy(), element))
    }

    /// Version of [`next`](Self::next) which doesn't guarantee anything about
    /// the returned element in case the iterator is past the end.
    ///
    /// Instead, the `is_dummy` flag is also returned so that this case can be
    /// handled in a custom way.
    pub fn next_with_dummy_flag(&mut self) -> ConstraintResult<(T, bool)> {
        let empty_hash = self.hasher.empty_hash();
        let index = self.position_hint();
        let WithHash {
            previous_hash,
            element,
        } = witness(|| {
            self.data
                .as_prover(|data| data.get(index).cloned())
                .unwrap_or_else(|| WithHash {
                    previous_hash: empty_hash,
                    element: T::dummy(),
                })
        });

        let is_dummy = self.is_at_end();
        let correct_hash = self.hasher.next_hash(previous_hash, &element);
        let required_hash = select(is_dummy, empty_hash, correct_hash);
        assert_digest_eq(
            self.current_hash,
            required_hash,
            "MerkleListIterator::next",
        )?;

        let length = self.len_hint();
        self.current_index
            .update_as_prover(|index| *index = (*index + 1).min(length));
        self.current_hash = select(is_dummy, empty_hash, previous_hash);

        Ok((element, is_dummy))
    }

    /// Return the element before the current position and move backward by one
    /// step.
    ///
    /// A dummy element is returned if the iterator is at the start. Walking
    /// backwards rebuilds the commitment from the current position, so only
    /// a final [`assert_at_start`](Self::assert_at_start) proves that the
    /// returned elements belong to the sequence.
    pub fn previous(&mut self) -> ConstraintResult<T> {
        let (element, is_dummy) = self.previous_with_dummy_flag()?;
        Ok(select(is_dummy, T::dummy(), element))
    }

    /// Version of [`previous`](Self::previous) which doesn't guarantee
    /// anything about the returned element in case the iterator is at the
    /// start.
    ///
    /// Instead, the `is_dummy` flag is also returned so that this case can be
    /// handled in a custom way.
    pub fn previous_with_dummy_flag(&mut self) -> ConstraintResult<(T, bool)> {
        let current_hash = self.current_hash;
        let index = self.position_hint();
        let WithHash {
            previous_hash,
            element,
        } = witness(|| {
            index
                .checked_sub(1)
                .and_then(|i| self.data.as_prover(|data| data.get(i).cloned()))
                .unwrap_or_else(|| WithHash {
                    previous_hash: current_hash,
                    element: T::dummy(),
                })
        });

        let is_dummy = self.is_at_start();
        let linked_hash = select(is_dummy, current_hash, previous_hash);
        assert_digest_eq(
            linked_hash,
            current_hash,
            "MerkleListIterator::previous",
        )?;

        self.current_index
            .update_as_prover(|index| *index = index.saturating_sub(1));
        let stepped_hash = self.hasher.next_hash(previous_hash, &element);
        self.current_hash = select(is_dummy, self.hash, stepped_hash);

        Ok((element, is_dummy))
    }
}

/// Two iterators are equal if both of their commitments are. The prover-only
/// data and cursor play no part.
impl<T, H> PartialEq for MerkleListIterator<T, H> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.current_hash == other.current_hash
    }
}

impl<T, H> Eq for MerkleListIterator<T, H> {}

impl<T, H> From<&MerkleList<T, H>> for MerkleListIterator<T, H>
where
    T: ListElement,
    H: NextHash<T> + Clone,
{
    fn from(list: &MerkleList<T, H>) -> Self {
        Self::start_iterating(list)
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use proptest::collection::vec;
    use proptest::prelude::*;
    use proptest_arbitrary_interop::arb;
    use test_strategy::proptest;

    use super::*;
    use crate::hash_chain::generic_hash;
    use crate::test_helpers::AnchoredHash;
    use crate::test_helpers::Payment;
    use crate::EMPTY_HASH;

    #[proptest]
    fn iterating_yields_elements_in_order_then_dummy(
        #[strategy(vec(arb::<BFieldElement>(), 0..20))] elements: Vec<BFieldElement>,
    ) {
        let mut iterator = MerkleListIterator::from_elements(elements.clone());
        iterator.assert_at_start()?;

        let mut replayed = vec![];
        for _ in 0..elements.len() {
            prop_assert!(!iterator.is_at_end());
            replayed.push(iterator.next()?);
        }
        prop_assert_eq!(elements, replayed);

        prop_assert!(iterator.is_at_end());
        prop_assert_eq!(BFieldElement::dummy(), iterator.next()?);
        prop_assert!(iterator.is_at_end());
    }

    #[test]
    fn iterating_ten_twenty_thirty() {
        let mut iterator = MerkleListIterator::from_elements(bfe_vec![10, 20, 30]);
        assert!(iterator.is_at_start());

        assert_eq!(bfe!(10), iterator.next().unwrap());
        assert!(!iterator.is_at_start());
        assert_eq!(bfe!(20), iterator.next().unwrap());
        assert_eq!(bfe!(30), iterator.next().unwrap());
        assert!(iterator.is_at_end());

        for _ in 0..3 {
            assert_eq!(BFieldElement::dummy(), iterator.next().unwrap());
            assert!(iterator.is_at_end());
        }
    }

    #[proptest]
    fn exhausted_iterator_is_a_fixed_point(
        #[strategy(vec(arb::<Payment>(), 0..5))] elements: Vec<Payment>,
        #[strategy(0_usize..5)] extra_steps: usize,
    ) {
        let mut iterator = MerkleListIterator::from_elements(elements.clone());
        for _ in 0..elements.len() {
            iterator.next()?;
        }

        for _ in 0..extra_steps {
            let (element, is_dummy) = iterator.next_with_dummy_flag()?;
            prop_assert!(is_dummy);
            prop_assert_eq!(Payment::dummy(), element);
            prop_assert_eq!(EMPTY_HASH, iterator.current_hash());
            prop_assert_eq!(elements.len(), iterator.position_hint());
        }
    }

    #[test]
    fn dummy_flag_is_unset_for_real_elements() {
        let elements = (0..10).map(|_| rand::random::<u64>()).collect_vec();
        let mut iterator = MerkleListIterator::from_elements(elements.clone());

        for element in elements {
            assert_eq!((element, false), iterator.next_with_dummy_flag().unwrap());
        }
        assert!(iterator.next_with_dummy_flag().unwrap().1);
    }

    #[test]
    fn empty_iterator_is_at_end_and_at_start() {
        let mut iterator = MerkleListIterator::<u64>::empty();
        assert!(iterator.is_at_end());
        assert!(iterator.is_at_start());
        assert!(iterator.assert_at_end().is_ok());
        assert_eq!(0, iterator.next().unwrap());
    }

    #[test]
    fn iterating_a_list_replays_pop_order() {
        let mut list = MerkleList::<u32>::empty();
        for i in 0..5 {
            list.push(i);
        }

        let mut iterator = list.start_iterating();
        assert_eq!(list.hash(), iterator.hash());
        for _ in 0..5 {
            assert_eq!(list.pop_exn().unwrap(), iterator.next().unwrap());
            assert_eq!(list.hash(), iterator.current_hash());
        }
        assert!(iterator.is_at_end());
        assert!(list.is_empty());
    }

    #[test]
    fn iterator_from_list_and_from_elements_agree() {
        let elements = vec![7_u64, 8, 9];
        let from_list = MerkleListIterator::from(&MerkleList::from_elements(elements.clone()));
        let from_elements = MerkleListIterator::from_elements(elements);
        assert_eq!(from_list, from_elements);
    }

    #[test]
    fn iterating_leaves_the_list_untouched() {
        let list = MerkleList::from_elements(vec![1_u64, 2, 3]);
        let mut iterator = list.start_iterating();
        iterator.jump_to_end();

        assert_eq!(3, list.len_hint());
        assert_eq!(MerkleList::from_elements(vec![1_u64, 2, 3]), list);
    }

    #[test]
    fn assert_at_start_fails_after_stepping() {
        let mut iterator = MerkleListIterator::from_elements(vec![1_u64, 2]);
        iterator.next().unwrap();

        let violation = iterator.assert_at_start().unwrap_err();
        assert_eq!("MerkleListIterator::assert_at_start", violation.context);
    }

    #[test]
    fn next_detects_tampered_element() {
        let list = MerkleList::from_elements(vec![1_u64, 2, 3]);
        let mut iterator = list.start_iterating();
        iterator.data.update_as_prover(|data| data[1].element = 5);

        assert_eq!(1, iterator.next().unwrap());
        let violation = iterator.next().unwrap_err();
        assert_eq!("MerkleListIterator::next", violation.context);
    }

    #[test]
    fn next_detects_truncated_data() {
        let mut iterator = MerkleListIterator::from_elements(vec![1_u64, 2, 3]);
        iterator.data.update_as_prover(|data| data.truncate(1));

        assert_eq!(1, iterator.next().unwrap());
        assert!(iterator.next().is_err());
    }

    #[test]
    fn jump_to_end_skips_remaining_elements() {
        let mut iterator = MerkleListIterator::from_elements(vec![1_u64, 2, 3]);
        iterator.next().unwrap();
        iterator.jump_to_end();

        assert!(iterator.is_at_end());
        assert_eq!(3, iterator.position_hint());
        assert_eq!(0, iterator.next().unwrap());
    }

    #[proptest]
    fn jump_to_end_if_only_jumps_when_condition_holds(
        condition: bool,
        #[strategy(vec(arb::<Digest>(), 1..5))] elements: Vec<Digest>,
    ) {
        let mut iterator = MerkleListIterator::from_elements(elements.clone());
        iterator.jump_to_end_if(condition);

        prop_assert_eq!(condition, iterator.is_at_end());
        let expected_position = if condition { elements.len() } else { 0 };
        prop_assert_eq!(expected_position, iterator.position_hint());

        let next = iterator.next()?;
        let expected_next = if condition { Digest::dummy() } else { elements[0] };
        prop_assert_eq!(expected_next, next);
    }

    #[test]
    fn jump_to_start_rewinds() {
        let mut iterator = MerkleListIterator::from_elements(vec![1_u64, 2, 3]);
        iterator.next().unwrap();
        iterator.next().unwrap();

        iterator.jump_to_start_if(false);
        assert_eq!(3, iterator.next().unwrap());

        iterator.jump_to_start_if(true);
        assert!(iterator.is_at_start());
        assert_eq!(1, iterator.next().unwrap());

        iterator.jump_to_start();
        assert!(iterator.assert_at_start().is_ok());
        assert_eq!(vec![1, 2, 3], (0..3).map(|_| iterator.next().unwrap()).collect_vec());
    }

    #[test]
    fn clones_advance_independently() {
        let mut original = MerkleListIterator::from_elements(vec![1_u64, 2, 3]);
        original.next().unwrap();

        let mut clone = original.clone();
        assert_eq!(original, clone);

        assert_eq!(2, original.next().unwrap());
        assert_eq!(3, original.next().unwrap());
        assert_ne!(original, clone);

        assert_eq!(1, clone.position_hint());
        assert_eq!(2, clone.next().unwrap());
    }

    #[test]
    fn iterator_uses_the_list_hashing_strategy() {
        let hasher = MerkleListHash::with_prefix("custom");
        let list = MerkleList::from_elements_with(vec![1_u64, 2], hasher);
        let iterator = MerkleListIterator::from_elements_with(vec![1_u64, 2], hasher);
        assert_eq!(list.hash(), iterator.hash());
        assert_ne!(MerkleListIterator::from_elements(vec![1_u64, 2]).hash(), iterator.hash());
    }

    #[proptest]
    fn walking_backwards_yields_elements_in_reverse_then_dummy(
        #[strategy(vec(arb::<Payment>(), 0..10))] elements: Vec<Payment>,
    ) {
        let list = MerkleList::from_elements(elements.clone());
        let mut iterator = list.start_iterating_from_last();
        iterator.assert_at_end()?;

        let mut replayed = vec![];
        for _ in 0..elements.len() {
            let (element, is_dummy) = iterator.previous_with_dummy_flag()?;
            prop_assert!(!is_dummy);
            replayed.push(element);
        }
        replayed.reverse();
        prop_assert_eq!(elements, replayed);

        iterator.assert_at_start()?;
        prop_assert_eq!(0, iterator.position_hint());
        prop_assert_eq!(Payment::dummy(), iterator.previous()?);
        prop_assert!(iterator.is_at_start());
    }

    #[test]
    fn stepping_forward_then_backward_returns_to_start() {
        let mut iterator = MerkleListIterator::from_elements(vec![1_u64, 2, 3]);
        assert_eq!(1, iterator.next().unwrap());
        assert_eq!(2, iterator.next().unwrap());
        let after_two = iterator.current_hash();

        assert_eq!(2, iterator.previous().unwrap());
        assert_eq!(1, iterator.previous().unwrap());
        assert!(iterator.assert_at_start().is_ok());

        assert_eq!(1, iterator.next().unwrap());
        assert_eq!(2, iterator.next().unwrap());
        assert_eq!(after_two, iterator.current_hash());
    }

    #[test]
    fn previous_detects_tampered_link() {
        let list = MerkleList::from_elements(vec![1_u64, 2, 3]);
        let mut iterator = list.start_iterating_from_last();
        iterator
            .data
            .update_as_prover(|data| data[2].previous_hash = list.hash());

        let violation = iterator.previous().unwrap_err();
        assert_eq!("MerkleListIterator::previous", violation.context);
    }

    #[test]
    fn walking_backwards_detects_tampered_element() {
        let list = MerkleList::from_elements(vec![1_u64, 2, 3]);
        let mut iterator = list.start_iterating_from_last();
        iterator.data.update_as_prover(|data| data[1].element = 5);

        assert_eq!(3, iterator.previous().unwrap());
        assert_eq!(5, iterator.previous().unwrap());
        assert!(!iterator.is_at_start());
        assert!(iterator.assert_at_start().is_err());
        assert!(iterator.previous().is_err());
    }

    #[test]
    fn non_zero_empty_hash_is_honored_by_every_iterator_operation() {
        let anchor = generic_hash("anchor", &0_u64);
        let hasher = AnchoredHash::new(anchor);

        let empty = MerkleListIterator::<u64, _>::empty_with(hasher);
        assert!(empty.is_at_end());
        assert!(empty.assert_at_end().is_ok());

        let mut list = MerkleList::empty_with(hasher);
        list.push(2_u64);
        list.push(1);

        let mut iterator = list.start_iterating();
        assert!(!iterator.is_at_end());
        assert_eq!(1, iterator.next().unwrap());
        assert_eq!(2, iterator.next().unwrap());
        assert!(iterator.is_at_end());
        assert_eq!(anchor, iterator.current_hash());
        assert_ne!(EMPTY_HASH, iterator.current_hash());

        assert_eq!((0, true), iterator.next_with_dummy_flag().unwrap());
        assert!(iterator.assert_at_end().is_ok());

        iterator.jump_to_start();
        assert!(iterator.assert_at_end().is_err());
        iterator.jump_to_end_if(true);
        assert_eq!(anchor, iterator.current_hash());

        assert_eq!(2, iterator.previous().unwrap());
        assert_eq!(1, iterator.previous().unwrap());
        assert!(iterator.assert_at_start().is_ok());

        let from_last = list.start_iterating_from_last();
        assert_eq!(anchor, from_last.current_hash());
    }
}
