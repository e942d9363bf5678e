use num_traits::Zero;
use triton_vm::prelude::*;

pub use merkle_list_derive::ListElement;

/// A value that can live in a [`MerkleList`](crate::MerkleList).
///
/// Its [`BFieldCodec`] encoding is what gets hashed into the list's
/// commitment. On top of that, an element type must provide
///  - a canonical dummy instance, substituted whenever an operation reads past
///    the logical end of a sequence, and
///  - a branch-free selection between two instances.
///
/// For structs, both can be derived with `#[derive(ListElement)]` as long as
/// every field is a `ListElement` itself.
pub trait ListElement: BFieldCodec + Clone {
    /// The canonical dummy instance. Must be the same on every call.
    fn dummy() -> Self;

    /// Return `if_true` if `condition` holds, else `if_false`, without
    /// branching on `condition`.
    fn select(condition: bool, if_true: Self, if_false: Self) -> Self;
}

fn select_bfe(condition: bool, if_true: BFieldElement, if_false: BFieldElement) -> BFieldElement {
    let condition = BFieldElement::new(u64::from(condition));
    if_false + condition * (if_true - if_false)
}

impl ListElement for BFieldElement {
    fn dummy() -> Self {
        BFieldElement::zero()
    }

    fn select(condition: bool, if_true: Self, if_false: Self) -> Self {
        select_bfe(condition, if_true, if_false)
    }
}

impl ListElement for XFieldElement {
    fn dummy() -> Self {
        XFieldElement::zero()
    }

    fn select(condition: bool, if_true: Self, if_false: Self) -> Self {
        let coefficients = <[BFieldElement; 3]>::select(
            condition,
            if_true.coefficients,
            if_false.coefficients,
        );
        XFieldElement::new(coefficients)
    }
}

impl ListElement for Digest {
    fn dummy() -> Self {
        Digest::default()
    }

    fn select(condition: bool, if_true: Self, if_false: Self) -> Self {
        Digest::new(<[BFieldElement; Digest::LEN]>::select(
            condition,
            if_true.values(),
            if_false.values(),
        ))
    }
}

impl ListElement for bool {
    fn dummy() -> Self {
        false
    }

    fn select(condition: bool, if_true: Self, if_false: Self) -> Self {
        (condition & if_true) | (!condition & if_false)
    }
}

macro_rules! impl_list_element_for_unsigned {
    ($($t:ty),+ $(,)?) => {$(
        impl ListElement for $t {
            fn dummy() -> Self {
                0
            }

            fn select(condition: bool, if_true: Self, if_false: Self) -> Self {
                let mask = <$t>::from(condition).wrapping_neg();
                if_false ^ (mask & (if_true ^ if_false))
            }
        }
    )+};
}

impl_list_element_for_unsigned!(u32, u64, u128);

impl<T: ListElement, const N: usize> ListElement for [T; N]
where
    [T; N]: BFieldCodec,
{
    fn dummy() -> Self {
        std::array::from_fn(|_| T::dummy())
    }

    fn select(condition: bool, if_true: Self, if_false: Self) -> Self {
        let mut if_false = if_false.into_iter();
        if_true.map(|t| {
            // both arrays have length N
            let f = if_false.next().unwrap_or_else(T::dummy);
            T::select(condition, t, f)
        })
    }
}

impl<A: ListElement, B: ListElement> ListElement for (A, B)
where
    (A, B): BFieldCodec,
{
    fn dummy() -> Self {
        (A::dummy(), B::dummy())
    }

    fn select(condition: bool, if_true: Self, if_false: Self) -> Self {
        (
            A::select(condition, if_true.0, if_false.0),
            B::select(condition, if_true.1, if_false.1),
        )
    }
}

impl<A: ListElement, B: ListElement, C: ListElement> ListElement for (A, B, C)
where
    (A, B, C): BFieldCodec,
{
    fn dummy() -> Self {
        (A::dummy(), B::dummy(), C::dummy())
    }

    fn select(condition: bool, if_true: Self, if_false: Self) -> Self {
        (
            A::select(condition, if_true.0, if_false.0),
            B::select(condition, if_true.1, if_false.1),
            C::select(condition, if_true.2, if_false.2),
        )
    }
}
