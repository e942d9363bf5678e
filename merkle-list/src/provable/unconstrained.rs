/// Prover-only data attached to a constrained value.
///
/// The wrapped value is never hashed, encoded, or compared as part of the
/// constrained representation: `Unconstrained` deliberately implements
/// neither [`PartialEq`] nor `BFieldCodec`. It is read through
/// [`as_prover`](Self::as_prover), typically inside a
/// [`witness`](super::witness) closure, and mutated through
/// [`update_as_prover`](Self::update_as_prover).
///
/// Cloning performs a deep copy; two clones never share state.
#[derive(Debug, Clone, Default)]
pub struct Unconstrained<T>(T);

impl<T> Unconstrained<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Read the prover-only value.
    pub fn as_prover<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&self.0)
    }

    /// Mutate the prover-only value. Branching in here is fine; it never
    /// influences the constraints.
    pub fn update_as_prover(&mut self, update: impl FnOnce(&mut T)) {
        update(&mut self.0)
    }

    pub fn set(&mut self, value: T) {
        self.0 = value;
    }
}
