use std::array;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PermutationError {
    #[error("Value {value} at index {index} is out of range, expected a value below {len}")]
    OutOfRange {
        index: usize,
        value: usize,
        len: usize,
    },
    #[error("Value {value} appears more than once, first repeated at index {index}")]
    Duplicate { index: usize, value: usize },
}

/// A permutation of `0..N` stored as its mapping vector.
///
/// Used as a state, entry `i` names the original element that currently sits in
/// position `i`. Used as a move, entry `i` names the position that supplies the
/// new occupant of position `i`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Permutation<const N: usize>([usize; N]);

impl<const N: usize> Permutation<N> {
    #[must_use]
    pub fn identity() -> Self {
        // Map every value to itself
        Permutation(array::from_fn(|i| i))
    }

    /// Build a permutation from a trusted table. Only for tables whose
    /// bijectivity is checked elsewhere, i.e. the move catalog.
    pub(crate) const fn from_table(mapping: [usize; N]) -> Self {
        Permutation(mapping)
    }

    /// Create a permutation from its mapping vector.
    ///
    /// # Errors
    ///
    /// If the mapping is not a bijection of `0..N`.
    pub fn from_mapping(mapping: [usize; N]) -> Result<Self, PermutationError> {
        let mut seen = [false; N];

        for (index, &value) in mapping.iter().enumerate() {
            if value >= N {
                return Err(PermutationError::OutOfRange {
                    index,
                    value,
                    len: N,
                });
            }

            if seen[value] {
                return Err(PermutationError::Duplicate { index, value });
            }

            seen[value] = true;
        }

        Ok(Permutation(mapping))
    }

    #[must_use]
    pub fn mapping(&self) -> &[usize; N] {
        &self.0
    }

    /// Apply `other` on top of `self`: `new[i] = old[other[i]]`.
    pub fn compose_into(&mut self, other: &Permutation<N>) {
        let old = self.0;
        for (value, &source) in self.0.iter_mut().zip(other.0.iter()) {
            *value = old[source];
        }
    }

    #[must_use]
    pub fn composed(&self, other: &Permutation<N>) -> Permutation<N> {
        let mut out = self.clone();
        out.compose_into(other);
        out
    }

    #[must_use]
    pub fn inverse(&self) -> Permutation<N> {
        let mut out = [0; N];
        for (i, &value) in self.0.iter().enumerate() {
            out[value] = i;
        }
        Permutation(out)
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &value)| i == value)
    }

    /// The non-trivial cycles of the permutation, each starting at its
    /// smallest element.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<usize>> {
        let mut covered = [false; N];
        let mut cycles = vec![];

        for i in 0..N {
            if covered[i] {
                continue;
            }

            covered[i] = true;
            let mut cycle = vec![i];
            let mut next = self.0[i];

            while next != i {
                covered[next] = true;
                cycle.push(next);
                next = self.0[next];
            }

            if cycle.len() > 1 {
                cycles.push(cycle);
            }
        }

        cycles
    }

    /// The number of times the permutation must be applied to return to the
    /// identity.
    #[must_use]
    pub fn order(&self) -> usize {
        self.cycles().iter().map(Vec::len).fold(1, lcm)
    }
}

impl<const N: usize> Default for Permutation<N> {
    fn default() -> Self {
        Permutation::identity()
    }
}

/// Check that `values` contains each of `0..values.len()` exactly once.
#[must_use]
pub fn is_bijection(values: &[usize]) -> bool {
    let mut seen = vec![false; values.len()];
    values.iter().all(|&value| {
        value < seen.len() && !std::mem::replace(&mut seen[value], true)
    })
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    loop {
        if b == 0 {
            return a;
        }

        let rem = a % b;
        a = b;
        b = rem;
    }
}

fn lcm(a: usize, b: usize) -> usize {
    b / gcd(a, b) * a
}
