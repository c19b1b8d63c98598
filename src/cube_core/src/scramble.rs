use fastrand::Rng;
use itertools::Itertools;
use log::debug;

use crate::catalog::{Axis, Move};

pub const SCRAMBLE_LENGTH: usize = 20;

/// A random 20 move scramble.
///
/// Seven moves turn about `x`, seven about `y` and six about `z`, in shuffled
/// order. No move directly undoes the one before it.
#[must_use]
pub fn generate_scramble(rng: &mut Rng) -> Vec<Move> {
    let mut axes = [Axis::X; 7]
        .into_iter()
        .chain([Axis::Y; 7])
        .chain([Axis::Z; 6])
        .collect_vec();
    rng.shuffle(&mut axes);

    let mut moves: Vec<Move> = Vec::with_capacity(SCRAMBLE_LENGTH);
    for axis in axes {
        let mv = pick(rng, Move::moves_on_axis(axis), moves.last().copied());
        moves.push(mv);
    }

    debug!("Generated scramble: {}", moves.iter().join(" "));
    moves
}

/// `count` uniformly random moves, none directly undoing the one before.
#[must_use]
pub fn random_moves(rng: &mut Rng, count: usize) -> Vec<Move> {
    let mut moves: Vec<Move> = Vec::with_capacity(count);
    for _ in 0..count {
        let mv = pick(rng, Move::ALL.into_iter(), moves.last().copied());
        moves.push(mv);
    }
    moves
}

/// The sequence undoing `moves`.
#[must_use]
pub fn inverse_sequence(moves: &[Move]) -> Vec<Move> {
    moves.iter().rev().map(|mv| mv.inverse()).collect()
}

fn pick(rng: &mut Rng, candidates: impl Iterator<Item = Move>, previous: Option<Move>) -> Move {
    let candidates = candidates
        .filter(|mv| previous.is_none_or(|prev| prev.inverse() != *mv))
        .collect_vec();
    candidates[rng.usize(..candidates.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scramble_shape() {
        let mut rng = Rng::with_seed(7);
        for _ in 0..50 {
            let scramble = generate_scramble(&mut rng);
            assert_eq!(scramble.len(), SCRAMBLE_LENGTH);

            let counts = scramble.iter().counts_by(|mv| mv.axis());
            assert_eq!(counts[&Axis::X], 7);
            assert_eq!(counts[&Axis::Y], 7);
            assert_eq!(counts[&Axis::Z], 6);

            for (a, b) in scramble.iter().tuple_windows() {
                assert_ne!(a.inverse(), *b);
            }
        }
    }

    #[test]
    fn seeded_scrambles_repeat() {
        let a = generate_scramble(&mut Rng::with_seed(42));
        let b = generate_scramble(&mut Rng::with_seed(42));
        assert_eq!(a, b);
    }

    #[test]
    fn random_moves_never_backtrack() {
        let moves = random_moves(&mut Rng::with_seed(3), 500);
        assert_eq!(moves.len(), 500);
        for (a, b) in moves.iter().tuple_windows() {
            assert_ne!(a.inverse(), *b);
        }
    }

    #[test]
    fn inverse_reverses_and_flips() {
        assert_eq!(
            inverse_sequence(&[Move::RPlus, Move::UMinus, Move::SPlus]),
            vec![Move::SMinus, Move::UPlus, Move::RMinus]
        );
        assert!(inverse_sequence(&[]).is_empty());
    }
}
