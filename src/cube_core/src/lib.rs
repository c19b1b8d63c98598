#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

//! The facelet permutation engine behind the 3x3x3 cube.
//!
//! A [`CubeState`] keeps two views of the same configuration in lockstep: the
//! 26 cubie geometries that a renderer animates, and a 54 entry permutation of
//! sticker identities. [`reconcile`] derives a third view from the geometry
//! alone and cross-checks it against the permutation.

pub mod catalog;
pub mod cube;
pub mod facelets;
pub mod geometry;
pub mod move_log;
pub mod permutation;
pub mod reconcile;
pub mod scramble;
pub mod slice;

pub use catalog::{Axis, Move, MoveDef, ParseMoveError};
pub use cube::{CubeError, CubeState, Turn};
pub use facelets::{FACELET_COUNT, Face};
pub use geometry::{CUBIE_COUNT, Cubie, STEP};
pub use move_log::{MoveLog, MoveLogError};
pub use permutation::{Permutation, PermutationError};
pub use reconcile::{ReconcileError, Reconciliation};
pub use scramble::{generate_scramble, inverse_sequence, random_moves};

#[macro_export]
macro_rules! start {
    ($msg:expr) => {
        concat!("⏳ ", $msg)
    };
}

#[macro_export]
macro_rules! working {
    ($msg:expr) => {
        concat!("🛠  ", $msg)
    };
}

#[macro_export]
macro_rules! success {
    ($msg:expr) => {
        concat!("✅ ", $msg)
    };
}
