use log::{Level, debug, log_enabled, trace};
use thiserror::Error;

use crate::{
    catalog::{Move, ParseMoveError},
    facelets::FACELET_COUNT,
    geometry::{CUBIE_COUNT, Cubie, SliceRotation, home_cubies},
    permutation::Permutation,
    reconcile::{ReconcileError, Reconciliation, check_orientations, reconcile},
    slice::{SliceError, select_slice},
};

#[derive(Error, Debug, PartialEq)]
pub enum CubeError {
    #[error(transparent)]
    UnknownMove(#[from] ParseMoveError),
    #[error("The cube is in an inconsistent state: {0}")]
    Slice(#[from] SliceError),
    #[error("The geometry and the facelets disagree: {0}")]
    Reconcile(#[from] ReconcileError),
}

/// The whole cube: 26 cubie geometries and the 54 sticker permutation, kept
/// in step one move at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeState {
    cubies: [Cubie; CUBIE_COUNT],
    facelets: Permutation<FACELET_COUNT>,
}

/// A move in progress, as driven by an animation.
#[derive(Debug)]
pub struct Turn {
    mv: Move,
    rotation: SliceRotation,
    progress: f32,
}

impl Turn {
    #[must_use]
    pub fn mv(&self) -> Move {
        self.mv
    }

    /// How far through the turn the layer is, from 0 to 1.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }
}

impl CubeState {
    #[must_use]
    pub fn solved() -> CubeState {
        CubeState {
            cubies: home_cubies(),
            facelets: Permutation::identity(),
        }
    }

    pub fn reset(&mut self) {
        *self = CubeState::solved();
        debug!(target: "cube", "Reset to solved");
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.facelets.is_identity() && self.cubies == home_cubies()
    }

    #[must_use]
    pub fn cubies(&self) -> &[Cubie; CUBIE_COUNT] {
        &self.cubies
    }

    /// For each facelet slot, the sticker currently shown there.
    #[must_use]
    pub fn facelets(&self) -> &Permutation<FACELET_COUNT> {
        &self.facelets
    }

    /// Apply a move instantly.
    ///
    /// # Errors
    ///
    /// If the move's layer does not hold its nine cubies, or eight for a middle
    /// layer. The cube is left untouched in that case.
    pub fn apply_move(&mut self, mv: Move) -> Result<(), CubeError> {
        let turn = self.begin_turn(mv)?;
        self.finish_turn(turn);
        Ok(())
    }

    /// Parse a move code and apply it.
    ///
    /// # Errors
    ///
    /// If the code is not one of the 18 moves, before anything is changed.
    pub fn apply_named(&mut self, name: &str) -> Result<Move, CubeError> {
        let mv = name.parse::<Move>()?;
        self.apply_move(mv)?;
        Ok(mv)
    }

    /// # Errors
    ///
    /// Stops at the first move that fails, see [`CubeState::apply_move`].
    pub fn apply_sequence(&mut self, moves: &[Move]) -> Result<(), CubeError> {
        for &mv in moves {
            self.apply_move(mv)?;
        }
        Ok(())
    }

    /// Start an animated move. Nothing changes until the turn is updated.
    ///
    /// # Errors
    ///
    /// If the move's layer does not hold its nine cubies, or eight for a middle
    /// layer.
    pub fn begin_turn(&self, mv: Move) -> Result<Turn, CubeError> {
        let slice = select_slice(&self.cubies, mv.axis(), mv.slice_coordinate())?;

        Ok(Turn {
            mv,
            rotation: SliceRotation::new(&self.cubies, &slice, mv.axis(), mv.direction()),
            progress: 0.,
        })
    }

    /// Move the turning layer to fraction `t` of the turn. Progress never goes
    /// backwards; an earlier `t` than the last one is ignored.
    pub fn update_turn(&mut self, turn: &mut Turn, t: f32) {
        turn.progress = turn.progress.max(t.clamp(0., 1.));
        turn.rotation.apply(&mut self.cubies, turn.progress);
    }

    /// Complete the turn, snap the layer onto the lattice and move the
    /// stickers.
    pub fn finish_turn(&mut self, turn: Turn) {
        turn.rotation.settle(&mut self.cubies);
        self.facelets.compose_into(turn.mv.facelet_permutation());

        debug!(
            target: "cube",
            "Applied {} on {} = {} ({})",
            turn.mv,
            turn.mv.axis(),
            turn.mv.slice_coordinate(),
            turn.mv.def().transformation
        );

        if log_enabled!(target: "cube", Level::Trace) {
            for cubie in &self.cubies {
                trace!(target: "cube", "{cubie}");
            }
        }
    }

    /// Derive the slot views from geometry and check them against the
    /// facelet permutation.
    ///
    /// # Errors
    ///
    /// If the two models disagree anywhere.
    pub fn verify(&self) -> Result<Reconciliation, CubeError> {
        let reconciliation = reconcile(&self.cubies)?;
        reconciliation.check_facelets(&self.facelets)?;
        check_orientations(&self.cubies, &self.facelets)?;
        Ok(reconciliation)
    }
}

impl Default for CubeState {
    fn default() -> Self {
        CubeState::solved()
    }
}
