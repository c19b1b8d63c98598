#![warn(clippy::pedantic)]

//! Drives a [`CubeState`] through animated moves the way the interactive cube
//! does: an endless auto-play loop, single manual moves while paused, and
//! 20 move scrambles, with pausing deferred to the end of the move in flight.

use std::{collections::VecDeque, mem, time::Duration};

use cube_core::{CubeError, CubeState, Move, Turn, generate_scramble, start, success};
use log::{debug, info, warn};
use thiserror::Error;

pub mod easing;

use easing::ease_in_out_quad;

/// The moves auto-play cycles through.
pub const AUTO_PLAY_SEQUENCE: [Move; 18] = {
    use Move::*;
    [
        LPlus, LMinus, MPlus, MMinus, RPlus, RMinus, DPlus, DMinus, EPlus, EMinus, UPlus, UMinus,
        BPlus, BMinus, SPlus, SMinus, FPlus, FMinus,
    ]
};

/// Shortest turn the sequencer will animate. Zero length turns would let a
/// single `advance` run forever.
const MIN_ROTATE: Duration = Duration::from_millis(1);

#[derive(Error, Debug, PartialEq)]
pub enum SequencerError {
    #[error("The cube is busy, pause and wait for the current move to finish")]
    Busy,
    #[error(transparent)]
    Cube(#[from] CubeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub rotate: Duration,
    pub pause: Duration,
    pub scramble_rotate: Duration,
    pub scramble_pause: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            rotate: Duration::from_millis(750),
            pause: Duration::from_millis(1250),
            scramble_rotate: Duration::from_millis(150),
            scramble_pause: Duration::from_millis(50),
        }
    }
}

/// What the sequencer does once the current move finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    AutoPlay,
    Manual,
    Scramble,
}

/// Something that happened during [`Sequencer::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    MoveStarted(Move),
    MoveFinished(Move),
    Paused,
    ScrambleFinished,
}

struct InFlight {
    turn: Turn,
    elapsed: Duration,
    duration: Duration,
}

pub struct Sequencer {
    timings: Timings,
    paused: bool,
    pending_pause: bool,
    mode: Mode,
    auto_index: usize,
    scramble: Vec<Move>,
    scramble_index: usize,
    in_flight: Option<InFlight>,
    wait: Option<Duration>,
    messages: VecDeque<String>,
}

impl Sequencer {
    /// A playing sequencer whose first auto move starts after one pause.
    #[must_use]
    pub fn new(mut timings: Timings) -> Sequencer {
        timings.rotate = timings.rotate.max(MIN_ROTATE);
        timings.scramble_rotate = timings.scramble_rotate.max(MIN_ROTATE);

        Sequencer {
            timings,
            paused: false,
            pending_pause: false,
            mode: Mode::AutoPlay,
            auto_index: 0,
            scramble: vec![],
            scramble_index: 0,
            in_flight: None,
            wait: Some(timings.pause),
            messages: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn is_pause_pending(&self) -> bool {
        self.pending_pause
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    /// Manual moves, scrambles and the like are only accepted while paused
    /// with nothing turning.
    #[must_use]
    pub fn controls_enabled(&self) -> bool {
        self.paused && !self.is_animating()
    }

    /// The move in flight and how far through it the layer is.
    #[must_use]
    pub fn current_turn(&self) -> Option<(Move, f32)> {
        self.in_flight
            .as_ref()
            .map(|flight| (flight.turn.mv(), flight.turn.progress()))
    }

    /// Moves of the current scramble still to go.
    #[must_use]
    pub fn scramble_remaining(&self) -> &[Move] {
        &self.scramble[self.scramble_index.min(self.scramble.len())..]
    }

    /// HUD messages, oldest first.
    pub fn messages(&mut self) -> &mut VecDeque<String> {
        &mut self.messages
    }

    /// Pause or resume. While a move is in flight the pause is only
    /// remembered and takes effect once the move completes.
    pub fn toggle_pause(&mut self) {
        if self.is_animating() {
            self.pending_pause = true;
            info!("Pausing after the current move");
            return;
        }

        self.paused = !self.paused;

        if self.paused {
            self.wait = None;
            info!("Paused");
        } else {
            self.wait = Some(match self.mode {
                Mode::Scramble => self.timings.scramble_pause,
                Mode::AutoPlay | Mode::Manual => self.timings.pause,
            });
            info!("Resumed");
        }
    }

    /// Turn a single layer by hand.
    ///
    /// # Errors
    ///
    /// [`SequencerError::Busy`] unless paused and idle.
    pub fn request_manual(&mut self, cube: &CubeState, mv: Move) -> Result<(), SequencerError> {
        if !self.controls_enabled() {
            return Err(SequencerError::Busy);
        }

        let turn = cube.begin_turn(mv)?;
        self.messages.push_back(format!(
            "Manual Move: {mv} ({})\nTransformation: {}",
            mv.direction_label(),
            mv.def().transformation
        ));

        self.paused = false;
        self.mode = Mode::Manual;
        self.launch(turn, self.timings.rotate);

        Ok(())
    }

    /// Generate a scramble and start playing it.
    ///
    /// # Errors
    ///
    /// [`SequencerError::Busy`] unless paused and idle. If the first move
    /// cannot start, the sequencer stays paused and idle.
    pub fn request_scramble(
        &mut self,
        cube: &CubeState,
        rng: &mut fastrand::Rng,
    ) -> Result<(), SequencerError> {
        if !self.controls_enabled() {
            return Err(SequencerError::Busy);
        }

        let scramble = generate_scramble(rng);
        // Nothing changes unless the first move can start
        let turn = cube.begin_turn(scramble[0])?;

        info!(start!("Scrambling"));
        self.scramble = scramble;
        self.scramble_index = 0;
        self.mode = Mode::Scramble;
        self.paused = false;
        self.wait = None;

        self.announce_scramble_move(turn.mv());
        self.launch(turn, self.timings.scramble_rotate);

        Ok(())
    }

    /// Put the cube back to solved. Any unfinished scramble is dropped.
    ///
    /// # Errors
    ///
    /// [`SequencerError::Busy`] while a move is in flight.
    pub fn request_reset(&mut self, cube: &mut CubeState) -> Result<(), SequencerError> {
        if self.is_animating() {
            return Err(SequencerError::Busy);
        }

        cube.reset();
        self.scramble.clear();
        self.scramble_index = 0;
        self.mode = Mode::AutoPlay;
        self.wait = (!self.paused).then_some(self.timings.pause);
        self.messages.push_back("Reset".to_owned());

        Ok(())
    }

    /// Move the clock forward by `dt`, starting, tweening and finishing moves
    /// as their times come up.
    ///
    /// # Errors
    ///
    /// If a move cannot be started on the cube. The sequencer is left paused
    /// so the controls work again.
    pub fn advance(
        &mut self,
        cube: &mut CubeState,
        dt: Duration,
    ) -> Result<Vec<SequencerEvent>, SequencerError> {
        let mut events = vec![];
        let mut remaining = dt;

        loop {
            if let Some(flight) = self.in_flight.as_mut() {
                let left = flight.duration.saturating_sub(flight.elapsed);

                if remaining < left {
                    flight.elapsed += remaining;
                    let t = flight.elapsed.as_secs_f32() / flight.duration.as_secs_f32();
                    cube.update_turn(&mut flight.turn, ease_in_out_quad(t));
                    break;
                }

                remaining -= left;
                self.complete(cube, &mut events);
            } else if self.paused {
                break;
            } else if let Some(wait) = self.wait {
                if remaining < wait {
                    self.wait = Some(wait - remaining);
                    break;
                }

                remaining -= wait;
                self.wait = None;
                self.start_scheduled(cube, &mut events)?;
            } else {
                break;
            }
        }

        Ok(events)
    }

    fn launch(&mut self, turn: Turn, duration: Duration) {
        debug!("Starting {} over {duration:?}", turn.mv());
        self.in_flight = Some(InFlight {
            turn,
            elapsed: Duration::ZERO,
            duration,
        });
    }

    fn announce_scramble_move(&mut self, mv: Move) {
        self.messages.push_back(format!(
            "Scrambling: {mv} ({}) [{}/{}]",
            mv.direction_label(),
            self.scramble_index + 1,
            self.scramble.len()
        ));
    }

    fn start_scheduled(
        &mut self,
        cube: &CubeState,
        events: &mut Vec<SequencerEvent>,
    ) -> Result<(), SequencerError> {
        let mv = match self.mode {
            Mode::Scramble => self.scramble[self.scramble_index],
            Mode::AutoPlay | Mode::Manual => AUTO_PLAY_SEQUENCE[self.auto_index],
        };

        let turn = match cube.begin_turn(mv) {
            Ok(turn) => turn,
            Err(e) => {
                warn!("Could not start {mv}, pausing: {e}");
                self.paused = true;
                self.wait = None;
                return Err(e.into());
            }
        };

        let duration = match self.mode {
            Mode::Scramble => {
                self.announce_scramble_move(mv);
                self.timings.scramble_rotate
            }
            Mode::AutoPlay | Mode::Manual => {
                self.mode = Mode::AutoPlay;
                self.messages.push_back(format!(
                    "Auto Move: {mv} ({})\nTransformation: {}",
                    mv.direction_label(),
                    mv.def().transformation
                ));
                self.timings.rotate
            }
        };

        events.push(SequencerEvent::MoveStarted(mv));
        self.launch(turn, duration);

        Ok(())
    }

    fn complete(&mut self, cube: &mut CubeState, events: &mut Vec<SequencerEvent>) {
        let Some(flight) = self.in_flight.take() else {
            return;
        };

        let mv = flight.turn.mv();
        cube.finish_turn(flight.turn);
        events.push(SequencerEvent::MoveFinished(mv));

        let pause_now = mem::take(&mut self.pending_pause);

        match self.mode {
            Mode::AutoPlay => {
                self.auto_index = (self.auto_index + 1) % AUTO_PLAY_SEQUENCE.len();
                if pause_now {
                    self.halt(events);
                } else {
                    self.wait = Some(self.timings.pause);
                }
            }
            Mode::Manual => {
                // Pick up an interrupted scramble if there is one
                self.mode = if self.scramble_remaining().is_empty() {
                    Mode::AutoPlay
                } else {
                    Mode::Scramble
                };
                self.halt(events);
            }
            Mode::Scramble => {
                self.scramble_index += 1;

                if self.scramble_remaining().is_empty() {
                    info!(success!("Scramble complete"));
                    self.messages
                        .push_back("Scramble Complete. Paused.".to_owned());
                    self.scramble.clear();
                    self.scramble_index = 0;
                    self.mode = Mode::AutoPlay;
                    events.push(SequencerEvent::ScrambleFinished);
                    self.halt(events);
                } else if pause_now {
                    self.halt(events);
                } else {
                    self.wait = Some(self.timings.scramble_pause);
                }
            }
        }
    }

    fn halt(&mut self, events: &mut Vec<SequencerEvent>) {
        self.paused = true;
        self.wait = None;
        events.push(SequencerEvent::Paused);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_play_covers_every_move_once() {
        for mv in Move::ALL {
            assert_eq!(
                AUTO_PLAY_SEQUENCE.iter().filter(|m| **m == mv).count(),
                1,
                "{mv}"
            );
        }
        // Each move is directly followed by its inverse
        for pair in AUTO_PLAY_SEQUENCE.chunks(2) {
            assert_eq!(pair[0].inverse(), pair[1]);
        }
    }

    #[test]
    fn default_timings() {
        let timings = Timings::default();
        assert_eq!(timings.rotate, Duration::from_millis(750));
        assert_eq!(timings.pause, Duration::from_millis(1250));
        assert_eq!(timings.scramble_rotate, Duration::from_millis(150));
        assert_eq!(timings.scramble_pause, Duration::from_millis(50));
    }

    #[test]
    fn zero_length_turns_are_stretched() {
        let sequencer = Sequencer::new(Timings {
            rotate: Duration::ZERO,
            pause: Duration::ZERO,
            scramble_rotate: Duration::ZERO,
            scramble_pause: Duration::ZERO,
        });
        assert_eq!(sequencer.timings().rotate, MIN_ROTATE);
        assert_eq!(sequencer.timings().scramble_rotate, MIN_ROTATE);
    }
}
