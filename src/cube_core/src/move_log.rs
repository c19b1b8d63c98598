//! Newline delimited JSON log of the cube state after every move.

use std::io::{self, Write};

use serde::Serialize;
use thiserror::Error;

use crate::{
    catalog::Move,
    cube::{CubeError, CubeState},
    geometry::Cubie,
};

#[derive(Error, Debug)]
pub enum MoveLogError {
    #[error("Could not write to the move log: {0}")]
    Io(#[from] io::Error),
    #[error("Could not serialize a move log record: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Cube(#[from] CubeError),
}

#[derive(Serialize)]
struct Record<'a> {
    #[serde(rename = "move")]
    mv: Option<&'a str>,
    facelets: &'a [usize],
    cubie_slots: &'a [usize],
    facelet_cubies: &'a [usize],
    #[serde(skip_serializing_if = "Option::is_none")]
    cubies: Option<Vec<CubieRecord>>,
}

/// Where one cubie is and how it is turned.
#[derive(Serialize)]
struct CubieRecord {
    slot_id: usize,
    position: [f32; 3],
    /// Quaternion as `[x, y, z, w]`.
    orientation: [f32; 4],
}

impl From<&Cubie> for CubieRecord {
    fn from(cubie: &Cubie) -> Self {
        CubieRecord {
            slot_id: cubie.slot_id(),
            position: cubie.position().to_array(),
            orientation: cubie.orientation().to_array(),
        }
    }
}

/// Writes one record for the starting state and one per appended move.
#[derive(Debug)]
pub struct MoveLog<W: Write> {
    writer: W,
    records: usize,
    with_cubies: bool,
}

impl<W: Write> MoveLog<W> {
    /// Begin a log and write the record of `cube` as it stands.
    ///
    /// # Errors
    ///
    /// If writing fails or the cube's geometry does not reconcile.
    pub fn start(writer: W, cube: &CubeState) -> Result<Self, MoveLogError> {
        MoveLog::begin(writer, cube, false)
    }

    /// Like [`MoveLog::start`], but every record also carries the position
    /// and orientation of all 26 cubies.
    ///
    /// # Errors
    ///
    /// If writing fails or the cube's geometry does not reconcile.
    pub fn start_with_cubies(writer: W, cube: &CubeState) -> Result<Self, MoveLogError> {
        MoveLog::begin(writer, cube, true)
    }

    fn begin(writer: W, cube: &CubeState, with_cubies: bool) -> Result<Self, MoveLogError> {
        let mut log = MoveLog {
            writer,
            records: 0,
            with_cubies,
        };
        log.write_record(None, cube)?;
        Ok(log)
    }

    /// Record `cube` after `mv` has been applied to it.
    ///
    /// # Errors
    ///
    /// If writing fails or the cube's geometry does not reconcile.
    pub fn append(&mut self, mv: Move, cube: &CubeState) -> Result<(), MoveLogError> {
        self.write_record(Some(mv), cube)
    }

    /// Records written so far, including the initial one.
    #[must_use]
    pub fn records(&self) -> usize {
        self.records
    }

    /// Flush and hand back the writer.
    ///
    /// # Errors
    ///
    /// If flushing fails.
    pub fn into_inner(mut self) -> Result<W, MoveLogError> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_record(&mut self, mv: Option<Move>, cube: &CubeState) -> Result<(), MoveLogError> {
        let reconciliation = cube.verify()?;

        let record = Record {
            mv: mv.map(Move::name),
            facelets: cube.facelets().mapping(),
            cubie_slots: &reconciliation.slot_cubies,
            facelet_cubies: &reconciliation.facelet_cubies,
            cubies: self
                .with_cubies
                .then(|| cube.cubies().iter().map(CubieRecord::from).collect()),
        };

        // Serialize first so a failed write never leaves half a line behind
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.records += 1;

        Ok(())
    }
}
