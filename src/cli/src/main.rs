#![warn(clippy::pedantic)]

mod config;

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
    thread,
    time::Instant,
};

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use config::CubeConfig;
use cube_core::{
    CubeState, Face, Move, MoveLog, generate_scramble, inverse_sequence, random_moves, start,
    success, working,
};
use env_logger::TimestampPrecision;
use itertools::Itertools;
use log::{LevelFilter, info};
use owo_colors::OwoColorize;
use sequencer::{Sequencer, SequencerEvent};

/// Applies, scrambles, verifies and logs moves on a 3x3x3 cube
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The configuration file to use, in TOML format. Defaults to
    /// `cube_config.toml` when it exists.
    #[arg(long, short = 'c', value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count)]
    log_level: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply moves to a solved cube and print the result.
    Apply {
        /// Moves to apply, e.g. "R+ U- S+".
        #[arg(required = true)]
        moves: Vec<String>,
        /// Write a move log to this file.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Also print the position and orientation of every cubie.
        #[arg(long)]
        cubies: bool,
    },
    /// Generate a 20 move scramble and apply it.
    Scramble {
        #[arg(long)]
        seed: Option<u64>,
        /// Write a move log to this file.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Also print the position and orientation of every cubie.
        #[arg(long)]
        cubies: bool,
    },
    /// Write a move log of random moves.
    GenerateLog {
        /// Where to write the log.
        output: PathBuf,
        #[arg(long, default_value_t = 1000)]
        count: usize,
        #[arg(long)]
        seed: Option<u64>,
        /// Include every cubie's position and orientation in each record.
        #[arg(long)]
        cubies: bool,
    },
    /// Check that geometry and facelets agree over many random moves.
    Verify {
        #[arg(long, default_value_t = 10_000)]
        count: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run the animated auto-play without a display, printing HUD messages.
    Play {
        /// Stop after this many completed moves, not counting the scramble.
        #[arg(long, default_value_t = 18)]
        moves: usize,
        /// Scramble before starting auto-play.
        #[arg(long)]
        scramble: bool,
        /// Run in real time instead of as fast as possible.
        #[arg(long)]
        realtime: bool,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List the 18 moves.
    Catalog,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.log_level {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let config = CubeConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Apply { moves, log, cubies } => {
            let moves = Move::parse_sequence(&moves.join(" "))?;
            run_moves(&moves, log, cubies)?;
        }
        Commands::Scramble { seed, log, cubies } => {
            let scramble = generate_scramble(&mut rng(seed.or(config.simulation.seed)));
            println!("{}", scramble.iter().join(" ").bold());
            run_moves(&scramble, log, cubies)?;
        }
        Commands::GenerateLog {
            output,
            count,
            seed,
            cubies,
        } => {
            let moves = random_moves(&mut rng(seed.or(config.simulation.seed)), count);
            let mut cube = CubeState::solved();
            write_log(&mut cube, &moves, &output, cubies)?;
            eprintln!("Wrote {} records to {}", count + 1, output.display());
        }
        Commands::Verify { count, seed } => {
            verify(count, &mut rng(seed.or(config.simulation.seed)))?;
        }
        Commands::Play {
            moves,
            scramble,
            realtime,
            seed,
        } => {
            play(
                &config,
                moves,
                scramble,
                realtime,
                &mut rng(seed.or(config.simulation.seed)),
            )?;
        }
        Commands::Catalog => print_catalog(),
    }

    Ok(())
}

fn rng(seed: Option<u64>) -> fastrand::Rng {
    match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    }
}

fn run_moves(moves: &[Move], log: Option<PathBuf>, cubies: bool) -> color_eyre::Result<()> {
    let mut cube = CubeState::solved();

    match log {
        Some(path) => write_log(&mut cube, moves, &path, cubies)?,
        None => cube.apply_sequence(moves)?,
    }

    cube.verify()?;
    print_cube(&cube);
    if cubies {
        for cubie in cube.cubies() {
            println!("{cubie}");
        }
    }
    Ok(())
}

fn write_log(
    cube: &mut CubeState,
    moves: &[Move],
    path: &Path,
    cubies: bool,
) -> color_eyre::Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("Failed to create the move log {}", path.display()))?;
    let writer = BufWriter::new(file);
    let mut log = if cubies {
        MoveLog::start_with_cubies(writer, cube)?
    } else {
        MoveLog::start(writer, cube)?
    };

    for &mv in moves {
        cube.apply_move(mv)?;
        log.append(mv, cube)?;
    }

    log.into_inner()?;
    Ok(())
}

fn verify(count: usize, rng: &mut fastrand::Rng) -> color_eyre::Result<()> {
    info!(start!("Verifying {} random moves"), count);
    let moves = random_moves(rng, count);
    let mut cube = CubeState::solved();

    for (i, &mv) in moves.iter().enumerate() {
        cube.apply_move(mv)?;
        cube.verify()
            .wrap_err_with(|| format!("Models diverged after move {} ({mv})", i + 1))?;
    }

    info!(working!("Undoing {} moves"), count);
    cube.apply_sequence(&inverse_sequence(&moves))?;
    if !cube.is_solved() {
        return Err(eyre!("The cube did not return to solved after undoing the moves"));
    }

    info!(success!("Verified"));
    println!(
        "{} {count} moves, geometry and facelets agree, undo returns to solved",
        "OK".green()
    );
    Ok(())
}

fn play(
    config: &CubeConfig,
    moves: usize,
    scramble: bool,
    realtime: bool,
    rng: &mut fastrand::Rng,
) -> color_eyre::Result<()> {
    let mut cube = CubeState::solved();
    let mut sequencer = Sequencer::new(config.timings.to_timings());
    let frame = config.simulation.frame();

    if scramble {
        sequencer.toggle_pause();
        sequencer.request_scramble(&cube, rng)?;
    }

    let mut finished = 0;
    let mut scrambling = scramble;
    let mut next_frame = Instant::now();

    while finished < moves {
        let events = sequencer.advance(&mut cube, frame)?;

        for message in sequencer.messages().drain(..) {
            println!("{message}");
        }

        for event in events {
            match event {
                SequencerEvent::MoveFinished(_) => {
                    if !scrambling {
                        finished += 1;
                    }
                    cube.verify()?;
                }
                SequencerEvent::ScrambleFinished => {
                    scrambling = false;
                    print_cube(&cube);
                    // Carry on with auto-play
                    sequencer.toggle_pause();
                }
                SequencerEvent::MoveStarted(_) | SequencerEvent::Paused => {}
            }
        }

        if realtime {
            next_frame += frame;
            thread::sleep(next_frame.saturating_duration_since(Instant::now()));
        }
    }

    print_cube(&cube);
    Ok(())
}

fn print_cube(cube: &CubeState) {
    for face in Face::ALL {
        let start = face as usize * 9;
        let stickers = cube.facelets().mapping()[start..start + 9]
            .iter()
            .map(|&sticker| paint(sticker))
            .join(" ");
        println!("{face:?} {:<6}  {stickers}", face.color());
    }

    let status = if cube.is_solved() {
        "solved".green().to_string()
    } else {
        "scrambled".yellow().to_string()
    };
    println!("{status}");
}

fn paint(sticker: usize) -> String {
    let text = format!("{sticker:>2}");
    match Face::of_facelet(sticker) {
        Face::R => text.red().to_string(),
        Face::L => text.truecolor(255, 140, 0).to_string(),
        Face::U => text.white().to_string(),
        Face::D => text.bright_yellow().to_string(),
        Face::F => text.blue().to_string(),
        Face::B => text.green().to_string(),
    }
}

fn print_catalog() {
    println!(
        "{}",
        "Move  Axis  Layer  Turn  Transformation           Cycles".bold()
    );
    for mv in Move::ALL {
        let def = mv.def();
        let cycles = def
            .facelet_permutation
            .cycles()
            .iter()
            .map(Vec::len)
            .counts()
            .into_iter()
            .sorted()
            .map(|(len, n)| format!("{n}x{len}"))
            .join(" ");
        println!(
            "{:<4}  {:<4}  {:>5}  {:<4}  {:<23}  {cycles}",
            def.name,
            def.axis.name(),
            mv.slice_coordinate(),
            mv.direction_label(),
            def.transformation,
        );
    }
}
