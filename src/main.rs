use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use log::info;

use tarneeb::detection::{read_frames, FrameDetections};
use tarneeb::overlay;
use tarneeb::round::{RoundConfig, TRICKS_PER_ROUND};
use tarneeb::session::{spawn_tracker, TrickEvent, TrickSession};
use tarneeb::simulate::Simulator;
use tarneeb::Suit;

const CHANNEL_CAPACITY: usize = 8;

/// Tracks the winner of Tarneeb tricks from card detections.
#[derive(Parser)]
#[command(name = "tarneeb")]
struct Cli {
    /// Trump suit for the round (letter or name).
    #[arg(long, default_value = "D")]
    trump: Suit,

    /// Seat (0-3) leading the first trick.
    #[arg(long, default_value = "0")]
    first_leader: usize,

    /// Ignore detections scored below this confidence (0.0-1.0).
    #[arg(long, default_value = "0.25")]
    min_confidence: f32,

    /// Print the round report as JSON instead of overlay lines.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a detection log, one frame per line ("-" for stdin).
    Replay { input: PathBuf },
    /// Play out a shuffled deal through a simulated detector.
    Simulate {
        #[arg(long, default_value = "13")]
        tricks: usize,
        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if cli.first_leader > 3 {
        return Err(format!("--first-leader must be 0-3, got {}", cli.first_leader).into());
    }
    let config = RoundConfig {
        trump: cli.trump,
        first_leader: cli.first_leader,
    };

    let frames = match cli.command {
        Command::Replay { ref input } => load_frames(input)?,
        Command::Simulate { tricks, seed } => {
            if tricks == 0 || tricks > TRICKS_PER_ROUND {
                return Err(format!("--tricks must be 1-{TRICKS_PER_ROUND}, got {tricks}").into());
            }
            let (cards, frames) = Simulator::new(seed).deal_round(tricks);
            info!("simulated {} cards over {} frames", cards.len(), frames.len());
            frames
        }
    };
    info!("trump is {}", config.trump);

    let (frame_tx, frame_rx) = crossbeam_channel::bounded(CHANNEL_CAPACITY);
    let (event_tx, event_rx) = crossbeam_channel::bounded(CHANNEL_CAPACITY);
    let tracker = spawn_tracker(TrickSession::new(config), frame_rx, event_tx);

    let min_confidence = cli.min_confidence;
    let producer = std::thread::spawn(move || {
        for frame in frames {
            if frame_tx.send(frame.above(min_confidence)).is_err() {
                break;
            }
        }
    });

    for event in event_rx {
        if !cli.json {
            print_event(&event);
        }
    }

    producer.join().map_err(|_| "frame producer panicked")?;
    let session = tracker.join().map_err(|_| "trick tracker panicked")?;

    if cli.json {
        let mut reports = session.finished_rounds().to_vec();
        if !session.round().history().is_empty() {
            reports.push(session.round().report());
        }
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for line in overlay::render(session.display_trick()) {
            println!("{line}");
        }
    }
    Ok(())
}

fn load_frames(input: &Path) -> Result<Vec<FrameDetections>, Box<dyn std::error::Error>> {
    let frames = if input.as_os_str() == "-" {
        read_frames(io::stdin().lock())?
    } else {
        read_frames(BufReader::new(File::open(input)?))?
    };
    Ok(frames)
}

fn print_event(event: &TrickEvent) {
    match event {
        TrickEvent::CardPlayed {
            trick,
            slot,
            seat,
            card,
        } => println!("Trick {trick}: {slot} Player (seat {}) plays {card}", seat + 1),
        TrickEvent::LeaderChanged { trick, slot, .. } => {
            println!("Trick {trick}: Winner IS: {slot}")
        }
        TrickEvent::TrickComplete { trick, result } => println!(
            "Trick {trick} won by {} Player (seat {})\n",
            result.winner,
            result.winner_seat + 1
        ),
        TrickEvent::RoundComplete(report) => println!(
            "Round over. Team 1: {} tricks, Team 2: {} tricks",
            report.team_tricks[0], report.team_tricks[1]
        ),
        TrickEvent::LabelRejected(_) | TrickEvent::DuplicateIgnored(_) => {}
    }
}
