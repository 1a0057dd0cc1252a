use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info, warn};

use crate::detection::FrameDetections;
use crate::round::{CompletedTrick, RoundConfig, RoundController, RoundReport};
use crate::trick::{Slot, TrickState, Transition, PLAYERS};
use crate::Card;

/// Notifications for whatever renders or reports the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrickEvent {
    CardPlayed {
        trick: usize,
        slot: Slot,
        seat: usize,
        card: Card,
    },
    /// `slot` now holds the trick.
    LeaderChanged { trick: usize, slot: Slot, seat: usize },
    TrickComplete { trick: usize, result: CompletedTrick },
    RoundComplete(RoundReport),
    LabelRejected(String),
    DuplicateIgnored(Card),
}

/// Drives trick evaluation from per-frame detector output.
///
/// A card seen in an earlier trick of the round is still on the table in
/// later frames; those detections are treated as duplicates. The last trick of
/// a round is carried into the next round the same way until a frame shows
/// none of its cards.
pub struct TrickSession {
    config: RoundConfig,
    round: RoundController,
    current: TrickState,
    last_completed: Option<TrickState>,
    carried_over: Vec<Card>,
    finished_rounds: Vec<RoundReport>,
}

impl TrickSession {
    pub fn new(mut config: RoundConfig) -> Self {
        config.first_leader %= PLAYERS;
        let round = RoundController::new(config);
        let current = round.start_new_trick();
        Self {
            config,
            round,
            current,
            last_completed: None,
            carried_over: Vec::new(),
            finished_rounds: Vec::new(),
        }
    }

    pub fn round(&self) -> &RoundController {
        &self.round
    }

    pub fn current_trick(&self) -> &TrickState {
        &self.current
    }

    /// Trick to show on screen: the one in progress, or the last finished
    /// trick until the next one gets its first card.
    pub fn display_trick(&self) -> &TrickState {
        match &self.last_completed {
            Some(done) if self.current.played().is_empty() => done,
            _ => &self.current,
        }
    }

    pub fn finished_rounds(&self) -> &[RoundReport] {
        &self.finished_rounds
    }

    pub fn feed_frame(&mut self, frame: &FrameDetections) -> Vec<TrickEvent> {
        if !self.carried_over.is_empty() {
            let still_visible = frame
                .labels()
                .filter_map(|l| l.parse::<Card>().ok())
                .any(|c| self.carried_over.contains(&c));
            if !still_visible {
                debug!("table cleared, previous round cards no longer visible");
                self.carried_over.clear();
            }
        }

        let mut events = Vec::new();
        for label in frame.labels() {
            self.feed_label(label, &mut events);
        }
        events
    }

    pub fn feed_label(&mut self, label: &str, events: &mut Vec<TrickEvent>) {
        let card = match label.parse::<Card>() {
            Ok(card) => card,
            Err(e) => {
                warn!("{}, skipping", e);
                events.push(TrickEvent::LabelRejected(label.to_string()));
                return;
            }
        };
        if self.round.already_played(&card) || self.carried_over.contains(&card) {
            events.push(TrickEvent::DuplicateIgnored(card));
            return;
        }

        let trick = self.round.history().len() + 1;
        let transition = match self.round.evaluator().apply(&mut self.current, card) {
            Ok(t) => t,
            Err(e) => {
                // the session closes every trick on its fourth card
                error!("trick {}: {}", trick, e);
                return;
            }
        };
        let (slot, winner, overtook, complete) = match transition {
            Transition::DuplicateIgnored(c) => {
                events.push(TrickEvent::DuplicateIgnored(c));
                return;
            }
            Transition::Played {
                slot,
                winner,
                overtook,
            } => (slot, winner, overtook, false),
            Transition::Completed { winner, overtook } => (Slot::Fourth, winner, overtook, true),
        };

        events.push(TrickEvent::CardPlayed {
            trick,
            slot,
            seat: self.round.seat_of(slot),
            card,
        });
        if overtook {
            events.push(TrickEvent::LeaderChanged {
                trick,
                slot: winner,
                seat: self.round.seat_of(winner),
            });
        }
        if complete {
            self.finish_trick(trick, events);
        }
    }

    fn finish_trick(&mut self, trick: usize, events: &mut Vec<TrickEvent>) {
        let done = std::mem::replace(&mut self.current, self.round.start_new_trick());
        self.last_completed = Some(done.clone());
        match self.round.record_completed_trick(done) {
            Ok(result) => events.push(TrickEvent::TrickComplete {
                trick,
                result: result.clone(),
            }),
            Err(e) => {
                error!("trick {}: {}", trick, e);
                return;
            }
        }

        if self.round.is_complete() {
            let report = self.round.report();
            info!(
                "round over, team tricks {}-{}",
                report.team_tricks[0], report.team_tricks[1]
            );
            self.carried_over = self
                .last_completed
                .as_ref()
                .map(|t| t.played().to_vec())
                .unwrap_or_default();
            self.config.first_leader = (self.config.first_leader + 1) % PLAYERS;
            self.round = RoundController::new(self.config);
            events.push(TrickEvent::RoundComplete(report.clone()));
            self.finished_rounds.push(report);
        }
    }
}

/// Run `session` on its own thread between two channels.
///
/// The thread stops when the frame channel closes or nobody listens for
/// events, and hands the session back for final reporting.
pub fn spawn_tracker(
    mut session: TrickSession,
    frame_rx: Receiver<FrameDetections>,
    event_tx: Sender<TrickEvent>,
) -> JoinHandle<TrickSession> {
    std::thread::spawn(move || {
        'frames: for frame in frame_rx {
            for event in session.feed_frame(&frame) {
                if event_tx.send(event).is_err() {
                    break 'frames;
                }
            }
        }
        session
    })
}
