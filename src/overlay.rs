use crate::trick::{Slot, TrickState};

/// Text lines drawn over the video frame for the trick in progress.
pub fn render(state: &TrickState) -> Vec<String> {
    let winner = state
        .winner()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "__".to_string());
    let mut lines = vec![format!("Winner IS: {}", winner)];
    for slot in Slot::ALL {
        if let Some(card) = state.card_at(slot) {
            lines.push(format!("{} Player: {}", slot, card));
        }
    }
    lines
}
