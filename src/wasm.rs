use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use crate::detection::FrameDetections;
use crate::round::RoundConfig;
use crate::session::TrickSession;
use crate::trick::Slot;
use crate::{overlay, Card, Suit};

#[wasm_bindgen]
pub struct WasmTrickTracker {
    inner: TrickSession,
}

#[derive(Serialize)]
pub struct JsTrick {
    cards: Vec<Card>,
    winner: Option<Slot>,
    lead_suit: Option<Suit>,
}

#[wasm_bindgen]
impl WasmTrickTracker {
    #[wasm_bindgen(constructor)]
    pub fn new(trump: &str, first_leader: usize) -> Result<WasmTrickTracker, JsValue> {
        let trump: Suit = trump.parse().map_err(|e| JsValue::from_str(&format!("{e}")))?;
        Ok(WasmTrickTracker {
            inner: TrickSession::new(RoundConfig {
                trump,
                first_leader,
            }),
        })
    }

    /// Feed the labels recognized in one frame. Returns the number of tricks
    /// completed by this frame.
    pub fn feed_frame(&mut self, labels: Vec<String>) -> usize {
        let events = self.inner.feed_frame(&FrameDetections::from_labels(&labels));
        events
            .iter()
            .filter(|e| matches!(e, crate::session::TrickEvent::TrickComplete { .. }))
            .count()
    }

    pub fn trick(&self) -> Result<JsValue, JsValue> {
        let state = self.inner.display_trick();
        let js = JsTrick {
            cards: state.played().to_vec(),
            winner: state.winner(),
            lead_suit: state.lead_suit(),
        };
        swb::to_value(&js).map_err(Into::into)
    }

    pub fn overlay_lines(&self) -> Vec<String> {
        overlay::render(self.inner.display_trick())
    }

    pub fn team_tricks(&self) -> Vec<usize> {
        self.inner.round().team_tricks().to_vec()
    }
}
