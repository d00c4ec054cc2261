//! Score boxes and the round result panel.
use crate::dom;
use rps_game::{Round, ScoreSnapshot};
use web_sys::{Document, Element};

const SESSION_IDS: [&str; 3] = ["sessionWins", "sessionLosses", "sessionDraws"];
const ALL_TIME_IDS: [&str; 3] = ["allTimeWins", "allTimeLosses", "allTimeDraws"];

/// Text for each score cell, keyed by element id.
#[must_use]
pub fn score_cells(scores: &ScoreSnapshot) -> [(&'static str, String); 6] {
    let s = scores.session;
    let a = scores.all_time;
    [
        (SESSION_IDS[0], s.wins.to_string()),
        (SESSION_IDS[1], s.losses.to_string()),
        (SESSION_IDS[2], s.draws.to_string()),
        (ALL_TIME_IDS[0], a.wins.to_string()),
        (ALL_TIME_IDS[1], a.losses.to_string()),
        (ALL_TIME_IDS[2], a.draws.to_string()),
    ]
}

/// Missing cells are skipped; the page still plays without them.
pub struct Scoreboard {
    cells: Vec<(&'static str, Element)>,
    player_choice: Option<Element>,
    computer_choice: Option<Element>,
    headline: Option<Element>,
    summary: Option<Element>,
}

impl Scoreboard {
    #[must_use]
    pub fn bind(doc: &Document) -> Self {
        let cells = SESSION_IDS
            .iter()
            .chain(ALL_TIME_IDS.iter())
            .filter_map(|id| doc.get_element_by_id(id).map(|el| (*id, el)))
            .collect();
        Self {
            cells,
            player_choice: doc.get_element_by_id("playerChoice"),
            computer_choice: doc.get_element_by_id("computerChoice"),
            headline: dom::query(doc, ".result h2"),
            summary: dom::query(doc, ".result p"),
        }
    }

    pub fn render_scores(&self, scores: &ScoreSnapshot) {
        for (id, text) in score_cells(scores) {
            if let Some((_, el)) = self.cells.iter().find(|(cell, _)| *cell == id) {
                el.set_text_content(Some(&text));
            }
        }
    }

    pub fn render_round(&self, round: &Round) {
        let slots = [
            (&self.player_choice, round.player.glyph().to_owned()),
            (&self.computer_choice, round.computer.glyph().to_owned()),
            (&self.headline, round.headline().to_owned()),
            (&self.summary, round.summary()),
        ];
        for (slot, text) in slots {
            if let Some(el) = slot {
                el.set_text_content(Some(&text));
            }
        }
    }
}
