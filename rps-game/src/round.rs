//! Rock/paper/scissors round resolution feeding the score ledger.
use crate::score::Outcome;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    /// Button order on the game board.
    pub const ALL: [Self; 3] = [Self::Rock, Self::Paper, Self::Scissors];

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub const fn beats(self) -> Self {
        match self {
            Self::Rock => Self::Scissors,
            Self::Paper => Self::Rock,
            Self::Scissors => Self::Paper,
        }
    }

    /// Outcome for `self` played against `other`.
    #[must_use]
    pub fn against(self, other: Self) -> Outcome {
        if self == other {
            Outcome::Draw
        } else if self.beats() == other {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }

    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Rock => "🪨",
            Self::Paper => "📄",
            Self::Scissors => "✂️",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Paper => "paper",
            Self::Scissors => "scissors",
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown move `{0}`")]
pub struct UnknownMove(pub String);

impl FromStr for Move {
    type Err = UnknownMove;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|mv| mv.as_str().eq_ignore_ascii_case(needle) || mv.glyph() == needle)
            .ok_or_else(|| UnknownMove(s.to_string()))
    }
}

/// A resolved round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub player: Move,
    pub computer: Move,
    pub outcome: Outcome,
}

impl Round {
    #[must_use]
    pub fn between(player: Move, computer: Move) -> Self {
        Self {
            player,
            computer,
            outcome: player.against(computer),
        }
    }

    /// Headline shown in the result box.
    #[must_use]
    pub const fn headline(&self) -> &'static str {
        match self.outcome {
            Outcome::Win => "YOU WIN!",
            Outcome::Loss => "YOU LOSE!",
            Outcome::Draw => "DRAW!",
        }
    }

    #[must_use]
    pub fn summary(&self) -> String {
        match self.outcome {
            Outcome::Win => format!("{} beats {}", self.player, self.computer),
            Outcome::Loss => format!("{} beats {}", self.computer, self.player),
            Outcome::Draw => format!("both picked {}", self.player),
        }
    }
}

/// Play `player` against a uniformly random computer move.
pub fn play_round(player: Move, rng: &mut impl Rng) -> Round {
    Round::between(player, Move::random(rng))
}
