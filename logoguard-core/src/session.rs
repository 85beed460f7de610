//! Per-session legitimacy counts.
//!
//! A tally belongs to one caller session and is passed around explicitly;
//! concurrent sessions each own their own tally.

use serde::{Deserialize, Serialize};

use crate::matcher::MatchResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTally {
    legitimate: u64,
    non_legitimate: u64,
}

impl SessionTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a match result. Results without any match are not counted.
    pub fn record(&mut self, result: &MatchResult) {
        if !result.has_match() {
            return;
        }
        if result.is_legitimate {
            self.legitimate += 1;
        } else {
            self.non_legitimate += 1;
        }
    }

    pub fn legitimate(&self) -> u64 {
        self.legitimate
    }

    pub fn non_legitimate(&self) -> u64 {
        self.non_legitimate
    }

    pub fn total(&self) -> u64 {
        self.legitimate + self.non_legitimate
    }
}
