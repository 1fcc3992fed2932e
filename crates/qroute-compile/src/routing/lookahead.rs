//! Lookahead heuristic for choosing which endpoint of a blocked two-qubit
//! operation moves.

use rand::Rng;
use serde::{Deserialize, Serialize};

use qroute_ir::QubitId;

/// How the endpoints of a non-adjacent two-qubit operation are brought
/// together along a shortest path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    /// The target walks up to the control; the control stays put.
    MoveTarget,
    /// The control walks up to the target; the target stays put.
    MoveControl,
    /// Both walk toward the middle of the path.
    MeetHalfway,
}

impl Movement {
    /// Every movement, in the order used for random picks.
    pub const ALL: [Movement; 3] = [
        Movement::MoveTarget,
        Movement::MoveControl,
        Movement::MeetHalfway,
    ];

    /// Split `hops` (the number of SWAPs needed, `distance - 1`) into
    /// `(control_hops, target_hops)`. An odd split gives the control the
    /// extra hop.
    pub fn split(self, hops: usize) -> (usize, usize) {
        match self {
            Movement::MoveTarget => (0, hops),
            Movement::MoveControl => (hops, 0),
            Movement::MeetHalfway => (hops.div_ceil(2), hops / 2),
        }
    }
}

/// Counts how often the two endpoints are reused in the next `window`
/// two-qubit operations and keeps the one reused sooner in place.
///
/// Decision rule, for reuse counts `c` (control) and `t` (target):
///
/// | Condition | Movement |
/// |-----------|----------|
/// | `c == t`, or both below `significance` | random among all three |
/// | `c > t + margin` | [`Movement::MoveTarget`] |
/// | `t > c + margin` | [`Movement::MoveControl`] |
/// | otherwise | [`Movement::MeetHalfway`] |
///
/// Reuse is a plain count; distance within the window does not weigh in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookaheadHeuristic {
    /// Number of upcoming two-qubit operations inspected.
    pub window: usize,
    /// Reuse counts below this are treated as "not reused".
    pub significance: usize,
    /// How far one count must exceed the other to dominate.
    pub margin: usize,
}

impl Default for LookaheadHeuristic {
    fn default() -> Self {
        Self {
            window: 10,
            significance: 1,
            margin: 0,
        }
    }
}

impl LookaheadHeuristic {
    /// Create a heuristic with the given window and default thresholds.
    pub fn with_window(window: usize) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    /// Number of operations in `pairs[index + 1 ..= index + window]` that
    /// touch `qubit`.
    pub fn reuse(&self, pairs: &[(QubitId, QubitId)], index: usize, qubit: QubitId) -> usize {
        let start = (index + 1).min(pairs.len());
        let end = index.saturating_add(self.window).saturating_add(1).min(pairs.len());
        pairs[start..end]
            .iter()
            .filter(|&&(a, b)| a == qubit || b == qubit)
            .count()
    }

    /// Deterministic part of the rule. `None` means neither endpoint
    /// dominates and the caller should pick at random.
    pub fn decide(&self, control_reuse: usize, target_reuse: usize) -> Option<Movement> {
        let both_low = control_reuse < self.significance && target_reuse < self.significance;
        if both_low || control_reuse == target_reuse {
            None
        } else if control_reuse > target_reuse + self.margin {
            Some(Movement::MoveTarget)
        } else if target_reuse > control_reuse + self.margin {
            Some(Movement::MoveControl)
        } else {
            Some(Movement::MeetHalfway)
        }
    }

    /// Choose a movement for the blocked operation `pairs[index]`.
    pub fn choose<R: Rng + ?Sized>(
        &self,
        pairs: &[(QubitId, QubitId)],
        index: usize,
        rng: &mut R,
    ) -> Movement {
        let (control, target) = pairs[index];
        let control_reuse = self.reuse(pairs, index, control);
        let target_reuse = self.reuse(pairs, index, target);
        self.decide(control_reuse, target_reuse)
            .unwrap_or_else(|| Movement::ALL[rng.gen_range(0..Movement::ALL.len())])
    }
}
