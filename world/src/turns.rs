//! Turn order bookkeeping.

use diplomacy_core::Team;

/// Summary of a single call to [`TurnCycle::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnChange {
    /// Team that was active before the advance.
    pub previous: Option<Team>,
    /// Team that is active after the advance.
    pub team: Team,
    /// Completed rounds after the advance.
    pub round: u32,
    /// Whether this advance wrapped from the last team back to the first.
    pub completed_round: bool,
}

/// Cyclic team order with a round counter and the placement phase flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnCycle {
    current: Option<Team>,
    round: u32,
    placement_phase: bool,
}

impl TurnCycle {
    /// Creates a cycle with no active team.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: None,
            round: 0,
            placement_phase: false,
        }
    }

    /// Team whose turn it is, `None` before the first advance.
    #[must_use]
    pub const fn current_team(&self) -> Option<Team> {
        self.current
    }

    /// Number of completed rounds.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Whether every turn now starts with a piece to place.
    ///
    /// Becomes `true` the first time the order wraps back to red and never
    /// resets.
    #[must_use]
    pub const fn placement_phase_active(&self) -> bool {
        self.placement_phase
    }

    /// Hands the turn to the next team.
    pub fn advance(&mut self) -> TurnChange {
        let previous = self.current;
        let Some(active) = previous else {
            self.current = Some(Team::Red);
            return TurnChange {
                previous,
                team: Team::Red,
                round: self.round,
                completed_round: false,
            };
        };

        let team = active.successor();
        let completed_round = team == Team::ALL[0];
        if completed_round {
            self.round = self.round.saturating_add(1);
            self.placement_phase = true;
        }
        self.current = Some(team);

        TurnChange {
            previous,
            team,
            round: self.round,
            completed_round,
        }
    }
}
