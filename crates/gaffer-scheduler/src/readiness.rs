//! Readiness state machine: decides when hourly polling for a finished
//! gameweek should start and stop. Pure; the owning process wires the
//! transitions to the task registry.

use chrono::{DateTime, Duration, NaiveTime, Utc};

/// Polling states. Re-entered daily: `Idle → Watching → Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Idle,
    Watching,
}

/// What to do after an hourly provider signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchAction {
    /// Not settled yet; keep the hourly task registered.
    Stay,
    /// Settled: run the full pipeline chain for this gameweek, then
    /// deregister the hourly task.
    RunChain { gameweek: i32 },
}

/// The midnight by which a gameweek that kicked off last at `last_kickoff`
/// has plausibly completed: a day later, rounded down to midnight.
pub fn completion_boundary(last_kickoff: DateTime<Utc>) -> DateTime<Utc> {
    (last_kickoff + Duration::hours(24))
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc()
}

#[derive(Debug)]
pub struct ReadinessMachine {
    state: Readiness,
}

impl Default for ReadinessMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadinessMachine {
    pub fn new() -> Self {
        Self {
            state: Readiness::Idle,
        }
    }

    pub fn state(&self) -> Readiness {
        self.state
    }

    /// Daily transition. Returns true when some gameweek's completion
    /// boundary is today, meaning the hourly task must be registered.
    /// A day with no boundary leaves the current state untouched.
    pub fn daily_check(
        &mut self,
        today_midnight: DateTime<Utc>,
        latest_kickoffs: &[(i32, DateTime<Utc>)],
    ) -> bool {
        let due = latest_kickoffs
            .iter()
            .any(|&(_, kickoff)| completion_boundary(kickoff) == today_midnight);
        if due {
            self.state = Readiness::Watching;
        }
        due
    }

    /// Hourly transition on the provider's settlement signal.
    pub fn observe_status(&mut self, updated: bool, gameweek: i32) -> WatchAction {
        if updated {
            self.state = Readiness::Idle;
            WatchAction::RunChain { gameweek }
        } else {
            WatchAction::Stay
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_boundary_rounds_up_to_next_midnight() {
        let kickoff = utc(2024, 3, 2, 15, 0);
        assert_eq!(completion_boundary(kickoff), utc(2024, 3, 3, 0, 0));
    }

    #[test]
    fn test_daily_check_watches_on_boundary_day() {
        let mut machine = ReadinessMachine::new();
        let kickoffs = [(27, utc(2024, 3, 2, 15, 0))];

        let due = machine.daily_check(utc(2024, 3, 3, 0, 0), &kickoffs);
        assert!(due);
        assert_eq!(machine.state(), Readiness::Watching);
    }

    #[test]
    fn test_daily_check_stays_idle_off_boundary_day() {
        let mut machine = ReadinessMachine::new();
        let kickoffs = [(27, utc(2024, 3, 2, 15, 0))];

        let due = machine.daily_check(utc(2024, 3, 4, 0, 0), &kickoffs);
        assert!(!due);
        assert_eq!(machine.state(), Readiness::Idle);
    }

    #[test]
    fn test_updated_status_triggers_chain_and_idles() {
        let mut machine = ReadinessMachine::new();
        machine.daily_check(utc(2024, 3, 3, 0, 0), &[(27, utc(2024, 3, 2, 15, 0))]);

        assert_eq!(machine.observe_status(false, 27), WatchAction::Stay);
        assert_eq!(machine.state(), Readiness::Watching);

        assert_eq!(
            machine.observe_status(true, 27),
            WatchAction::RunChain { gameweek: 27 }
        );
        assert_eq!(machine.state(), Readiness::Idle);
    }
}
