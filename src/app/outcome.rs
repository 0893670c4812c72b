use chrono::NaiveDate;

use super::matching::MatchResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum VideoOutcome {
    Downloaded,
    AlreadyInLedger,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AudioOutcome {
    Downloaded(u64),
    Unavailable,
    /// Local copy exists; the rest of the week is not processed.
    AlreadyPresent,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RetentionOutcome {
    Kept,
    Removed,
    Untouched,
    Failed(String),
}

#[derive(Debug, Default)]
pub(crate) struct VideoReport {
    pub(crate) channels_searched: usize,
    pub(crate) channels_failed: usize,
    pub(crate) outcomes: Vec<(MatchResult, VideoOutcome)>,
}

impl VideoReport {
    pub(crate) fn count(&self, pred: impl Fn(&VideoOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, outcome)| pred(outcome)).count()
    }
}

#[derive(Debug, Default)]
pub(crate) struct AudioReport {
    pub(crate) outcomes: Vec<(NaiveDate, AudioOutcome)>,
}

impl AudioReport {
    pub(crate) fn count(&self, pred: impl Fn(&AudioOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, outcome)| pred(outcome)).count()
    }

    pub(crate) fn stopped_early(&self) -> bool {
        matches!(
            self.outcomes.last(),
            Some((_, AudioOutcome::AlreadyPresent))
        )
    }
}

#[derive(Debug, Default)]
pub(crate) struct RetentionReport {
    pub(crate) outcomes: Vec<(String, RetentionOutcome)>,
}

impl RetentionReport {
    pub(crate) fn count(&self, pred: impl Fn(&RetentionOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, outcome)| pred(outcome)).count()
    }
}
