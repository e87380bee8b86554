use crate::SiteOutcome;

/// Outcomes accumulated during a run, aligned 1:1 with the input sites.
///
/// Slots fill strictly front to back, one batch at a time; a filled slot is
/// never overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchState {
    outcomes: Vec<Option<SiteOutcome>>,
    completed: usize,
}

impl BatchState {
    pub fn new(total: usize) -> Self {
        Self {
            outcomes: vec![None; total],
            completed: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn is_finished(&self) -> bool {
        self.completed == self.outcomes.len()
    }

    /// Outcome for the site at `index`, or `None` while it is still pending.
    pub fn outcome(&self, index: usize) -> Option<&SiteOutcome> {
        self.outcomes.get(index).and_then(Option::as_ref)
    }

    pub fn outcomes(&self) -> impl Iterator<Item = Option<&SiteOutcome>> {
        self.outcomes.iter().map(Option::as_ref)
    }

    /// Append the outcomes of the next batch. Outcomes beyond the remaining
    /// capacity are ignored. Returns the number of slots filled.
    pub fn record_batch(&mut self, batch: Vec<SiteOutcome>) -> usize {
        let start = self.completed;
        let mut filled = 0;
        for (slot, outcome) in self.outcomes[start..].iter_mut().zip(batch) {
            *slot = Some(outcome);
            filled += 1;
        }
        self.completed += filled;
        filled
    }

    /// Consume the state, returning the finished outcomes in input order.
    pub fn into_outcomes(self) -> Vec<SiteOutcome> {
        self.outcomes.into_iter().flatten().collect()
    }
}
