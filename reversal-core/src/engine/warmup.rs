/// Tracks how many closed bars have been observed against the number the
/// slowest indicator needs.
#[derive(Debug, Clone)]
pub struct WarmupState {
    warmup_bars: usize,
    bars_observed: usize,
}

impl WarmupState {
    pub fn new(warmup_bars: usize) -> Self {
        Self {
            warmup_bars,
            bars_observed: 0,
        }
    }

    /// Record that `closed_bars` bars are now closed. Never moves backwards.
    pub fn observe(&mut self, closed_bars: usize) {
        self.bars_observed = self.bars_observed.max(closed_bars);
    }

    pub fn bars_observed(&self) -> usize {
        self.bars_observed
    }

    pub fn is_warm(&self) -> bool {
        self.bars_observed >= self.warmup_bars
    }

    pub fn bars_until_warm(&self) -> usize {
        self.warmup_bars.saturating_sub(self.bars_observed)
    }
}
