use tracing::debug;

use crate::config::{SamplingMode, WindowConfig};

/// Outcome of evaluating one delivered batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Skip,
    /// Keep tracing inside the window that is already open.
    Sample,
    /// A window just opened; `instructions` is the count before this batch.
    OpenWindow { instructions: u64 },
}

impl Decision {
    pub fn is_sample(&self) -> bool {
        !matches!(self, Decision::Skip)
    }
}

/// Decides, batch by batch, which parts of a stream get persisted.
#[derive(Debug, Clone)]
pub struct SamplingPolicy {
    mode: SamplingMode,
    instructions: u64,
    sampling: bool,
}

impl SamplingPolicy {
    pub fn new(mode: SamplingMode) -> Self {
        Self {
            mode,
            instructions: 0,
            sampling: false,
        }
    }

    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    pub fn is_sampling(&self) -> bool {
        self.sampling
    }

    /// Evaluates the batch against the count seen so far, then adds its length.
    pub fn decide(&mut self, batch_len: u64) -> Decision {
        let wanted = match self.mode {
            SamplingMode::Disabled => false,
            SamplingMode::Full => true,
            SamplingMode::Windowed(window) => in_snippet(&window, self.instructions),
        };

        let decision = match (wanted, self.sampling) {
            (false, was) => {
                if was {
                    debug!(instructions = self.instructions, "sampling window closed");
                }
                Decision::Skip
            }
            (true, true) => Decision::Sample,
            (true, false) => {
                debug!(instructions = self.instructions, "sampling window opened");
                Decision::OpenWindow {
                    instructions: self.instructions,
                }
            }
        };

        self.sampling = wanted;
        self.instructions = self.instructions.saturating_add(batch_len);
        decision
    }
}

/// True when instruction index `seen` falls inside the traced snippet of one of the windows.
pub fn in_snippet(window: &WindowConfig, seen: u64) -> bool {
    if seen < window.warmup || window.interval == 0 {
        return false;
    }
    let elapsed = seen - window.warmup;
    let index = elapsed / window.interval;
    if index >= window.count {
        return false;
    }
    let start = index * window.interval;
    elapsed < start.saturating_add(window.snippet)
}
