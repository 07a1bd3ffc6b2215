use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

use crate::types::StreamId;

/// Records per capture buffer: 1024 pages of 32-byte records.
pub const DEFAULT_BUFFER_RECORDS: usize = 131_072;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("window interval must be non-zero when windowed sampling is enabled")]
    ZeroInterval,
    #[error("capture buffer must hold at least one record")]
    ZeroBuffer,
}

/// SMARTS-style window parameters, all counted in instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    pub warmup: u64,
    pub interval: u64,
    pub count: u64,
    pub snippet: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            warmup: 10_000,
            interval: 20_000,
            count: 10,
            snippet: 1_000,
        }
    }
}

/// Which streams get traced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StreamFilter {
    #[default]
    All,
    Only(BTreeSet<StreamId>),
}

impl StreamFilter {
    pub fn accepts(&self, stream: StreamId) -> bool {
        match self {
            StreamFilter::All => true,
            StreamFilter::Only(ids) => ids.contains(&stream),
        }
    }
}

impl FromIterator<StreamId> for StreamFilter {
    fn from_iter<I: IntoIterator<Item = StreamId>>(iter: I) -> Self {
        let ids: BTreeSet<StreamId> = iter.into_iter().collect();
        if ids.is_empty() {
            StreamFilter::All
        } else {
            StreamFilter::Only(ids)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingMode {
    Disabled,
    Full,
    Windowed(WindowConfig),
}

/// Process-wide tracing configuration. Built once, then shared by reference.
#[derive(Debug, Clone)]
pub struct TraceConfig {
    pub emit: bool,
    pub windowed: bool,
    pub window: WindowConfig,
    pub output_base: PathBuf,
    pub buffer_records: usize,
    pub streams: StreamFilter,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            emit: false,
            windowed: false,
            window: WindowConfig::default(),
            output_base: PathBuf::from("trace_gen.out"),
            buffer_records: DEFAULT_BUFFER_RECORDS,
            streams: StreamFilter::All,
        }
    }
}

impl TraceConfig {
    pub fn mode(&self) -> SamplingMode {
        match (self.emit, self.windowed) {
            (false, _) => SamplingMode::Disabled,
            (true, false) => SamplingMode::Full,
            (true, true) => SamplingMode::Windowed(self.window),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_records == 0 {
            return Err(ConfigError::ZeroBuffer);
        }
        if self.windowed {
            if self.window.interval == 0 {
                return Err(ConfigError::ZeroInterval);
            }
            if self.window.snippet > self.window.interval {
                warn!(
                    snippet = self.window.snippet,
                    interval = self.window.interval,
                    "snippet is longer than the window interval, every window will be traced in full"
                );
            }
        }
        Ok(())
    }
}
