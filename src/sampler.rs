use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::clock::{Clock, SystemClock, Timestamp};
use crate::config::{SamplingMode, TraceConfig};
use crate::error::TraceError;
use crate::policy::{Decision, SamplingPolicy};
use crate::types::{AttributeRecord, StreamId};
use crate::writer::{output_path, TraceWriter};

/// What one stream did over its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamStats {
    pub stream: StreamId,
    pub instructions: u64,
    pub batches: u64,
    pub sampled_batches: u64,
    pub records_written: u64,
    pub windows_opened: u64,
    pub output: Option<PathBuf>,
}

struct StreamTracer {
    policy: SamplingPolicy,
    path: PathBuf,
    writer: Option<TraceWriter<BufWriter<File>>>,
    last_batch: Timestamp,
    batches: u64,
    sampled_batches: u64,
    failed: bool,
}

impl StreamTracer {
    /// Writes the header (when a window opens) and the batch for a sampled decision.
    fn persist(
        &mut self,
        stream: StreamId,
        decision: Decision,
        records: &[AttributeRecord],
    ) -> Result<(), TraceError> {
        if !decision.is_sample() {
            return Ok(());
        }
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => {
                info!(stream, path = %self.path.display(), "opening trace file");
                TraceWriter::create(self.path.clone())?
            }
        };
        let writer = self.writer.insert(writer);
        if let Decision::OpenWindow { instructions } = decision {
            writer.write_header(self.last_batch, instructions)?;
        }
        writer.emit(records)?;
        self.sampled_batches += 1;
        Ok(())
    }

    fn stats(&self, stream: StreamId) -> StreamStats {
        StreamStats {
            stream,
            instructions: self.policy.instructions(),
            batches: self.batches,
            sampled_batches: self.sampled_batches,
            records_written: self.writer.as_ref().map_or(0, |w| w.records_written()),
            windows_opened: self.writer.as_ref().map_or(0, |w| w.headers_written()),
            output: self.writer.as_ref().map(|w| w.path().to_path_buf()),
        }
    }
}

/// Owns the per-stream policy and trace file for every running stream.
pub struct Sampler<'a, C: Clock = SystemClock> {
    config: &'a TraceConfig,
    clock: C,
    pid: u32,
    streams: HashMap<StreamId, StreamTracer>,
    finished: Vec<StreamStats>,
}

impl<'a> Sampler<'a, SystemClock> {
    pub fn new(config: &'a TraceConfig) -> Result<Self, TraceError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<'a, C: Clock> Sampler<'a, C> {
    pub fn with_clock(config: &'a TraceConfig, clock: C) -> Result<Self, TraceError> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            pid: std::process::id(),
            streams: HashMap::new(),
            finished: Vec::new(),
        })
    }

    pub fn config(&self) -> &'a TraceConfig {
        self.config
    }

    pub fn is_running(&self, stream: StreamId) -> bool {
        self.streams.contains_key(&stream)
    }

    pub fn start_stream(&mut self, stream: StreamId) -> Result<(), TraceError> {
        if self.streams.contains_key(&stream) {
            return Err(TraceError::DuplicateStream(stream));
        }
        let mode = if self.config.streams.accepts(stream) {
            self.config.mode()
        } else {
            SamplingMode::Disabled
        };
        info!(stream, ?mode, "stream started");
        self.streams.insert(
            stream,
            StreamTracer {
                policy: SamplingPolicy::new(mode),
                path: output_path(&self.config.output_base, self.pid, stream),
                writer: None,
                last_batch: self.clock.now(),
                batches: 0,
                sampled_batches: 0,
                failed: false,
            },
        );
        Ok(())
    }

    /// Runs one full (or final partial) capture buffer through the policy and,
    /// when sampled, into the stream's trace file.
    pub fn deliver_batch(
        &mut self,
        stream: StreamId,
        records: &[AttributeRecord],
    ) -> Result<Decision, TraceError> {
        let tracer = self
            .streams
            .get_mut(&stream)
            .ok_or(TraceError::UnknownStream(stream))?;

        if tracer.failed {
            return Err(TraceError::Halted {
                stream,
                path: tracer.path.clone(),
            });
        }

        let decision = tracer.policy.decide(records.len() as u64);
        if let Err(err) = tracer.persist(stream, decision, records) {
            tracer.failed = true;
            return Err(err);
        }

        tracer.last_batch = self.clock.now();
        tracer.batches += 1;
        debug!(stream, len = records.len(), ?decision, "batch delivered");
        Ok(decision)
    }

    /// Flushes and closes the stream's trace file.
    pub fn end_stream(&mut self, stream: StreamId) -> Result<StreamStats, TraceError> {
        let mut tracer = self
            .streams
            .remove(&stream)
            .ok_or(TraceError::UnknownStream(stream))?;
        if let Some(writer) = tracer.writer.as_mut() {
            writer.flush()?;
        }
        let stats = tracer.stats(stream);
        info!(
            stream,
            instructions = stats.instructions,
            records = stats.records_written,
            "stream ended"
        );
        self.finished.push(stats.clone());
        Ok(stats)
    }

    /// Ends every stream still running and returns all stats ordered by stream id.
    pub fn finish(mut self) -> Result<Vec<StreamStats>, TraceError> {
        let mut running: Vec<StreamId> = self.streams.keys().copied().collect();
        running.sort_unstable();
        for stream in running {
            self.end_stream(stream)?;
        }
        let mut stats = self.finished;
        stats.sort_by_key(|s| s.stream);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    #[test]
    fn test_unknown_stream() {
        let config = TraceConfig::default();
        let mut sampler = Sampler::new(&config).unwrap();
        let err = sampler.deliver_batch(3, &[]).unwrap_err();
        assert!(matches!(err, TraceError::UnknownStream(3)));
        assert!(matches!(sampler.end_stream(3), Err(TraceError::UnknownStream(3))));
    }

    #[test]
    fn test_duplicate_stream() {
        let config = TraceConfig::default();
        let mut sampler = Sampler::new(&config).unwrap();
        sampler.start_stream(1).unwrap();
        assert!(matches!(sampler.start_stream(1), Err(TraceError::DuplicateStream(1))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = TraceConfig::default();
        config.emit = true;
        config.windowed = true;
        config.window.interval = 0;
        let err = Sampler::with_clock(&config, FixedClock::default()).err();
        assert!(matches!(err, Some(TraceError::Config(_))));
    }

    #[test]
    fn test_disabled_counts_without_file() {
        let config = TraceConfig::default();
        let mut sampler = Sampler::new(&config).unwrap();
        sampler.start_stream(0).unwrap();
        let batch = vec![AttributeRecord::plain(0x400000); 8];
        assert_eq!(sampler.deliver_batch(0, &batch).unwrap(), Decision::Skip);
        let stats = sampler.end_stream(0).unwrap();
        assert_eq!(stats.instructions, 8);
        assert_eq!(stats.batches, 1);
        assert_eq!(stats.output, None);
    }
}
