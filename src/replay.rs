use std::collections::BTreeMap;
use std::io::BufRead;

use crate::clock::Clock;
use crate::error::TraceError;
use crate::parse::replay_lines;
use crate::ringbuffer::CaptureBuffer;
use crate::sampler::{Sampler, StreamStats};
use crate::types::{AttributeRecord, StreamId};

/// Feeds captured records to the sampler the way the capture side would:
/// per-stream buffers delivered whenever they fill, partial buffers at stream end.
pub struct Replayer<'a, C: Clock> {
    sampler: Sampler<'a, C>,
    buffers: BTreeMap<StreamId, CaptureBuffer>,
    capacity: usize,
}

impl<'a, C: Clock> Replayer<'a, C> {
    /// Buffers hold `buffer_records` from the sampler's (validated) configuration.
    pub fn new(sampler: Sampler<'a, C>) -> Self {
        let capacity = sampler.config().buffer_records;
        Self {
            sampler,
            buffers: BTreeMap::new(),
            capacity,
        }
    }

    pub fn push(&mut self, stream: StreamId, record: AttributeRecord) -> Result<(), TraceError> {
        if !self.sampler.is_running(stream) {
            self.sampler.start_stream(stream)?;
        }
        let buffer = self
            .buffers
            .entry(stream)
            .or_insert_with(|| CaptureBuffer::new(self.capacity));
        if let Some(batch) = buffer.push(record) {
            self.sampler.deliver_batch(stream, &batch)?;
        }
        Ok(())
    }

    /// Delivers what is left in the stream's buffer and closes the stream.
    pub fn end_stream(&mut self, stream: StreamId) -> Result<StreamStats, TraceError> {
        let mut buffer = self
            .buffers
            .remove(&stream)
            .ok_or(TraceError::UnknownStream(stream))?;
        if !buffer.is_empty() {
            self.sampler.deliver_batch(stream, &buffer.drain())?;
        }
        self.sampler.end_stream(stream)
    }

    pub fn finish(mut self) -> Result<Vec<StreamStats>, TraceError> {
        let streams: Vec<StreamId> = self.buffers.keys().copied().collect();
        for stream in streams {
            self.end_stream(stream)?;
        }
        self.sampler.finish()
    }
}

/// Replays already-decoded records in order.
pub fn replay<C, I>(sampler: Sampler<'_, C>, records: I) -> Result<Vec<StreamStats>, TraceError>
where
    C: Clock,
    I: IntoIterator<Item = (StreamId, AttributeRecord)>,
{
    let mut replayer = Replayer::new(sampler);
    for (stream, record) in records {
        replayer.push(stream, record)?;
    }
    replayer.finish()
}

/// Replays a `<stream> <trace line>` input line by line, never holding more
/// than one capture buffer per stream.
pub fn replay_reader<C, R>(sampler: Sampler<'_, C>, reader: R) -> anyhow::Result<Vec<StreamStats>>
where
    C: Clock,
    R: BufRead,
{
    let mut replayer = Replayer::new(sampler);
    for entry in replay_lines(reader) {
        let (stream, record) = entry?;
        replayer.push(stream, record)?;
    }
    Ok(replayer.finish()?)
}
