use clap::Parser;
use std::path::PathBuf;

use crate::config::{TraceConfig, WindowConfig, DEFAULT_BUFFER_RECORDS};
use crate::types::StreamId;

#[derive(Parser, Debug)]
#[command(author, version, about = "Windowed instruction trace sampler", long_about = None)]
pub struct Args {
    /// Base name of the per-stream trace files
    #[arg(short, long, default_value = "trace_gen.out")]
    pub output: PathBuf,

    /// Emit a trace at all
    #[arg(long)]
    pub emit: bool,

    /// SMARTS-style interval tracing instead of tracing everything
    #[arg(long)]
    pub smarts: bool,

    #[arg(long, default_value_t = 10_000)]
    pub warmup_ins: u64,

    #[arg(long, default_value_t = 20_000)]
    pub ins_interval: u64,

    #[arg(long, default_value_t = 10)]
    pub num_intervals: u64,

    #[arg(long, default_value_t = 1_000)]
    pub snippet_size: u64,

    /// Records per capture buffer
    #[arg(long, default_value_t = DEFAULT_BUFFER_RECORDS)]
    pub buffer_records: usize,

    /// Only trace these streams (repeatable); all streams when absent
    #[arg(long = "stream")]
    pub streams: Vec<StreamId>,

    /// Replay input, `<stream> <trace line>` per line; stdin when absent
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Skip the summary table
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn trace_config(&self) -> TraceConfig {
        TraceConfig {
            emit: self.emit,
            windowed: self.smarts,
            window: WindowConfig {
                warmup: self.warmup_ins,
                interval: self.ins_interval,
                count: self.num_intervals,
                snippet: self.snippet_size,
            },
            output_base: self.output.clone(),
            buffer_records: self.buffer_records,
            streams: self.streams.iter().copied().collect(),
        }
    }
}
