pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod parse;
pub mod policy;
pub mod replay;
pub mod report;
pub mod ringbuffer;
pub mod sampler;
pub mod types;
pub mod writer;

pub use config::TraceConfig;
pub use error::TraceError;
pub use sampler::Sampler;
