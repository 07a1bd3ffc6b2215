use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::clock::Timestamp;
use crate::error::TraceError;
use crate::types::{AttributeRecord, StreamId};

/// `<base>.<pid>.<stream>`
pub fn output_path(base: &Path, pid: u32, stream: StreamId) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(format!(".{}.{}", pid, stream));
    PathBuf::from(name)
}

/// Appends headers and record lines to one stream's trace.
pub struct TraceWriter<W: Write> {
    out: W,
    path: PathBuf,
    records: u64,
    headers: u64,
}

impl TraceWriter<BufWriter<File>> {
    /// Creates (truncating) the trace file at `path`.
    pub fn create(path: PathBuf) -> Result<Self, TraceError> {
        let file = File::create(&path).map_err(|source| TraceError::Open {
            path: path.clone(),
            source,
        })?;
        Ok(Self::new(BufWriter::new(file), path))
    }
}

impl<W: Write> TraceWriter<W> {
    pub fn new(out: W, path: PathBuf) -> Self {
        Self {
            out,
            path,
            records: 0,
            headers: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records_written(&self) -> u64 {
        self.records
    }

    pub fn headers_written(&self) -> u64 {
        self.headers
    }

    pub fn write_header(&mut self, time: Timestamp, instructions: u64) -> Result<(), TraceError> {
        writeln!(self.out, "time: {}", time)
            .and_then(|_| writeln!(self.out, "instructions: {}", instructions))
            .map_err(|source| self.write_error(source))?;
        self.headers += 1;
        Ok(())
    }

    pub fn emit(&mut self, records: &[AttributeRecord]) -> Result<(), TraceError> {
        for record in records {
            if let Err(source) = writeln!(self.out, "{}", record) {
                return Err(self.write_error(source));
            }
        }
        self.records += records.len() as u64;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), TraceError> {
        self.out.flush().map_err(|source| self.write_error(source))
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_error(&self, source: std::io::Error) -> TraceError {
        TraceError::Write {
            path: self.path.clone(),
            source,
        }
    }
}
