use crate::types::AttributeRecord;

/// Fixed-capacity capture buffer. Hands back a whole batch each time it fills.
pub struct CaptureBuffer {
    data: Vec<AttributeRecord>,
    capacity: usize,
}

impl CaptureBuffer {
    /// Creates a new CaptureBuffer with the specified capacity, which must be non-zero.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the full batch once `record` fills the buffer.
    pub fn push(&mut self, record: AttributeRecord) -> Option<Vec<AttributeRecord>> {
        self.data.push(record);
        if self.data.len() == self.capacity {
            Some(self.drain())
        } else {
            None
        }
    }

    /// Takes whatever is buffered, e.g. when the stream ends.
    pub fn drain(&mut self) -> Vec<AttributeRecord> {
        std::mem::replace(&mut self.data, Vec::with_capacity(self.capacity))
    }
}
