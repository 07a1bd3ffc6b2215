use std::fmt;

/// Identifier of one traced execution stream (a hardware thread on the capture side).
pub type StreamId = u32;

/// Control-flow or maintenance role of an instruction, as classified by the capture side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventKind {
    #[default]
    None,
    CacheInvalidate,
    TlbInvalidate,
    BranchTaken,
    BranchNotTaken,
    Jump,
    Call,
    Return,
}

impl EventKind {
    /// Single-letter trace code, `None` for plain instructions.
    pub fn code(self) -> Option<char> {
        match self {
            EventKind::None => None,
            EventKind::CacheInvalidate => Some('C'),
            EventKind::TlbInvalidate => Some('P'),
            EventKind::BranchTaken => Some('T'),
            EventKind::BranchNotTaken => Some('N'),
            EventKind::Jump => Some('J'),
            EventKind::Call => Some('A'),
            EventKind::Return => Some('E'),
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'C' => Some(EventKind::CacheInvalidate),
            'P' => Some(EventKind::TlbInvalidate),
            'T' => Some(EventKind::BranchTaken),
            'N' => Some(EventKind::BranchNotTaken),
            'J' => Some(EventKind::Jump),
            'A' => Some(EventKind::Call),
            'E' => Some(EventKind::Return),
            _ => None,
        }
    }
}

/// How `second_address` of a record is to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecondAccess {
    #[default]
    None,
    Read,
    Write,
}

/// One captured instruction.
///
/// `first_address` equal to `instruction_address` means the instruction has
/// no primary memory operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeRecord {
    pub instruction_address: u64,
    pub event: EventKind,
    pub first_address: u64,
    pub second_address: u64,
    pub second_access: SecondAccess,
}

impl AttributeRecord {
    /// A plain instruction: no operand, no event.
    pub fn plain(pc: u64) -> Self {
        Self {
            instruction_address: pc,
            event: EventKind::None,
            first_address: pc,
            second_address: pc,
            second_access: SecondAccess::None,
        }
    }

    pub fn with_event(mut self, event: EventKind) -> Self {
        self.event = event;
        self
    }

    pub fn with_read(mut self, addr: u64) -> Self {
        self.first_address = addr;
        self
    }

    pub fn with_second(mut self, access: SecondAccess, addr: u64) -> Self {
        self.second_access = access;
        self.second_address = addr;
        self
    }

    pub fn has_first_operand(&self) -> bool {
        self.first_address != self.instruction_address
    }
}

/// Canonical trace line, without the newline.
impl fmt::Display for AttributeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.instruction_address)?;
        if let Some(code) = self.event.code() {
            write!(f, " {}", code)?;
        }
        if self.has_first_operand() {
            write!(f, " R {:x}", self.first_address)?;
        }
        match self.second_access {
            SecondAccess::Write => write!(f, " W {:x}", self.second_address),
            SecondAccess::Read => write!(f, " R {:x}", self.second_address),
            SecondAccess::None => Ok(()),
        }
    }
}
