use thiserror::Error;

/// Failures surfaced by the guest/host bridge.
///
/// Everything except [`EmuError::NotACallSite`] indicates either a bug in the
/// caller or corrupted guest state; callers abort the current operation
/// rather than continue with partial data.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EmuError {
    /// The opcode at the program counter matches neither recognized calling
    /// idiom. The interpreter should not have asked for trap resolution here.
    #[error("opcode {opcode:#06x} at {pc:#010x} is not a recognized call site")]
    NotACallSite { pc: u32, opcode: u16 },

    /// A variant structure carried a selector value the layout table does not
    /// know about. Either the table is incomplete or guest memory is corrupt.
    #[error("unknown selector {selector} for guest structure {layout}")]
    UnknownSelector {
        layout: &'static str,
        selector: u8,
    },

    /// The normalized trap word fell outside the valid trap-number range.
    /// This is a decoding-logic failure, not a guest-state problem.
    #[error("normalized trap word {word:#06x} is outside the trap range")]
    TrapWordOutOfRange { word: u16 },

    /// A host buffer was offered for mapping while a mapping for it is still
    /// live.
    #[error("host buffer is already projected into guest space at {guest:#010x}")]
    AlreadyMapped { guest: u32 },

    /// A guest access hit an address no bank responds to.
    #[error("guest access at {addr:#010x} hit unmapped address space")]
    BusError { addr: u32 },

    /// The guest's system library table pointer is null.
    #[error("guest has no system library table")]
    NoLibraryTable,

    /// A library reference number indexed past the guest's library table.
    #[error("library refnum {ref_num} out of range (table holds {entries})")]
    LibRefNumOutOfRange { ref_num: u16, entries: u16 },
}

pub type EmuResult<T> = std::result::Result<T, EmuError>;
