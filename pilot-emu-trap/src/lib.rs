//! Syscall trap resolution.
//!
//! When the interpreter reaches an OS call site it hands the program counter
//! here; the resolver classifies the calling idiom from the raw instruction
//! bytes, normalizes the trap word, and captures the extra machine-state
//! value the dispatch layer needs.

pub mod library;

pub use library::{library_name, LowMemGlobals, INVALID_REF_NUM};

use pilot_emu_errors::{EmuError, EmuResult};
use pilot_emu_mem::{GuestAddr, MemAccess};
use tracing::warn;

/// `TRAP #15`, the instruction the OS dispatch macro expands to.
pub const OPCODE_TRAP_DISPATCH: u16 = 0x4E4F;

/// `JSR (A1)`, the tail of the fast-dispatch macro that calls through the
/// OS dispatch table.
pub const OPCODE_JSR_A1: u16 = 0x4E91;

/// Base of the trap-number range; every normalized trap word carries it.
pub const SYS_TRAP_BASE: u16 = 0xA000;

/// First trap word belonging to a shared library rather than the system.
pub const LIB_TRAP_BASE: u16 = 0xA800;

/// One past the last valid trap word.
pub const TRAP_RANGE_END: u16 = 0xB000;

/// Byte stride of one OS dispatch-table entry.
pub const DISPATCH_TABLE_STRIDE: u16 = 4;

/// How the guest reached the OS entry point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CallIdiom {
    /// Via the trap instruction followed by an inline selector word.
    TrapInstruction,
    /// Via an indirect jump through the OS dispatch table.
    DispatchJump,
}

/// Everything the dispatch layer needs about one resolved OS call.
///
/// Built once per call site and immutable afterwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TrapContext {
    pub pc: GuestAddr,
    pub next_pc: GuestAddr,
    pub idiom: CallIdiom,
    /// The normalized trap word, always within
    /// [`SYS_TRAP_BASE`]`..`[`TRAP_RANGE_END`].
    pub trap_word: u16,
    /// Index into the system or library dispatch table, per
    /// [`is_system_trap`].
    pub trap_index: u16,
    /// D2 for system calls, the 16-bit refnum on top of the stack for
    /// library calls.
    pub extra: u32,
}

/// CPU state the resolver consumes from the interpreter.
pub trait TrapRegs {
    fn data_reg(&self, n: usize) -> u32;
    fn addr_reg(&self, n: usize) -> u32;
}

pub const fn is_system_trap(trap_word: u16) -> bool {
    trap_word < LIB_TRAP_BASE
}

/// Index of a system trap word into the OS dispatch table.
pub const fn sys_trap_index(trap_word: u16) -> u16 {
    trap_word - SYS_TRAP_BASE
}

/// Index of a library trap word into a library dispatch table.
pub const fn lib_trap_index(trap_word: u16) -> u16 {
    trap_word - LIB_TRAP_BASE
}

/// Resolves the OS call at `pc` into a [`TrapContext`].
///
/// Fails with [`EmuError::NotACallSite`] when the opcode matches neither
/// idiom; the interpreter only asks for resolution at call sites, so that is
/// a precondition violation and is logged before being surfaced.
pub fn resolve<M: MemAccess, R: TrapRegs>(
    mem: &M,
    regs: &R,
    pc: GuestAddr,
) -> EmuResult<TrapContext> {
    let opcode = mem.get_u16(pc)?;

    let (idiom, trap_word, next_pc) = match opcode {
        OPCODE_TRAP_DISPATCH => {
            // Some firmware generations emit selector words with the high
            // bits stripped; OR-ing the base in unconditionally normalizes
            // both encodings to the same trap word.
            let word = mem.get_u16(pc.offset(2))? | SYS_TRAP_BASE;
            (CallIdiom::TrapInstruction, word, pc.offset(4))
        }
        OPCODE_JSR_A1 => {
            // The fast-dispatch macro loads A1 from the dispatch table; the
            // table offset it used is encoded two bytes before the jump.
            let offset = mem.get_u16(pc.offset(-2))?;
            let word = (offset / DISPATCH_TABLE_STRIDE) | SYS_TRAP_BASE;
            (CallIdiom::DispatchJump, word, pc.offset(2))
        }
        opcode => {
            warn!(%pc, opcode, "trap resolution requested at a non-call site");
            return Err(EmuError::NotACallSite {
                pc: pc.get(),
                opcode,
            });
        }
    };

    if trap_word >= TRAP_RANGE_END {
        return Err(EmuError::TrapWordOutOfRange { word: trap_word });
    }

    let (trap_index, extra) = if is_system_trap(trap_word) {
        (sys_trap_index(trap_word), regs.data_reg(2))
    } else {
        let sp = GuestAddr::new(regs.addr_reg(7));
        (lib_trap_index(trap_word), mem.get_u16(sp)? as u32)
    };

    Ok(TrapContext {
        pc,
        next_pc,
        idiom,
        trap_word,
        trap_index,
        extra,
    })
}
