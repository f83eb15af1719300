//! OS-call resolution and library lookup driven end to end through a
//! machine's bus.

use pilot_emu::{Machine, MachineConfig};
use pilot_emu_hal::Ez328Bank;
use pilot_emu_marshal::SysLibTblEntry;
use pilot_emu_mem::{GuestAddr, MemAccess};
use pilot_emu_trap::{CallIdiom, TrapRegs, INVALID_REF_NUM};

struct Regs {
    d: [u32; 8],
    a: [u32; 8],
}

impl TrapRegs for Regs {
    fn data_reg(&self, n: usize) -> u32 {
        self.d[n]
    }

    fn addr_reg(&self, n: usize) -> u32 {
        self.a[n]
    }
}

fn machine() -> Machine {
    Machine::new(MachineConfig::default(), Box::new(Ez328Bank::new()))
}

#[test]
fn system_call_resolves_from_trap_instruction() {
    let machine = machine();
    let mem = machine.mem();
    let pc = GuestAddr::new(0x6000);

    // TRAP dispatch followed by a stripped selector word.
    mem.put_u16(pc, 0x4E4F).unwrap();
    mem.put_u16(pc.offset(2), 0x0123).unwrap();

    let regs = Regs {
        d: [0, 0, 0xDEAD, 0, 0, 0, 0, 0],
        a: [0; 8],
    };

    let ctx = machine.resolve_call(&regs, pc).unwrap();
    assert_eq!(ctx.idiom, CallIdiom::TrapInstruction);
    assert_eq!(ctx.trap_word, 0xA123);
    assert_eq!(ctx.trap_index, 0x123);
    assert_eq!(ctx.extra, 0xDEAD);
    assert_eq!(ctx.next_pc, pc.offset(4));
}

#[test]
fn library_call_takes_refnum_from_the_stack() {
    let machine = machine();
    let mem = machine.mem();
    let pc = GuestAddr::new(0x6100);
    let sp = GuestAddr::new(0x7FF0);

    mem.put_u16(pc, 0x4E4F).unwrap();
    mem.put_u16(pc.offset(2), 0xA812).unwrap();
    mem.put_u16(sp, 3).unwrap();

    let regs = Regs {
        d: [0; 8],
        a: [0, 0, 0, 0, 0, 0, 0, sp.get()],
    };

    let ctx = machine.resolve_call(&regs, pc).unwrap();
    assert_eq!(ctx.trap_word, 0xA812);
    assert_eq!(ctx.trap_index, 0x12);
    assert_eq!(ctx.extra, 3);
}

#[test]
fn library_name_resolves_through_low_memory() {
    let config = MachineConfig::default();
    let machine = Machine::new(config, Box::new(Ez328Bank::new()));
    let mem = machine.mem();

    // One-entry library table with its dispatch table's first slot holding
    // the offset of the name string.
    let table = GuestAddr::new(0x0800);
    let dispatch = GuestAddr::new(0x0900);

    mem.put_addr(config.globals.lib_table_ptr, table).unwrap();
    mem.put_u16(config.globals.lib_table_entries, 1).unwrap();
    mem.put_addr(
        table.offset(SysLibTblEntry::OFFSET_DISPATCH_TBL_PTR as i32),
        dispatch,
    )
    .unwrap();
    mem.put_u16(dispatch, 0x20).unwrap();
    mem.write(dispatch.offset(0x20), b"Serial Library\0").unwrap();

    assert_eq!(
        machine.library_name(0).unwrap(),
        Some("Serial Library".to_string())
    );
    assert_eq!(machine.library_name(INVALID_REF_NUM).unwrap(), None);
    assert!(machine.library_name(5).is_err());
}
