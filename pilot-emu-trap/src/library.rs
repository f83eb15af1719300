use pilot_emu_errors::{EmuError, EmuResult};
use pilot_emu_marshal::{GuestStruct, SysLibTblEntry};
use pilot_emu_mem::{GuestAddr, MemAccess};

/// Reference number the OS uses for "no library".
pub const INVALID_REF_NUM: u16 = 0xFFFF;

/// Longest library name the guest will store, terminator included.
const MAX_LIB_NAME: usize = 256;

/// Guest addresses of the low-memory globals the library table lives behind.
///
/// Passed in explicitly (they differ per ROM generation) so resolution works
/// against any memory image without ambient state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LowMemGlobals {
    /// Address of the global holding the library-table pointer.
    pub lib_table_ptr: GuestAddr,
    /// Address of the 16-bit global holding the table's entry count.
    pub lib_table_entries: GuestAddr,
}

/// Resolves a library reference number to the library's name.
///
/// The guest's library table is an array of [`SysLibTblEntry`]; each entry's
/// dispatch table is an array of 16-bit offsets relative to the table start,
/// and the first offset points at the library's NUL-terminated name.
///
/// [`INVALID_REF_NUM`] yields `Ok(None)`; a null table or an out-of-range
/// refnum is an error, because a guest asking for such a library has
/// corrupted state.
pub fn library_name<M: MemAccess>(
    mem: &M,
    globals: &LowMemGlobals,
    ref_num: u16,
) -> EmuResult<Option<String>> {
    if ref_num == INVALID_REF_NUM {
        return Ok(None);
    }

    let table = mem.get_addr(globals.lib_table_ptr)?;
    let entries = mem.get_u16(globals.lib_table_entries)?;

    if table.is_null() {
        return Err(EmuError::NoLibraryTable);
    }

    if ref_num >= entries {
        return Err(EmuError::LibRefNumOutOfRange { ref_num, entries });
    }

    let entry_addr = table.offset((ref_num as u32 * SysLibTblEntry::SIZE) as i32);
    let entry = SysLibTblEntry::read_guest(mem, entry_addr)?;

    // The offset is signed; a library may store its name below the table.
    let name_offset = mem.get_u16(entry.dispatch_tbl_ptr)? as i16;
    let name_addr = entry.dispatch_tbl_ptr.offset(name_offset as i32);

    Ok(Some(mem.read_cstring(name_addr, MAX_LIB_NAME)?))
}

#[cfg(test)]
mod test {
    use pilot_emu_mem::Ram;

    use super::*;

    const GLOBALS: LowMemGlobals = LowMemGlobals {
        lib_table_ptr: GuestAddr::new(0x100),
        lib_table_entries: GuestAddr::new(0x104),
    };

    fn guest_with_table() -> Ram {
        let mem = Ram::new(GuestAddr::new(0), 0x1000);

        // Two-entry library table at 0x200; entry 1 is "Net.lib" with its
        // dispatch table at 0x400.
        mem.put_addr(GLOBALS.lib_table_ptr, GuestAddr::new(0x200))
            .unwrap();
        mem.put_u16(GLOBALS.lib_table_entries, 2).unwrap();

        let entry1 = GuestAddr::new(0x200 + SysLibTblEntry::SIZE);
        mem.put_addr(
            entry1.offset(SysLibTblEntry::OFFSET_DISPATCH_TBL_PTR as i32),
            GuestAddr::new(0x400),
        )
        .unwrap();

        // First dispatch entry: offset from table start to the name.
        mem.put_u16(GuestAddr::new(0x400), 0x10).unwrap();
        mem.write(GuestAddr::new(0x410), b"Net.lib\0").unwrap();

        mem
    }

    #[test]
    fn test_resolves_library_name() {
        let mem = guest_with_table();

        assert_eq!(
            library_name(&mem, &GLOBALS, 1).unwrap(),
            Some("Net.lib".to_string())
        );
    }

    #[test]
    fn test_name_offset_is_signed() {
        let mem = guest_with_table();

        // Entry 0 stores its name below the dispatch table.
        mem.put_addr(
            GuestAddr::new(0x200).offset(SysLibTblEntry::OFFSET_DISPATCH_TBL_PTR as i32),
            GuestAddr::new(0x500),
        )
        .unwrap();
        mem.put_u16(GuestAddr::new(0x500), (-0x20i16) as u16).unwrap();
        mem.write(GuestAddr::new(0x4E0), b"IrDA Library\0").unwrap();

        assert_eq!(
            library_name(&mem, &GLOBALS, 0).unwrap(),
            Some("IrDA Library".to_string())
        );
    }

    #[test]
    fn test_invalid_refnum_is_no_library() {
        let mem = guest_with_table();

        assert_eq!(library_name(&mem, &GLOBALS, INVALID_REF_NUM).unwrap(), None);
    }

    #[test]
    fn test_missing_table_and_range_are_errors() {
        let mem = guest_with_table();

        assert_eq!(
            library_name(&mem, &GLOBALS, 7),
            Err(EmuError::LibRefNumOutOfRange {
                ref_num: 7,
                entries: 2
            })
        );

        mem.put_addr(GLOBALS.lib_table_ptr, GuestAddr::NULL).unwrap();
        assert_eq!(library_name(&mem, &GLOBALS, 0), Err(EmuError::NoLibraryTable));
    }
}
