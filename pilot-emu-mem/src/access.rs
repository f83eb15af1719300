use pilot_emu_errors::EmuResult;
use pilot_emu_primitives::primitive::{BeU16, BeU32};

use crate::addr::GuestAddr;

/// Raw access to guest memory in the guest's fixed byte order.
///
/// Banks implement the slice-level `read`/`write` pair; the sized accessors
/// are derived from them and perform the big-endian conversion, so a value
/// stored through any implementor is immediately visible to every other
/// reader of the same bank.
pub trait MemAccess {
    fn read(&self, addr: GuestAddr, data: &mut [u8]) -> EmuResult<()>;
    fn write(&self, addr: GuestAddr, data: &[u8]) -> EmuResult<()>;

    fn get_u8(&self, addr: GuestAddr) -> EmuResult<u8> {
        let mut bytes = [0u8; 1];
        self.read(addr, &mut bytes)?;
        Ok(bytes[0])
    }

    fn get_u16(&self, addr: GuestAddr) -> EmuResult<u16> {
        let mut bytes = [0u8; 2];
        self.read(addr, &mut bytes)?;
        Ok(BeU16::from_be_bytes(bytes).get())
    }

    fn get_u32(&self, addr: GuestAddr) -> EmuResult<u32> {
        let mut bytes = [0u8; 4];
        self.read(addr, &mut bytes)?;
        Ok(BeU32::from_be_bytes(bytes).get())
    }

    fn put_u8(&self, addr: GuestAddr, val: u8) -> EmuResult<()> {
        self.write(addr, &[val])
    }

    fn put_u16(&self, addr: GuestAddr, val: u16) -> EmuResult<()> {
        self.write(addr, &BeU16::new(val).to_be_bytes())
    }

    fn put_u32(&self, addr: GuestAddr, val: u32) -> EmuResult<()> {
        self.write(addr, &BeU32::new(val).to_be_bytes())
    }

    /// Reads a pointer-sized guest value as an address.
    fn get_addr(&self, addr: GuestAddr) -> EmuResult<GuestAddr> {
        Ok(GuestAddr::new(self.get_u32(addr)?))
    }

    fn put_addr(&self, addr: GuestAddr, val: GuestAddr) -> EmuResult<()> {
        self.put_u32(addr, val.get())
    }

    /// Reads a NUL-terminated guest string, stopping after `max_len` bytes if
    /// no terminator is found. Guest strings are not guaranteed to be UTF-8;
    /// non-ASCII bytes are replaced.
    fn read_cstring(&self, addr: GuestAddr, max_len: usize) -> EmuResult<String> {
        let mut bytes = Vec::new();

        for i in 0..max_len {
            let b = self.get_u8(addr.offset(i as i32))?;
            if b == 0 {
                break;
            }
            bytes.push(b);
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl<'a, M: MemAccess + ?Sized> MemAccess for &'a M {
    fn read(&self, addr: GuestAddr, data: &mut [u8]) -> EmuResult<()> {
        M::read(self, addr, data)
    }

    fn write(&self, addr: GuestAddr, data: &[u8]) -> EmuResult<()> {
        M::write(self, addr, data)
    }
}
