use pilot_emu_errors::EmuResult;
use pilot_emu_mem::{GuestAddr, MemAccess};

/// The guest-side width of one marshalled field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldWidth {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    /// A pointer-sized guest address.
    Ptr,
    /// A nested aggregate of the given byte size.
    Aggregate(u32),
}

impl FieldWidth {
    pub const fn size(self) -> u32 {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::Ptr => 4,
            Self::Aggregate(size) => size,
        }
    }
}

/// Describes one field of a guest structure layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub offset: u32,
    pub width: FieldWidth,
}

/// A host value that aliases a fixed-width slot of a guest structure.
///
/// Implementors convert between the guest's big-endian representation and
/// the host-native value; marshalling always goes field-by-field through
/// these, never through a raw block copy, because guest and host layouts are
/// not byte-identical.
pub trait GuestField: Sized {
    const WIDTH: FieldWidth;

    fn read_field<M: MemAccess>(mem: &M, addr: GuestAddr) -> EmuResult<Self>;
    fn write_field<M: MemAccess>(&self, mem: &M, addr: GuestAddr) -> EmuResult<()>;
}

macro_rules! impl_guest_field_ints {
    {$($ty:ident : $width:ident = $get:ident / $put:ident;)*} => {
        $(
            impl GuestField for $ty {
                const WIDTH: FieldWidth = FieldWidth::$width;

                fn read_field<M: MemAccess>(mem: &M, addr: GuestAddr) -> EmuResult<Self> {
                    Ok(mem.$get(addr)? as $ty)
                }

                fn write_field<M: MemAccess>(&self, mem: &M, addr: GuestAddr) -> EmuResult<()> {
                    mem.$put(addr, *self as _)
                }
            }
        )*
    }
}

impl_guest_field_ints! {
    u8: U8 = get_u8 / put_u8;
    i8: I8 = get_u8 / put_u8;
    u16: U16 = get_u16 / put_u16;
    i16: I16 = get_u16 / put_u16;
    u32: U32 = get_u32 / put_u32;
    i32: I32 = get_u32 / put_u32;
}

/// The guest represents booleans as one byte; anything non-zero is true.
impl GuestField for bool {
    const WIDTH: FieldWidth = FieldWidth::U8;

    fn read_field<M: MemAccess>(mem: &M, addr: GuestAddr) -> EmuResult<Self> {
        Ok(mem.get_u8(addr)? != 0)
    }

    fn write_field<M: MemAccess>(&self, mem: &M, addr: GuestAddr) -> EmuResult<()> {
        mem.put_u8(addr, *self as u8)
    }
}

impl GuestField for GuestAddr {
    const WIDTH: FieldWidth = FieldWidth::Ptr;

    fn read_field<M: MemAccess>(mem: &M, addr: GuestAddr) -> EmuResult<Self> {
        mem.get_addr(addr)
    }

    fn write_field<M: MemAccess>(&self, mem: &M, addr: GuestAddr) -> EmuResult<()> {
        mem.put_addr(addr, *self)
    }
}

/// A host-native structure with a described guest layout.
///
/// `read_guest` zero-fills the destination first and performs no guest access
/// at all for a null address; `write_guest` is a no-op for a null address.
/// The `*_fields` methods are the per-layout copy code (generated by
/// [`guest_struct!`][crate::guest_struct] or hand-written for variant
/// structures) and require a non-null address.
pub trait GuestStruct: Sized + Default {
    const NAME: &'static str;
    const SIZE: u32;
    const FIELDS: &'static [FieldDescriptor];

    fn read_fields<M: MemAccess>(mem: &M, addr: GuestAddr) -> EmuResult<Self>;
    fn write_fields<M: MemAccess>(&self, mem: &M, addr: GuestAddr) -> EmuResult<()>;

    fn read_guest<M: MemAccess>(mem: &M, addr: GuestAddr) -> EmuResult<Self> {
        if addr.is_null() {
            Ok(Self::default())
        } else {
            Self::read_fields(mem, addr)
        }
    }

    fn write_guest<M: MemAccess>(&self, mem: &M, addr: GuestAddr) -> EmuResult<()> {
        if addr.is_null() {
            Ok(())
        } else {
            self.write_fields(mem, addr)
        }
    }
}
