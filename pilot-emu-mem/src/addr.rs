use bytemuck::{Pod, Zeroable};

/// An address in the emulated address space.
///
/// Zero is the reserved null sentinel meaning "no object"; the marshaller
/// treats it as a defined no-op rather than a dereferencable location.
#[repr(transparent)]
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Zeroable, Pod)]
pub struct GuestAddr(u32);

impl GuestAddr {
    pub const NULL: Self = Self(0);

    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Displaces the address by a signed byte count, wrapping at the ends of
    /// the 32-bit space like the guest's address arithmetic does.
    pub const fn offset(self, delta: i32) -> Self {
        Self(self.0.wrapping_add(delta as u32))
    }
}

impl core::fmt::Debug for GuestAddr {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "GuestAddr({:#010x})", self.0)
    }
}

impl core::fmt::Display for GuestAddr {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
