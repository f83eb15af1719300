pub mod access;
pub mod addr;
pub mod mapped;
pub mod ram;

pub use access::MemAccess;
pub use addr::GuestAddr;
pub use mapped::{MappedBank, ScopedMapping};
pub use ram::Ram;
