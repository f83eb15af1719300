//! Struct-aliasing marshaller for the guest's byte-exact memory image.
//!
//! Guest structures are described by a layout (field offsets and widths) and
//! marshalled field-by-field through [`MemAccess`][pilot_emu_mem::MemAccess],
//! so host code only ever sees host-native values and guest code only ever
//! sees the platform's big-endian byte image.

pub mod layout;
pub mod structs;

pub use layout::{FieldDescriptor, FieldWidth, GuestField, GuestStruct};
pub use structs::*;

#[doc(hidden)]
pub mod __exports {
    pub use paste::paste;
    pub use pilot_emu_errors::EmuResult;
    pub use pilot_emu_mem::{GuestAddr, MemAccess};
}

/// Declares a host structure that aliases a guest layout.
///
/// Each field names its host type and its byte offset inside the guest
/// image; the macro generates the host struct, per-field offset constants,
/// the [`GuestStruct`] copy code, and a [`GuestField`] impl so the structure
/// can nest inside other layouts. The declared size is checked against the
/// field table at compile time.
#[macro_export]
macro_rules! guest_struct {
    {
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $size:literal {
            $($(#[$fmeta:meta])* $fvis:vis $field:ident : $ty:ty = $off:literal),*
            $(,)?
        }
    } => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Default, PartialEq)]
        $vis struct $name {
            $($(#[$fmeta])* $fvis $field: $ty,)*
        }

        $crate::__exports::paste! {
            impl $name {
                $(
                    #[doc = concat!("Byte offset of `", stringify!($field), "` inside the guest image")]
                    $vis const [<OFFSET_ $field:upper>]: u32 = $off;
                )*
            }
        }

        impl $crate::layout::GuestStruct for $name {
            const NAME: &'static str = ::core::stringify!($name);
            const SIZE: u32 = $size;
            const FIELDS: &'static [$crate::layout::FieldDescriptor] = &[
                $($crate::layout::FieldDescriptor {
                    name: ::core::stringify!($field),
                    offset: $off,
                    width: <$ty as $crate::layout::GuestField>::WIDTH,
                },)*
            ];

            fn read_fields<M: $crate::__exports::MemAccess>(
                mem: &M,
                addr: $crate::__exports::GuestAddr,
            ) -> $crate::__exports::EmuResult<Self> {
                let mut dest = <Self as ::core::default::Default>::default();
                $(dest.$field = <$ty as $crate::layout::GuestField>::read_field(mem, addr.offset($off))?;)*
                ::core::result::Result::Ok(dest)
            }

            fn write_fields<M: $crate::__exports::MemAccess>(
                &self,
                mem: &M,
                addr: $crate::__exports::GuestAddr,
            ) -> $crate::__exports::EmuResult<()> {
                $(<$ty as $crate::layout::GuestField>::write_field(&self.$field, mem, addr.offset($off))?;)*
                ::core::result::Result::Ok(())
            }
        }

        impl $crate::layout::GuestField for $name {
            const WIDTH: $crate::layout::FieldWidth =
                $crate::layout::FieldWidth::Aggregate(<$name as $crate::layout::GuestStruct>::SIZE);

            fn read_field<M: $crate::__exports::MemAccess>(
                mem: &M,
                addr: $crate::__exports::GuestAddr,
            ) -> $crate::__exports::EmuResult<Self> {
                <Self as $crate::layout::GuestStruct>::read_fields(mem, addr)
            }

            fn write_field<M: $crate::__exports::MemAccess>(
                &self,
                mem: &M,
                addr: $crate::__exports::GuestAddr,
            ) -> $crate::__exports::EmuResult<()> {
                <Self as $crate::layout::GuestStruct>::write_fields(self, mem, addr)
            }
        }

        const _: () = {
            let fields = <$name as $crate::layout::GuestStruct>::FIELDS;
            let size = <$name as $crate::layout::GuestStruct>::SIZE;

            let mut i = 0;
            while i < fields.len() {
                assert!(
                    fields[i].offset + fields[i].width.size() <= size,
                    "guest_struct field extends past the declared size"
                );
                i += 1;
            }
        };
    }
}
