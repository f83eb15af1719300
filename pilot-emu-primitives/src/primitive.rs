macro_rules! impl_be_integers_logic{
    {
        $(impl ::$($trait:ident)::+ for $be_int_ty:ident = $method:ident;)*
    } => {
        $(
            impl ::$($trait)::+ for $be_int_ty{
                type Output = Self;
                #[inline]
                fn $method(self, rhs: Self) -> Self{
                    Self(self.0.$method(rhs.0))
                }
            }
        )*
    }
}

macro_rules! impl_be_integers_arith{
    {
        $(impl ::$($trait:ident)::+ for $be_int_ty:ident = $method:ident;)*
    } => {
        $(
            impl ::$($trait)::+ for $be_int_ty{
                type Output = Self;

                #[inline]
                fn $method(self, rhs: Self) -> Self{
                    let this = self.get();
                    let rhs = rhs.get();
                    Self::new(this.$method(rhs))
                }
            }
        )*
    }
}

macro_rules! impl_be_integers_arith_base_ty{
    {
        $(impl ::$($trait:ident)::+ <$base_ty:ident> for $be_int_ty:ident = $method:ident;)*
    } => {
        $(
            impl ::$($trait)::+ <$base_ty> for $be_int_ty{
                type Output = $be_int_ty;

                #[inline]
                fn $method(self, rhs: $base_ty) -> $be_int_ty{
                    self.$method($be_int_ty::new(rhs))
                }
            }
        )*
    }
}

macro_rules! impl_be_integers_shifts{
    {$(impl ::$($trait:ident)::+ for $be_int_ty:ident = $method:ident;)*} => {
        $(
            impl ::$($trait)::+ ::<u32> for $be_int_ty{
                type Output = $be_int_ty;

                #[inline]
                fn $method(self, rhs: u32) -> $be_int_ty{
                    $be_int_ty::new(self.get().$method(rhs))
                }
            }
        )*
    }
}

macro_rules! impl_be_integers_fmt{
    {
        $(impl ::$($trait:ident)::+ for $be_int_ty:ident;)*
    } => {
        $(
            impl ::$($trait)::+ for $be_int_ty{
                fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result{
                    let this = self.get();

                    ::$($trait)::+ :: fmt(&this, f)
                }
            }
        )*
    }
}

macro_rules! impl_be_integers_cmp_base_ty{
    {
        $(impl ::$($trait:ident)::+<$base_ty:ident> for $be_int_ty:ident = $method:ident -> $ret_ty:ty;)*
    } => {
        $(
            impl ::$($trait)::+<$base_ty> for $be_int_ty{
                fn $method(&self, rhs: &$base_ty) -> $ret_ty{
                    let this = self.get();
                    let rhs = *rhs;

                    this.$method(&rhs)
                }
            }
        )*
    }
}

macro_rules! def_fixed_endian_integers{
    {
        $($vis:vis type $be_int_ty:ident = $base_ty:ident;)*
    } => {
        $(
            #[doc = concat!("A [`", stringify!($base_ty), "`] that is represented in memory as big-endian, matching the guest's byte order")]
            #[repr(transparent)]
            #[derive(Copy, Clone, Default, PartialEq, Eq, bytemuck::Zeroable, bytemuck::Pod)]
            $vis struct $be_int_ty($base_ty);

            impl $be_int_ty{

                pub const BITS: u32 = $base_ty::BITS;

                pub const MIN: Self = Self::new($base_ty::MIN);
                pub const MAX: Self = Self::new($base_ty::MAX);

                #[doc = concat!("Constructs a [`", stringify!($be_int_ty), "`] from its base type. On little-endian hosts, this swaps the bytes of `x`")]
                $vis const fn new(x: $base_ty) -> Self{
                    Self(x.to_be())
                }

                #[doc = concat!("Converts a [`", stringify!($be_int_ty), "`] to its base type. On little-endian hosts, this swaps the bytes")]
                $vis const fn get(self) -> $base_ty{
                    $base_ty::from_be(self.0)
                }

                #[doc = concat!("Constructs a [`", stringify!($be_int_ty), "`] from the raw BE bytes. This is zero cost on all hosts")]
                $vis const fn from_be_bytes(x: [u8;core::mem::size_of::<Self>()]) -> Self{
                    Self(<$base_ty>::from_ne_bytes(x))
                }

                #[doc = concat!("Converts a [`", stringify!($be_int_ty), "`] to the raw BE bytes. This is zero cost on all hosts")]
                $vis const fn to_be_bytes(self) -> [u8;core::mem::size_of::<Self>()]{
                    self.0.to_ne_bytes()
                }

                $vis const fn wrapping_add(self, val: $be_int_ty) -> Self{
                    Self::new(self.get().wrapping_add(val.get()))
                }

                $vis const fn wrapping_sub(self, val: $be_int_ty) -> Self{
                    Self::new(self.get().wrapping_sub(val.get()))
                }
            }

            impl ::core::convert::From<$base_ty> for $be_int_ty{
                fn from(x: $base_ty) -> Self{
                    Self::new(x)
                }
            }

            impl ::core::convert::From<$be_int_ty> for $base_ty{
                fn from(x: $be_int_ty) -> Self{
                    x.get()
                }
            }

            impl ::core::hash::Hash for $be_int_ty{
                fn hash<H: ::core::hash::Hasher>(&self, state: &mut H){
                    let val = self.get();
                    val.hash(state)
                }
            }

            impl ::core::cmp::Ord for $be_int_ty{
                #[inline]
                fn cmp(&self, other: &Self) -> ::core::cmp::Ordering{
                    let this = self.get();
                    let other = other.get();

                    this.cmp(&other)
                }
            }

            impl ::core::cmp::PartialOrd for $be_int_ty{
                #[inline]
                fn partial_cmp(&self, other: &Self) -> ::core::option::Option<::core::cmp::Ordering>{
                    ::core::option::Option::Some(self.cmp(other))
                }
            }

            impl ::core::ops::Not for $be_int_ty{
                type Output = Self;
                #[inline]
                fn not(self) -> Self{
                    Self(!self.0)
                }
            }

            impl_be_integers_cmp_base_ty!{
                impl ::core::cmp::PartialEq<$base_ty> for $be_int_ty = eq -> bool;
                impl ::core::cmp::PartialOrd<$base_ty> for $be_int_ty = partial_cmp -> ::core::option::Option<::core::cmp::Ordering>;
            }

            impl_be_integers_fmt!{
                impl ::core::fmt::Display for $be_int_ty;
                impl ::core::fmt::Debug for $be_int_ty;
                impl ::core::fmt::UpperHex for $be_int_ty;
                impl ::core::fmt::LowerHex for $be_int_ty;
            }

            impl_be_integers_logic!{
                impl ::core::ops::BitAnd for $be_int_ty = bitand;
                impl ::core::ops::BitOr for $be_int_ty = bitor;
                impl ::core::ops::BitXor for $be_int_ty = bitxor;
            }

            impl_be_integers_arith!{
                impl ::core::ops::Add for $be_int_ty = add;
                impl ::core::ops::Sub for $be_int_ty = sub;
                impl ::core::ops::Mul for $be_int_ty = mul;
                impl ::core::ops::Div for $be_int_ty = div;
                impl ::core::ops::Rem for $be_int_ty = rem;
            }

            impl_be_integers_arith_base_ty!{
                impl ::core::ops::Add<$base_ty> for $be_int_ty = add;
                impl ::core::ops::Sub<$base_ty> for $be_int_ty = sub;
                impl ::core::ops::Mul<$base_ty> for $be_int_ty = mul;
                impl ::core::ops::Div<$base_ty> for $be_int_ty = div;
                impl ::core::ops::BitAnd<$base_ty> for $be_int_ty = bitand;
                impl ::core::ops::BitOr<$base_ty> for $be_int_ty = bitor;
                impl ::core::ops::BitXor<$base_ty> for $be_int_ty = bitxor;
            }

            impl_be_integers_shifts!{
                impl ::core::ops::Shr for $be_int_ty = shr;
                impl ::core::ops::Shl for $be_int_ty = shl;
            }
        )*
    }
}

macro_rules! impl_be_integers_cast_sign{
    {
        $($signed_ty:ident @ $unsigned_ty:ident;)*
    } => {
        $(
            impl $signed_ty{
                pub const fn cast_sign(self) -> $unsigned_ty{
                    $unsigned_ty(self.0 as _)
                }
            }
            impl $unsigned_ty{
                pub const fn cast_sign(self) -> $signed_ty{
                    $signed_ty(self.0 as _)
                }
            }
        )*
    }
}

macro_rules! impl_be_integers_from{
    {$(impl From <$other_ty:ident> for $be_int_ty:ident;)*} => {
        $(
            impl ::core::convert::From<$other_ty> for $be_int_ty{
                fn from(x: $other_ty) -> Self{
                    Self::new(x.get().into())
                }
            }
        )*
    }
}

def_fixed_endian_integers! {
    pub type BeI8 = i8;
    pub type BeU8 = u8;
    pub type BeI16 = i16;
    pub type BeU16 = u16;
    pub type BeI32 = i32;
    pub type BeU32 = u32;
}

impl_be_integers_cast_sign! {
    BeI8 @ BeU8;
    BeI16 @ BeU16;
    BeI32 @ BeU32;
}

impl_be_integers_from! {
    impl From<BeI8>  for BeI16;
    impl From<BeI8>  for BeI32;
    impl From<BeI16> for BeI32;

    impl From<BeU8>  for BeI16;
    impl From<BeU8>  for BeI32;
    impl From<BeU16> for BeI32;

    impl From<BeU8>  for BeU16;
    impl From<BeU8>  for BeU32;
    impl From<BeU16> for BeU32;
}

/// Declares a discriminant type that is laid out like its fixed-endian
/// representation but carries named constants for the known values.
///
/// Unlike a real `enum`, unknown raw values are representable; `validate`
/// reports whether the wrapped value is one of the declared constants.
#[macro_export]
macro_rules! be_fake_enum{
    {

        #[repr($field_vis:vis $repr:ident)]
        $(#[$meta:meta])*
        $vis:vis enum $name:ident{
            $( $(#[$meta2:meta])* $var:ident = $discrim:literal),*
            $(,)?
        }
    } => {

        #[repr(transparent)]
        #[derive(Copy, Clone, Hash, PartialEq, Eq)]
        $(#[$meta])*
        $vis struct $name($field_vis $crate::primitive::$repr);

        #[allow(non_upper_case_globals)]
        impl $name{
            $(
                $(#[$meta2])* $vis const $var: Self = Self($crate::primitive::$repr::new($discrim));
            )*

            pub const fn validate(self) -> bool{
                match self.0.get(){
                    $($discrim => true,)*
                    _ => false
                }
            }
        }

        impl ::core::fmt::Display for $name{
            fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result{
                match *self{
                    $(Self::$var => f.write_str(::core::stringify!($var)),)*
                    _ => {
                        f.write_str(::core::stringify!($name))?;
                        f.write_str("(")?;
                        self.0.fmt(f)?;
                        f.write_str(")")
                    }
                }
            }
        }

        impl ::core::fmt::Debug for $name{
            fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result{
                ::core::fmt::Display::fmt(self, f)
            }
        }
    }
}

pub use be_fake_enum;
