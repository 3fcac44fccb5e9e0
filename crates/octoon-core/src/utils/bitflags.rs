// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Declarative bitflag sets for native-facing masks (color writes, clear
//! targets, shader stages, stencil faces).

/// Declares a `Copy` flag-set newtype over an unsigned integer.
///
/// Besides the declared constants the generated type carries `EMPTY`, `ALL`
/// (the union of every declared flag), set algebra helpers and the bitwise
/// operators. Unknown bits survive `from_bits_truncate` and are rejected by
/// `from_bits`.
#[macro_export]
#[doc(hidden)]
macro_rules! octoon_bitflags {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident: $ty:ty {
            $(
                $(#[$flag_attr:meta])*
                const $flag_name:ident = $flag_value:expr;
            )*
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $name {
            bits: $ty,
        }

        impl $name {
            /// No flag set.
            pub const EMPTY: Self = Self { bits: 0 };

            /// Every declared flag.
            pub const ALL: Self = Self { bits: 0 $(| $flag_value)* };

            $(
                $(#[$flag_attr])*
                pub const $flag_name: Self = Self { bits: $flag_value };
            )*

            /// Builds a set from raw bits, failing if any bit is not declared.
            pub const fn from_bits(bits: $ty) -> Option<Self> {
                if bits & !Self::ALL.bits == 0 {
                    Some(Self { bits })
                } else {
                    None
                }
            }

            /// Builds a set from raw bits, keeping undeclared bits as-is.
            pub const fn from_bits_truncate(bits: $ty) -> Self {
                Self { bits }
            }

            /// Raw value.
            pub const fn bits(&self) -> $ty {
                self.bits
            }

            /// `true` when no bit is set.
            pub const fn is_empty(&self) -> bool {
                self.bits == 0
            }

            /// `true` when every declared flag is set.
            pub const fn is_all(&self) -> bool {
                self.bits & Self::ALL.bits == Self::ALL.bits
            }

            /// `true` if every bit of `other` is set in `self`.
            pub const fn contains(&self, other: Self) -> bool {
                (self.bits & other.bits) == other.bits
            }

            /// `true` if `self` and `other` share at least one bit.
            pub const fn intersects(&self, other: Self) -> bool {
                (self.bits & other.bits) != 0
            }

            /// Sets the bits of `other`.
            pub fn insert(&mut self, other: Self) {
                self.bits |= other.bits;
            }

            /// Clears the bits of `other`.
            pub fn remove(&mut self, other: Self) {
                self.bits &= !other.bits;
            }

            /// Sets or clears the bits of `other` depending on `value`.
            pub fn set(&mut self, other: Self, value: bool) {
                if value {
                    self.insert(other);
                } else {
                    self.remove(other);
                }
            }

            /// Copy of `self` with `other` set.
            #[must_use]
            pub const fn with(mut self, other: Self) -> Self {
                self.bits |= other.bits;
                self
            }

            /// Copy of `self` with `other` cleared.
            #[must_use]
            pub const fn without(mut self, other: Self) -> Self {
                self.bits &= !other.bits;
                self
            }
        }

        impl core::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, other: Self) -> Self {
                Self { bits: self.bits | other.bits }
            }
        }

        impl core::ops::BitAnd for $name {
            type Output = Self;
            fn bitand(self, other: Self) -> Self {
                Self { bits: self.bits & other.bits }
            }
        }

        impl core::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, other: Self) {
                self.bits |= other.bits;
            }
        }

        impl core::ops::BitAndAssign for $name {
            fn bitand_assign(&mut self, other: Self) {
                self.bits &= other.bits;
            }
        }

        impl core::ops::Not for $name {
            type Output = Self;
            fn not(self) -> Self {
                Self { bits: !self.bits & Self::ALL.bits }
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}(", stringify!($name))?;
                let mut rest = self.bits;
                let mut first = true;
                $(
                    // Composite constants are printed only if nothing narrower consumed their bits.
                    if $flag_value != 0 && rest & $flag_value == $flag_value {
                        if !first {
                            write!(f, " | ")?;
                        }
                        write!(f, "{}", stringify!($flag_name))?;
                        rest &= !$flag_value;
                        first = false;
                    }
                )*
                if rest != 0 {
                    if !first {
                        write!(f, " | ")?;
                    }
                    write!(f, "{:#x}", rest)?;
                } else if first {
                    write!(f, "EMPTY")?;
                }
                write!(f, ")")
            }
        }
    };
}

#[cfg(test)]
mod tests {
    crate::octoon_bitflags! {
        /// Stand-in for a color write mask.
        pub struct Channels: u8 {
            const RED = 1 << 0;
            const GREEN = 1 << 1;
            const BLUE = 1 << 2;
            const ALPHA = 1 << 3;
        }
    }

    #[test]
    fn test_all_is_union_of_declared_flags() {
        assert_eq!(Channels::ALL.bits(), 0b1111);
        assert!(Channels::ALL.is_all());
        assert!(!(Channels::RED | Channels::GREEN).is_all());
    }

    #[test]
    fn test_from_bits_rejects_undeclared_bits() {
        assert_eq!(Channels::from_bits(0b0101), Some(Channels::RED | Channels::BLUE));
        assert_eq!(Channels::from_bits(0b1_0000), None);
        assert_eq!(Channels::from_bits_truncate(0b1_0000).bits(), 0b1_0000);
    }

    #[test]
    fn test_set_and_remove() {
        let mut mask = Channels::EMPTY;
        mask.set(Channels::ALPHA, true);
        mask.set(Channels::RED, true);
        assert!(mask.contains(Channels::RED | Channels::ALPHA));
        mask.set(Channels::RED, false);
        assert_eq!(mask, Channels::ALPHA);
        mask.remove(Channels::ALPHA);
        assert!(mask.is_empty());
    }

    #[test]
    fn test_not_stays_within_declared_flags() {
        let inverted = !Channels::RED;
        assert_eq!(inverted, Channels::GREEN | Channels::BLUE | Channels::ALPHA);
    }

    #[test]
    fn test_intersects_and_with_without() {
        let rg = Channels::RED.with(Channels::GREEN);
        assert!(rg.intersects(Channels::GREEN | Channels::BLUE));
        assert!(!rg.intersects(Channels::ALPHA));
        assert_eq!(rg.without(Channels::RED), Channels::GREEN);
    }

    #[test]
    fn test_debug_output() {
        assert_eq!(format!("{:?}", Channels::EMPTY), "Channels(EMPTY)");
        assert_eq!(
            format!("{:?}", Channels::RED | Channels::ALPHA),
            "Channels(RED | ALPHA)"
        );
        assert_eq!(
            format!("{:?}", Channels::from_bits_truncate(0b1_0010)),
            "Channels(GREEN | 0x10)"
        );
    }
}
