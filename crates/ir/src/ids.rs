use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! impl_id {
    (
        $(
            $(#[$attr:meta])*
            $vis:vis struct $ident:ident($inner_vis:vis $inner_ty:ty);
        )*
    ) => {
        $(
            $(#[$attr])*
            #[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
            #[derive(Serialize, Deserialize)]
            #[serde(transparent)]
            $vis struct $ident($inner_vis $inner_ty);

            impl fmt::Debug for $ident {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}({})", stringify!($ident), self.0)
                }
            }

            impl fmt::Display for $ident {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    self.0.fmt(f)
                }
            }

            impl From<$inner_ty> for $ident {
                #[inline(always)]
                fn from(n: $inner_ty) -> Self {
                    Self(n)
                }
            }

            impl $ident {
                #[inline(always)]
                pub fn from_u32(n: u32) -> Self {
                    Self(n as $inner_ty)
                }

                #[inline(always)]
                pub fn to_u32(self) -> u32 {
                    self.0 as u32
                }
            }
        )*
    };
}

impl_id! {
    /// Pass-local, human-facing block number.
    ///
    /// May be reassigned between passes as blocks are added, removed, or
    /// renumbered by an optimization pass. Display-only outside a single pass.
    pub struct BlockId(pub u32);

    /// Cross-pass-stable block identity.
    ///
    /// A block that is the same logical entity across consecutive passes keeps
    /// the same ptr for the lifetime of the function, even when its
    /// [`BlockId`] changes. Never reused after the original block is removed.
    pub struct BlockPtr(pub u32);

    /// Pass-local, human-facing instruction number.
    pub struct InsId(pub u32);

    /// Cross-pass-stable instruction identity.
    pub struct InsPtr(pub u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_serde_is_transparent() {
        let ptr = BlockPtr(42);
        assert_eq!(serde_json::to_string(&ptr).unwrap(), "42");
        assert_eq!(serde_json::from_str::<BlockPtr>("42").unwrap(), ptr);
    }

    #[test]
    fn id_display_and_debug() {
        assert_eq!(InsId(7).to_string(), "7");
        assert_eq!(format!("{:?}", InsPtr(7)), "InsPtr(7)");
    }
}
