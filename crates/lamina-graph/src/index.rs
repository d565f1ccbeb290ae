//! Stable entity ids.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates an id from a zero-based arena index.
            ///
            /// # Panics
            ///
            /// Panics if the index does not fit in a `u32`.
            #[inline]
            pub fn new(index: usize) -> Self {
                match u32::try_from(index) {
                    Ok(ix) => Self(ix),
                    Err(_) => panic!("{} index out of bounds: {index}", stringify!($name)),
                }
            }

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// Index of a [`crate::Vertex`].
    VertexId,
    "v"
);
entity_id!(
    /// Index of a [`crate::Port`].
    PortId,
    "p"
);
entity_id!(
    /// Index of a [`crate::PortGroup`].
    PortGroupId,
    "g"
);
entity_id!(
    /// Index of an [`crate::Edge`].
    EdgeId,
    "e"
);
