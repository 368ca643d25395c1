//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `u32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_u32()`, `next()`
/// - `From<u32>`, `Into<u32>` and `FromStr` implementations
///
/// # Example
///
/// ```rust
/// # use prifam_core::define_id;
/// define_id!(TicketId);
/// define_id!(InvoiceId);
///
/// let ticket = TicketId::new(1);
/// let invoice = InvoiceId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: TicketId = invoice;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create a new ID from a u32 value.
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            /// Get the underlying u32 value.
            #[must_use]
            pub const fn as_u32(&self) -> u32 {
                self.0
            }

            /// The ID that follows this one in a sequentially numbered list.
            #[must_use]
            pub const fn next(&self) -> Self {
                Self(self.0.saturating_add(1))
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<u32>().map(Self)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Sequentially numbered entities
define_id!(ReviewId);
define_id!(UserId);
define_id!(AdminAccountId);

/// Slug identifier for a review platform (e.g. `uber-eats`).
///
/// Platforms are keyed by a stable lowercase slug rather than a number so
/// that toggle URLs stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformId(String);

impl PlatformId {
    /// Create a platform ID from a slug.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for PlatformId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlatformId {
    fn from(slug: &str) -> Self {
        Self(slug.to_owned())
    }
}
