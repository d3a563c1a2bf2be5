//! Strongly typed string identifiers.
//!
//! Both IDs arrive over the wire as free-form strings.  Wrapping them keeps an
//! agent id from being passed where an action id is expected; the inner value
//! is reference-counted so clones captured by completion callbacks are cheap.

use std::fmt;
use std::sync::Arc;

use crate::{CoreError, CoreResult};

/// Generate a typed, cheaply clonable string ID wrapper.
macro_rules! string_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        $vis struct $name(Arc<str>);

        impl $name {
            /// Wrap `value` without validation.  Empty values are allowed and
            /// mean "absent" (see [`is_empty`](Self::is_empty)).
            pub fn new(value: impl AsRef<str>) -> Self {
                Self(Arc::from(value.as_ref()))
            }

            /// Wrap `value`, rejecting empty or whitespace-only strings.
            pub fn parse(value: impl AsRef<str>) -> CoreResult<Self> {
                let value = value.as_ref();
                if value.trim().is_empty() {
                    return Err(CoreError::InvalidId(format!(
                        "{} must not be empty",
                        stringify!($name)
                    )));
                }
                Ok(Self::new(value))
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[inline]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(Arc::from(value))
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(&self.0)
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let s = String::deserialize(d)?;
                Ok(Self::from(s))
            }
        }
    };
}

string_id! {
    /// Identity of the controlled agent, sent with every outbound frame.
    pub struct AgentId;
}

string_id! {
    /// Opaque correlation id chosen by the server for one command.
    pub struct ActionId;
}
