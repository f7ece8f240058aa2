//! Newtype wrappers for all domain identifiers.
//!
//! Users and customers are keyed by numeric database ids; tenants and
//! sessions by opaque strings. Distinct types prevent passing a tenant id
//! where a session id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Macro to define a numeric newtype ID.
macro_rules! define_numeric_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Return the inner numeric value.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

/// Macro to define a string-keyed newtype ID.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from any string-like value.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the identifier is the empty string.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Consume the identifier, returning the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

define_numeric_id!(
    /// Unique identifier for a user.
    UserId
);

define_numeric_id!(
    /// Identifier of the customer a customer-contact user is scoped to.
    CustomerId
);

define_string_id!(
    /// Identifier of a tenant (an isolated customer organization).
    TenantId
);

define_string_id!(
    /// Opaque identifier of a server-side session.
    SessionId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_id_empty() {
        assert!(TenantId::default().is_empty());
        assert!(!TenantId::from("houston").is_empty());
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let user = serde_json::to_string(&UserId(42)).unwrap();
        assert_eq!(user, "42");

        let tenant = serde_json::to_string(&TenantId::from("houston")).unwrap();
        assert_eq!(tenant, "\"houston\"");

        let parsed: SessionId = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(parsed.as_str(), "abc123");
    }
}
