//! Customer contact classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a customer contact may do on behalf of their customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactType {
    /// Main point of contact; may request and approve.
    Primary,
    /// May approve work orders raised for the customer.
    Approver,
    /// Read-only access to the customer's data.
    Viewer,
}

impl ContactType {
    pub fn can_approve(&self) -> bool {
        matches!(self, Self::Primary | Self::Approver)
    }

    pub fn can_create_orders(&self) -> bool {
        matches!(self, Self::Primary | Self::Approver)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Approver => "approver",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for ContactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
