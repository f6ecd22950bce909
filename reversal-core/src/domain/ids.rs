use serde::{Deserialize, Serialize};
use std::fmt;

/// Broker-assigned position identifier. Doubles as the handle used to close it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PositionId(pub u64);

impl From<u64> for PositionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
