// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

/// Sequence number assigned to each submission. Ids are issued in increasing
/// order, so the largest id issued so far identifies the only response the
/// view is still waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(u64);

impl RequestId {
    pub const FIRST: Self = Self(1);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl From<u64> for RequestId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::RequestId;

    #[test]
    fn next_increments_and_saturates() {
        assert_eq!(RequestId::FIRST.next(), RequestId::new(2));
        assert_eq!(RequestId::new(u64::MAX).next(), RequestId::new(u64::MAX));
    }

    #[test]
    fn display_uses_hash_prefix() {
        assert_eq!(RequestId::new(7).to_string(), "#7");
    }
}
