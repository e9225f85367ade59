use serde::{Deserialize, Serialize};

/// User ID domain type. Opaque positive integer handed to the core by the
/// session layer; the core never sees credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// Company ID domain type. Wrapping it separately from `UserId` keeps tenant
/// scoping arguments from being swapped silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(i64);

impl CompanyId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        assert_eq!(UserId::new(7).as_i64(), 7);
        assert_eq!(CompanyId::new(3).as_i64(), 3);
    }
}
