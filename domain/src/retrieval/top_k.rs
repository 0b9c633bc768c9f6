//! Retrieval depth.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of passages to retrieve per turn, between 1 and [`TopK::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct TopK(usize);

impl TopK {
    pub const MAX: usize = 10;

    pub fn new(k: usize) -> Result<Self, DomainError> {
        if (1..=Self::MAX).contains(&k) {
            Ok(Self(k))
        } else {
            Err(DomainError::InvalidTopK(k))
        }
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for TopK {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<usize> for TopK {
    type Error = DomainError;

    fn try_from(k: usize) -> Result<Self, Self::Error> {
        Self::new(k)
    }
}

impl From<TopK> for usize {
    fn from(k: TopK) -> usize {
        k.0
    }
}

impl fmt::Display for TopK {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_rejected() {
        assert_eq!(TopK::new(0), Err(DomainError::InvalidTopK(0)));
        assert!(serde_json::from_str::<TopK>("0").is_err());
    }

    #[test]
    fn test_upper_bound() {
        assert!(TopK::new(TopK::MAX).is_ok());
        assert_eq!(TopK::new(11), Err(DomainError::InvalidTopK(11)));
        assert!(serde_json::from_str::<TopK>("50").is_err());
    }

    #[test]
    fn test_default_and_get() {
        assert_eq!(TopK::default().get(), 3);
        assert_eq!(TopK::new(7).unwrap().get(), 7);
        assert_eq!(serde_json::from_str::<TopK>("5").unwrap().get(), 5);
    }
}
