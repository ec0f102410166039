//! Access control for owner-restricted operations
//!
//! The owner is fixed when the contract is constructed. There is no role
//! table and no transfer operation; a call is either from the owner or it
//! is rejected.

use types::ids::Address;

use crate::errors::FundMeError;

/// Single-owner access control, composed into the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControl {
    owner: Address,
}

impl AccessControl {
    /// Create access control owned by `owner`.
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    /// Check if a caller is the owner.
    pub fn is_owner(&self, caller: &Address) -> bool {
        self.owner == *caller
    }

    /// Fail with `NotOwner` unless `caller` is the owner.
    pub fn require_owner(&self, caller: &Address) -> Result<(), FundMeError> {
        if !self.is_owner(caller) {
            return Err(FundMeError::NotOwner);
        }
        Ok(())
    }

    /// Get the owner identity.
    pub fn owner(&self) -> Address {
        self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_control_owner() {
        let alice = Address::from_low_u64(1);
        let bob = Address::from_low_u64(2);
        let ac = AccessControl::new(alice);
        assert!(ac.is_owner(&alice));
        assert!(!ac.is_owner(&bob));
        assert_eq!(ac.owner(), alice);
    }

    #[test]
    fn test_require_owner_accepts_owner() {
        let alice = Address::from_low_u64(1);
        let ac = AccessControl::new(alice);
        assert_eq!(ac.require_owner(&alice), Ok(()));
    }

    #[test]
    fn test_require_owner_rejects_others() {
        let ac = AccessControl::new(Address::from_low_u64(1));
        assert_eq!(
            ac.require_owner(&Address::from_low_u64(2)),
            Err(FundMeError::NotOwner)
        );
        assert_eq!(ac.require_owner(&Address::ZERO), Err(FundMeError::NotOwner));
    }
}
