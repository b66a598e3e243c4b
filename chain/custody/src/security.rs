//! Access control for administrative operations
//!
//! A single transferable admin identified by a caller string. Pair creation
//! and fee-parameter mutation require the admin; everything else is open.

/// Single-admin access control.
#[derive(Debug, Clone)]
pub struct AccessControl {
    admin: String,
}

impl AccessControl {
    /// Create access control with an initial admin.
    pub fn new(admin: impl Into<String>) -> Self {
        Self {
            admin: admin.into(),
        }
    }

    /// Check if the caller is the admin.
    pub fn is_admin(&self, caller: &str) -> bool {
        self.admin == caller
    }

    /// Transfer admin to a new caller. Returns `false` if the current
    /// caller is not the admin; state is unchanged in that case.
    pub fn transfer_admin(&mut self, current_admin: &str, new_admin: &str) -> bool {
        if !self.is_admin(current_admin) {
            return false;
        }
        self.admin = new_admin.to_string();
        true
    }

    /// Get the current admin.
    pub fn admin(&self) -> &str {
        &self.admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_check() {
        let access = AccessControl::new("alice");
        assert!(access.is_admin("alice"));
        assert!(!access.is_admin("bob"));
    }

    #[test]
    fn test_transfer_admin() {
        let mut access = AccessControl::new("alice");
        assert!(!access.transfer_admin("bob", "carol"));
        assert_eq!(access.admin(), "alice");

        assert!(access.transfer_admin("alice", "bob"));
        assert!(access.is_admin("bob"));
        assert!(!access.is_admin("alice"));
    }
}
