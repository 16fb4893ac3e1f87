//! Account role policy.
//!
//! Roles are assigned from the email domain exactly once, at account
//! creation, and stored as data; later email edits never re-derive them.

use serde::{Deserialize, Serialize};

/// Domains accepted for both login and registration.
pub const ALLOWED_EMAIL_DOMAINS: [&str; 3] =
    ["duoc.cl", "profesor.duoc.cl", "gmail.com"];

/// Closed role set. `SuperAdmin` is only ever assigned through seed data.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub enum UserRole {
    SuperAdmin,
    Administrador,
    Vendedor,
    #[default]
    Cliente,
}

impl UserRole {
    /// Protected accounts keep their RUN and role for life.
    pub fn is_protected(self) -> bool {
        matches!(self, UserRole::SuperAdmin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            UserRole::SuperAdmin => write!(f, "SuperAdmin"),
            UserRole::Administrador => write!(f, "Administrador"),
            UserRole::Vendedor => write!(f, "Vendedor"),
            UserRole::Cliente => write!(f, "Cliente"),
        }
    }
}

/// Lowercased domain part of `email`, if it has one.
pub fn email_domain(email: &str) -> Option<String> {
    let normalized = email.trim().to_lowercase();
    let (_, domain) = normalized.rsplit_once('@')?;

    (!domain.is_empty()).then(|| domain.to_owned())
}

/// Whether the address belongs to the fixed allow-list.
pub fn domain_allowed(email: &str) -> bool {
    email_domain(email)
        .is_some_and(|domain| ALLOWED_EMAIL_DOMAINS.contains(&domain.as_str()))
}

/// Create-flow role assignment, a pure function of the domain.
pub fn assign_role(email: &str) -> UserRole {
    match email_domain(email).as_deref() {
        Some("profesor.duoc.cl") => UserRole::Vendedor,
        Some("duoc.cl") => UserRole::Administrador,
        _ => UserRole::Cliente,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_domain() {
        assert_eq!(email_domain("ana@duoc.cl").as_deref(), Some("duoc.cl"));
        assert_eq!(
            email_domain("  Ana@DUOC.CL  ").as_deref(),
            Some("duoc.cl")
        );
        assert_eq!(email_domain("sin-arroba"), None);
        assert_eq!(email_domain("vacio@"), None);
    }

    #[test]
    fn test_domain_allowed() {
        assert!(domain_allowed("ana@gmail.com"));
        assert!(domain_allowed("ana@profesor.duoc.cl"));
        assert!(!domain_allowed("ana@unknown.org"));
        // exact match, not a suffix check.
        assert!(!domain_allowed("ana@notduoc.cl"));
    }

    #[test]
    fn test_assign_role() {
        assert_eq!(assign_role("p@profesor.duoc.cl"), UserRole::Vendedor);
        assert_eq!(assign_role("a@duoc.cl"), UserRole::Administrador);
        assert_eq!(assign_role("c@gmail.com"), UserRole::Cliente);
        assert_eq!(assign_role("c@unknown.org"), UserRole::Cliente);
    }

    #[test]
    fn test_protected_roles() {
        assert!(UserRole::SuperAdmin.is_protected());
        assert!(!UserRole::Administrador.is_protected());
        assert!(!UserRole::Cliente.is_protected());
    }
}
