use std::env;

/// Access-control policy knobs.
///
/// The set of protected role names and the designated administrator role are
/// deployment configuration rather than code constants, so installations can
/// reserve their own role names without a rebuild.
#[derive(Clone, Debug)]
pub struct AccessConfig {
    /// Role names that can never be renamed or deleted. Stored lowercased;
    /// matching is case-insensitive.
    pub protected_roles: Vec<String>,
    /// Role name whose last membership a user cannot drop. Matched exactly.
    pub admin_role: String,
}

impl AccessConfig {
    pub fn from_env() -> Self {
        let protected_roles = env::var("PROTECTED_ROLES")
            .unwrap_or_else(|_| "admin,super-admin,super administrador,administrador".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            protected_roles,
            admin_role: env::var("ADMIN_ROLE").unwrap_or_else(|_| "admin".to_string()),
        }
    }

    /// Whether `name` belongs to the protected set, ignoring case.
    pub fn is_protected(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.protected_roles.iter().any(|p| *p == lowered)
    }

    /// Whether `name` is the designated administrator role. The comparison is
    /// exact: only the configured spelling counts.
    pub fn is_admin_role(&self, name: &str) -> bool {
        self.admin_role == name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AccessConfig {
        AccessConfig {
            protected_roles: vec![
                "admin".to_string(),
                "super-admin".to_string(),
                "super administrador".to_string(),
                "administrador".to_string(),
            ],
            admin_role: "admin".to_string(),
        }
    }

    #[test]
    fn protected_matching_ignores_case() {
        let config = config();
        assert!(config.is_protected("admin"));
        assert!(config.is_protected("Administrador"));
        assert!(config.is_protected("SUPER-ADMIN"));
        assert!(config.is_protected("Super Administrador"));
        assert!(!config.is_protected("Operador"));
    }

    #[test]
    fn admin_role_matching_is_exact() {
        let config = config();
        assert!(config.is_admin_role("admin"));
        assert!(!config.is_admin_role("Admin"));
        assert!(!config.is_admin_role("administrador"));
    }
}
