//! Path classification: an ordered rule table, first match wins.

use serde::Serialize;

use crate::Role;

/// What a role must satisfy to enter a role-gated route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoleRequirement {
    /// Rank at or above the given role.
    AtLeast(Role),
    /// Membership in an explicit allow-list, regardless of rank.
    OneOf(Vec<Role>),
}

impl RoleRequirement {
    pub fn satisfied_by(&self, role: Role) -> bool {
        match self {
            RoleRequirement::AtLeast(required) => role.at_least(*required),
            RoleRequirement::OneOf(allowed) => allowed.contains(&role),
        }
    }
}

impl core::fmt::Display for RoleRequirement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RoleRequirement::AtLeast(r) => write!(f, "at least {r}"),
            RoleRequirement::OneOf(roles) => {
                f.write_str("one of [")?;
                for (i, r) in roles.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{r}")?;
                }
                f.write_str("]")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteClass {
    /// Always allowed, identity or not.
    Public,
    /// Only for anonymous callers (the login page).
    AuthOnly,
    /// Requires an identity.
    Protected,
    /// Requires an identity whose role satisfies the requirement.
    RoleGated(RoleRequirement),
}

/// A path prefix mapped to a route class.
///
/// Prefixes match on segment boundaries: `/admin` covers `/admin` and
/// `/admin/users` but not `/administrator`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    prefix: String,
    class: RouteClass,
}

impl RouteRule {
    pub fn new(prefix: impl Into<String>, class: RouteClass) -> Self {
        let mut prefix = prefix.into();
        while prefix.len() > 1 && prefix.ends_with('/') {
            prefix.pop();
        }
        Self { prefix, class }
    }

    pub fn public(prefix: impl Into<String>) -> Self {
        Self::new(prefix, RouteClass::Public)
    }

    pub fn auth_only(prefix: impl Into<String>) -> Self {
        Self::new(prefix, RouteClass::AuthOnly)
    }

    pub fn protected(prefix: impl Into<String>) -> Self {
        Self::new(prefix, RouteClass::Protected)
    }

    pub fn at_least(prefix: impl Into<String>, role: Role) -> Self {
        Self::new(prefix, RouteClass::RoleGated(RoleRequirement::AtLeast(role)))
    }

    pub fn one_of(prefix: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self::new(
            prefix,
            RouteClass::RoleGated(RoleRequirement::OneOf(roles.into_iter().collect())),
        )
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn class(&self) -> &RouteClass {
        &self.class
    }

    pub fn matches(&self, path: &str) -> bool {
        if self.prefix == "/" {
            return path == "/";
        }
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Ordered rules. Role-gated prefixes must come before any protected prefix
/// that would otherwise shadow them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// `None` means no rule matched; the guard treats that as unclassified.
    pub fn classify(&self, path: &str) -> Option<&RouteClass> {
        let path = normalize(path);
        self.rules.iter().find(|r| r.matches(path)).map(RouteRule::class)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(vec![
            RouteRule::public("/signup"),
            RouteRule::auth_only("/login"),
            RouteRule::at_least("/admin", Role::Admin),
            RouteRule::one_of("/settings", [Role::Admin, Role::Manager]),
            RouteRule::protected("/dashboard"),
            RouteRule::protected("/properties"),
            RouteRule::protected("/leads"),
            RouteRule::protected("/plans"),
            RouteRule::protected("/profile"),
            RouteRule::protected("/api/auth/me"),
            RouteRule::protected("/api/permissions"),
            RouteRule::protected("/api/tenants"),
        ])
    }
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_boundaries() {
        let rule = RouteRule::protected("/admin");
        assert!(rule.matches("/admin"));
        assert!(rule.matches("/admin/users"));
        assert!(!rule.matches("/administrator"));
        assert!(!rule.matches("/"));
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/login/"), Some(&RouteClass::AuthOnly));
        assert_eq!(RouteRule::protected("/leads/").prefix(), "/leads");
    }

    #[test]
    fn default_table_classes() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/signup"), Some(&RouteClass::Public));
        assert_eq!(table.classify("/signup/confirm"), Some(&RouteClass::Public));
        assert_eq!(table.classify("/login"), Some(&RouteClass::AuthOnly));
        assert_eq!(table.classify("/dashboard/leads/42"), Some(&RouteClass::Protected));
        assert_eq!(
            table.classify("/admin/tenants"),
            Some(&RouteClass::RoleGated(RoleRequirement::AtLeast(Role::Admin)))
        );
        assert!(matches!(
            table.classify("/settings/billing"),
            Some(RouteClass::RoleGated(RoleRequirement::OneOf(_)))
        ));
        assert_eq!(table.classify("/"), None);
        assert_eq!(table.classify("/pricing"), None);
    }

    #[test]
    fn first_match_wins() {
        let table = RouteTable::new(vec![
            RouteRule::protected("/reports"),
            RouteRule::at_least("/reports/finance", Role::Manager),
        ]);
        assert_eq!(table.classify("/reports/finance"), Some(&RouteClass::Protected));

        let table = RouteTable::new(vec![
            RouteRule::at_least("/reports/finance", Role::Manager),
            RouteRule::protected("/reports"),
        ]);
        assert!(matches!(table.classify("/reports/finance"), Some(RouteClass::RoleGated(_))));
        assert_eq!(table.classify("/reports/weekly"), Some(&RouteClass::Protected));
    }

    #[test]
    fn requirement_checks() {
        let admin_only = RoleRequirement::AtLeast(Role::Admin);
        assert!(admin_only.satisfied_by(Role::Admin));
        assert!(!admin_only.satisfied_by(Role::Manager));

        let list = RoleRequirement::OneOf(vec![Role::Admin, Role::Agent]);
        assert!(list.satisfied_by(Role::Agent));
        assert!(!list.satisfied_by(Role::Manager));
        assert_eq!(list.to_string(), "one of [ADMIN, AGENT]");

        assert!(!RoleRequirement::OneOf(vec![]).satisfied_by(Role::Admin));
    }
}
