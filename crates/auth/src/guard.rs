//! Per-request access decision.
//!
//! Nothing is kept between requests: a decision is a function of
//! (path, identity, route table).

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Serialize;

use keystone_core::{TenantId, UserId};

use crate::{Identity, Role, RouteClass, RouteTable};

/// Identity values handed to downstream handlers so they don't re-decode
/// the token.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityContext {
    pub user_id: UserId,
    pub tenant_id: TenantId,
    pub role: Role,
}

impl From<&Identity> for IdentityContext {
    fn from(identity: &Identity) -> Self {
        Self {
            user_id: identity.user_id,
            tenant_id: identity.tenant_id,
            role: identity.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    AllowWithIdentity(IdentityContext),
    /// `return_to` is the originally requested path.
    RedirectToLogin { return_to: String },
    RedirectToHome,
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow | Decision::AllowWithIdentity(_))
    }
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    table: RouteTable,
    login_path: String,
    home_path: String,
    root_redirect: bool,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(RouteTable::default())
    }
}

impl RouteGuard {
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            login_path: "/login".to_string(),
            home_path: "/dashboard".to_string(),
            root_redirect: true,
        }
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn with_home_path(mut self, path: impl Into<String>) -> Self {
        self.home_path = path.into();
        self
    }

    /// Disable the `/` → home convenience redirect.
    pub fn without_root_redirect(mut self) -> Self {
        self.root_redirect = false;
        self
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn home_path(&self) -> &str {
        &self.home_path
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Security rules first; the convenience rule only sees unclassified paths.
    pub fn decide(&self, path: &str, identity: Option<&Identity>) -> Decision {
        let decision = match self.table.classify(path) {
            Some(class) => self.decide_class(class, path, identity),
            None => self.convenience(path, identity),
        };
        tracing::debug!(path, authenticated = identity.is_some(), ?decision, "route decision");
        decision
    }

    fn decide_class(
        &self,
        class: &RouteClass,
        path: &str,
        identity: Option<&Identity>,
    ) -> Decision {
        match (class, identity) {
            (RouteClass::Public, _) => Decision::Allow,
            (RouteClass::AuthOnly, Some(_)) => Decision::RedirectToHome,
            (RouteClass::AuthOnly, None) => Decision::Allow,
            (RouteClass::Protected | RouteClass::RoleGated(_), None) => Decision::RedirectToLogin {
                return_to: path.to_string(),
            },
            (RouteClass::Protected, Some(identity)) => {
                Decision::AllowWithIdentity(IdentityContext::from(identity))
            }
            (RouteClass::RoleGated(req), Some(identity)) => {
                if req.satisfied_by(identity.role) {
                    Decision::AllowWithIdentity(IdentityContext::from(identity))
                } else {
                    Decision::RedirectToHome
                }
            }
        }
    }

    /// Not an access control rule: sends signed-in visitors of `/` to home.
    fn convenience(&self, path: &str, identity: Option<&Identity>) -> Decision {
        if self.root_redirect && path == "/" && identity.is_some() {
            Decision::RedirectToHome
        } else {
            Decision::Allow
        }
    }

    /// Redirect target for a decision, `None` when the request passes through.
    pub fn location(&self, decision: &Decision) -> Option<String> {
        match decision {
            Decision::Allow | Decision::AllowWithIdentity(_) => None,
            Decision::RedirectToHome => Some(self.home_path.clone()),
            Decision::RedirectToLogin { return_to } => Some(self.login_location(return_to)),
        }
    }

    /// `<login>?redirect=<path>`.
    pub fn login_location(&self, return_to: &str) -> String {
        format!("{}?redirect={}", self.login_path, encode_query_value(return_to))
    }

    /// Validate a `redirect` query value before honouring it after login.
    ///
    /// Only same-origin absolute paths are accepted; anything else falls back
    /// to home.
    pub fn safe_return_path<'a>(&'a self, candidate: Option<&'a str>) -> &'a str {
        match candidate {
            Some(p)
                if p.starts_with('/')
                    && !p.starts_with("//")
                    && !p.contains('\\')
                    && !p.chars().any(char::is_control) =>
            {
                p
            }
            _ => &self.home_path,
        }
    }
}

/// Characters escaped in the `redirect` value. `%` is included so an
/// already-encoded path survives one round of query decoding; `/` is not.
const RETURN_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'=')
    .add(b'?')
    .add(b'`');

fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, RETURN_PATH).to_string()
}
