//! Route protection
//!
//! Decides per request whether credentials are needed, checks them and, on
//! rejection, hands the request path to the registered
//! [`SecurityFailureAdapter`]s so the client receives the standard error
//! contract rather than a bare status.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use faultline_core::{AuthenticationFailed, AuthorizationFailed, Messages, SecurityFailureAdapter};

use crate::api::error::render;
use crate::config::{SecurityConfig, UserConfig};

/// What a path requires from the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// No credentials needed
    Public,
    /// Any authenticated principal
    Authenticated,
    /// An authenticated principal holding the role
    Role(String),
}

/// Maps request paths to their [`Access`] requirement
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    public_paths: Vec<String>,
    admin_prefix: String,
    admin_role: String,
}

impl AccessPolicy {
    pub fn new(config: &SecurityConfig) -> Self {
        Self {
            public_paths: config.public_paths.clone(),
            admin_prefix: config.admin_prefix.clone(),
            admin_role: config.admin_role.clone(),
        }
    }

    /// Requirement for `path`, public prefixes are checked first
    pub fn requirement(&self, path: &str) -> Access {
        if self.public_paths.iter().any(|p| under_prefix(path, p)) {
            Access::Public
        } else if under_prefix(path, &self.admin_prefix) {
            Access::Role(self.admin_role.clone())
        } else {
            Access::Authenticated
        }
    }
}

// Segment-aware: `/admin` covers `/admin` and `/admin/ping` but not `/administrator`.
fn under_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// An authenticated caller, inserted into request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Credential checking collaborator
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// The principal behind the request credentials, `None` when missing or invalid
    async fn authenticate(&self, headers: &HeaderMap) -> Option<Principal>;
}

/// HTTP Basic authentication against the configured user table
#[derive(Debug, Clone, Default)]
pub struct BasicAuthenticator {
    users: HashMap<String, UserConfig>,
}

impl BasicAuthenticator {
    pub fn new(users: &[UserConfig]) -> Self {
        Self {
            users: users.iter().map(|u| (u.name.clone(), u.clone())).collect(),
        }
    }

    fn credentials(headers: &HeaderMap) -> Option<(String, String)> {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        let encoded = value.strip_prefix("Basic ")?;
        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (name, password) = decoded.split_once(':')?;
        Some((name.to_string(), password.to_string()))
    }
}

#[async_trait]
impl Authenticator for BasicAuthenticator {
    async fn authenticate(&self, headers: &HeaderMap) -> Option<Principal> {
        let (name, password) = Self::credentials(headers)?;
        let user = self.users.get(&name).filter(|u| u.password == password)?;
        Some(Principal {
            name,
            roles: user.roles.clone(),
        })
    }
}

/// Everything the security middleware needs
pub struct Guard {
    pub policy: AccessPolicy,
    pub authenticator: Arc<dyn Authenticator>,
    pub on_unauthenticated: Arc<dyn SecurityFailureAdapter>,
    pub on_forbidden: Arc<dyn SecurityFailureAdapter>,
}

impl Guard {
    /// Basic authentication plus the standard 401/403 adapters
    pub fn from_config(config: &SecurityConfig, messages: Arc<Messages>) -> Self {
        Self {
            policy: AccessPolicy::new(config),
            authenticator: Arc::new(BasicAuthenticator::new(&config.users)),
            on_unauthenticated: Arc::new(AuthenticationFailed::new(Arc::clone(&messages))),
            on_forbidden: Arc::new(AuthorizationFailed::new(messages)),
        }
    }
}

/// Middleware enforcing the [`AccessPolicy`]
pub async fn enforce(State(guard): State<Arc<Guard>>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();

    let requirement = guard.policy.requirement(&path);
    if requirement == Access::Public {
        return next.run(request).await;
    }

    let Some(principal) = guard.authenticator.authenticate(request.headers()).await else {
        return render(guard.on_unauthenticated.respond(&path));
    };

    if let Access::Role(role) = &requirement {
        if !principal.has_role(role) {
            tracing::debug!(user = %principal.name, role = %role, "missing role");
            return render(guard.on_forbidden.respond(&path));
        }
    }

    request.extensions_mut().insert(principal);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn policy() -> AccessPolicy {
        AccessPolicy::new(&SecurityConfig::default())
    }

    fn basic(user: &str, password: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let token = STANDARD.encode(format!("{user}:{password}"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {token}")).unwrap(),
        );
        headers
    }

    fn authenticator() -> BasicAuthenticator {
        BasicAuthenticator::new(&[UserConfig {
            name: "alice".to_string(),
            password: "wonderland".to_string(),
            roles: vec!["USER".to_string()],
        }])
    }

    #[test]
    fn test_requirements() {
        let policy = policy();
        assert_eq!(policy.requirement("/health"), Access::Public);
        assert_eq!(policy.requirement("/api-docs/openapi.json"), Access::Public);
        assert_eq!(policy.requirement("/admin/ping"), Access::Role("ADMIN".to_string()));
        assert_eq!(policy.requirement("/admin"), Access::Role("ADMIN".to_string()));
        assert_eq!(policy.requirement("/administrator"), Access::Authenticated);
        assert_eq!(policy.requirement("/healthz"), Access::Authenticated);
        assert_eq!(policy.requirement("/ping"), Access::Authenticated);
    }

    #[test]
    fn test_principal_roles() {
        let principal = Principal {
            name: "root".to_string(),
            roles: vec!["ADMIN".to_string()],
        };
        assert!(principal.has_role("ADMIN"));
        assert!(!principal.has_role("admin"));
    }

    #[tokio::test]
    async fn test_basic_authentication() {
        let auth = authenticator();

        let principal = auth.authenticate(&basic("alice", "wonderland")).await.unwrap();
        assert_eq!(principal.name, "alice");
        assert!(principal.has_role("USER"));

        assert!(auth.authenticate(&basic("alice", "nope")).await.is_none());
        assert!(auth.authenticate(&basic("bob", "wonderland")).await.is_none());
        assert!(auth.authenticate(&HeaderMap::new()).await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_header_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic !!!not-base64"));
        assert!(authenticator().authenticate(&headers).await.is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert!(authenticator().authenticate(&headers).await.is_none());
    }
}
