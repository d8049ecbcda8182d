//! Caller identification and role checks
//!
//! Authentication happens upstream; the proxy forwards the signed-in user's
//! id in the `x-user-id` header. Handlers turn that id into a [`Caller`]
//! with [`authorize`], which rejects unknown users and missing roles.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use shared::{ProcessId, Role, UserId, process_debug};

use crate::error::{WebServerError, WebServerResult};
use crate::traits::AccessControl;

pub const CALLER_HEADER: &str = "x-user-id";

/// Id of the user making the request, not yet checked against the store
#[derive(Debug, Clone)]
pub struct CallerId(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = WebServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(CALLER_HEADER)
            .ok_or(WebServerError::Unauthorized)?
            .to_str()
            .map_err(|_| WebServerError::Unauthorized)?;

        UserId::parse(raw)
            .map(CallerId)
            .map_err(|_| WebServerError::Unauthorized)
    }
}

/// An authenticated caller with the roles it holds
#[derive(Debug, Clone)]
pub struct Caller {
    pub id: UserId,
    pub roles: Vec<Role>,
}

impl Caller {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Resolve the caller and require at least one of `allowed`
pub async fn authorize(
    access: &dyn AccessControl,
    caller: CallerId,
    allowed: &[Role],
) -> WebServerResult<Caller> {
    let CallerId(id) = caller;
    let roles = access.roles_for(&id).await?.ok_or(WebServerError::Unauthorized)?;

    if !allowed.iter().any(|role| roles.contains(role)) {
        process_debug!(ProcessId::current(), "🚫 User {} lacks any of {:?}", id, allowed);
        let required = allowed
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(" or ");
        return Err(WebServerError::Forbidden { required });
    }

    Ok(Caller { id, roles })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockAccessControl;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<CallerId, WebServerError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(CALLER_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        CallerId::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_missing_or_malformed_header_is_unauthorized() {
        assert!(matches!(extract(None).await, Err(WebServerError::Unauthorized)));
        assert!(matches!(extract(Some("bob")).await, Err(WebServerError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_valid_header_is_extracted() {
        let id = UserId::new();
        let caller = extract(Some(id.as_str())).await.unwrap();
        assert_eq!(caller.0, id);
    }

    #[tokio::test]
    async fn test_authorize_checks_roles() {
        let mut access = MockAccessControl::new();
        access
            .expect_roles_for()
            .returning(|_| Ok(Some(vec![Role::Student])));

        let student = authorize(&access, CallerId(UserId::new()), &[Role::Student])
            .await
            .unwrap();
        assert!(student.has_role(Role::Student));

        let denied = authorize(&access, CallerId(UserId::new()), &[Role::Instructor, Role::Admin]).await;
        match denied {
            Err(WebServerError::Forbidden { required }) => assert_eq!(required, "Instructor or Admin"),
            other => panic!("expected forbidden, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_authorize_unknown_user_is_unauthorized() {
        let mut access = MockAccessControl::new();
        access.expect_roles_for().returning(|_| Ok(None));

        let result = authorize(&access, CallerId(UserId::new()), &[Role::Student]).await;
        assert!(matches!(result, Err(WebServerError::Unauthorized)));
    }
}
