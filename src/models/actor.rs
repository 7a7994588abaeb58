use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role resolved by the identity provider and carried in the access token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Monitor,
    #[serde(rename = "prof")]
    Teacher,
}

/// Authenticated caller, injected into request extensions by the auth
/// middleware and passed down to the services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Server-side re-check for admin-only operations, independent of
    /// whatever the caller already verified.
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), "\"prof\"");
        let r: Role = serde_json::from_str("\"monitor\"").unwrap();
        assert_eq!(r, Role::Monitor);
    }

    #[test]
    fn test_require_admin() {
        let mut actor = Actor {
            id: "1".into(),
            name: "Ana".into(),
            role: Role::Admin,
        };
        assert!(actor.require_admin().is_ok());
        actor.role = Role::Monitor;
        assert!(matches!(actor.require_admin(), Err(AppError::PermissionDenied)));
    }
}
