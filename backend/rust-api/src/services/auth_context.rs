use crate::error::{ServiceError, ServiceResult};
use crate::middlewares::auth::JwtClaims;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Admin,
}

impl Role {
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::Student
        }
    }
}

/// Identity of the caller, passed explicitly into every service operation.
///
/// A request without a valid bearer token yields an anonymous context; the
/// operations that need a user reject it with `NotAuthenticated`.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    user_id: Option<String>,
    role: Option<Role>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            role: Some(Role::Student),
        }
    }

    pub fn from_claims(claims: Option<&JwtClaims>) -> Self {
        match claims {
            Some(claims) => Self {
                user_id: Some(claims.sub.clone()),
                role: Some(Role::parse(&claims.role)),
            },
            None => Self::anonymous(),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn require_user(&self) -> ServiceResult<&str> {
        self.user_id().ok_or(ServiceError::NotAuthenticated)
    }

    pub fn require_admin(&self) -> ServiceResult<&str> {
        let user_id = self.require_user()?;
        match self.role {
            Some(Role::Admin) => Ok(user_id),
            _ => Err(ServiceError::Forbidden),
        }
    }
}
