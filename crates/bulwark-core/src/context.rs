/// Authentication result for a single request
///
/// Produced by an identity provider. A present `user_id` is the only
/// signal that the caller is signed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Option<String>,
}

impl AuthContext {
    /// Context for a caller with no session
    pub const fn anonymous() -> Self {
        Self { user_id: None }
    }

    /// Context for a signed-in user
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Narrow to the signed-in user, if any
    pub fn into_user(self) -> Option<AuthenticatedUser> {
        self.user_id
            .filter(|id| !id.is_empty())
            .map(|user_id| AuthenticatedUser { user_id })
    }
}

/// Signed-in caller, attached to the request once the auth gate lets it through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_has_no_user() {
        let ctx = AuthContext::anonymous();
        assert!(!ctx.is_authenticated());
        assert!(ctx.into_user().is_none());
    }

    #[test]
    fn signed_in_context_yields_user() {
        let user = AuthContext::for_user("user_2abc").into_user().unwrap();
        assert_eq!(user.user_id, "user_2abc");
    }

    #[test]
    fn empty_user_id_is_not_a_session() {
        let ctx = AuthContext::for_user("");
        assert!(!ctx.is_authenticated());
        assert!(ctx.into_user().is_none());
    }
}
