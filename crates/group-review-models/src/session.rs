use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Who is signed in, and the bearer token that authorizes their requests.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: UserId,
    pub token: Option<String>,
}

impl SessionIdentity {
    pub fn new(user_id: UserId, token: Option<String>) -> Self {
        Self { user_id, token }
    }

    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

// Never print the token.
impl std::fmt::Debug for SessionIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIdentity")
            .field("user_id", &self.user_id)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_masks_token() {
        let session = SessionIdentity::new(5, Some("secret-token".to_string()));
        let printed = format!("{:?}", session);
        assert!(printed.contains("user_id: 5"));
        assert!(!printed.contains("secret-token"));
    }

    #[test]
    fn test_has_token() {
        assert!(SessionIdentity::new(1, Some("t".to_string())).has_token());
        assert!(!SessionIdentity::new(1, Some(String::new())).has_token());
        assert!(!SessionIdentity::new(1, None).has_token());
    }
}
