use engine::decode_user_id;

/// The client's identity: the bearer token and the user id decoded from
/// its payload. Absence of an id means "not logged in", never an error.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
    current_user_id: Option<String>,
}

impl Session {
    /// Builds the session from a token restored at startup, if any.
    pub fn from_token(token: Option<String>) -> Self {
        let current_user_id = token.as_deref().and_then(decode_user_id);
        Self {
            token,
            current_user_id,
        }
    }

    /// Replaces the token after a successful login and re-decodes the
    /// identity from it.
    pub fn set_token(&mut self, token: String) {
        self.current_user_id = decode_user_id(&token);
        self.token = Some(token);
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.current_user_id = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.current_user_id.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparsable_token_means_logged_out() {
        let session = Session::from_token(Some("garbage".to_string()));
        assert!(!session.is_logged_in());
        assert_eq!(session.user_id(), None);
    }

    #[test]
    fn clear_drops_both_token_and_identity() {
        let mut session = Session::default();
        session.set_token("a.eyJzdWIiOiI0MiJ9.c".to_string());
        assert_eq!(session.user_id(), Some("42"));
        session.clear();
        assert!(session.token().is_none());
        assert!(!session.is_logged_in());
    }
}
