//! Session state shared by every authenticated request.

/// Identity of the logged-in user, as reported by the login handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfo {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub full_name: String,
}

/// An established session: the bearer token and the instance it is valid for.
///
/// The token is redacted in Debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    access_token: String,
    instance_url: String,
    user: UserInfo,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("instance_url", &self.instance_url)
            .field("user", &self.user)
            .finish()
    }
}

impl Session {
    /// Create a session from a token and instance URL. A trailing `/` on the
    /// instance URL is dropped.
    pub fn new(access_token: impl Into<String>, instance_url: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            user: UserInfo::default(),
        }
    }

    /// Attach the user identity returned by login.
    pub fn with_user(mut self, user: UserInfo) -> Self {
        self.user = user;
        self
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    pub fn user(&self) -> &UserInfo {
        &self.user
    }

    /// A session is usable only when it carries a token.
    pub fn is_valid(&self) -> bool {
        !self.access_token.is_empty()
    }
}
