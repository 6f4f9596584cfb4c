use std::fmt;

/// Jenkins API token.
///
/// Kept out of `Debug` output so it never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// User name and API token pair sent as HTTP basic auth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub token: Token,
}

impl Credentials {
    pub fn new(user: impl Into<String>, token: impl Into<Token>) -> Self {
        Self {
            user: user.into(),
            token: token.into(),
        }
    }

    /// Builds credentials only when both halves are present.
    pub fn from_parts(user: Option<&str>, token: Option<&str>) -> Option<Self> {
        match (user, token) {
            (Some(user), Some(token)) => Some(Self::new(user, token)),
            _ => None,
        }
    }
}
