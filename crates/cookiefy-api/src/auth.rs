use secrecy::{ExposeSecret, SecretString};

/// Hook invoked by the API client when the backend rejects the session.
///
/// Supplied at construction by whoever owns the session state. The client
/// has already cleared the session store when this runs; implementations
/// update their in-memory view and notify the user.
pub trait UnauthorizedHandler: Send + Sync {
    fn session_expired(&self);
}

/// OAuth2 password-grant form posted to `/auth/login`.
///
/// The backend is a FastAPI `OAuth2PasswordRequestForm` endpoint and
/// expects these exact fields, including the placeholder client
/// credentials.
#[derive(Debug, Clone)]
pub struct LoginForm {
    username: String,
    password: SecretString,
}

impl LoginForm {
    const GRANT_TYPE: &'static str = "password";
    const CLIENT_ID: &'static str = "string";
    const CLIENT_SECRET: &'static str = "********";

    /// Usernames are matched case-insensitively by the backend, so they are
    /// trimmed and lower-cased here.
    pub fn new(username: &str, password: SecretString) -> Self {
        Self {
            username: username.trim().to_lowercase(),
            password,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Form fields in wire order.
    pub(crate) fn fields(&self) -> Vec<(String, String)> {
        vec![
            ("grant_type".into(), Self::GRANT_TYPE.into()),
            ("username".into(), self.username.clone()),
            ("password".into(), self.password.expose_secret().to_owned()),
            ("scope".into(), String::new()),
            ("client_id".into(), Self::CLIENT_ID.into()),
            ("client_secret".into(), Self::CLIENT_SECRET.into()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_is_normalized() {
        let form = LoginForm::new("  Admin@Cookiefy ", SecretString::from("pw"));
        assert_eq!(form.username(), "admin@cookiefy");
    }

    #[test]
    fn fields_follow_password_grant() {
        let form = LoginForm::new("admin", SecretString::from("hunter2"));
        let fields = form.fields();
        let names: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            ["grant_type", "username", "password", "scope", "client_id", "client_secret"]
        );
        assert!(fields.contains(&("password".into(), "hunter2".into())));
        assert!(fields.contains(&("scope".into(), String::new())));
    }
}
