// src/config/credentials.rs
use std::fmt;

const DEFAULT_REDDIT_USER_AGENT: &str = "mention-digest/0.1 (news compiler)";

/// Secrets read from the environment. `Debug` only reports presence.
#[derive(Clone, Default)]
pub struct Credentials {
    pub gemini_api_key: Option<String>,
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
    pub recipient_email: Option<String>,
    pub reddit_client_id: Option<String>,
    pub reddit_client_secret: Option<String>,
    pub reddit_user_agent: Option<String>,
    pub twitter_bearer_token: Option<String>,
}

#[derive(Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

/// Sender, password and recipient; all three or nothing.
#[derive(Clone)]
pub struct MailCredentials {
    pub sender: String,
    pub password: String,
    pub recipient: String,
}

/// Empty values and unedited `YOUR_...` placeholders count as unset.
fn meaningful(v: Option<String>) -> Option<String> {
    let v = v?;
    let t = v.trim();
    if t.is_empty() || t.starts_with("YOUR_") {
        None
    } else {
        Some(t.to_string())
    }
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |k: &str| meaningful(get(k));
        Self {
            gemini_api_key: read("GEMINI_API_KEY"),
            sender_email: read("EMAIL_ADDRESS"),
            sender_password: read("EMAIL_PASSWORD"),
            recipient_email: read("RECIPIENT_EMAIL"),
            reddit_client_id: read("REDDIT_CLIENT_ID"),
            reddit_client_secret: read("REDDIT_CLIENT_SECRET"),
            reddit_user_agent: read("REDDIT_USER_AGENT"),
            twitter_bearer_token: read("TWITTER_BEARER_TOKEN"),
        }
    }

    /// Reddit is usable only with both id and secret.
    pub fn reddit(&self) -> Option<RedditCredentials> {
        Some(RedditCredentials {
            client_id: self.reddit_client_id.clone()?,
            client_secret: self.reddit_client_secret.clone()?,
            user_agent: self
                .reddit_user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_REDDIT_USER_AGENT.to_string()),
        })
    }

    pub fn mail(&self) -> Option<MailCredentials> {
        Some(MailCredentials {
            sender: self.sender_email.clone()?,
            password: self.sender_password.clone()?,
            recipient: self.recipient_email.clone()?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set = |v: &Option<String>| v.as_ref().map(|s| s.len()).unwrap_or(0);
        f.debug_struct("Credentials")
            .field("gemini_key_len", &set(&self.gemini_api_key))
            .field("sender_email", &self.sender_email)
            .field("sender_password_len", &set(&self.sender_password))
            .field("recipient_email", &self.recipient_email)
            .field("reddit_client_id_len", &set(&self.reddit_client_id))
            .field("reddit_secret_len", &set(&self.reddit_client_secret))
            .field("twitter_token_len", &set(&self.twitter_bearer_token))
            .finish()
    }
}
