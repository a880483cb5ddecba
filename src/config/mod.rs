pub mod credentials;
pub mod settings;

pub use credentials::{Credentials, MailCredentials, RedditCredentials};
pub use settings::{
    GeminiSettings, RedditSettings, Settings, SmtpSettings, TwitterSettings, DEFAULT_CONFIG_PATH,
    ENV_CONFIG_PATH,
};
