pub mod reddit;
pub mod twitter;

pub use reddit::RedditProvider;
pub use twitter::TwitterProvider;
