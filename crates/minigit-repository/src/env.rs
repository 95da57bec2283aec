use minigit_utils::date::{GitDate, Signature};

/// Author and committer identity for the next commit or tag.
///
/// Populated from the environment by the CLI layer: `AUTHOR_NAME`,
/// `AUTHOR_EMAIL`, `COMMITTER_NAME`, `COMMITTER_EMAIL`, `AUTHOR_DATE`,
/// `COMMITTER_DATE`. Dates parse as RFC 3339 or `<unix-seconds> <±HHMM>`;
/// absent dates default to now in the local timezone.
#[derive(Debug, Clone)]
pub struct Identity {
    pub author: Signature,
    pub committer: Signature,
}

impl Identity {
    /// Read identity from the environment, once per commit operation.
    pub fn from_env() -> Self {
        let author_name = std::env::var("AUTHOR_NAME").ok();
        let author_email = std::env::var("AUTHOR_EMAIL").ok();
        let committer_name = std::env::var("COMMITTER_NAME").ok();
        let committer_email = std::env::var("COMMITTER_EMAIL").ok();

        // Author and committer fall back to each other before the default.
        let name = |primary: &Option<String>, secondary: &Option<String>| {
            primary
                .clone()
                .or_else(|| secondary.clone())
                .unwrap_or_else(|| "minigit".to_string())
        };
        let email = |primary: &Option<String>, secondary: &Option<String>| {
            primary
                .clone()
                .or_else(|| secondary.clone())
                .unwrap_or_else(|| "minigit@localhost".to_string())
        };

        let author_date = parse_date_env("AUTHOR_DATE");
        let committer_date = parse_date_env("COMMITTER_DATE");

        Self {
            author: Signature::new(
                name(&author_name, &committer_name),
                email(&author_email, &committer_email),
                author_date,
            ),
            committer: Signature::new(
                name(&committer_name, &author_name),
                email(&committer_email, &author_email),
                committer_date,
            ),
        }
    }
}

fn parse_date_env(var: &str) -> GitDate {
    std::env::var(var)
        .ok()
        .and_then(|value| GitDate::parse(&value).ok())
        .unwrap_or_else(GitDate::now)
}
