use reqwest::Url;

use crate::error::{MiniAppError, Result};

/// Query parameters a page is launched with.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LaunchParams {
    token: Option<String>,
    hash: Option<String>,
}

impl LaunchParams {
    pub fn new(token: Option<String>, hash: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
            hash: hash.filter(|h| !h.trim().is_empty()),
        }
    }

    /// Reads `token` and `hash` from the launch URL's query string.
    pub fn from_url(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|err| MiniAppError::validation(format!("invalid launch url: {err}")))?;

        let mut token = None;
        let mut hash = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "token" => token = Some(value.into_owned()),
                "hash" => hash = Some(value.into_owned()),
                _ => {}
            }
        }
        Ok(Self::new(token, hash))
    }

    pub fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or(MiniAppError::MissingLaunchParam("Access token"))
    }

    pub fn hash(&self) -> Result<&str> {
        self.hash
            .as_deref()
            .ok_or(MiniAppError::MissingLaunchParam("Transaction hash"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_token_and_hash() {
        let params =
            LaunchParams::from_url("https://example.org/detail.html?token=abc.def&hash=f00d").unwrap();
        assert_eq!(params.token().unwrap(), "abc.def");
        assert_eq!(params.hash().unwrap(), "f00d");
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let params = LaunchParams::from_url("https://example.org/edit.html?token=").unwrap();
        let err = params.token().unwrap_err();
        assert_eq!(err.user_message(), "Access token not found.");
    }
}
