use auth_headers::{Challenge, Credentials};
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CredentialsReport {
    pub scheme: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub params: Vec<(String, String)>,
}

impl From<&Credentials> for CredentialsReport {
    fn from(credentials: &Credentials) -> Self {
        Self {
            scheme: credentials.scheme().to_string(),
            username: credentials.username().map(str::to_string),
            password: credentials.password().map(|_| "********".to_string()),
            token: credentials.token().map(str::to_string),
            params: credentials
                .parameters()
                .map(|params| {
                    params
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ChallengeReport {
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stale: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub qop: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub domain: Vec<String>,
    pub params: Vec<(String, String)>,
}

impl From<&Challenge> for ChallengeReport {
    fn from(challenge: &Challenge) -> Self {
        Self {
            scheme: challenge.scheme().map(str::to_string),
            realm: challenge.realm().map(str::to_string),
            stale: challenge.stale(),
            qop: challenge.qop().iter().map(str::to_string).collect(),
            domain: challenge.domain().iter().map(str::to_string).collect(),
            params: challenge
                .parameters()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}
