use serde::{Deserialize, Serialize};

/// Token issued by the OAuth server for the client-credentials grant.
/// Unknown fields of the token response are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: u64, // seconds
    #[serde(default)]
    pub scope: String,
    #[serde(rename = "compania", default)]
    pub company: String,
    #[serde(default)]
    pub jti: String,
}
