use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct LoginParams {
    pub redirect_uri: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub authorize_url: String,
}
