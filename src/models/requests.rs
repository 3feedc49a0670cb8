use serde::{Deserialize, Serialize};

/// Body of `/cadastro`, `/login` and `/perdeu_cartao`
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default, alias = "senha")]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CardForm {
    #[serde(default)]
    pub rfid_uid: String,
}

#[derive(Debug, Deserialize)]
pub struct CardQuery {
    pub rfid_uid: Option<String>,
}

/// JSON body of `/reservar` and `/liberar`
#[derive(Debug, Deserialize)]
pub struct SpotRequest {
    #[serde(alias = "vaga_id")]
    pub spot_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SpotResponse {
    pub success: bool,
    pub message: String,
}
