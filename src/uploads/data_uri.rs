use base64::engine::general_purpose;
use base64::Engine;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DataUriError {
    #[error("not a data URI")]
    MissingScheme,
    #[error("data URI has no payload separator")]
    MissingPayload,
    #[error("data URI is not base64 encoded")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    InvalidPayload(String),
}

/// A parsed `data:<mime>;base64,<payload>` string.
#[derive(Debug, Clone, PartialEq)]
pub struct DataUri {
    pub mime: String,
    pub payload: String,
}

impl DataUri {
    pub fn encode(mime: &str, bytes: &[u8]) -> Self {
        Self {
            mime: mime.to_string(),
            payload: general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn parse(uri: &str) -> Result<Self, DataUriError> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or(DataUriError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingPayload)?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or(DataUriError::NotBase64)?;

        Ok(Self {
            mime: mime.to_string(),
            payload: payload.to_string(),
        })
    }

    pub fn decode(&self) -> Result<Vec<u8>, DataUriError> {
        general_purpose::STANDARD
            .decode(&self.payload)
            .map_err(|e| DataUriError::InvalidPayload(e.to_string()))
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    pub fn to_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.payload)
    }
}
