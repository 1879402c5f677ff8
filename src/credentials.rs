use crate::error::HousingError;
use crate::{DATABASE, DRIVER_SCHEME, PORT};
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::debug;

/// Database login, as stored in the json configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Credentials {
    #[serde(rename = "UserName")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "HostName")]
    pub hostname: String,
}

impl Credentials {
    /// Read the credentials from a json file with the keys `UserName`, `Password` and `HostName`.
    /// Any other key is ignored; a missing key is an error.
    pub fn from_json_file<P>(fin: P) -> Result<Credentials, HousingError>
    where
        P: AsRef<Path>,
    {
        let path = fin.as_ref();
        let contents = fs::read_to_string(path)?;
        let credentials: Credentials = serde_json::from_str(&contents)?;
        debug!(path = %path.display(), hostname = %credentials.hostname, "loaded database credentials");
        Ok(credentials)
    }

    /// Connection url for the housing database.
    /// The fields are used as they are, without escaping.
    pub fn connection_string(&self) -> String {
        format!(
            "{}://{}:{}@{}:{}/{}",
            DRIVER_SCHEME, self.username, self.password, self.hostname, PORT, DATABASE
        )
    }
}
