use anyhow::{anyhow, Result};
use file_manager::aws_credentials::AwsCredentials;
use serde::Serialize;

#[derive(Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct JsonCredential {
    pub version: u8,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: String,
}

impl JsonCredential {
    pub fn convert(credential: AwsCredentials) -> Result<Self> {
        Ok(Self {
            version: 1,
            access_key_id: credential
                .aws_access_key_id
                .ok_or(anyhow!("No access key ID in credentials"))?,
            secret_access_key: credential
                .aws_secret_access_key
                .ok_or(anyhow!("No secret access key in credentials"))?,
            session_token: credential
                .aws_session_token
                .ok_or(anyhow!("No session token in credentials"))?,
            expiration: credential
                .aws_expiration
                .ok_or(anyhow!("No expiration in credentials"))?
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn convert_produces_credential_process_shape() {
        let credential = AwsCredentials {
            profile_name: Some("temp_dev".to_string()),
            aws_access_key_id: Some("AKIASESSIONKEY".to_string()),
            aws_secret_access_key: Some("sessionsecret".to_string()),
            aws_session_token: Some("sessiontoken".to_string()),
            aws_expiration: Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()),
        };

        let json = serde_json::to_value(JsonCredential::convert(credential).unwrap()).unwrap();

        assert_eq!(json["Version"], 1);
        assert_eq!(json["AccessKeyId"], "AKIASESSIONKEY");
        assert_eq!(json["SecretAccessKey"], "sessionsecret");
        assert_eq!(json["SessionToken"], "sessiontoken");
        assert_eq!(json["Expiration"], "2030-01-01T00:00:00.000Z");
    }

    #[test]
    fn convert_requires_complete_credentials() {
        let credential = AwsCredentials {
            profile_name: None,
            aws_access_key_id: Some("AKIASESSIONKEY".to_string()),
            aws_secret_access_key: None,
            aws_session_token: None,
            aws_expiration: None,
        };

        assert!(JsonCredential::convert(credential).is_err());
    }
}
