use crate::serde_support::{serialize_ordered, FileName};
use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use directories::UserDirs;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// One section of the AWS credentials file. The expiration is an extra key
/// next to the standard three so a later run can tell whether the session is
/// still usable without calling STS.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AwsCredentials {
    #[serde(skip)]
    pub profile_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_access_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_secret_access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_session_token: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_datetime_with_ms"
    )]
    pub aws_expiration: Option<DateTime<Utc>>,
}

fn serialize_datetime_with_ms<S>(
    dt: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(actual_dt) => {
            let str_dt = actual_dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
            serializer.serialize_str(&str_dt)
        }
        None => serializer.serialize_none(),
    }
}

impl AwsCredentials {
    /// AWS_SHARED_CREDENTIALS_FILE wins over ~/.aws/credentials.
    fn file_path() -> Result<PathBuf> {
        if let Ok(path) = env::var("AWS_SHARED_CREDENTIALS_FILE") {
            return Ok(PathBuf::from(path));
        }

        match UserDirs::new() {
            Some(user_dirs) => Ok(user_dirs.home_dir().join(".aws/credentials")),
            None => Err(anyhow!("Unable to get user directories")),
        }
    }

    pub fn read_file() -> Result<HashMap<String, AwsCredentials>> {
        let credentials_path = Self::file_path()?;
        if !credentials_path.exists() {
            bail!("AWS credentials file not found")
        }

        let file = File::open(credentials_path)?;
        let reader = BufReader::new(file);
        let aws_credentials: HashMap<String, AwsCredentials> = serde_ini::from_bufread(reader)?;

        Ok(aws_credentials)
    }

    pub fn write(profiles: &HashMap<String, AwsCredentials>) -> Result<()> {
        let credentials_path = Self::file_path()?;
        serialize_ordered(profiles, credentials_path.clone(), FileName::Credentials)?;
        restrict_permissions(&credentials_path)
    }

    pub fn get(
        profile_name: &str,
        profiles: &HashMap<String, AwsCredentials>,
    ) -> Result<AwsCredentials> {
        let profile = profiles.get(profile_name).ok_or_else(|| {
            anyhow!(
                "Profile '{}' not found in the AWS credentials file",
                profile_name
            )
        })?;

        Ok(profile.clone())
    }

    pub fn is_profile_about_to_expire(&self) -> bool {
        match self.aws_expiration {
            Some(expiration_date) => {
                let time_difference = expiration_date.signed_duration_since(Utc::now());
                time_difference < chrono::Duration::minutes(11)
            }
            None => true,
        }
    }

    pub fn upsert(
        profile_name: &str,
        profile: &AwsCredentials,
        profiles: &mut HashMap<String, AwsCredentials>,
    ) -> Result<()> {
        let _ = profiles.insert(profile_name.to_owned(), profile.to_owned());

        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path)?;
    let mut permissions = metadata.permissions();
    permissions.set_mode(0o600);
    std::fs::set_permissions(path, permissions)?;

    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
