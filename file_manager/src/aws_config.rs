use crate::serde_support::{serialize_ordered, FileName};
use anyhow::{anyhow, bail, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub const DEFAULT_DURATION_SECONDS: i32 = 3600;

/// One `[profile X]` section of the AWS config file. Only the keys this tool
/// acts on are modelled; unknown keys are ignored on read and left out on
/// write.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AwsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mfa_serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i32>,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            role_arn: None,
            source_profile: None,
            mfa_serial: None,
            region: None,
            duration_seconds: Some(DEFAULT_DURATION_SECONDS),
        }
    }
}

impl AwsConfig {
    /// Explicit override wins, then AWS_CONFIG_FILE, then ~/.aws/config.
    fn file_path(path: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = path {
            return Ok(path.to_path_buf());
        }

        if let Ok(path) = env::var("AWS_CONFIG_FILE") {
            return Ok(PathBuf::from(path));
        }

        match UserDirs::new() {
            Some(user_dirs) => Ok(user_dirs.home_dir().join(".aws/config")),
            None => Err(anyhow!("Unable to get user directories")),
        }
    }

    pub fn read_file(path: Option<&Path>) -> Result<HashMap<String, AwsConfig>> {
        let config_path = Self::file_path(path)?;
        if !config_path.exists() {
            bail!(
                "AWS config file {} not found, please run with -c or --configure",
                config_path.display()
            );
        }

        let file = File::open(&config_path)?;
        let reader = BufReader::new(file);
        let profiles: HashMap<String, AwsConfig> = serde_ini::from_bufread(reader)?;

        if profiles.is_empty() {
            bail!("AWS config file {} is empty", config_path.display());
        }

        Ok(profiles)
    }

    pub fn write(profiles: &HashMap<String, AwsConfig>, path: Option<&Path>) -> Result<()> {
        let config_path = Self::file_path(path)?;
        serialize_ordered(profiles, config_path, FileName::Config)
    }

    pub fn get(profile_name: &str, profiles: &HashMap<String, AwsConfig>) -> Result<AwsConfig> {
        let profile_name_sanitized = Self::sanitize_profile_name(profile_name);
        let profile = profiles.get(&profile_name_sanitized).ok_or_else(|| {
            anyhow!(
                "Profile '{}' not found in the AWS config file, please run with -c or --configure",
                profile_name
            )
        })?;

        Ok(profile.clone())
    }

    pub fn upsert(
        profile_name: &str,
        profile: &AwsConfig,
        profiles: &mut HashMap<String, AwsConfig>,
    ) -> Result<()> {
        let profile_name_sanitized = Self::sanitize_profile_name(profile_name);

        let _ = profiles.insert(profile_name_sanitized, profile.to_owned());

        Ok(())
    }

    /// Names of the profiles that map to a role, sorted, with the
    /// `profile ` section prefix stripped.
    pub fn profile_names(profiles: &HashMap<String, AwsConfig>) -> Vec<String> {
        let mut names: Vec<String> = profiles
            .iter()
            .filter(|(_, profile)| profile.role_arn.is_some())
            .map(|(name, _)| name.strip_prefix("profile ").unwrap_or(name).to_string())
            .collect();

        names.sort();

        names
    }

    pub fn sanitize_profile_name(profile_name: &str) -> String {
        if profile_name != "default" && !profile_name.starts_with("profile ") {
            format!("profile {}", profile_name)
        } else {
            profile_name.to_string()
        }
    }
}
