use anyhow::{anyhow, Context, Result};
use aws_sdk_sts::config::Region;
use aws_smithy_types::date_time::Format;
use chrono::Utc;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use file_manager::aws_config::{AwsConfig, DEFAULT_DURATION_SECONDS};
use file_manager::aws_credentials::AwsCredentials;
use shared::args::Args;
use std::collections::HashMap;
use tracing::info;

/// Obtain session credentials for a single profile. Cached credentials are
/// reused as long as they are not about to expire; otherwise the profile's
/// role is assumed and the credentials file rewritten.
pub async fn acquire(
    configs: &HashMap<String, AwsConfig>,
    credentials: &mut HashMap<String, AwsCredentials>,
    profile_name: &str,
    args: &Args,
) -> Result<AwsCredentials> {
    let session_name = session_name(profile_name);

    if !args.force {
        if let Ok(credential) = AwsCredentials::get(&session_name, credentials) {
            if !credential.is_profile_about_to_expire() {
                info!("Reusing cached credentials for profile: {}", profile_name);
                return Ok(credential);
            }
        }
    }

    let config = AwsConfig::get(profile_name, configs)?;
    let role_arn = config.role_arn.clone().ok_or_else(|| {
        anyhow!(
            "Profile '{}' has no role_arn in the AWS config file",
            profile_name
        )
    })?;

    info!("Assuming role for profile: {}", profile_name);

    let credential = assume_role(profile_name, &session_name, &config, &role_arn).await?;

    AwsCredentials::upsert(&session_name, &credential, credentials)?;
    AwsCredentials::write(credentials)?;

    info!("Set your profile with: export AWS_PROFILE={}", session_name);

    Ok(credential)
}

/// Run every role-bearing profile through `acquire`, so still-valid sessions
/// are kept and the rest are renewed.
pub async fn refresh_all(
    configs: &HashMap<String, AwsConfig>,
    credentials: &mut HashMap<String, AwsCredentials>,
    args: &Args,
) -> Result<()> {
    for profile_name in AwsConfig::profile_names(configs) {
        acquire(configs, credentials, &profile_name, args).await?;
    }

    Ok(())
}

/// Session name sent to STS, doubling as the credentials file section name.
pub fn session_name(profile_name: &str) -> String {
    format!("temp_{}", profile_name)
}

async fn assume_role(
    profile_name: &str,
    session_name: &str,
    config: &AwsConfig,
    role_arn: &str,
) -> Result<AwsCredentials> {
    let source_profile = config.source_profile.as_deref().unwrap_or(profile_name);

    let loader = aws_config::from_env().profile_name(source_profile);
    let sdk_config = if let Some(region) = config.region.clone() {
        loader.region(Region::new(region)).load().await
    } else {
        loader.load().await
    };

    let sts_client = aws_sdk_sts::Client::new(&sdk_config);

    let duration_seconds = config.duration_seconds.unwrap_or(DEFAULT_DURATION_SECONDS);

    let mut assume_role_request = sts_client
        .assume_role()
        .role_arn(role_arn)
        .role_session_name(session_name)
        .duration_seconds(duration_seconds);

    if let Some(mfa_serial) = &config.mfa_serial {
        assume_role_request = assume_role_request
            .serial_number(mfa_serial)
            .token_code(prompt_token_code(mfa_serial)?);
    }

    let assume_role_response = assume_role_request
        .send()
        .await
        .with_context(|| format!("Failed to assume role {}", role_arn))?;

    let credentials = assume_role_response
        .credentials
        .ok_or(anyhow!("No credentials found in assume role response"))?;

    let access_key_id = credentials
        .access_key_id
        .ok_or(anyhow!("No access key ID found in assume role response"))?;

    let secret_access_key = credentials.secret_access_key.ok_or(anyhow!(
        "No secret access key found in assume role response"
    ))?;

    let session_token = credentials
        .session_token
        .ok_or(anyhow!("No session token found in assume role response"))?;

    let expiration = credentials
        .expiration
        .ok_or(anyhow!("No expiration found in assume role response"))?
        .fmt(Format::DateTime)?;

    let expiration = chrono::DateTime::parse_from_rfc3339(&expiration)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| anyhow!("Failed to parse datetime: {:?}", e))?;

    Ok(AwsCredentials {
        profile_name: Some(session_name.to_owned()),
        aws_access_key_id: Some(access_key_id),
        aws_secret_access_key: Some(secret_access_key),
        aws_session_token: Some(session_token),
        aws_expiration: Some(expiration),
    })
}

fn prompt_token_code(mfa_serial: &str) -> Result<String> {
    let token_code: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("MFA token for {}", mfa_serial))
        .validate_with(|input: &String| {
            if input.len() == 6 && input.chars().all(|c| c.is_ascii_digit()) {
                Ok(())
            } else {
                Err("MFA token must be 6 digits")
            }
        })
        .interact_text()
        .context("Failed to read MFA token")?;

    Ok(token_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn args() -> Args {
        Args {
            profile: None,
            config_file: None,
            refresh: false,
            force: false,
            configure: false,
            json: false,
            debug: false,
        }
    }

    fn cached_credential(expires_in: Duration) -> AwsCredentials {
        AwsCredentials {
            profile_name: Some("temp_dev".to_string()),
            aws_access_key_id: Some("AKIACACHEDKEY".to_string()),
            aws_secret_access_key: Some("cachedsecret".to_string()),
            aws_session_token: Some("cachedtoken".to_string()),
            aws_expiration: Some(Utc::now() + expires_in),
        }
    }

    #[test]
    fn session_name_is_prefixed() {
        assert_eq!(session_name("dev"), "temp_dev");
    }

    #[tokio::test]
    async fn acquire_reuses_unexpired_cached_credentials() {
        // The config map is empty, so anything past the cache check errors.
        let configs = HashMap::new();
        let mut credentials = HashMap::new();
        credentials.insert("temp_dev".to_string(), cached_credential(Duration::hours(1)));

        let credential = acquire(&configs, &mut credentials, "dev", &args())
            .await
            .unwrap();

        assert_eq!(credential.aws_access_key_id.as_deref(), Some("AKIACACHEDKEY"));
    }

    #[tokio::test]
    async fn acquire_force_bypasses_cache() {
        let configs = HashMap::new();
        let mut credentials = HashMap::new();
        credentials.insert("temp_dev".to_string(), cached_credential(Duration::hours(1)));

        let mut args = args();
        args.force = true;

        assert!(acquire(&configs, &mut credentials, "dev", &args)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn acquire_ignores_expired_cache() {
        let configs = HashMap::new();
        let mut credentials = HashMap::new();
        credentials.insert(
            "temp_dev".to_string(),
            cached_credential(Duration::minutes(-30)),
        );

        assert!(acquire(&configs, &mut credentials, "dev", &args())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn acquire_requires_role_arn() {
        let mut configs = HashMap::new();
        configs.insert(
            "profile dev".to_string(),
            AwsConfig {
                role_arn: None,
                ..Default::default()
            },
        );
        let mut credentials = HashMap::new();

        let error = acquire(&configs, &mut credentials, "dev", &args())
            .await
            .unwrap_err();

        assert!(error.to_string().contains("role_arn"));
    }
}
