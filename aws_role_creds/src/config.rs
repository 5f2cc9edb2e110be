use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use file_manager::aws_config::{AwsConfig, DEFAULT_DURATION_SECONDS};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

pub fn configure_profile(
    profiles: &mut HashMap<String, AwsConfig>,
    profile_name: &str,
    config_path: Option<&Path>,
) -> Result<()> {
    let profile = AwsConfig::get(profile_name, profiles).unwrap_or_default();

    info!("Configuring profile: {}", profile_name);

    let role_arn: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Role ARN")
        .with_initial_text(profile.role_arn.unwrap_or_default())
        .allow_empty(false)
        .interact_text()
        .unwrap();

    let source_profile: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Source Profile (blank to sign with the profile itself)")
        .default(profile.source_profile.unwrap_or_default())
        .allow_empty(true)
        .interact_text()
        .unwrap();

    let mfa_serial: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("MFA Device ARN")
        .default(profile.mfa_serial.unwrap_or_default())
        .allow_empty(true)
        .interact_text()
        .unwrap();

    let region: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Region")
        .default(profile.region.unwrap_or_default())
        .allow_empty(true)
        .interact_text()
        .unwrap();

    let duration_seconds: i32 = loop {
        let input: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Session Duration Seconds (900 to 43200)")
            .default(
                profile
                    .duration_seconds
                    .unwrap_or(DEFAULT_DURATION_SECONDS)
                    .to_string(),
            )
            .allow_empty(false)
            .interact_text()
            .unwrap();

        if let Ok(value) = input.parse::<i32>() {
            if (900..=43200).contains(&value) {
                break value;
            }
        }
    };

    let new_profile = AwsConfig {
        role_arn: Some(role_arn),
        source_profile: if source_profile.trim().is_empty() {
            None
        } else {
            Some(source_profile)
        },
        mfa_serial: if mfa_serial.trim().is_empty() {
            None
        } else {
            Some(mfa_serial)
        },
        region: if region.trim().is_empty() {
            None
        } else {
            Some(region)
        },
        duration_seconds: Some(duration_seconds),
    };

    AwsConfig::upsert(profile_name, &new_profile, profiles)?;
    AwsConfig::write(profiles, config_path)?;

    Ok(())
}
