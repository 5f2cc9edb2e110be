use anyhow::{bail, Context, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use file_manager::aws_config::AwsConfig;
use std::collections::HashMap;

/// Prompt the operator to pick one of the role-bearing profiles by number.
/// A selection outside the printed range is an error, not a re-prompt.
pub fn select_profile(configs: &HashMap<String, AwsConfig>) -> Result<String> {
    let names = AwsConfig::profile_names(configs);
    if names.is_empty() {
        bail!("No profile with a role_arn found in the AWS config file");
    }

    println!("Please choose from the following profile(s):");
    for (position, name) in names.iter().enumerate() {
        println!("{}) {}", position + 1, name);
    }

    let input: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Profile number")
        .interact_text()
        .context("Failed to read profile selection")?;

    let index: usize = input
        .trim()
        .parse()
        .context("Profile selection must be a number")?;

    profile_at(&names, index).map(|name| name.clone())
}

fn profile_at(names: &[String], index: usize) -> Result<&String> {
    if index == 0 || index > names.len() {
        bail!(
            "Profile number {} is out of range (1-{})",
            index,
            names.len()
        );
    }

    Ok(&names[index - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["dev".to_string(), "ops".to_string(), "prod".to_string()]
    }

    #[test]
    fn profile_at_is_one_based() {
        let names = names();
        assert_eq!(profile_at(&names, 1).unwrap(), "dev");
        assert_eq!(profile_at(&names, 3).unwrap(), "prod");
    }

    #[test]
    fn profile_at_rejects_out_of_range() {
        let names = names();
        assert!(profile_at(&names, 0).is_err());
        assert!(profile_at(&names, 4).is_err());
    }
}
