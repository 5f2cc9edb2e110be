use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The name of the profile to assume a role for (or configure); prompts for a selection when omitted
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Path to the AWS config file holding the profile to role mappings [default: ~/.aws/config]
    #[arg(short = 't', long)]
    pub config_file: Option<PathBuf>,

    /// Refresh credentials for all configured profiles
    #[arg(short, long, default_value_t = false)]
    pub refresh: bool,

    /// Force a credential refresh, even if they are still valid
    #[arg(short, long, default_value_t = false)]
    pub force: bool,

    /// Configure the profile
    #[arg(short, long, default_value_t = false)]
    pub configure: bool,

    /// Additionally returns the JSON credentials to stdout, for consumption by AWS Config [credential_process]
    #[arg(short, long, default_value_t = false)]
    pub json: bool,

    /// Enables verbose logging to the console
    #[arg(short, long, default_value_t = false)]
    pub debug: bool,
}
