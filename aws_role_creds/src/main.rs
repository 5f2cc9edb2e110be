use clap::Parser;
use file_manager::aws_config::AwsConfig;
use file_manager::aws_credentials::AwsCredentials;
use tracing_subscriber::EnvFilter;

mod config;
mod json;

/// Required due to using the stderr writer vs no writer specified
/// SubscriberBuilder<fn() -> Stderr> vs SubscriberBuilder
#[macro_export]
macro_rules! init_tracing {
    ($builder:expr, $debug:expr) => {
        let logging = $builder;

        logging
            .with_target($debug)
            .with_line_number($debug)
            .with_env_filter(EnvFilter::from(if $debug { "debug" } else { "info" }))
            .init();
    };
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = shared::args::Args::parse();

    if args.json {
        // Keep stdout clean for the credential_process consumer
        let logging = tracing_subscriber::fmt().with_writer(std::io::stderr);
        init_tracing!(logging, args.debug);
    } else {
        let logging = tracing_subscriber::fmt();
        init_tracing!(logging, args.debug);
    }

    if args.configure {
        let profile_name = args.profile.clone().unwrap_or_else(|| "default".to_string());
        let mut configs = AwsConfig::read_file(args.config_file.as_deref()).unwrap_or_default();
        config::configure_profile(&mut configs, &profile_name, args.config_file.as_deref())?;
        return Ok(());
    }

    let configs = AwsConfig::read_file(args.config_file.as_deref())?;
    let mut credentials = AwsCredentials::read_file().unwrap_or_default();

    if args.refresh {
        sts::sts::refresh_all(&configs, &mut credentials, &args).await?;
    } else {
        let profile_name = match args.profile.clone() {
            Some(profile_name) => profile_name,
            None => sts::select::select_profile(&configs)?,
        };

        let credential = sts::sts::acquire(&configs, &mut credentials, &profile_name, &args).await?;

        if args.json {
            let json_credentials = json::JsonCredential::convert(credential)?;
            let json = serde_json::to_string_pretty(&json_credentials)?;
            println!("{}", json);
        }
    }

    Ok(())
}
