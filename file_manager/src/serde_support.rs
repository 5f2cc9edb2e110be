use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

pub enum FileName {
    Config,
    Credentials,
}

impl Display for FileName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FileName::Config => write!(f, "Config"),
            FileName::Credentials => write!(f, "Credentials"),
        }
    }
}

pub fn serialize_ordered<T>(
    profiles: &HashMap<String, T>,
    path: PathBuf,
    file_name: FileName,
) -> Result<()>
where
    T: Serialize,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let mut sorted_profiles: Vec<_> = profiles.iter().collect();
    sorted_profiles.sort_by_key(|x| x.0);

    for (key, profile) in sorted_profiles {
        writeln!(writer, "[{}]", key)?;
        serde_ini::to_writer(&mut writer, profile)?;
        writeln!(writer)?;
    }

    writer.flush()?;

    info!("AWS {} file modified", file_name);

    Ok(())
}
