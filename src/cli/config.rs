//! Show or initialise configuration.

use std::path::Path;

use crate::config::Config;
use crate::error::Error;

/// Print the effective config, or write a default project file with `init`.
pub fn run(project_dir: &Path, init: bool) -> Result<(), Error> {
    if init {
        let path = Config::project_path(project_dir);
        if path.exists() {
            println!("Config already exists: {}", path.display());
            return Ok(());
        }
        Config::default().save(&path)?;
        println!("Created {}", path.display());
        return Ok(());
    }

    let (config, source) = Config::load(project_dir)?;
    match source {
        Some(path) => println!("# Loaded from {}", path.display()),
        None => println!("# No config file found, using defaults"),
    }
    println!(
        "# Repository: {}",
        config.repo_root(project_dir).display()
    );
    println!();
    print!("{}", config.to_toml()?);

    Ok(())
}
