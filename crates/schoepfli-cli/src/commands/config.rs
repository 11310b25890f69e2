use clap::Subcommand;
use schoepfli_core::AlarmConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Write the default configuration to the config file
    Init,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = AlarmConfig::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", AlarmConfig::config_path()?.display());
        }
        ConfigAction::Init => {
            let path = AlarmConfig::config_path()?;
            if path.exists() {
                eprintln!("config already exists at {}", path.display());
                std::process::exit(1);
            }
            AlarmConfig::default().save_to(&path)?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}
