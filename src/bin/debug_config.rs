// Check a probe configuration file and print the values it resolves to
use anyhow::Result;
use shine_probe::config::Config;
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "debug"),
    );

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("shine_probe.yaml"));

    println!("Testing file: {:?}", path);
    println!("File exists: {}", path.exists());

    match Config::from_file(&path) {
        Ok(config) => {
            println!("Validation succeeded");
            print!("{}", serde_yml::to_string(&config)?);
        }
        Err(e) => println!("Validation failed: {:#}", e),
    }

    Ok(())
}
