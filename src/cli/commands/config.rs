use log::error;
use serde_yaml::Value;

use crate::cli::commands::load_effective_config;
use crate::cli::types::Cli;

/// Handle the config command: print the whole effective configuration, or one key
pub fn handle_config_command(key: Option<&str>, cli: &Cli) {
    let cfg = match load_effective_config(cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return;
        }
    };

    let yaml = match serde_yaml::to_value(&cfg) {
        Ok(yaml) => yaml,
        Err(e) => {
            error!("Failed to serialize configuration: {}", e);
            return;
        }
    };

    let shown = match key {
        Some(key) => match get_nested_value(&yaml, key) {
            Some(v) => v,
            None => {
                println!("Key not found: {}", key);
                return;
            }
        },
        None => &yaml,
    };
    print!("{}", serde_yaml::to_string(shown).unwrap_or_default());
}

fn get_nested_value<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let mut current = value;
    for part in key.split('.') {
        match current {
            Value::Mapping(map) => {
                let part_key = Value::String(part.to_string());
                current = map.get(&part_key)?;
            }
            _ => return None,
        }
    }
    Some(current)
}
