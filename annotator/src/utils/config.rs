use crate::utils::logging::*;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fs;
use tokio::sync::RwLock;

lazy_static! {
    static ref CONFIG: RwLock<Config> = RwLock::new(Config::new());
}

#[derive(Debug, Deserialize)]
struct ConfigTable {
    #[serde(rename = "Config")]
    config: Config,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub http_server_bind_port: u16, //port
    pub bind_retry_duration: u64, //seconds
    pub working_folder: String, //path
    pub python_script_path: String, //path
    pub model_file_path: String, //path
    pub image_size: usize, //pixels
    pub confidence_threshold: f32, //0.0 - 1.0
}

impl Config {
    pub fn new() -> Self {
        //Seriously, the program must be terminated.
        match fs::read_to_string("./annotator.toml") {
            Ok(toml_string) => {
                match toml::from_str::<ConfigTable>(&toml_string) {
                    Ok(config_table) => {
                        let config = config_table.config;
                        if !Self::validate(&config) {
                            logging_console!(emergency_entry!(SystemEntry::InvalidConfig));
                            panic!("Invalid configuration file");
                        }
                        config
                    },
                    Err(err) => {
                        logging_console!(emergency_entry!(SystemEntry::InvalidConfig, format!("Err: {err}")));
                        panic!("Unable to parse configuration file");
                    },
                }
            },
            Err(err) => {
                logging_console!(emergency_entry!(SystemEntry::ConfigNotFound, format!("Err: {err}")));
                panic!("Configuration file not found");
            },
        }
    }

    pub async fn now() -> Config {
        CONFIG.read().await.clone()
    }

    pub async fn update(config: Config) {
        *CONFIG.write().await = config
    }

    pub fn validate(config: &Config) -> bool {
        Self::validate_second(config.bind_retry_duration)
            && Self::validate_folder(&config.working_folder)
            && Self::validate_image_size(config.image_size)
            && Self::validate_confidence(config.confidence_threshold)
    }

    fn validate_second(second: u64) -> bool {
        second <= 3600
    }

    fn validate_folder(folder: &str) -> bool {
        !folder.trim().is_empty()
    }

    fn validate_image_size(size: usize) -> bool {
        (32..=4096).contains(&size)
    }

    fn validate_confidence(confidence: f32) -> bool {
        confidence > 0.0_f32 && confidence <= 1.0_f32
    }
}
