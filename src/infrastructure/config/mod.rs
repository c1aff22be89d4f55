use anyhow::Context;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    // Fitbit OAuth
    pub fitbit_client_id: String,
    pub fitbit_client_secret: String,
    pub fitbit_redirect_uri: String,
    // InfluxDB sink
    pub influx_url: String,
    pub influx_database: String,
    pub influx_username: String,
    pub influx_password: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .context("PORT must be a valid port number")?,
            fitbit_client_id: env::var("FITBIT_CLIENT_ID")
                .context("FITBIT_CLIENT_ID is required")?,
            fitbit_client_secret: env::var("FITBIT_CLIENT_SECRET")
                .context("FITBIT_CLIENT_SECRET is required")?,
            fitbit_redirect_uri: env::var("FITBIT_REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:4000/auth".to_string()),
            influx_url: env::var("INFLUX_URL")
                .unwrap_or_else(|_| "http://localhost:8086".to_string()),
            influx_database: env::var("INFLUX_DATABASE").unwrap_or_else(|_| "mydb".to_string()),
            influx_username: env::var("INFLUX_USERNAME").unwrap_or_default(),
            influx_password: env::var("INFLUX_PASSWORD").unwrap_or_default(),
            log_format: env::var("LOG_FORMAT")
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })
                .unwrap_or(LogFormat::Pretty),
        };

        Ok(config)
    }
}
