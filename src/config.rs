use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub integration_rps: u32,
    pub public_rps: u32,
    pub google_sheets_id: Option<String>,
    pub google_service_account_email: Option<String>,
    pub google_private_key: Option<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            jwt_secret: get_env("JWT_SECRET")?,
            integration_rps: get_env_parse("INTEGRATION_RPS")?,
            public_rps: get_env_parse("PUBLIC_RPS")?,
            google_sheets_id: env::var("GOOGLE_SHEETS_ID").ok(),
            google_service_account_email: env::var("GOOGLE_SERVICE_ACCOUNT_EMAIL").ok(),
            // .env files carry the key with literal "\n" escapes
            google_private_key: env::var("GOOGLE_PRIVATE_KEY")
                .ok()
                .map(|k| k.replace("\\n", "\n")),
        })
    }

    pub fn sheets_credentials(&self) -> Option<(String, String, String)> {
        match (
            &self.google_sheets_id,
            &self.google_service_account_email,
            &self.google_private_key,
        ) {
            (Some(id), Some(email), Some(key)) => {
                Some((id.clone(), email.clone(), key.clone()))
            }
            _ => None,
        }
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
