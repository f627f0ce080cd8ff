// Application configuration loaded from the environment

use rust_decimal::Decimal;

/// Runtime configuration. All values come from environment variables,
/// with a .env file loaded beforehand for local development.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Sales tax rate applied to every order, e.g. 0.10 for 10%
    pub tax_rate: Decimal,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// DATABASE_URL and JWT_SECRET are required; the rest have defaults.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set in environment".to_string())?;

        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET must be set in environment".to_string())?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| "PORT must be a valid port number".to_string())?;

        let tax_rate = std::env::var("TAX_RATE")
            .unwrap_or_else(|_| "0.10".to_string())
            .parse::<Decimal>()
            .map_err(|_| "TAX_RATE must be a decimal fraction, e.g. 0.10".to_string())?;

        if tax_rate < Decimal::ZERO || tax_rate >= Decimal::ONE {
            return Err("TAX_RATE must be in [0, 1)".to_string());
        }

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            tax_rate,
        })
    }
}
