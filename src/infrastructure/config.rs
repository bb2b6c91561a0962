use anyhow::{Context, Result, anyhow};
use chrono::FixedOffset;
use std::env;
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_JWT_SECRET: &str = "dev-secret-change-me";
// 01:10 every day, seconds field first.
const DEFAULT_NOTIFY_SCHEDULE: &str = "0 10 1 * * *";
const DEFAULT_NOTIFY_UTC_OFFSET: &str = "+05:30";
const DEFAULT_MAIL_FROM: &str = "noreply@recipes.local";
const DEFAULT_MAIL_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SMTP_PORT: u16 = 587;

/// Outbound relay settings. Present only when `SMTP_HOST` is set.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Upgrade the connection with STARTTLS; plain only for local relays.
    pub starttls: bool,
}

impl SmtpConfig {
    fn from_env() -> Result<Option<Self>> {
        let host = match env::var("SMTP_HOST") {
            Ok(host) if !host.trim().is_empty() => host.trim().to_string(),
            _ => {
                warn!("SMTP_HOST not set, notification mail will only be logged");
                return Ok(None);
            }
        };

        let port = match env::var("SMTP_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("Invalid SMTP_PORT: {}", raw))?,
            Err(_) => DEFAULT_SMTP_PORT,
        };
        let starttls = match env::var("SMTP_STARTTLS") {
            Ok(raw) => {
                parse_flag(&raw).with_context(|| format!("Invalid SMTP_STARTTLS: {}", raw))?
            }
            Err(_) => true,
        };

        info!(host = %host, port = port, starttls = starttls, "SMTP relay configured");
        Ok(Some(Self {
            host,
            port,
            username: env::var("SMTP_USERNAME").ok(),
            password: env::var("SMTP_PASSWORD").ok(),
            starttls,
        }))
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub notify_schedule: String,
    pub notify_offset: FixedOffset,
    pub mail_from: String,
    pub mail_timeout: Duration,
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self> {
        if dotenv::dotenv().is_ok() {
            info!("Loaded environment from .env");
        }

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        let offset_raw =
            env::var("NOTIFY_UTC_OFFSET").unwrap_or_else(|_| DEFAULT_NOTIFY_UTC_OFFSET.to_string());
        let notify_offset = parse_utc_offset(&offset_raw)
            .with_context(|| format!("Invalid NOTIFY_UTC_OFFSET: {}", offset_raw))?;

        let mail_timeout = match env::var("MAIL_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("Invalid MAIL_TIMEOUT_SECS: {}", raw))?,
            Err(_) => DEFAULT_MAIL_TIMEOUT_SECS,
        };

        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            jwt_secret,
            notify_schedule: env::var("NOTIFY_SCHEDULE")
                .unwrap_or_else(|_| DEFAULT_NOTIFY_SCHEDULE.to_string()),
            notify_offset,
            mail_from: env::var("MAIL_FROM").unwrap_or_else(|_| DEFAULT_MAIL_FROM.to_string()),
            mail_timeout: Duration::from_secs(mail_timeout),
            smtp: SmtpConfig::from_env()?,
        })
    }
}

/// Parses `+HH:MM` / `-HH:MM` (or `Z` / `UTC`) into a fixed offset.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| anyhow!("offset out of range"));
    }
    raw.parse::<FixedOffset>().map_err(|e| anyhow!("offset must look like +HH:MM: {}", e))
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("expected true or false, got {:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_utc_offset_accepts_signed_offsets() {
        assert_eq!(
            parse_utc_offset("+05:30").unwrap().local_minus_utc(),
            5 * 3600 + 30 * 60
        );
        assert_eq!(
            parse_utc_offset("-08:00").unwrap().local_minus_utc(),
            -8 * 3600
        );
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset(" utc ").unwrap().local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_utc_offset_rejects_garbage() {
        assert!(parse_utc_offset("05:30").is_err());
        assert!(parse_utc_offset("+5").is_err());
        assert!(parse_utc_offset("+25:00").is_err());
        assert!(parse_utc_offset("+aa:bb").is_err());
        assert!(parse_utc_offset("").is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true").unwrap());
        assert!(parse_flag(" YES ").unwrap());
        assert!(!parse_flag("0").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}
