use std::time::Duration;

use anyhow::Context;
use time::UtcOffset;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub issuer: Option<String>,
    pub audience: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub auth: AuthConfig,
    /// Calendar used to split timestamps into days.
    pub calendar_offset: UtcOffset,
    pub streak_lookback_days: u32,
    pub achievement_eval_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL")?;
        let auth = AuthConfig {
            secret: std::env::var("AUTH_JWT_SECRET").context("AUTH_JWT_SECRET")?,
            issuer: std::env::var("AUTH_JWT_ISSUER").ok(),
            audience: std::env::var("AUTH_JWT_AUDIENCE").unwrap_or_else(|_| "authenticated".into()),
        };
        let calendar_offset = match std::env::var("CALENDAR_UTC_OFFSET_MINUTES") {
            Ok(v) => parse_offset_minutes(&v)?,
            Err(_) => UtcOffset::UTC,
        };
        let streak_lookback_days = std::env::var("STREAK_LOOKBACK_DAYS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|d| *d > 0)
            .unwrap_or(90);
        let timeout_ms = std::env::var("ACHIEVEMENT_EVAL_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(3000);

        Ok(Self {
            database_url,
            auth,
            calendar_offset,
            streak_lookback_days,
            achievement_eval_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

/// Whole minutes east of UTC, e.g. `-300` for UTC-05:00.
fn parse_offset_minutes(raw: &str) -> anyhow::Result<UtcOffset> {
    let minutes = raw
        .trim()
        .parse::<i32>()
        .with_context(|| format!("CALENDAR_UTC_OFFSET_MINUTES is not a whole number: {raw:?}"))?;
    minutes
        .checked_mul(60)
        .and_then(|secs| UtcOffset::from_whole_seconds(secs).ok())
        .with_context(|| format!("CALENDAR_UTC_OFFSET_MINUTES out of range: {minutes}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::offset;

    #[test]
    fn offset_minutes_parse() {
        assert_eq!(parse_offset_minutes("-300").unwrap(), offset!(-5));
        assert_eq!(parse_offset_minutes(" 330 ").unwrap(), offset!(+5:30));
        assert_eq!(parse_offset_minutes("0").unwrap(), UtcOffset::UTC);
    }

    #[test]
    fn offset_minutes_reject_garbage_and_overflow() {
        let err = parse_offset_minutes("abc").unwrap_err();
        assert!(err.to_string().contains("not a whole number"));
        assert!(parse_offset_minutes("1600").is_err());
        assert!(parse_offset_minutes(&i32::MAX.to_string()).is_err());
    }
}
