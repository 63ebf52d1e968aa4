use std::env;

use chrono::{NaiveTime, Weekday};
use chrono_tz::Tz;
use dotenvy::dotenv;

use crate::policy::{GeoPoint, LocationPolicy, TimePolicy};

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub access_token_ttl: usize,

    // Working-time policy
    pub timezone: Tz,
    pub official_start: NaiveTime,
    pub weekly_off: Vec<Weekday>,

    // Office-location gate
    pub office_latitude: f64,
    pub office_longitude: f64,
    pub office_radius_m: f64,
    pub location_required: bool,

    // Daily job fire times (local wall clock in `timezone`)
    pub forced_checkout_at: NaiveTime,
    pub daily_report_at: NaiveTime,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
}

fn parse_time(var: &str, default: &str) -> NaiveTime {
    let raw = env::var(var).unwrap_or_else(|_| default.to_string());
    NaiveTime::parse_from_str(&raw, "%H:%M")
        .unwrap_or_else(|_| panic!("{var} must be HH:MM, got {raw}"))
}

fn parse_weekdays(raw: &str) -> Vec<Weekday> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Weekday>()
                .unwrap_or_else(|_| panic!("WEEKLY_OFF_DAYS contains invalid weekday {s}"))
        })
        .collect()
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: env::var("ACCESS_TOKEN_TTL")
                .unwrap_or_else(|_| "900".to_string())
                .parse()
                .unwrap(),

            timezone: env::var("TIMEZONE")
                .unwrap_or_else(|_| "Asia/Dhaka".to_string())
                .parse()
                .expect("TIMEZONE must be a valid IANA zone"),
            official_start: parse_time("OFFICIAL_START_TIME", "10:00"),
            weekly_off: parse_weekdays(
                &env::var("WEEKLY_OFF_DAYS").unwrap_or_else(|_| "sun".to_string()),
            ),

            office_latitude: env::var("OFFICE_LATITUDE")
                .unwrap_or_else(|_| "23.8103".to_string())
                .parse()
                .unwrap(),
            office_longitude: env::var("OFFICE_LONGITUDE")
                .unwrap_or_else(|_| "90.4125".to_string())
                .parse()
                .unwrap(),
            office_radius_m: env::var("OFFICE_RADIUS_M")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),
            location_required: env::var("LOCATION_REQUIRED")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap(),

            forced_checkout_at: parse_time("FORCED_CHECKOUT_AT", "23:55"),
            daily_report_at: parse_time("DAILY_REPORT_AT", "20:00"),

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }

    /// Base working-time policy; the holiday calendar is loaded from the
    /// store and swapped in through the policy handle.
    pub fn time_policy(&self) -> TimePolicy {
        TimePolicy::new(self.timezone, self.official_start, self.weekly_off.clone())
    }

    pub fn location_policy(&self) -> LocationPolicy {
        LocationPolicy {
            office: GeoPoint {
                latitude: self.office_latitude,
                longitude: self.office_longitude,
            },
            radius_m: self.office_radius_m,
            enabled: self.location_required,
        }
    }
}
