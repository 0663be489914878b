use std::{net::SocketAddr, time::Duration};

use crate::auth::decode_secret_key;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub jwt_secret: Vec<u8>,
    pub token_ttl: Duration,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub logo_lookup_enabled: bool,
    pub renewal_rollover_enabled: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("KLYPP_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .expect("Invalid KLYPP_LISTEN_ADDR");
        let db_path = std::env::var("KLYPP_DB_PATH").unwrap_or_else(|_| "./db".into());
        let jwt_secret = std::env::var("KLYPP_JWT_SECRET")
            .ok()
            .map(|raw| decode_secret_key(&raw).expect("Invalid KLYPP_JWT_SECRET"))
            .expect("KLYPP_JWT_SECRET must be set");
        let token_ttl_secs: u64 = std::env::var("KLYPP_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| "604800".into())
            .parse()
            .unwrap_or(604_800);
        let cors_allow = std::env::var("KLYPP_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("KLYPP_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30_000);
        let logo_lookup_enabled = std::env::var("KLYPP_LOGO_LOOKUP")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);
        let renewal_rollover_enabled = std::env::var("KLYPP_RENEWAL_ROLLOVER")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        Self {
            listen_addr,
            db_path,
            jwt_secret,
            token_ttl: Duration::from_secs(token_ttl_secs),
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            logo_lookup_enabled,
            renewal_rollover_enabled,
        }
    }
}
