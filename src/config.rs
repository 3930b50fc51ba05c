use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "socialgraph".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "socialgraph-users".into()),
            // Tokens stay valid for one day unless overridden. Unsigned
            // parse, so a negative value cannot wrap into a huge TTL.
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60 * 24),
        };
        Ok(Self { jwt })
    }
}
