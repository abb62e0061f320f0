use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_port: u16,
    pub frontend_url: Option<String>,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expires_secs: i64,
    pub backup_dir: String,
    pub seed_csv: Option<String>,
    pub cache_capacity: u64,
    pub cache_ttl_secs: u64,
    pub cache_sweep_secs: u64,
    pub admin_username: String,
    pub admin_password: String,
    pub is_production: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8888);
        let frontend_url = env::var("FRONTEND_URL").ok();
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://popshelf.db".into());
        let jwt_secret =
            env::var("JWT_SECRET").unwrap_or_else(|_| "development-secret-change-me".into());
        let jwt_expires_secs = env::var("JWT_EXPIRES_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60 * 60);
        let backup_dir = env::var("BACKUP_DIR").unwrap_or_else(|_| "./data".into());
        let seed_csv = env::var("SEED_CSV").ok().and_then(|v| {
            let trimmed = v.trim().to_string();
            if trimmed.is_empty() { None } else { Some(trimmed) }
        });
        let cache_capacity = env::var("CACHE_CAPACITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(15);
        let cache_ttl_secs = env::var("CACHE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(90);
        let cache_sweep_secs = env::var("CACHE_SWEEP_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        let admin_username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into());
        let admin_password =
            env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "development-admin-change-me".into());
        let is_production = matches!(
            env::var("RUST_ENV").ok().as_deref(),
            Some("production") | Some("prod")
        );

        // Production hardening: refuse to boot on default or weak secrets
        if is_production {
            if jwt_secret == "development-secret-change-me" || jwt_secret.len() < 16 {
                anyhow::bail!("JWT_SECRET must be set to a strong secret in production");
            }
            if admin_password == "development-admin-change-me" || admin_password.len() < 12 {
                anyhow::bail!("ADMIN_PASSWORD must be set to a strong password in production");
            }
        }

        Ok(Self {
            api_port,
            frontend_url,
            database_url,
            jwt_secret,
            jwt_expires_secs,
            backup_dir,
            seed_csv,
            cache_capacity,
            cache_ttl_secs,
            cache_sweep_secs,
            admin_username,
            admin_password,
            is_production,
        })
    }
}
