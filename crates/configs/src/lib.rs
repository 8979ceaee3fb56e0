use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 3000, worker_threads: Some(4) }
    }
}

/// Where the JSON documents and public assets live.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_contacts_path")]
    pub contacts_path: String,
    #[serde(default = "default_users_path")]
    pub users_path: String,
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
    #[serde(default = "default_temp_dir")]
    pub temp_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            contacts_path: default_contacts_path(),
            users_path: default_users_path(),
            public_dir: default_public_dir(),
            temp_dir: default_temp_dir(),
        }
    }
}

impl StorageConfig {
    /// Avatars are served from `<public_dir>/avatars`.
    pub fn avatars_dir(&self) -> String {
        format!("{}/avatars", self.public_dir.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: String::new(), token_ttl_hours: default_token_ttl_hours() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_avatar_bytes")]
    pub max_avatar_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self { max_avatar_bytes: default_max_avatar_bytes() }
    }
}

fn default_contacts_path() -> String { "data/contacts.json".into() }
fn default_users_path() -> String { "data/users.json".into() }
fn default_public_dir() -> String { "public".into() }
fn default_temp_dir() -> String { "tmp".into() }
fn default_token_ttl_hours() -> i64 { 12 }
fn default_max_avatar_bytes() -> usize { 5 * 1024 * 1024 }

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

/// `CONFIG_PATH`, or `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content).map_err(|e| anyhow!("invalid config {path}: {e}"))?;
    Ok(cfg)
}

impl AppConfig {
    /// `CONFIG_PATH` (or `config.toml`) when present, otherwise defaults;
    /// env overrides apply either way.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_from(&config_path())
    }

    /// Like [`AppConfig::load_or_env`] for an explicit path. Only a missing
    /// file falls back to defaults; unreadable or malformed files are errors.
    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = match load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env();
        self.server.normalize()?;
        self.storage.normalize_from_env();
        self.storage.validate()?;
        self.auth.normalize_from_env();
        self.auth.validate()?;
        self.upload.validate()?;
        Ok(())
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

impl ServerConfig {
    fn normalize_from_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            self.worker_threads = Some(w);
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    fn normalize_from_env(&mut self) {
        if let Ok(p) = std::env::var("CONTACTS_PATH") {
            self.contacts_path = p;
        }
        if let Ok(p) = std::env::var("USERS_PATH") {
            self.users_path = p;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.contacts_path.trim().is_empty() || self.users_path.trim().is_empty() {
            return Err(anyhow!("storage.contacts_path and storage.users_path must be set"));
        }
        if self.contacts_path == self.users_path {
            return Err(anyhow!("storage.contacts_path and storage.users_path must differ"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn normalize_from_env(&mut self) {
        if self.jwt_secret.trim().is_empty() {
            self.jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret is empty; set it in config.toml or JWT_SECRET"));
        }
        if self.token_ttl_hours <= 0 {
            return Err(anyhow!("auth.token_ttl_hours must be a positive number of hours"));
        }
        Ok(())
    }

    pub fn is_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

impl UploadConfig {
    fn validate(&self) -> Result<()> {
        if self.max_avatar_bytes == 0 {
            return Err(anyhow!("upload.max_avatar_bytes must be >= 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_toml_with_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [storage]
            contacts_path = "db/contacts.json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.storage.contacts_path, "db/contacts.json");
        assert_eq!(cfg.storage.users_path, "data/users.json");
        assert_eq!(cfg.storage.avatars_dir(), "public/avatars");
        assert_eq!(cfg.auth.token_ttl_hours, 12);
        assert_eq!(cfg.upload.max_avatar_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn rejects_shared_storage_file() {
        let storage = StorageConfig {
            contacts_path: "data/x.json".into(),
            users_path: "data/x.json".into(),
            ..StorageConfig::default()
        };
        assert!(storage.validate().is_err());
    }

    #[test]
    fn zero_worker_threads_falls_back() {
        let mut server = ServerConfig { host: " ".into(), port: 1, worker_threads: Some(0) };
        server.normalize().unwrap();
        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.worker_threads, Some(4));
    }

    fn config_file(tag: &str, body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("configs_{}_{}.toml", tag, std::process::id()));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let path = config_file(
            "malformed",
            "[storage]\ncontacts_path = \"/srv/real/contacts.json\"\nthis is not toml\n",
        );
        let res = AppConfig::load_or_env_from(&path.display().to_string());
        let _ = std::fs::remove_file(&path);
        let err = res.expect_err("malformed file must not fall back to defaults");
        assert!(err.to_string().contains("invalid config"), "{err}");
    }

    #[test]
    fn missing_config_file_uses_defaults() {
        let path = std::env::temp_dir().join(format!("configs_absent_{}.toml", std::process::id()));
        let cfg = AppConfig::load_or_env_from(&path.display().to_string()).unwrap();
        assert!(cfg.server.port > 0);
        assert!(!cfg.storage.contacts_path.is_empty());
    }

    #[test]
    fn valid_config_file_is_honoured() {
        let path = config_file("valid", "[upload]\nmax_avatar_bytes = 2048\n");
        let cfg = AppConfig::load_or_env_from(&path.display().to_string());
        let _ = std::fs::remove_file(&path);
        assert_eq!(cfg.unwrap().upload.max_avatar_bytes, 2048);
    }

    #[test]
    fn non_positive_ttl_is_rejected() {
        let auth = AuthConfig { jwt_secret: "s".into(), token_ttl_hours: 0 };
        assert!(auth.validate().is_err());
    }
}
