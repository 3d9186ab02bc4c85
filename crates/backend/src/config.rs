use std::path::PathBuf;

/// Server settings, read from the environment with local-dev defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    /// Hand-maintained static files, served under `/static`.
    pub assets_dir: PathBuf,
    /// Output of the frontend build: `index.html` plus hashed bundles.
    pub dist_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: 3000,
            assets_dir: PathBuf::from("assets"),
            dist_dir: PathBuf::from("dist"),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. An unparsable `PORT` keeps the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ServerConfig::default();
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(%raw, "PORT is not a valid port, using {}", defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };
        ServerConfig {
            port,
            assets_dir: lookup("ASSETS_DIR").map(PathBuf::from).unwrap_or(defaults.assets_dir),
            dist_dir: lookup("DIST_DIR").map(PathBuf::from).unwrap_or(defaults.dist_dir),
        }
    }

    pub fn index_path(&self) -> PathBuf {
        self.dist_dir.join("index.html")
    }
}
