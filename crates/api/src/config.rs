use std::net::SocketAddr;

use clap::Parser;

/// Server configuration, from flags or environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "learnify", about = "Learner progress and activity API")]
pub struct Config {
    /// `SQLite` database URL
    #[arg(long, env = "LEARNIFY_DB_URL", default_value = "sqlite://learnify.sqlite3?mode=rwc")]
    pub db_url: String,

    /// Address to listen on
    #[arg(long, env = "LEARNIFY_LISTEN", default_value = "127.0.0.1:8000")]
    pub listen: SocketAddr,

    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, env = "LEARNIFY_LOG", default_value = "info")]
    pub log: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_flags() {
        let config = Config::try_parse_from(["learnify"]).unwrap();
        assert_eq!(config.listen, "127.0.0.1:8000".parse().unwrap());
        assert_eq!(config.log, "info");
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "learnify",
            "--db-url",
            "sqlite::memory:",
            "--listen",
            "0.0.0.0:9000",
        ])
        .unwrap();
        assert_eq!(config.db_url, "sqlite::memory:");
        assert_eq!(config.listen.port(), 9000);
    }
}
