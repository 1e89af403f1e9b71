//! Process settings read from the environment (and `.env` via dotenvy).

use std::env;

use tracing::warn;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Optional TOML rule set; defaults apply when unset.
    pub pricing_config_path: Option<String>,
}

impl ServerSettings {
    /// Read `HOST`, `PORT` and `PRICING_CONFIG`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Invalid PORT '{}', falling back to {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };
        let pricing_config_path = lookup("PRICING_CONFIG").filter(|p| !p.is_empty());

        Self {
            host,
            port,
            pricing_config_path,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> ServerSettings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]);
        assert_eq!(s.addr(), "0.0.0.0:8080");
        assert_eq!(s.pricing_config_path, None);
    }

    #[test]
    fn test_reads_values() {
        let s = settings(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("PRICING_CONFIG", "pricing.toml"),
        ]);
        assert_eq!(s.addr(), "127.0.0.1:9000");
        assert_eq!(s.pricing_config_path.as_deref(), Some("pricing.toml"));
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let s = settings(&[("PORT", "not-a-port"), ("PRICING_CONFIG", "")]);
        assert_eq!(s.port, DEFAULT_PORT);
        assert_eq!(s.pricing_config_path, None);
    }
}
