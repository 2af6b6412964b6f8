//! Configuração do servidor (padrões + variáveis de ambiente)

use std::time::Duration;

/// Endereço padrão do servidor
const DEFAULT_ADDR: &str = "0.0.0.0:3000";
/// Filtro de log padrão (sintaxe do `EnvFilter`)
const DEFAULT_LOG_FILTER: &str = "info";
/// Pausa entre eventos no WebSocket, para a animação passo a passo
const DEFAULT_STREAM_DELAY_MS: u64 = 35;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Endereço de escuta (`host:porta`)
    pub addr: String,
    /// Filtro de log
    pub log_filter: String,
    /// Pausa entre eventos enviados pelo WebSocket
    pub stream_delay: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            stream_delay: Duration::from_millis(DEFAULT_STREAM_DELAY_MS),
        }
    }
}

impl ServerConfig {
    /// Lê `DECODER_ADDR`, `RUST_LOG` e `DECODER_STREAM_DELAY_MS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Monta a configuração a partir de uma função de busca de variáveis.
    /// Valores ausentes, vazios ou inválidos mantêm o padrão.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(addr) = lookup("DECODER_ADDR") {
            config = config.addr(addr);
        }
        if let Some(filter) = lookup("RUST_LOG") {
            config = config.log_filter(filter);
        }
        if let Some(ms) = lookup("DECODER_STREAM_DELAY_MS").and_then(|v| v.trim().parse().ok()) {
            config = config.stream_delay(Duration::from_millis(ms));
        }
        config
    }

    pub fn addr(mut self, addr: impl Into<String>) -> Self {
        self.addr = addr.into();
        self
    }

    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    pub fn stream_delay(mut self, delay: Duration) -> Self {
        self.stream_delay = delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr, "0.0.0.0:3000");
        assert_eq!(config.stream_delay, Duration::from_millis(35));
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("DECODER_ADDR", "127.0.0.1:8080"),
            ("RUST_LOG", "debug"),
            ("DECODER_STREAM_DELAY_MS", "0"),
        ]));
        assert_eq!(config.addr, "127.0.0.1:8080");
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.stream_delay, Duration::ZERO);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("DECODER_ADDR", "   "),
            ("DECODER_STREAM_DELAY_MS", "rápido"),
        ]));
        assert_eq!(config, ServerConfig::default());
    }
}
