use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub admins: Vec<String>,
    pub command_prefix: String,
    // period of the outbound/persistence tick
    pub main_loop_interval: Duration,
    // how long one outbound message may stay unacknowledged
    pub sync_message_timeout: Duration,
    pub data_path: PathBuf,
    pub delivery_url: String,
    pub bind_addr: SocketAddr,
    pub verbose_logging: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            admins: Vec::new(),
            command_prefix: "##".to_string(),
            main_loop_interval: Duration::from_millis(100),
            sync_message_timeout: Duration::from_millis(5000),
            data_path: PathBuf::from("data/mafia.json"),
            delivery_url: "http://localhost:3000/messages".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            verbose_logging: false,
        }
    }
}

impl BotConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let admins = env::var("MAFIA_ADMINS")
            .map(|v| parse_admins(&v))
            .unwrap_or(defaults.admins);
        let command_prefix = env::var("MAFIA_COMMAND_PREFIX")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.command_prefix);
        let main_loop_interval = env::var("MAFIA_MAIN_LOOP_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.main_loop_interval);
        let sync_message_timeout = env::var("MAFIA_SYNC_MESSAGE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.sync_message_timeout);
        let data_path = env::var("MAFIA_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);
        let delivery_url = env::var("MAFIA_DELIVERY_URL").unwrap_or(defaults.delivery_url);
        let bind_addr = env::var("MAFIA_BIND_ADDR")
            .ok()
            .and_then(|v| v.parse::<SocketAddr>().ok())
            .unwrap_or(defaults.bind_addr);
        let verbose_logging = env::var("MAFIA_VERBOSE_LOGGING")
            .map(|v| v == "true")
            .unwrap_or(defaults.verbose_logging);

        Self {
            admins,
            command_prefix,
            main_loop_interval,
            sync_message_timeout,
            data_path,
            delivery_url,
            bind_addr,
            verbose_logging,
        }
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admins.iter().any(|id| id == user_id)
    }
}

fn parse_admins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_list_ignores_blanks() {
        assert_eq!(parse_admins(" 12, ,34,"), vec!["12", "34"]);
        assert!(parse_admins("").is_empty());
    }

    #[test]
    fn is_admin_checks_configured_ids() {
        let config = BotConfig {
            admins: vec!["12".to_string()],
            ..BotConfig::default()
        };
        assert!(config.is_admin("12"));
        assert!(!config.is_admin("34"));
    }

    #[test]
    fn defaults_are_quiet_and_local() {
        let config = BotConfig::default();
        assert!(!config.verbose_logging);
        assert_eq!(config.command_prefix, "##");
        assert_eq!(config.sync_message_timeout, Duration::from_millis(5000));
    }
}
