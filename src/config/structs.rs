use serde::{Deserialize, Serialize};

/// Environment variable prefix for layered configuration
pub const ENV_PREFIX: &str = "SLIDEDECK";

/// Bare environment variable overriding `analytics.log_group`
pub const LOG_GROUP_ENV: &str = "LOG_GROUP_NAME";

/// Bare environment variable overriding `analytics.api_base`
pub const LOG_API_ENV: &str = "SLIDEDECK_LOG_API";

/// Default configuration file name
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: 服务器地址、端口、CPU 数量
/// - deck: markdown 目录与缓存开关
/// - logging: 日志配置
/// - analytics: 事件日志端点与 sink 配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub deck: DeckConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：裸环境变量 > SLIDEDECK__* > config.toml > 默认值
    /// 示例：SLIDEDECK__SERVER__PORT=9999
    pub fn load(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config = match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply the bare `LOG_GROUP_NAME` / `SLIDEDECK_LOG_API` variables.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(group) = lookup(LOG_GROUP_ENV).filter(|v| !v.trim().is_empty()) {
            self.analytics.log_group = group;
        }
        if let Some(api) = lookup(LOG_API_ENV) {
            self.analytics.api_base = api;
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// Markdown deck source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckConfig {
    /// Directory holding `<int>[-<slug>].md` files
    #[serde(default = "default_deck_directory")]
    pub directory: String,
    /// Memoize the parsed deck until a markdown file changes
    #[serde(default)]
    pub cache_enabled: bool,
    /// Shown in the page `<title>` next to the slide title
    #[serde(default = "default_session_label")]
    pub session_label: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 事件日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Public base URL of the `/log` endpoint; empty disables event logging
    #[serde(default)]
    pub api_base: String,
    /// Log group (destination namespace) used by the receiving side
    #[serde(default = "default_log_group")]
    pub log_group: String,
    /// Sink backend: "file" or "memory"
    #[serde(default = "default_sink")]
    pub sink: String,
    /// Root directory for the file sink
    #[serde(default = "default_sink_directory")]
    pub sink_directory: String,
    /// `source` field stamped on every stored event
    #[serde(default = "default_source")]
    pub source: String,
    /// Daily stream name prefix
    #[serde(default = "default_stream_prefix")]
    pub stream_prefix: String,
    /// Timeout for outgoing event POSTs
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl AnalyticsConfig {
    /// The configured endpoint base, if logging is enabled
    pub fn endpoint(&self) -> Option<&str> {
        let trimmed = self.api_base.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.trim_end_matches('/'))
        }
    }
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_deck_directory() -> String {
    "slides-md".to_string()
}

fn default_session_label() -> String {
    "Presentation".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_log_group() -> String {
    "/presentation-demo/slide-events".to_string()
}

fn default_sink() -> String {
    "file".to_string()
}

fn default_sink_directory() -> String {
    "event-logs".to_string()
}

fn default_source() -> String {
    "slidedeck-presentation".to_string()
}

fn default_stream_prefix() -> String {
    "slide-events-".to_string()
}

fn default_request_timeout_secs() -> u64 {
    5
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            directory: default_deck_directory(),
            cache_enabled: false,
            session_label: default_session_label(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            log_group: default_log_group(),
            sink: default_sink(),
            sink_directory: default_sink_directory(),
            source: default_source(),
            stream_prefix: default_stream_prefix(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
