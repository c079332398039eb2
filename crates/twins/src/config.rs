//! 扫描配置

use crate::scanner::DEFAULT_THRESHOLD;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// 扫描配置
#[derive(Debug, Clone)]
pub struct TwinsConfig {
    pub threshold: f64,
    /// 文本输出最多显示的配对数
    pub max_results: usize,
    pub format: OutputFormat,
}

impl Default for TwinsConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            max_results: 20,
            format: OutputFormat::Text,
        }
    }
}

impl TwinsConfig {
    /// 从环境变量加载配置，无法解析的值保留默认
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = get("COPYCAT_THRESHOLD") {
            if let Ok(t) = v.trim().parse() {
                config.threshold = t;
            }
        }

        if let Some(v) = get("COPYCAT_MAX_RESULTS") {
            if let Ok(m) = v.trim().parse() {
                config.max_results = m;
            }
        }

        if let Some(v) = get("COPYCAT_FORMAT") {
            if let Some(f) = OutputFormat::from_str(v.trim()) {
                config.format = f;
            }
        }

        config
    }
}
