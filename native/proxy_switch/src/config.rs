// 运行配置：工具不接受命令行参数，可调整项全部来自环境变量

use std::env;

pub const DEFAULT_ENDPOINT: &str = "127.0.0.1:10808";
pub const DEFAULT_GIT_PROGRAM: &str = "git";
pub const DEFAULT_LOG_FILTER: &str = "warn";

const ENV_GIT_PROGRAM: &str = "PROXY_SWITCH_GIT";
const ENV_DEFAULT_ENDPOINT: &str = "PROXY_SWITCH_DEFAULT_ENDPOINT";
const ENV_LOG_FILTER: &str = "PROXY_SWITCH_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    // git 可执行文件
    pub git_program: String,
    // 用户直接回车时使用的代理地址
    pub default_endpoint: String,
    // 日志过滤规则（RUST_LOG 优先）
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            git_program: DEFAULT_GIT_PROGRAM.to_string(),
            default_endpoint: DEFAULT_ENDPOINT.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // 空值视为未设置
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            git_program: read(ENV_GIT_PROGRAM, DEFAULT_GIT_PROGRAM),
            default_endpoint: read(ENV_DEFAULT_ENDPOINT, DEFAULT_ENDPOINT),
            log_filter: read(ENV_LOG_FILTER, DEFAULT_LOG_FILTER),
        }
    }
}
