// Linux 实现：设置当前进程的代理环境变量，并写入 shell 配置文件持久化
//
// 环境变量只对本进程及其子进程生效；已打开的终端需要重新加载配置文件。

use super::{ProxyInfo, ProxyStrategy};
use crate::endpoint;
use crate::error::ProxyError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

// 读取顺序即优先级
pub const PROXY_VARS: [&str; 4] = ["http_proxy", "HTTP_PROXY", "https_proxy", "HTTPS_PROXY"];

// 配置文件中包含这些片段的行视为旧的代理设置
const PROFILE_MARKERS: [&str; 4] = ["http_proxy=", "https_proxy=", "HTTP_PROXY=", "HTTPS_PROXY="];

const PROFILE_NAMES: [&str; 3] = [".bashrc", ".zshrc", ".profile"];

// 环境变量存取
pub trait EnvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

// 当前进程环境
pub struct ProcessEnv;

impl EnvStore for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set(&self, key: &str, value: &str) {
        // SAFETY: 交互会话在单个线程上顺序执行，没有其他线程同时读写环境变量
        unsafe { std::env::set_var(key, value) }
    }

    fn remove(&self, key: &str) {
        // SAFETY: 同上
        unsafe { std::env::remove_var(key) }
    }
}

// 用户主目录下的候选配置文件，按顺序只修改第一个存在的
pub fn default_profiles() -> Vec<PathBuf> {
    match dirs::home_dir() {
        Some(home) => PROFILE_NAMES.iter().map(|name| home.join(name)).collect(),
        None => {
            log::warn!("无法获取用户主目录，跳过配置文件持久化");
            Vec::new()
        }
    }
}

pub struct LinuxProxy {
    env: Box<dyn EnvStore>,
    profiles: Vec<PathBuf>,
}

impl LinuxProxy {
    pub fn new(env: Box<dyn EnvStore>, profiles: Vec<PathBuf>) -> Self {
        Self { env, profiles }
    }

    // 重写第一个存在的配置文件；读写失败则尝试下一个
    fn persist(&self, export_lines: &[String]) -> Option<&Path> {
        for path in &self.profiles {
            if !path.exists() {
                continue;
            }
            match rewrite_profile(path, export_lines) {
                Ok(()) => {
                    log::info!("已更新配置文件 {}", path.display());
                    return Some(path);
                }
                Err(e) => {
                    log::warn!("更新配置文件 {} 失败：{}", path.display(), e);
                }
            }
        }

        log::info!("没有可更新的 shell 配置文件");
        None
    }
}

fn rewrite_profile(path: &Path, export_lines: &[String]) -> io::Result<()> {
    let content = fs::read_to_string(path)?;
    fs::write(path, filter_profile(&content, export_lines))
}

// 去掉所有代理设置行，再追加新的 export 行
pub fn filter_profile(content: &str, export_lines: &[String]) -> String {
    let mut lines: Vec<&str> = content
        .split('\n')
        .filter(|line| !PROFILE_MARKERS.iter().any(|marker| line.contains(marker)))
        .collect();
    lines.extend(export_lines.iter().map(String::as_str));
    lines.join("\n")
}

impl ProxyStrategy for LinuxProxy {
    fn get(&self) -> ProxyInfo {
        PROXY_VARS
            .iter()
            .filter_map(|var| self.env.get(var))
            .find(|value| !value.is_empty())
            .map(|value| ProxyInfo::enabled(endpoint::strip_http_scheme(&value)))
            .unwrap_or_default()
    }

    fn set(&self, address: &str) -> Result<(), ProxyError> {
        let proxy_url = format!("http://{address}");

        for var in PROXY_VARS {
            self.env.set(var, &proxy_url);
        }

        let export_lines: Vec<String> = ["http_proxy", "https_proxy", "HTTP_PROXY", "HTTPS_PROXY"]
            .iter()
            .map(|var| format!("export {var}=\"{proxy_url}\""))
            .collect();
        self.persist(&export_lines);

        Ok(())
    }

    fn unset(&self) -> Result<(), ProxyError> {
        // 读不出的值（如非 UTF-8）同样要删除
        for var in PROXY_VARS {
            self.env.remove(var);
        }

        self.persist(&[]);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::MemoryEnv;
    use super::*;
    use tempfile::TempDir;

    fn profiles_in(dir: &TempDir) -> Vec<PathBuf> {
        PROFILE_NAMES.iter().map(|name| dir.path().join(name)).collect()
    }

    #[test]
    fn test_get_priority_and_prefix_stripping() {
        let env = MemoryEnv::default();
        let proxy = LinuxProxy::new(Box::new(env.clone()), Vec::new());
        assert_eq!(proxy.get(), ProxyInfo::disabled());

        env.set("HTTPS_PROXY", "https://10.0.0.9:443");
        assert_eq!(proxy.get(), ProxyInfo::enabled("10.0.0.9:443"));

        env.set("https_proxy", "http://10.0.0.8:8080");
        assert_eq!(proxy.get(), ProxyInfo::enabled("10.0.0.8:8080"));

        env.set("HTTP_PROXY", "");
        env.set("http_proxy", "socks5://10.0.0.7:1080");
        assert_eq!(proxy.get(), ProxyInfo::enabled("socks5://10.0.0.7:1080"));
    }

    #[test]
    fn test_set_then_get_without_profiles() {
        let env = MemoryEnv::default();
        let proxy = LinuxProxy::new(Box::new(env.clone()), Vec::new());

        proxy.set("127.0.0.1:10808").unwrap();
        assert_eq!(proxy.get(), ProxyInfo::enabled("127.0.0.1:10808"));
        for var in PROXY_VARS {
            assert_eq!(env.get(var).as_deref(), Some("http://127.0.0.1:10808"));
        }
    }

    #[test]
    fn test_filter_profile() {
        let content = "alias ll='ls -l'\nexport http_proxy=\"http://old:1\"\nexport HTTPS_PROXY=\"http://old:1\"\n";
        assert_eq!(filter_profile(content, &[]), "alias ll='ls -l'\n");

        let appended = filter_profile("alias ll='ls -l'", &["export http_proxy=\"x\"".to_string()]);
        assert_eq!(appended, "alias ll='ls -l'\nexport http_proxy=\"x\"");

        // 大小写敏感：混合大小写的变量名不会被删除
        assert_eq!(filter_profile("Http_Proxy=1", &[]), "Http_Proxy=1");
    }

    #[test]
    fn test_set_and_unset_edit_only_first_existing_profile() {
        let dir = TempDir::new().unwrap();
        let zshrc = dir.path().join(".zshrc");
        let profile = dir.path().join(".profile");
        fs::write(&zshrc, "export PATH=$HOME/bin:$PATH\nexport http_proxy=\"http://old:1\"\n").unwrap();
        fs::write(&profile, "export https_proxy=\"http://keep:2\"\n").unwrap();

        let env = MemoryEnv::default();
        let proxy = LinuxProxy::new(Box::new(env.clone()), profiles_in(&dir));

        proxy.set("10.0.0.5:1080").unwrap();
        assert_eq!(proxy.get(), ProxyInfo::enabled("10.0.0.5:1080"));

        let content = fs::read_to_string(&zshrc).unwrap();
        assert!(content.starts_with("export PATH=$HOME/bin:$PATH\n"));
        assert!(!content.contains("old:1"));
        for var in ["http_proxy", "https_proxy", "HTTP_PROXY", "HTTPS_PROXY"] {
            assert!(content.contains(&format!("export {var}=\"http://10.0.0.5:1080\"")));
        }
        assert!(!dir.path().join(".bashrc").exists());

        proxy.unset().unwrap();
        for var in PROXY_VARS {
            assert!(!env.contains(var));
        }
        assert_eq!(proxy.get(), ProxyInfo::disabled());

        let content = fs::read_to_string(&zshrc).unwrap();
        assert!(!content.contains("proxy"));
        assert!(!content.contains("PROXY"));

        // 后续的配置文件保持不变
        assert_eq!(
            fs::read_to_string(&profile).unwrap(),
            "export https_proxy=\"http://keep:2\"\n"
        );
    }

    #[test]
    fn test_unreadable_profile_falls_through_to_next() {
        let dir = TempDir::new().unwrap();
        // 与 .bashrc 同名的目录存在但无法按文件读取
        fs::create_dir(dir.path().join(".bashrc")).unwrap();
        let zshrc = dir.path().join(".zshrc");
        fs::write(&zshrc, "").unwrap();

        let proxy = LinuxProxy::new(Box::new(MemoryEnv::default()), profiles_in(&dir));
        proxy.set("127.0.0.1:10808").unwrap();

        let content = fs::read_to_string(&zshrc).unwrap();
        assert!(content.contains("export http_proxy=\"http://127.0.0.1:10808\""));
    }

    #[test]
    fn test_set_succeeds_without_any_profile() {
        let dir = TempDir::new().unwrap();
        let proxy = LinuxProxy::new(Box::new(MemoryEnv::default()), profiles_in(&dir));

        assert!(proxy.set("127.0.0.1:10808").is_ok());
        assert!(proxy.unset().is_ok());
        assert!(!dir.path().join(".bashrc").exists());
    }

    #[test]
    fn test_unset_removes_unreadable_variables() {
        let env = MemoryEnv::default();
        env.set_unreadable("http_proxy");
        env.set_unreadable("HTTPS_PROXY");
        env.set("https_proxy", "http://10.0.0.1:3128");
        let proxy = LinuxProxy::new(Box::new(env.clone()), Vec::new());
        assert_eq!(proxy.get(), ProxyInfo::enabled("10.0.0.1:3128"));

        proxy.unset().unwrap();
        for var in PROXY_VARS {
            assert!(!env.contains(var), "{var} 未被删除");
        }
        assert_eq!(proxy.get(), ProxyInfo::disabled());
    }
}
