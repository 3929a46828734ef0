// 系统代理管理：提供跨平台的系统级代理设置能力。
//
// 启动时检测一次平台并选定对应策略，之后所有查询、设置、取消操作
// 都交给该策略处理。

pub mod linux;
pub mod macos;
pub mod session;
pub mod windows;

use crate::command::CommandRunner;
use crate::error::ProxyError;
use crate::prompt::Prompt;
use std::io::{BufRead, Write};
use std::rc::Rc;

pub use linux::{EnvStore, LinuxProxy, ProcessEnv};
pub use macos::MacosProxy;
pub use windows::WindowsProxy;

// 系统代理配置信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyInfo {
    pub is_enabled: bool,
    pub server: Option<String>,
}

impl ProxyInfo {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn enabled(server: impl Into<String>) -> Self {
        Self {
            is_enabled: true,
            server: Some(server.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Other(String),
}

impl Platform {
    pub fn detect() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            "linux" => Platform::Linux,
            other => Platform::Other(other.to_string()),
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Platform::Windows => "Windows",
            Platform::MacOs => "macOS",
            Platform::Linux => "Linux",
            Platform::Other(name) => name,
        }
    }
}

// 平台代理策略
pub trait ProxyStrategy {
    fn get(&self) -> ProxyInfo;
    fn set(&self, address: &str) -> Result<(), ProxyError>;
    fn unset(&self) -> Result<(), ProxyError>;
}

// 不支持的平台：查询视为未设置，不执行任何命令
pub struct UnsupportedProxy {
    os: String,
}

impl UnsupportedProxy {
    pub fn new(os: impl Into<String>) -> Self {
        Self { os: os.into() }
    }
}

impl ProxyStrategy for UnsupportedProxy {
    fn get(&self) -> ProxyInfo {
        ProxyInfo::disabled()
    }

    fn set(&self, _address: &str) -> Result<(), ProxyError> {
        Err(ProxyError::UnsupportedPlatform(self.os.clone()))
    }

    fn unset(&self) -> Result<(), ProxyError> {
        Err(ProxyError::UnsupportedPlatform(self.os.clone()))
    }
}

// 按平台选择策略
pub fn create_strategy(platform: &Platform, runner: Rc<dyn CommandRunner>) -> Box<dyn ProxyStrategy> {
    match platform {
        Platform::Windows => Box::new(WindowsProxy::new(runner)),
        Platform::MacOs => Box::new(MacosProxy::new(runner)),
        Platform::Linux => Box::new(LinuxProxy::new(
            Box::new(ProcessEnv),
            linux::default_profiles(),
        )),
        Platform::Other(os) => Box::new(UnsupportedProxy::new(os.clone())),
    }
}

pub struct SystemProxyManager {
    platform: Platform,
    strategy: Box<dyn ProxyStrategy>,
}

impl SystemProxyManager {
    pub fn new(runner: Rc<dyn CommandRunner>) -> Self {
        let platform = Platform::detect();
        log::info!("当前操作系统：{}", platform.display_name());
        let strategy = create_strategy(&platform, runner);
        Self::with_strategy(platform, strategy)
    }

    pub fn with_strategy(platform: Platform, strategy: Box<dyn ProxyStrategy>) -> Self {
        Self { platform, strategy }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn get(&self) -> ProxyInfo {
        let info = self.strategy.get();
        log::debug!("当前系统代理：{:?}", info);
        info
    }

    pub fn set(&self, address: &str) -> Result<(), ProxyError> {
        log::info!("正在设置 {} 系统代理：{}", self.platform.display_name(), address);
        let result = self.strategy.set(address);
        match &result {
            Ok(()) => log::info!("系统代理设置成功：{}", address),
            Err(e) => log::error!("设置系统代理失败：{}", e),
        }
        result
    }

    pub fn unset(&self) -> Result<(), ProxyError> {
        log::info!("正在禁用 {} 系统代理", self.platform.display_name());
        let result = self.strategy.unset();
        match &result {
            Ok(()) => log::info!("系统代理已禁用"),
            Err(e) => log::error!("禁用系统代理失败：{}", e),
        }
        result
    }

    pub fn display_current_proxy<I: BufRead, O: Write>(
        &self,
        prompt: &mut Prompt<I, O>,
    ) -> Result<(), ProxyError> {
        let info = self.get();

        prompt.line(format!(
            "\n📋 当前系统代理设置 ({}):",
            self.platform.display_name()
        ))?;
        prompt.rule(50)?;
        match info.server.as_deref() {
            Some(server) if info.is_enabled => prompt.success(&format!("代理已启用: {server}"))?,
            _ => prompt.failure("未设置代理")?,
        }
        prompt.rule(50)
    }
}
