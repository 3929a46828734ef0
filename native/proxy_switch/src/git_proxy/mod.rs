// Git 代理管理：通过 git config --global 读写 http.proxy / https.proxy。
// 每次查询都实时读取 git 配置，不做缓存。

pub mod session;

use crate::command::CommandRunner;
use crate::endpoint::{self, Scheme};
use crate::error::ProxyError;
use crate::prompt::Prompt;
use std::io::{BufRead, Write};

pub const HTTP_KEY: &str = "http.proxy";
pub const HTTPS_KEY: &str = "https.proxy";

// 当前 Git 代理配置快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitProxyState {
    pub http: Option<String>,
    pub https: Option<String>,
}

impl GitProxyState {
    pub fn is_set(&self) -> bool {
        self.http.is_some() || self.https.is_some()
    }
}

pub struct GitProxyManager<R> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> GitProxyManager<R> {
    pub fn new(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    // 启动时检查 git 是否可用
    pub fn check_available(&self) -> Result<(), ProxyError> {
        let output = self.runner.run(&self.program, &["--version"]);
        if !output.success {
            log::error!("git 不可用：{}", output.stderr);
            return Err(ProxyError::MissingDependency("Git".to_string()));
        }
        log::debug!("检测到 {}", output.stdout);
        Ok(())
    }

    pub fn current_proxy(&self) -> GitProxyState {
        GitProxyState {
            http: self.read_key(HTTP_KEY),
            https: self.read_key(HTTPS_KEY),
        }
    }

    fn read_key(&self, key: &str) -> Option<String> {
        let output = self
            .runner
            .run(&self.program, &["config", "--global", "--get", key]);
        (output.success && !output.stdout.is_empty()).then_some(output.stdout)
    }

    // 设置代理，返回最终写入的完整代理 URL
    pub fn set_proxy<I: BufRead, O: Write>(
        &self,
        address: &str,
        protocol: Option<Scheme>,
        prompt: &mut Prompt<I, O>,
    ) -> Result<String, ProxyError> {
        let proxy_url = resolve_proxy_url(address, protocol, prompt)?;
        prompt.line(format!("正在设置Git代理为: {proxy_url}"))?;
        self.apply_proxy_url(&proxy_url)?;
        Ok(proxy_url)
    }

    // 依次写入 http.proxy 与 https.proxy，任一失败立即返回，不回滚
    pub fn apply_proxy_url(&self, proxy_url: &str) -> Result<(), ProxyError> {
        log::info!("正在设置 Git 代理：{}", proxy_url);

        for key in [HTTP_KEY, HTTPS_KEY] {
            let output = self
                .runner
                .run(&self.program, &["config", "--global", key, proxy_url]);
            if !output.success {
                log::error!("写入 {} 失败：{}", key, output.stderr);
                return Err(ProxyError::GitConfigWrite {
                    key,
                    message: output.stderr,
                });
            }
        }

        log::info!("Git 代理设置成功");
        Ok(())
    }

    // 取消代理；键本来就不存在时 git 会返回非零，这里不检查
    pub fn unset_proxy(&self) {
        log::info!("正在取消 Git 代理");
        for key in [HTTP_KEY, HTTPS_KEY] {
            let output = self
                .runner
                .run(&self.program, &["config", "--global", "--unset", key]);
            if !output.success {
                log::debug!("取消 {} 未成功（可能本就未设置）：{}", key, output.stderr);
            }
        }
    }

    pub fn display_current_proxy<I: BufRead, O: Write>(
        &self,
        prompt: &mut Prompt<I, O>,
    ) -> Result<(), ProxyError> {
        let state = self.current_proxy();

        prompt.line("\n📋 当前Git代理设置:")?;
        prompt.rule(40)?;
        if state.is_set() {
            if let Some(http) = &state.http {
                prompt.line(format!("HTTP代理:  {http}"))?;
            }
            if let Some(https) = &state.https {
                prompt.line(format!("HTTPS代理: {https}"))?;
            }
        } else {
            prompt.failure("未设置代理")?;
        }
        prompt.rule(40)
    }
}

// 为地址确定协议：已带前缀直接使用；否则在未指定协议时询问用户
pub fn resolve_proxy_url<I: BufRead, O: Write>(
    address: &str,
    protocol: Option<Scheme>,
    prompt: &mut Prompt<I, O>,
) -> Result<String, ProxyError> {
    if endpoint::detect_scheme(address).is_some() {
        return Ok(address.to_string());
    }

    let protocol = match protocol {
        Some(p) => p,
        None => {
            prompt.line("\n🔧 请选择代理协议:")?;
            prompt.line("1. HTTP/HTTPS")?;
            prompt.line("2. SOCKS5")?;
            match prompt.choose("请输入选择 (1-2): ", 2)? {
                2 => Scheme::Socks5,
                _ => Scheme::Http,
            }
        }
    };

    Ok(endpoint::qualify(address, Some(protocol)))
}
