// macOS 实现：使用 networksetup 命令行工具管理每个网络服务的代理

use super::{ProxyInfo, ProxyStrategy};
use crate::command::CommandRunner;
use crate::endpoint;
use crate::error::ProxyError;
use std::rc::Rc;

const NETWORKSETUP: &str = "networksetup";

pub struct MacosProxy {
    runner: Rc<dyn CommandRunner>,
}

impl MacosProxy {
    pub fn new(runner: Rc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    // 获取所有网络服务（带 * 的行是说明行或已停用的服务）
    fn network_services(&self) -> Result<Vec<String>, ProxyError> {
        let output = self
            .runner
            .run(NETWORKSETUP, &["-listallnetworkservices"]);
        if !output.success {
            return Err(ProxyError::NetworkServices(output.stderr));
        }

        let services: Vec<String> = output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.contains('*'))
            .map(str::to_string)
            .collect();

        log::info!("找到 {} 个网络服务", services.len());
        Ok(services)
    }

    fn run_ok(&self, args: &[&str]) -> bool {
        let output = self.runner.run(NETWORKSETUP, args);
        if !output.success {
            log::warn!("networksetup {} 失败：{}", args.join(" "), output.stderr);
        }
        output.success
    }

    // 对每个服务执行一组命令，统计全部成功的服务数
    fn apply_to_services(&self, commands: impl Fn(&str) -> Vec<Vec<String>>) -> Result<(), ProxyError> {
        let services = self.network_services()?;

        let mut success_count = 0;
        for service in &services {
            let mut all_ok = true;
            for args in commands(service) {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                all_ok &= self.run_ok(&args);
            }
            if all_ok {
                success_count += 1;
            } else {
                log::warn!("网络服务 {} 未能全部设置成功", service);
            }
        }

        log::info!("{}/{} 个网络服务设置成功", success_count, services.len());
        if success_count > 0 {
            Ok(())
        } else {
            Err(ProxyError::NoServiceUpdated)
        }
    }
}

// 解析 -getwebproxy 输出，仅在启用且服务器与端口齐全时返回 主机:端口
fn parse_web_proxy(output: &str) -> Option<String> {
    let mut enabled = false;
    let mut server = "";
    let mut port = "";

    for line in output.lines() {
        if let Some(value) = line.strip_prefix("Enabled:") {
            enabled = value.trim() == "Yes";
        } else if let Some(value) = line.strip_prefix("Server:") {
            server = value.trim();
        } else if let Some(value) = line.strip_prefix("Port:") {
            port = value.trim();
        }
    }

    (enabled && !server.is_empty() && !port.is_empty()).then(|| format!("{server}:{port}"))
}

impl ProxyStrategy for MacosProxy {
    fn get(&self) -> ProxyInfo {
        let services = match self.network_services() {
            Ok(s) => s,
            Err(e) => {
                log::warn!("{}", e);
                return ProxyInfo::disabled();
            }
        };

        // 返回第一个启用了代理的服务
        for service in &services {
            let output = self.runner.run(NETWORKSETUP, &["-getwebproxy", service]);
            if !output.success {
                continue;
            }
            if let Some(server) = parse_web_proxy(&output.stdout) {
                log::info!("网络服务 {} 的代理：{}", service, server);
                return ProxyInfo::enabled(server);
            }
        }

        ProxyInfo::disabled()
    }

    fn set(&self, address: &str) -> Result<(), ProxyError> {
        let (host, port) = endpoint::split_host_port(address)
            .ok_or_else(|| ProxyError::InvalidAddress(address.to_string()))?;

        self.apply_to_services(|service| {
            vec![
                vec!["-setwebproxy".into(), service.into(), host.into(), port.into()],
                vec!["-setsecurewebproxy".into(), service.into(), host.into(), port.into()],
            ]
        })
    }

    fn unset(&self) -> Result<(), ProxyError> {
        self.apply_to_services(|service| {
            vec![
                vec!["-setwebproxystate".into(), service.into(), "off".into()],
                vec!["-setsecurewebproxystate".into(), service.into(), "off".into()],
            ]
        })
    }
}
