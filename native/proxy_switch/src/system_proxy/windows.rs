// Windows 实现：通过 reg 命令读写当前用户的 Internet Settings

use super::{ProxyInfo, ProxyStrategy};
use crate::command::CommandRunner;
use crate::error::ProxyError;
use std::rc::Rc;

const INTERNET_SETTINGS_KEY: &str =
    r"HKCU\Software\Microsoft\Windows\CurrentVersion\Internet Settings";

pub struct WindowsProxy {
    runner: Rc<dyn CommandRunner>,
}

impl WindowsProxy {
    pub fn new(runner: Rc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn query(&self, value: &str) -> Option<String> {
        let output = self
            .runner
            .run("reg", &["query", INTERNET_SETTINGS_KEY, "/v", value]);
        output.success.then_some(output.stdout)
    }

    fn add(&self, value: &str, kind: &str, data: &str) -> Result<(), ProxyError> {
        let output = self.runner.run(
            "reg",
            &[
                "add",
                INTERNET_SETTINGS_KEY,
                "/v",
                value,
                "/t",
                kind,
                "/d",
                data,
                "/f",
            ],
        );
        if output.success {
            Ok(())
        } else {
            Err(ProxyError::Registry(format!("{value}：{}", output.stderr)))
        }
    }

    // 通知系统刷新连接设置，结果不影响操作是否成功
    fn refresh(&self) {
        let output = self
            .runner
            .run("rundll32.exe", &["inetcpl.cpl,LaunchConnectionDialog"]);
        if !output.success {
            log::debug!("刷新系统代理设置失败：{}", output.stderr);
        }
    }
}

impl ProxyStrategy for WindowsProxy {
    fn get(&self) -> ProxyInfo {
        let enabled = self
            .query("ProxyEnable")
            .is_some_and(|output| output.contains("0x1"));
        if !enabled {
            return ProxyInfo::disabled();
        }

        // 输出最后一列即代理服务器地址
        match self
            .query("ProxyServer")
            .and_then(|output| output.split_whitespace().last().map(str::to_string))
        {
            Some(server) => ProxyInfo::enabled(server),
            None => ProxyInfo::disabled(),
        }
    }

    fn set(&self, address: &str) -> Result<(), ProxyError> {
        let enable = self.add("ProxyEnable", "REG_DWORD", "1");
        let server = self.add("ProxyServer", "REG_SZ", address);
        enable.and(server)?;

        self.refresh();
        Ok(())
    }

    fn unset(&self) -> Result<(), ProxyError> {
        self.add("ProxyEnable", "REG_DWORD", "0")?;
        self.refresh();
        Ok(())
    }
}
