// 系统代理交互会话

use super::{Platform, SystemProxyManager};
use crate::error::ProxyError;
use crate::prompt::{MenuAction, Prompt};
use std::io::{BufRead, Write};

pub fn run<I: BufRead, O: Write>(
    manager: &SystemProxyManager,
    default_endpoint: &str,
    prompt: &mut Prompt<I, O>,
) -> Result<(), ProxyError> {
    prompt.line("🔧 系统代理设置工具")?;
    prompt.line("=".repeat(60))?;
    prompt.line(format!(
        "当前操作系统: {}",
        manager.platform().display_name()
    ))?;

    manager.display_current_proxy(prompt)?;

    let has_proxy = manager.get().is_enabled;
    match prompt.choose_action(has_proxy)? {
        MenuAction::Unset => {
            prompt.line("正在取消系统代理设置...")?;
            match manager.unset() {
                Ok(()) => prompt.success("系统代理已取消！")?,
                Err(e) => prompt.failure(&format!("取消代理失败：{e}"))?,
            }
        }
        MenuAction::Set => {
            prompt.line("\n📝 代理地址格式说明:")?;
            prompt.line(format!("  • 格式: IP:端口 (例如: {default_endpoint})"))?;
            prompt.line(format!("  • 默认使用 {default_endpoint}"))?;

            // 地址原样交给平台策略，只有策略无法解析时才重新输入
            loop {
                let address = prompt.ask_address(
                    &format!("\n请输入代理地址 (默认: {default_endpoint}): "),
                    default_endpoint,
                    |_| Ok(()),
                )?;

                prompt.line(format!("正在设置系统代理为: {address}"))?;
                match manager.set(&address) {
                    Ok(()) => {
                        prompt.success("系统代理设置成功！")?;
                        if *manager.platform() == Platform::Linux {
                            prompt.tip(
                                "Linux系统提示: 请重新启动终端或执行 'source ~/.bashrc' 使代理生效",
                            )?;
                        }
                    }
                    Err(e @ ProxyError::InvalidAddress(_)) => {
                        prompt.failure(&e.to_string())?;
                        continue;
                    }
                    Err(e) => prompt.failure(&format!("设置代理失败：{e}"))?,
                }
                break;
            }
        }
        MenuAction::Exit => {
            prompt.line("👋 再见！")?;
        }
    }

    prompt.line("\n📋 最终系统代理设置:")?;
    manager.display_current_proxy(prompt)
}

// Windows 下修改注册表建议使用管理员身份，未提权时提示并等待确认
pub fn check_privileges<I: BufRead, O: Write>(
    platform: &Platform,
    is_elevated: bool,
    prompt: &mut Prompt<I, O>,
) -> Result<(), ProxyError> {
    if *platform != Platform::Windows || is_elevated {
        return Ok(());
    }

    log::warn!("当前未以管理员身份运行");
    prompt.warning("警告: Windows系统建议以管理员身份运行此程序以确保代理设置生效")?;
    prompt.line("请右键点击终端，选择「以管理员身份运行」")?;
    prompt.wait_enter("\n按回车键继续...")
}

#[cfg(windows)]
pub fn is_elevated() -> bool {
    use windows::Win32::UI::Shell::IsUserAnAdmin;
    unsafe { IsUserAnAdmin().as_bool() }
}

#[cfg(not(windows))]
pub fn is_elevated() -> bool {
    true
}
