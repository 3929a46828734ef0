// Git 代理交互会话

use super::GitProxyManager;
use crate::command::CommandRunner;
use crate::error::ProxyError;
use crate::prompt::{MenuAction, Prompt};
use std::io::{BufRead, Write};

pub fn run<R: CommandRunner, I: BufRead, O: Write>(
    manager: &GitProxyManager<R>,
    default_endpoint: &str,
    prompt: &mut Prompt<I, O>,
) -> Result<(), ProxyError> {
    prompt.line("🔧 Git代理设置工具")?;
    prompt.line("=".repeat(50))?;

    manager.check_available()?;
    manager.display_current_proxy(prompt)?;

    let has_proxy = manager.current_proxy().is_set();
    match prompt.choose_action(has_proxy)? {
        MenuAction::Unset => {
            prompt.line("正在取消Git代理设置...")?;
            manager.unset_proxy();
            prompt.success("Git代理已取消！")?;
        }
        MenuAction::Set => {
            prompt.line("\n📝 代理地址格式说明:")?;
            prompt.line(format!("  • HTTP代理: http://{default_endpoint} 或 {default_endpoint}"))?;
            prompt.line(format!("  • SOCKS5代理: socks5://{default_endpoint}"))?;
            prompt.line("  • 如果不指定协议，将提示选择")?;

            let address = prompt.ask_address(
                &format!("\n请输入代理地址 (默认: {default_endpoint}): "),
                default_endpoint,
                |_| Ok(()),
            )?;

            match manager.set_proxy(&address, None, prompt) {
                Ok(_) => prompt.success("Git代理设置成功！")?,
                Err(e @ ProxyError::GitConfigWrite { .. }) => prompt.failure(&e.to_string())?,
                Err(e) => return Err(e),
            }
        }
        MenuAction::Exit => {
            prompt.line("👋 再见！")?;
        }
    }

    prompt.line("\n📋 最终Git代理设置:")?;
    manager.display_current_proxy(prompt)
}
