// 交互式提示：编号菜单、地址输入与状态输出
//
// 输入结束（Ctrl+D / 管道关闭）视为用户中断。

use crate::error::ProxyError;
use crossterm::style::Stylize;
use std::fmt::Display;
use std::io::{BufRead, Write};

// 主菜单操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Set,
    Unset,
    Exit,
}

pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn line(&mut self, text: impl Display) -> Result<(), ProxyError> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    pub fn rule(&mut self, width: usize) -> Result<(), ProxyError> {
        self.line("-".repeat(width))
    }

    pub fn success(&mut self, text: &str) -> Result<(), ProxyError> {
        self.line(format!("✅ {text}").green())
    }

    pub fn failure(&mut self, text: &str) -> Result<(), ProxyError> {
        self.line(format!("❌ {text}").red())
    }

    pub fn warning(&mut self, text: &str) -> Result<(), ProxyError> {
        self.line(format!("⚠️  {text}").yellow())
    }

    pub fn tip(&mut self, text: &str) -> Result<(), ProxyError> {
        self.line(format!("💡 {text}").cyan())
    }

    // 读取一行（已去除首尾空白）
    pub fn ask(&mut self, message: &str) -> Result<String, ProxyError> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(ProxyError::Interrupted);
        }
        Ok(buf.trim().to_string())
    }

    // 在 1..=max 中选择，只接受与菜单编号完全一致的输入（不接受 "+1"、"01"）
    pub fn choose(&mut self, message: &str, max: usize) -> Result<usize, ProxyError> {
        loop {
            let answer = self.ask(message)?;
            if let Some(choice) = (1..=max).find(|n| n.to_string() == answer) {
                return Ok(choice);
            }
            self.failure(&format!("无效选择，请输入1-{max}"))?;
        }
    }

    // 主菜单：已有代理时可取消或重新设置，否则只能设置
    pub fn choose_action(&mut self, has_proxy: bool) -> Result<MenuAction, ProxyError> {
        self.line("\n🎯 请选择操作:")?;
        if has_proxy {
            self.line("1. 取消当前代理设置")?;
            self.line("2. 重新设置代理")?;
            self.line("3. 退出")?;
            Ok(match self.choose("\n请输入选择 (1-3): ", 3)? {
                1 => MenuAction::Unset,
                2 => MenuAction::Set,
                _ => MenuAction::Exit,
            })
        } else {
            self.line("1. 设置代理")?;
            self.line("2. 退出")?;
            Ok(match self.choose("\n请输入选择 (1-2): ", 2)? {
                1 => MenuAction::Set,
                _ => MenuAction::Exit,
            })
        }
    }

    // 读取地址，空输入使用默认值；validate 不通过时重新提示
    pub fn ask_address(
        &mut self,
        message: &str,
        default: &str,
        validate: impl Fn(&str) -> Result<(), ProxyError>,
    ) -> Result<String, ProxyError> {
        loop {
            let answer = self.ask(message)?;
            let address = if answer.is_empty() {
                default.to_string()
            } else {
                answer
            };

            match validate(&address) {
                Ok(()) => return Ok(address),
                Err(e) => self.failure(&e.to_string())?,
            }
        }
    }

    pub fn wait_enter(&mut self, message: &str) -> Result<(), ProxyError> {
        self.ask(message).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompt(input: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output_of(prompt: Prompt<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8_lossy(&prompt.into_output()).to_string()
    }

    #[test]
    fn test_choose_loops_until_valid() {
        let mut p = prompt("abc\n0\n4\n+1\n01\n002\n 2 \n");
        assert_eq!(p.choose("请输入选择 (1-3): ", 3).unwrap(), 2);

        let output = output_of(p);
        assert_eq!(output.matches("无效选择，请输入1-3").count(), 6);
    }

    #[test]
    fn test_choose_action_depends_on_current_state() {
        let mut p = prompt("1\n");
        assert_eq!(p.choose_action(true).unwrap(), MenuAction::Unset);

        let mut p = prompt("1\n");
        assert_eq!(p.choose_action(false).unwrap(), MenuAction::Set);

        let mut p = prompt("3\n2\n");
        assert_eq!(p.choose_action(false).unwrap(), MenuAction::Exit);
        assert!(output_of(p).contains("无效选择，请输入1-2"));
    }

    #[test]
    fn test_end_of_input_is_interruption() {
        let mut p = prompt("9\n");
        assert!(matches!(p.choose("> ", 2), Err(ProxyError::Interrupted)));
    }

    #[test]
    fn test_ask_address_uses_default_and_revalidates() {
        let mut p = prompt("\n");
        let address = p.ask_address("> ", "127.0.0.1:10808", |_| Ok(())).unwrap();
        assert_eq!(address, "127.0.0.1:10808");

        let mut p = prompt("bad\n10.0.0.1:8080\n");
        let address = p
            .ask_address("> ", "127.0.0.1:10808", |a| {
                if a.contains(':') {
                    Ok(())
                } else {
                    Err(ProxyError::InvalidAddress(a.to_string()))
                }
            })
            .unwrap();
        assert_eq!(address, "10.0.0.1:8080");
        assert!(output_of(p).contains("代理地址格式无效：bad"));
    }
}
