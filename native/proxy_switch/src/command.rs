// 外部命令执行器
//
// 同步执行外部程序并捕获输出。无论进程启动失败还是退出码非零，
// 都以 CommandOutput 的形式返回，调用方只检查 success 标志。

use std::process::Command;

// 命令执行结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    // 退出码为 0
    pub success: bool,
    // 标准输出（已去除首尾空白）
    pub stdout: String,
    // 标准错误（已去除首尾空白），启动失败时为错误描述
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> CommandOutput;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &str, args: &[&str]) -> CommandOutput {
        (**self).run(program, args)
    }
}

// 直接调用操作系统进程的执行器
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> CommandOutput {
        let command_line = display_command(program, args);
        log::debug!("执行命令：{}", command_line);

        let output = match Command::new(program).args(args).output() {
            Ok(o) => o,
            Err(e) => {
                log::debug!("无法启动命令 {}：{}", command_line, e);
                return CommandOutput::failure(format!("执行 {} 失败：{}", program, e));
            }
        };

        let result = CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        };

        if !result.success {
            log::debug!(
                "命令 {} 执行失败（{}）：{}",
                command_line,
                output.status,
                result.stderr
            );
        }

        result
    }
}

// 将命令格式化为便于阅读的单行文本，含空格的参数加引号
pub fn display_command(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            line.push('"');
            line.push_str(arg);
            line.push('"');
        } else {
            line.push_str(arg);
        }
    }
    line
}
