// 系统代理设置工具

use std::process::ExitCode;

fn main() -> ExitCode {
    proxy_switch::system_cli()
}
