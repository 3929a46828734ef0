// proxy-switch
//
// Git 代理与系统代理的交互式设置工具。两个命令行入口互不依赖，
// 共享命令执行、交互提示、日志与配置。

pub mod command;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod git_proxy;
pub mod logger;
pub mod prompt;
pub mod system_proxy;

use anyhow::{Context, Result};
use command::SystemRunner;
use config::Settings;
use error::ProxyError;
use git_proxy::GitProxyManager;
use prompt::Prompt;
use std::io;
use std::process::ExitCode;
use std::rc::Rc;
use system_proxy::SystemProxyManager;

// Git 代理设置工具入口
pub fn git_cli() -> ExitCode {
    launch(|settings| {
        let manager = GitProxyManager::new(SystemRunner, settings.git_program.as_str());
        let mut prompt = Prompt::new(io::stdin().lock(), io::stdout());
        git_proxy::session::run(&manager, &settings.default_endpoint, &mut prompt)
    })
}

// 系统代理设置工具入口
pub fn system_cli() -> ExitCode {
    launch(|settings| {
        let manager = SystemProxyManager::new(Rc::new(SystemRunner));
        let mut prompt = Prompt::new(io::stdin().lock(), io::stdout());

        system_proxy::session::check_privileges(
            manager.platform(),
            system_proxy::session::is_elevated(),
            &mut prompt,
        )?;
        system_proxy::session::run(&manager, &settings.default_endpoint, &mut prompt)
    })
}

fn launch<F>(session: F) -> ExitCode
where
    F: FnOnce(&Settings) -> Result<(), ProxyError> + Send + 'static,
{
    let settings = Settings::from_env();
    logger::init_logger(&settings.log_filter);
    log::debug!("运行配置：{:?}", settings);

    let outcome = run_interruptible(settings, session);
    ExitCode::from(report_outcome(&outcome))
}

// 在阻塞线程上运行交互会话，同时监听 Ctrl+C
fn run_interruptible<F>(settings: Settings, session: F) -> Result<Result<(), ProxyError>>
where
    F: FnOnce(&Settings) -> Result<(), ProxyError> + Send + 'static,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("无法创建运行时")?;

    let outcome = runtime.block_on(async move {
        let task = tokio::task::spawn_blocking(move || session(&settings));

        let interrupted = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::warn!("无法监听 Ctrl+C 信号：{}", e);
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            joined = task => joined.context("交互会话异常结束"),
            () = interrupted => {
                log::info!("收到 Ctrl+C 信号");
                Ok(Err(ProxyError::Interrupted))
            }
        }
    });

    // 会话线程可能阻塞在标准输入上，不等待其结束
    runtime.shutdown_background();
    outcome
}

// 输出结束信息并返回进程退出码
pub fn report_outcome(outcome: &Result<Result<(), ProxyError>>) -> u8 {
    match outcome {
        Ok(Ok(())) => 0,
        Ok(Err(ProxyError::Interrupted)) => {
            println!("\n\n👋 用户取消操作，再见！");
            0
        }
        Ok(Err(e @ ProxyError::MissingDependency(_))) => {
            log::error!("{}", e);
            println!("❌ 错误: {e}");
            1
        }
        Ok(Err(e)) => {
            log::error!("{}", e);
            println!("\n❌ 发生错误: {e}");
            1
        }
        Err(e) => {
            log::error!("{:#}", e);
            println!("\n❌ 发生错误: {e:#}");
            1
        }
    }
}
