// 日志初始化
//
// 日志统一输出到 stderr，避免与交互式菜单的 stdout 混在一起。

use std::io::Write;

pub fn init_logger(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);

    let result = env_logger::Builder::from_env(env)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .try_init();

    // 重复初始化时保留已有的 logger
    if result.is_err() {
        log::debug!("日志系统已初始化，跳过");
    }
}
