// 代理操作错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    // 外部依赖缺失（致命，进程以退出码 1 结束）
    #[error("未找到 {0}，请确保已正确安装并添加到 PATH 环境变量中")]
    MissingDependency(String),

    // git 配置写入失败，不回滚已成功的写入
    #[error("设置 {key} 代理失败：{message}")]
    GitConfigWrite { key: &'static str, message: String },

    #[error("写入注册表失败：{0}")]
    Registry(String),

    #[error("获取网络服务列表失败：{0}")]
    NetworkServices(String),

    #[error("没有任何网络服务设置成功")]
    NoServiceUpdated,

    #[error("代理地址格式无效：{0}（应为 主机:端口）")]
    InvalidAddress(String),

    #[error("不支持的操作系统：{0}")]
    UnsupportedPlatform(String),

    // 用户中断（Ctrl+C 或输入结束）
    #[error("用户取消操作")]
    Interrupted,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
