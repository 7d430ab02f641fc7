/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数；日志写到 stderr，stdout 只输出表格
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则默认 `warn`，详细模式下为 `debug`
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 学期 {}", config.term);
    info!("📊 最大并发数: {}", config.max_concurrent_requests());
    info!("🌐 镜像: {}", config.instances.join(", "));
    info!("{}", "=".repeat(60));
}

/// 记录课程列表信息
pub fn log_courses_listed(study_direction: &str, total: usize) {
    info!("✓ 学习方向 {} 共 {} 门课程", study_direction, total);
    info!("📋 开始并发抓取排课数据");
}

/// 记录抓取完成统计
///
/// # 参数
/// - `total`: 任务总数
/// - `with_dates`: 含排课数据的课程数
/// - `unique`: 去重后的日期数
pub fn log_fetch_complete(total: usize, with_dates: usize, unique: usize) {
    info!("{}", "─".repeat(60));
    info!("✓ 抓取完成: {}/{} 门课程含排课数据", with_dates, total);
    info!("📅 去重后共 {} 个日期", unique);
    info!("{}", "─".repeat(60));
}
