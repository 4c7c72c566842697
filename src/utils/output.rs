//! # 美化输出工具
//!
//! 提供统一的终端输出样式：`[OK]`、`[ERR]`、`[WARN]`、`[*]`、`[SKIP]` 前缀与标题栏。
//! 库代码不打印，只有命令模块调用这里。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块使用
//! - 使用 `colored` crate

use colored::Colorize;

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印跳过消息
pub fn print_skip(msg: &str) {
    println!("{} {}", "[SKIP]".dimmed(), msg);
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// 打印分隔线
pub fn print_separator() {
    println!("{}", "─".repeat(60).dimmed());
}

/// 打印参数行（`  key : value`）
pub fn print_setting(key: &str, value: &str) {
    println!("    {:<18} {}", key.cyan(), value);
}

/// 打印当前峰检测设置
pub fn print_detector_settings(config: &lipidsaxs::detect::DetectorConfig, threshold: f64) {
    let instrument = config
        .instrument
        .map(|i| i.to_string())
        .unwrap_or_else(|| "-".to_string());
    print_setting("instrument", &instrument);
    print_setting("q window", &format!("{} - {} Å⁻¹", config.lo_q, config.hi_q));
    print_setting("amplitude cutoff", &format!("{}", threshold));
    print_setting("peak separation", &format!("{} Å⁻¹", config.min_separation));
    print_setting("strategy", &format!("{:?}", config.strategy));
    println!();
}
