//! # lipidsaxs - SAXS 峰检测与脂质相识别命令行工具
//!
//! ## 子命令
//! - `find` - 检测曲线中的 Bragg 峰
//! - `identify` - 从峰列表识别相
//! - `analyze` - 完整流程，支持批量目录
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     └── lipidsaxs 库 (parsers, detect, phase, export)
//!   ├── batch/      (批量文件处理)
//!   └── utils/      (终端输出与进度条)
//! ```

mod batch;
mod cli;
mod commands;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        if e.is_configuration() {
            utils::output::print_info("Check the command line options (see --help)");
        }
        std::process::exit(1);
    }
}
