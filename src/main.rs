use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use bitmap_pack::{
    cli::{Cli, Commands},
    handler::{handle_convert, handle_preview},
};

/// 程序的主入口点
///
/// 负责解析命令行参数、初始化日志，并根据指定的子命令（`convert` 或 `preview`）
/// 将执行分派到相应的处理函数
fn main() -> ExitCode {
    // 解析命令行参数
    let cli = Cli::parse();

    // 日志统一写到标准错误，标准输出只留给生成的文本
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("bitmap_pack={log_level}").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // 根据子命令调用相应的处理函数
    let result = match cli.command {
        Commands::Convert(args) => handle_convert(args),
        Commands::Preview(args) => handle_preview(args),
    };

    if let Err(err) = result {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
