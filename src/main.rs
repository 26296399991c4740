use anyhow::{Context, Result};
use clap::Parser;
use clash_select::prompt::Terminal;
use clash_select::{commands, Cli, Feature, RunConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // 配置错误在任何网络请求之前报告
    let config = RunConfig::from_cli(cli)?;
    println!("{}", config.banner());

    let mut term = Terminal::stdio();
    match config.feature {
        Feature::Select => {
            println!("> Selecting Nodes\n");
            commands::select::run(&config, &mut term)
                .await
                .context("节点选择中止")?;
        }
        Feature::DelayTest => {
            println!("> Doing Delay Test\n");
            commands::delay::run(&config, &mut term)
                .await
                .context("延迟测试中止")?;
        }
    }

    Ok(())
}

/// 日志输出到 stderr, 过滤规则取自 CLASH_LOG
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("CLASH_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}
