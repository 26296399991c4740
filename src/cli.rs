use clap::Parser;

const ENV_HELP: &str = "\
Environment variables (overridden by command line arguments):

    CLASH_PORT          Clash external controller port. If not specified,
                        9090, 9091, 19090, 19091 will be tried sequentially.
    CLASH_ADDR          Clash external controller address. Defaults to 127.0.0.1.
    CLASH_SCHEME        Clash external controller scheme. Defaults to http.
    CLASH_GROUPS        Which groups to select from. Can be group names or
                        group indexes (starts from 0), separated by commas.
                        E.g. \"My Proxy,Video Media,3\".
    CLASH_TEST_URL      Delay test URL. Defaults to
                        connectivitycheck.gstatic.com/generate_204 .
    CLASH_LOG           Log filter for diagnostics on stderr (e.g. debug).";

#[derive(Parser, Debug)]
#[command(name = "clash-select", version)]
#[command(about = "Clash 代理组节点选择与延迟测试工具", long_about = None)]
#[command(after_help = ENV_HELP)]
pub struct Cli {
    /// Clash external controller port [env: CLASH_PORT]
    #[arg(short = 'p', value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Clash external controller address [env: CLASH_ADDR] [default: 127.0.0.1]
    #[arg(short = 'a')]
    pub addr: Option<String>,

    /// Clash external controller scheme, http/https [env: CLASH_SCHEME] [default: http]
    #[arg(short = 'e')]
    pub scheme: Option<String>,

    /// Delay test URL [env: CLASH_TEST_URL]
    #[arg(short = 'u')]
    pub test_url: Option<String>,

    /// (Select) 节点选择功能, 默认功能
    #[arg(short = 's')]
    pub select: bool,

    /// (delay Test) 延迟测试功能, 只能指定一个代理组
    #[arg(short = 't')]
    pub delay_test: bool,

    /// 输出调试日志到 stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// 代理组名称或序号 (从 0 开始)
    #[arg(value_name = "GROUP")]
    pub groups: Vec<String>,
}
