use anyhow::Result;
use auto_scrape::app::{self, App, SettingsUpdate};
use auto_scrape::models::{OutputFormat, RunStatus};
use auto_scrape::utils::logging;
use auto_scrape::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(
    name = "auto-scrape",
    about = "自动抓取课程测验的反馈题目",
    version,
    propagate_version = true
)]
struct Cli {
    /// 题目数据文件
    #[arg(long, global = true, env = "DATA_FILE")]
    data_file: Option<PathBuf>,

    /// 设置文件
    #[arg(long, global = true, env = "SETTINGS_FILE")]
    settings_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 从当前标签页开始自动抓取
    Run {
        /// 导航后等待时间（毫秒），覆盖设置文件
        #[arg(long)]
        navigation_delay_ms: Option<String>,

        /// 展开反馈后等待时间（毫秒），覆盖设置文件
        #[arg(long)]
        feedback_delay_ms: Option<String>,

        /// 日志语言（en / vi）
        #[arg(long)]
        language: Option<String>,

        /// 启动无头浏览器而不是连接已有浏览器
        #[arg(long)]
        headless: bool,

        /// 浏览器调试端口
        #[arg(long, env = "BROWSER_DEBUG_PORT")]
        port: Option<u16>,
    },

    /// 抓取当前标签页上已展开的题目并追加到数据文件
    Scrape {
        /// 浏览器调试端口
        #[arg(long, env = "BROWSER_DEBUG_PORT")]
        port: Option<u16>,
    },

    /// 导出累积的题目
    Export {
        /// normal / formatted / json，默认取设置文件
        #[arg(long)]
        format: Option<OutputFormat>,

        /// 输出文件，省略时打印到标准输出
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// 清空累积的题目
    Clear,

    /// 查看或修改设置
    Settings {
        #[arg(long)]
        navigation_delay_ms: Option<String>,

        #[arg(long)]
        feedback_delay_ms: Option<String>,

        #[arg(long)]
        language: Option<String>,

        #[arg(long)]
        default_format: Option<OutputFormat>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(path) = cli.data_file {
        config.data_file = path;
    }
    if let Some(path) = cli.settings_file {
        config.settings_file = path;
    }

    match cli.command {
        Commands::Run {
            navigation_delay_ms,
            feedback_delay_ms,
            language,
            headless,
            port,
        } => {
            config.headless |= headless;
            if let Some(port) = port {
                config.browser_debug_port = port;
            }

            // 命令行参数只作用于本次运行，不写回设置文件
            let mut settings = app::load_settings(&config).await?;
            SettingsUpdate {
                navigation_delay_ms,
                feedback_delay_ms,
                language,
                default_format: None,
            }
            .apply(&mut settings);

            let app = App::initialize(config).await?;
            let snapshot = app.run_scrape(settings.scrape).await?;
            if snapshot.status == RunStatus::Failed {
                error!(
                    "运行失败: {}",
                    snapshot.last_error.as_deref().unwrap_or_default()
                );
                std::process::exit(1);
            }
        }
        Commands::Scrape { port } => {
            if let Some(port) = port {
                config.browser_debug_port = port;
            }
            let app = App::initialize(config).await?;
            let total = app.scrape_current().await?;
            println!("{}", total);
        }
        Commands::Export { format, output } => {
            let text = app::export_questions(&config, format, output.as_deref()).await?;
            if output.is_none() {
                print!("{}", text);
            }
        }
        Commands::Clear => {
            app::clear_questions(&config).await?;
        }
        Commands::Settings {
            navigation_delay_ms,
            feedback_delay_ms,
            language,
            default_format,
        } => {
            let settings = app::update_settings(
                &config,
                SettingsUpdate {
                    navigation_delay_ms,
                    feedback_delay_ms,
                    language,
                    default_format,
                },
            )
            .await?;
            print!("{}", toml::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}
