// ==========================================
// AirPlus 工艺流程聚合 - 命令行入口
// ==========================================
// 子命令:
//   export   加载三源数据,聚合并导出 JSON
//   summary  输出流程指标 + 缺件 + 6M 归因 + 数据质量（JSON）
//   serve    启动 HTTP 服务
// ==========================================

use airplus_workflow::api::{ApiError, WorkflowApi};
use airplus_workflow::app::{self, AppState};
use airplus_workflow::config::{config_keys, get_default_config_path, ConfigManager};
use airplus_workflow::i18n::{self, t, t_with_args};
use airplus_workflow::logging::{self, LogFormat};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "airplus-workflow", version, about = "MES / ERP / PLM 工艺流程聚合")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// 配置文件路径（JSON 键值）
    #[arg(long, global = true, env = "AIRPLUS_WORKFLOW_CONFIG")]
    config: Option<PathBuf>,

    /// JSON 格式日志
    #[arg(long, global = true)]
    log_json: bool,

    /// 界面语言（zh-CN / en）
    #[arg(long, global = true, default_value = "zh-CN")]
    lang: String,
}

/// 三个数据源路径覆写
#[derive(Args, Debug)]
struct SourceArgs {
    /// MES 工序日志
    #[arg(long)]
    mes: Option<PathBuf>,

    /// ERP 人员名册
    #[arg(long)]
    erp: Option<PathBuf>,

    /// PLM 物料清单
    #[arg(long)]
    plm: Option<PathBuf>,

    /// 行错误策略（skip / abort）
    #[arg(long)]
    on_row_error: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 聚合并导出流程 JSON
    Export {
        #[command(flatten)]
        sources: SourceArgs,

        /// 输出路径
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 输出流程指标、缺件与数据质量汇总
    Summary {
        #[command(flatten)]
        sources: SourceArgs,

        /// 排行截断数量
        #[arg(long)]
        top: Option<usize>,
    },

    /// 启动 HTTP 服务
    Serve {
        /// 监听地址
        #[arg(long)]
        bind: Option<String>,
    },
}

fn load_config(global: &GlobalArgs) -> Result<ConfigManager> {
    let path = global.config.clone().unwrap_or_else(get_default_config_path);
    let config = ConfigManager::new(&path)
        .with_context(|| format!("无法加载配置文件: {}", path.display()))?;

    match config.origin() {
        Some(origin) => tracing::info!(
            "{}",
            t_with_args("cli.config_loaded", &[("path", &origin.display().to_string())])
        ),
        None => tracing::info!("{}", t("cli.config_default")),
    }
    Ok(config)
}

fn apply_sources(config: &mut ConfigManager, sources: &SourceArgs) {
    let overrides = [
        (config_keys::MES_PATH, &sources.mes),
        (config_keys::ERP_PATH, &sources.erp),
        (config_keys::PLM_PATH, &sources.plm),
    ];
    for (key, value) in overrides {
        if let Some(path) = value {
            config.set_override(key, path.display().to_string());
        }
    }
    if let Some(policy) = &sources.on_row_error {
        config.set_override(config_keys::ROW_ERROR_POLICY, policy.clone());
    }
}

fn run_export(mut config: ConfigManager, sources: SourceArgs, output: Option<PathBuf>) -> Result<()> {
    apply_sources(&mut config, &sources);
    tracing::debug!(config = %config.get_config_snapshot(), "生效配置");

    let api = WorkflowApi::new(Arc::new(config));
    let response = api.export(output)?;

    println!(
        "{}",
        t_with_args("cli.export_done", &[("path", &response.output_path)])
    );
    println!(
        "{}",
        t_with_args(
            "cli.export_stats",
            &[
                ("stages", &response.stages.to_string()),
                ("entries", &response.entries.to_string()),
                ("employees", &response.employees.to_string()),
                ("parts", &response.parts.to_string()),
            ],
        )
    );
    if response.dq_summary.rejected > 0 {
        eprintln!(
            "{}",
            t_with_args(
                "cli.dq_rejected",
                &[
                    ("rejected", &response.dq_summary.rejected.to_string()),
                    ("total", &response.dq_summary.total_rows.to_string()),
                ],
            )
        );
    }
    Ok(())
}

fn run_summary(mut config: ConfigManager, sources: SourceArgs, top: Option<usize>) -> Result<()> {
    apply_sources(&mut config, &sources);
    if let Some(top) = top {
        config.set_override(config_keys::RANKING_LIMIT, top.to_string());
    }

    let api = WorkflowApi::new(Arc::new(config));
    let summary = api.summary()?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run_serve(mut config: ConfigManager, bind: Option<String>) -> Result<()> {
    use airplus_workflow::config::WorkflowConfigReader;

    if let Some(bind) = bind {
        config.set_override(config_keys::BIND_ADDR, bind);
    }
    let bind_addr = config.bind_addr();
    let state = Arc::new(AppState::new(Arc::new(config)));

    let runtime = tokio::runtime::Runtime::new().context("无法创建 tokio 运行时")?;
    tracing::info!("{}", t_with_args("cli.server_starting", &[("addr", &bind_addr)]));
    runtime.block_on(app::serve(state, &bind_addr))?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = if cli.global.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    logging::init_with_format(format);
    i18n::set_locale(&cli.global.lang);

    tracing::info!("{} v{}", airplus_workflow::APP_NAME, airplus_workflow::VERSION);

    let config = load_config(&cli.global)?;

    let result = match cli.command {
        Commands::Export { sources, output } => run_export(config, sources, output),
        Commands::Summary { sources, top } => run_summary(config, sources, top),
        Commands::Serve { bind } => run_serve(config, bind),
    };

    // 输入数据问题以退出码 2 区分于运行期故障
    if let Some(api_err) = result.as_ref().err().and_then(|e| e.downcast_ref::<ApiError>()) {
        if api_err.is_input_error() {
            let hint = match api_err {
                ApiError::SchemaError(_) => t("error.schema"),
                ApiError::DataError(_) => t("error.data"),
                _ => String::new(),
            };
            tracing::error!(error = %api_err, "{}", hint);
            eprintln!("{}", api_err);
            std::process::exit(2);
        }
    }
    result
}
