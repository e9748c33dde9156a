// ==========================================
// 梳棉机保养跟踪系统 - CLI 主入口
// ==========================================
// 定位: 现场查询/维护的薄壳, 业务全部在库内
// ==========================================

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use carding_mts::api::dto::{AppendEventRequest, CheckMachineStatusRequest};
use carding_mts::app::AppState;
use carding_mts::auth::identity::{IdentityProvider, SessionIdentityProvider};
use carding_mts::config::settings::AppConfig;
use carding_mts::domain::types::{UserRole, ViewMode};
use carding_mts::i18n;
use carding_mts::store::table_store_trait::TableStore;
use carding_mts::store::xlsx_import::XlsxImporter;
use carding_mts::logging;

#[derive(Parser)]
#[command(name = "carding-mts", version, about = "梳棉机保养跟踪系统 - Bail Yarn 纺纱准备车间")]
struct Cli {
    /// 配置文件路径 (默认: 平台数据目录下 carding-mts/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 查询机台保养状态
    Lookup {
        /// 机台号
        #[arg(long)]
        card: String,

        /// 当前累计吨数
        #[arg(long)]
        tons: f64,

        /// 视图模式: current / lower / higher / custom / all
        #[arg(long, default_value = "current")]
        mode: String,

        /// 自定义范围下界 (custom 模式)
        #[arg(long)]
        from: Option<f64>,

        /// 自定义范围上界 (custom 模式)
        #[arg(long)]
        to: Option<f64>,

        /// 附带逐条历史明细
        #[arg(long)]
        history: bool,
    },

    /// 列出存在记录表的机台
    Cards,

    /// 导入旧 Excel 工作簿到表存储
    Import {
        /// 工作簿路径 (.xlsx / .xls)
        #[arg(long)]
        file: PathBuf,
    },

    /// 登录
    Login {
        #[arg(long)]
        user: String,

        #[arg(long)]
        password: String,
    },

    /// 注销当前会话
    Logout,

    /// 新增用户 (注册表非空时需要编辑权限)
    AddUser {
        #[arg(long)]
        user: String,

        #[arg(long)]
        password: String,

        /// 角色: admin / viewer
        #[arg(long, default_value = "viewer")]
        role: String,
    },

    /// 与远程副本同步
    Sync {
        /// 发布本地副本 (默认为拉取远程副本)
        #[arg(long)]
        publish: bool,
    },

    /// 追加保养记录 (需要编辑权限)
    AppendEvent {
        #[arg(long)]
        card: String,

        #[arg(long)]
        min_tons: f64,

        #[arg(long)]
        max_tons: f64,

        /// 日期 (dd/mm/YYYY)
        #[arg(long)]
        date: Option<String>,

        /// 记录时累计吨数
        #[arg(long)]
        tons: Option<f64>,

        #[arg(long)]
        technician: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// 本次完成的项目 (可重复)
        #[arg(long = "performed")]
        performed: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", carding_mts::APP_NAME);
    tracing::info!("系统版本: {}", carding_mts::VERSION);
    tracing::info!("==================================================");

    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(AppConfig::default_path);
    let config = AppConfig::load(&config_path).context("装载配置失败")?;
    tracing::info!(config = %config_path.display(), data_dir = %config.data_dir.display(), "配置就绪");

    let state = AppState::new(config);

    match cli.command {
        Command::Lookup {
            card,
            tons,
            mode,
            from,
            to,
            history,
        } => run_lookup(&state, card, tons, &mode, from, to, history),
        Command::Cards => {
            let mut cards = state.lookup_api.list_cards()?;
            cards.sort();
            println!("机台 ({}):", cards.len());
            for card in cards {
                println!("  {}", card);
            }
            Ok(())
        }
        Command::Import { file } => {
            let workbook = XlsxImporter.import(&file)?;
            state.store.save_all(&workbook)?;
            println!("已导入 {} 张表 -> {}", workbook.len(), state.config.data_dir.display());
            Ok(())
        }
        Command::Login { user, password } => {
            let registry = state.user_registry()?;
            let session = state.session_store().login(&registry, &user, &password)?;
            println!(
                "{} (有效期至 {})",
                i18n::t_with_args("auth.login_ok", &[("user", &session.user)]),
                session.expires_at.format("%d/%m/%Y %H:%M UTC")
            );
            Ok(())
        }
        Command::Logout => {
            state.session_store().logout()?;
            println!("{}", i18n::t("auth.logged_out"));
            Ok(())
        }
        Command::AddUser {
            user,
            password,
            role,
        } => run_add_user(&state, &user, &password, &role),
        Command::Sync { publish } => {
            if publish {
                let published = state.sync.publish().await?;
                println!("{} ({})", i18n::t("sync.publish_ok"), published);
            } else {
                let updated = state.sync.refresh().await?;
                println!("{} ({})", i18n::t("sync.refresh_ok"), updated);
            }
            Ok(())
        }
        Command::AppendEvent {
            card,
            min_tons,
            max_tons,
            date,
            tons,
            technician,
            notes,
            performed,
        } => {
            let table = state.config.card_table_name(&card);
            state.edit_api.append_event(&AppendEventRequest {
                card_no: card,
                min_tons,
                max_tons,
                date,
                tons_at_event: tons,
                technician,
                notes,
                performed,
            })?;
            println!("{}", i18n::t_with_args("edit.event_appended", &[("table", &table)]));
            Ok(())
        }
    }
}

/// 查询并渲染对账行表
fn run_lookup(
    state: &AppState,
    card: String,
    tons: f64,
    mode: &str,
    from: Option<f64>,
    to: Option<f64>,
    history: bool,
) -> anyhow::Result<()> {
    let Some(mode) = ViewMode::parse(mode) else {
        bail!("未知视图模式: {} (可选 current/lower/higher/custom/all)", mode);
    };

    let custom_range = match (from, to) {
        (Some(low), Some(high)) => Some((low, high)),
        _ => None,
    };

    let response = state.lookup_api.check_machine_status(&CheckMachineStatusRequest {
        card_no: card,
        current_tons: tons,
        mode,
        custom_range,
        include_history: history,
    })?;

    println!(
        "{}: Card{} @ {}t [{}]",
        i18n::t("lookup.result_title"),
        response.card_no,
        response.current_tons,
        response.mode
    );

    if let Some(message) = &response.message {
        println!("  {}", message);
    }

    if !response.rows.is_empty() {
        println!(
            "{:<16} | {:<28} | {:<28} | {:<28} | {:<12} | {:<10} | {:<12} | {}",
            "档位", "应做", "已做", "未做", "最近日期", "最近吨数", "保养人", "备注"
        );
        for row in &response.rows {
            println!(
                "{:<16} | {:<28} | {:<28} | {:<28} | {:<12} | {:<10} | {:<12} | {}",
                row.tier_range,
                row.required,
                row.done,
                row.outstanding,
                row.last_date,
                row.last_tons,
                row.technician,
                row.notes
            );
        }
    }

    if !response.history.is_empty() {
        println!();
        println!("历史明细:");
        for row in &response.history {
            println!(
                "  {:<16} | {:<16} | {:<12} | {:<10} | {:<28} | {:<12} | {}",
                row.tier_range,
                row.event_range,
                row.date,
                row.tons,
                row.performed,
                row.technician,
                row.notes
            );
        }
    }

    Ok(())
}

/// 新增用户; 注册表为空时允许首次初始化
fn run_add_user(state: &AppState, user: &str, password: &str, role: &str) -> anyhow::Result<()> {
    let role = match role.trim().to_lowercase().as_str() {
        "admin" => UserRole::Admin,
        "viewer" => UserRole::Viewer,
        other => bail!("未知角色: {} (可选 admin/viewer)", other),
    };

    let mut registry = state.user_registry()?;
    if registry.user_count() > 0 {
        let identity = SessionIdentityProvider::new(state.session_store());
        if !identity.is_privileged() {
            bail!("{}", i18n::t("auth.not_privileged"));
        }
    }

    registry.add_user(user, password, role)?;
    registry.save()?;
    println!("用户已创建: {} ({})", user, role);
    Ok(())
}
