use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use mup_cli::sources::{create_source, create_sources, SOURCE_NAMES};
use mup_core::config::SourcePaths;
use mup_core::runner::{CommandRunner, ShellRunner};
use mup_core::session::UpdateSession;
use mup_core::state::AppState;
use mup_core::update::{PackageUpdate, SourceKind};
use std::io::Write;
use std::sync::Arc;

const EXIT_USAGE: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "mup", version = env!("CARGO_PKG_VERSION"), about = "mise/Homebrew 更新助手")]
struct Cli {
    #[arg(short, long, global = true)]
    json: bool,

    #[arg(short, long, global = true)]
    verbose: bool,

    /// 只操作指定的更新源（mise 或 brew）
    #[arg(short, long, global = true)]
    source: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 检查有哪些包可以更新
    Check,
    /// 检查并安装全部可用更新
    Upgrade {
        /// 跳过确认直接安装
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化 tracing
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let paths = SourcePaths::from_env();
    let runner: Arc<dyn CommandRunner> = Arc::new(ShellRunner);

    let sources = match cli.source.as_deref() {
        Some(name) => match create_source(name, &paths, runner) {
            Some(source) => vec![source],
            None => {
                eprintln!(
                    "{}",
                    format!(
                        "错误: 未知的更新源 '{}'，可用: {}",
                        name,
                        SOURCE_NAMES.join(", ")
                    )
                    .bright_red()
                );
                std::process::exit(EXIT_USAGE);
            }
        },
        None => create_sources(&paths, runner),
    };
    let session = UpdateSession::new(sources);

    match cli.command {
        Commands::Check => cmd_check(&session, cli.json).await,
        Commands::Upgrade { yes } => cmd_upgrade(&session, cli.json, yes).await,
    }
}

async fn cmd_check(session: &UpdateSession, json: bool) -> Result<()> {
    if !json {
        println!("{}", "检查更新中...".bright_cyan());
    }

    match session.check_for_updates().await {
        AppState::Updates(updates) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&updates)?);
            } else {
                print_updates(&updates);
            }
        }
        _ => {
            if json {
                println!("{}", serde_json::json!({ "updates": [] }));
            } else {
                println!("{}", "✓ 所有包都是最新版本".bright_green());
            }
        }
    }

    Ok(())
}

async fn cmd_upgrade(session: &UpdateSession, json: bool, yes: bool) -> Result<()> {
    if !json {
        println!("{}", "检查更新中...".bright_cyan());
    }

    let updates = match session.check_for_updates().await {
        AppState::Updates(updates) => updates,
        _ => {
            if json {
                println!("{}", serde_json::json!({ "status": "up-to-date" }));
            } else {
                println!("{}", "✓ 所有包都是最新版本".bright_green());
            }
            return Ok(());
        }
    };

    if !json {
        print_updates(&updates);
        if !yes && !confirm("确认安装以上更新?")? {
            println!("已取消");
            return Ok(());
        }
    }

    let mut final_log: Vec<String> = Vec::new();
    let mut on_state = |state: AppState| match state {
        AppState::Installing { progress, log } => {
            // 会话每发一次状态日志恰好多一行，打印最后一行即可
            if !json {
                if let Some(line) = log.last() {
                    println!(
                        "{} {}",
                        format!("[{:>3.0}%]", progress * 100.0).bright_blue(),
                        line
                    );
                }
            }
        }
        AppState::Done { log } => {
            final_log = log;
        }
        _ => {}
    };
    session.install_updates(&updates, &mut on_state).await;

    if json {
        println!(
            "{}",
            serde_json::json!({ "status": "done", "log": final_log })
        );
    } else {
        println!("{}", "✓ 更新完成".bright_green());
    }

    Ok(())
}

fn print_updates(updates: &[PackageUpdate]) {
    for kind in [SourceKind::Mise, SourceKind::Brew] {
        let group: Vec<&PackageUpdate> =
            updates.iter().filter(|u| u.source == kind).collect();
        if group.is_empty() {
            continue;
        }

        println!(
            "{}",
            format!("{} {} ({})", kind.icon(), kind.as_str().bright_cyan(), group.len()).bold()
        );
        for pkg in group {
            println!("  {} {}", "•".bright_yellow(), pkg.name.bright_white());
            println!("    当前: {}", pkg.current_version.dimmed());
            println!("    最新: {}", pkg.new_version.bright_green());
        }
        println!();
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim(), "y" | "Y" | "yes"))
}
