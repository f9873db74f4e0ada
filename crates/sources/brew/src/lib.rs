use async_trait::async_trait;
use mup_core::runner::{CommandRunner, StreamOutcome};
use mup_core::source::UpdateSource;
use mup_core::update::{PackageUpdate, SourceKind};
use mup_error::{MupError, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};
use tracing::{debug, info};

const CHECK_TIMEOUT: Duration = Duration::from_secs(300);

pub struct BrewSource {
    bin: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl BrewSource {
    pub fn new(bin: PathBuf, runner: Arc<dyn CommandRunner>) -> Self {
        Self { bin, runner }
    }

    fn bin_str(&self) -> String {
        self.bin.to_string_lossy().into_owned()
    }
}

/// 解析 `brew outdated --verbose` 的输出。
///
/// 每行形如 `git (2.40.0) < 2.41.0`，比较符可以是 `<`、`<=`、`!`、`!=`。
/// 不匹配的行被静默跳过；新版本按自由文本接受，不要求带数字。
pub fn parse_outdated_output(output: &str) -> Vec<PackageUpdate> {
    output.lines().filter_map(parse_line).collect()
}

// 等价于 ^(\S+)\s+\(([^)]+)\)\s+[<!]=?\s+(.+)$ 的结构化解析
fn parse_line(line: &str) -> Option<PackageUpdate> {
    let (name, rest) = line.split_once(char::is_whitespace)?;
    if name.is_empty() {
        return None;
    }

    let rest = rest.trim_start().strip_prefix('(')?;
    let (current, rest) = rest.split_once(')')?;
    if current.is_empty() {
        return None;
    }

    // 括号和比较符之间、比较符和新版本之间都必须有空白
    let after = rest.trim_start();
    if after.len() == rest.len() {
        return None;
    }
    let after = strip_operator(after)?;
    let new = after.trim_start();
    if new.len() == after.len() || new.is_empty() {
        return None;
    }

    Some(PackageUpdate {
        name: name.to_string(),
        current_version: current.to_string(),
        new_version: new.trim_end().to_string(),
        source: SourceKind::Brew,
    })
}

fn strip_operator(s: &str) -> Option<&str> {
    s.strip_prefix("<=")
        .or_else(|| s.strip_prefix("!="))
        .or_else(|| s.strip_prefix('<'))
        .or_else(|| s.strip_prefix('!'))
}

#[async_trait]
impl UpdateSource for BrewSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Brew
    }

    async fn check_available(&self) -> Result<bool> {
        Ok(self.runner.run(&self.bin_str(), &["--version"]).await.is_ok())
    }

    async fn check_outdated(&self) -> Result<Vec<PackageUpdate>> {
        debug!("执行 brew outdated --verbose");

        let bin = self.bin_str();
        let output = timeout(
            CHECK_TIMEOUT,
            self.runner.run(&bin, &["outdated", "--verbose"]),
        )
        .await
        .map_err(|_| MupError::CommandTimeout {
            source_name: "brew".to_string(),
            command: "outdated --verbose".to_string(),
        })??;

        let updates = parse_outdated_output(&output);
        debug!("brew 可更新包: {} 个", updates.len());

        Ok(updates)
    }

    async fn upgrade_all(&self, tx: mpsc::UnboundedSender<String>) -> Result<StreamOutcome> {
        info!("brew upgrade");
        self.runner.stream(&self.bin_str(), &["upgrade"], tx).await
    }
}
