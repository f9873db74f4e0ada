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

pub struct MiseSource {
    bin: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl MiseSource {
    pub fn new(bin: PathBuf, runner: Arc<dyn CommandRunner>) -> Self {
        Self { bin, runner }
    }

    fn bin_str(&self) -> String {
        self.bin.to_string_lossy().into_owned()
    }
}

/// 解析 `mise outdated` 的输出。
///
/// 输出是按空白分列的表格:
///   Tool    Requested  Current  Latest
///   node    lts        20.11.0  20.12.2
/// 表头、mise 自身的提示行和不描述版本变化的行都会被静默跳过。
pub fn parse_outdated_output(output: &str) -> Vec<PackageUpdate> {
    output
        .lines()
        .filter_map(|line| {
            if line.starts_with("mise ") || line.contains("up to date") {
                return None;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 4 {
                return None;
            }

            let name = parts[0];
            let current = parts[2];
            let new = parts[3];

            // 当前版本列允许 [MISSING]（已配置但未安装），其余情况两个
            // 版本列都必须带数字，借此过滤表头和噪音行
            let current_ok =
                current.chars().any(|c| c.is_ascii_digit()) || current == "[MISSING]";
            let new_ok = new.chars().any(|c| c.is_ascii_digit());
            if !current_ok || !new_ok {
                return None;
            }

            Some(PackageUpdate {
                name: name.to_string(),
                current_version: current.to_string(),
                new_version: new.to_string(),
                source: SourceKind::Mise,
            })
        })
        .collect()
}

#[async_trait]
impl UpdateSource for MiseSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Mise
    }

    async fn check_available(&self) -> Result<bool> {
        Ok(self.runner.run(&self.bin_str(), &["--version"]).await.is_ok())
    }

    async fn check_outdated(&self) -> Result<Vec<PackageUpdate>> {
        debug!("执行 mise outdated");

        let bin = self.bin_str();
        let output = timeout(CHECK_TIMEOUT, self.runner.run(&bin, &["outdated"]))
            .await
            .map_err(|_| MupError::CommandTimeout {
                source_name: "mise".to_string(),
                command: "outdated".to_string(),
            })??;

        let updates = parse_outdated_output(&output);
        debug!("mise 可更新包: {} 个", updates.len());

        Ok(updates)
    }

    async fn upgrade_all(&self, tx: mpsc::UnboundedSender<String>) -> Result<StreamOutcome> {
        info!("mise upgrade");
        self.runner.stream(&self.bin_str(), &["upgrade"], tx).await
    }
}
