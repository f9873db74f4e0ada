use crate::runner::StreamOutcome;
use crate::update::{PackageUpdate, SourceKind};
use async_trait::async_trait;
use mup_error::Result;
use tokio::sync::mpsc;

/// 一个包管理器更新源（mise 或 brew）
#[async_trait]
pub trait UpdateSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// 检查更新源的可执行文件是否可用
    async fn check_available(&self) -> Result<bool>;

    /// 列出有新版本的包。
    /// 解析永远不会失败：无法识别的输出行被静默跳过，
    /// 空输出或全部被跳过时返回空列表。
    async fn check_outdated(&self) -> Result<Vec<PackageUpdate>>;

    /// 升级该源的全部包，逐行转发命令输出。
    /// 升级命令不设超时，返回前必须回收子进程。
    async fn upgrade_all(&self, tx: mpsc::UnboundedSender<String>) -> Result<StreamOutcome>;
}
