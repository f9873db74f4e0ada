use crate::progress::Progress;
use crate::source::UpdateSource;
use crate::state::{AppState, RollingLog};
use crate::update::PackageUpdate;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// 串起"检查更新"和"安装更新"两个阶段的会话。
///
/// 所有状态都通过调用方提供的回调按顺序发出，回调所在的一侧
/// 就是唯一的"UI 线程"：会话内部没有并发写者，状态转移严格单向。
/// 每次回调前日志恰好新增一行，渲染方只需关心最后一行。
pub struct UpdateSession {
    sources: Vec<Arc<dyn UpdateSource>>,
}

impl UpdateSession {
    pub fn new(sources: Vec<Arc<dyn UpdateSource>>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &[Arc<dyn UpdateSource>] {
        &self.sources
    }

    /// 依次执行各更新源的 outdated 检查并汇总结果。
    ///
    /// 某个源不可用或检查失败不会中断整体流程，只会少报该源的更新。
    /// 汇总为空时视为全部都是最新版本。
    pub async fn check_for_updates(&self) -> AppState {
        let mut updates = Vec::new();

        for source in &self.sources {
            let available = match source.check_available().await {
                Ok(available) => available,
                Err(err) => {
                    warn!("检查 {} 可用性失败: {}", source.name(), err);
                    false
                }
            };
            if !available {
                warn!("{} 不可用，跳过检查", source.name());
                continue;
            }

            match source.check_outdated().await {
                Ok(mut list) => {
                    info!("{} 可更新包: {} 个", source.name(), list.len());
                    updates.append(&mut list);
                }
                Err(err) => {
                    warn!("检查 {} 更新失败: {}", source.name(), err);
                }
            }
        }

        if updates.is_empty() {
            AppState::UpToDate
        } else {
            AppState::Updates(updates)
        }
    }

    /// 安装给定的更新，按更新源分组依次执行，组与组之间没有并发。
    ///
    /// 进度按步数计算：每个有待更新包的源算一步，该源的升级命令结束后
    /// 前进一步。命令的每行输出都进入滚动日志并触发一次 Installing 状态。
    /// 启动失败折叠为日志里的一行错误文本，不产生独立的错误状态，
    /// 也不重试；所有组跑完后无条件转移到 Done。
    pub async fn install_updates(
        &self,
        updates: &[PackageUpdate],
        on_state: &mut (dyn FnMut(AppState) + Send),
    ) {
        let groups: Vec<Arc<dyn UpdateSource>> = self
            .sources
            .iter()
            .filter(|source| updates.iter().any(|u| u.source == source.kind()))
            .cloned()
            .collect();

        let mut progress = Progress::new(groups.len());
        let mut log = RollingLog::new();

        log.push("开始更新...");
        on_state(AppState::Installing {
            progress: progress.value(),
            log: log.snapshot(),
        });

        for source in groups {
            log.push(format!(
                "{} 正在更新 {} 包...",
                source.kind().icon(),
                source.name()
            ));
            on_state(AppState::Installing {
                progress: progress.value(),
                log: log.snapshot(),
            });

            let (tx, mut rx) = mpsc::unbounded_channel();
            let task_source = source.clone();
            let handle = tokio::spawn(async move { task_source.upgrade_all(tx).await });

            // 发送端随升级任务结束而关闭，这里一定能读完全部输出
            while let Some(line) = rx.recv().await {
                log.push(line);
                on_state(AppState::Installing {
                    progress: progress.value(),
                    log: log.snapshot(),
                });
            }

            match handle.await {
                Ok(Ok(outcome)) if outcome.success => {
                    info!("{} 更新完成", source.name());
                    log.push(format!("✅ {} 更新完成", source.name()));
                }
                Ok(Ok(outcome)) => {
                    warn!("{} 升级退出异常: {:?}", source.name(), outcome.exit_code);
                    log.push(format!(
                        "⚠ {} 升级退出码 {}",
                        source.name(),
                        outcome.exit_code.unwrap_or(-1)
                    ));
                }
                Ok(Err(err)) => {
                    warn!("启动 {} 升级失败: {}", source.name(), err);
                    log.push(format!("⚠ 启动 {} 升级失败: {}", source.name(), err));
                }
                Err(err) => {
                    warn!("{} 升级任务异常: {}", source.name(), err);
                    log.push(format!("⚠ {} 升级任务异常: {}", source.name(), err));
                }
            }

            progress.advance();
            on_state(AppState::Installing {
                progress: progress.value(),
                log: log.snapshot(),
            });
        }

        log.push("✅ 完成!");
        on_state(AppState::Done {
            log: log.snapshot(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::StreamOutcome;
    use crate::state::MAX_LOG_LINES;
    use crate::update::SourceKind;
    use async_trait::async_trait;
    use mup_error::{MupError, Result};

    struct FakeSource {
        kind: SourceKind,
        available: bool,
        outdated: Vec<PackageUpdate>,
        upgrade_lines: Vec<String>,
        launch_error: bool,
    }

    impl FakeSource {
        fn new(kind: SourceKind) -> Self {
            Self {
                kind,
                available: true,
                outdated: Vec::new(),
                upgrade_lines: Vec::new(),
                launch_error: false,
            }
        }

        fn with_outdated(mut self, names: &[&str]) -> Self {
            self.outdated = names
                .iter()
                .map(|name| PackageUpdate {
                    name: name.to_string(),
                    current_version: "1.0.0".to_string(),
                    new_version: "2.0.0".to_string(),
                    source: self.kind,
                })
                .collect();
            self
        }

        fn with_upgrade_lines(mut self, lines: &[&str]) -> Self {
            self.upgrade_lines = lines.iter().map(|s| s.to_string()).collect();
            self
        }
    }

    #[async_trait]
    impl UpdateSource for FakeSource {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        async fn check_available(&self) -> Result<bool> {
            Ok(self.available)
        }

        async fn check_outdated(&self) -> Result<Vec<PackageUpdate>> {
            Ok(self.outdated.clone())
        }

        async fn upgrade_all(
            &self,
            tx: mpsc::UnboundedSender<String>,
        ) -> Result<StreamOutcome> {
            if self.launch_error {
                return Err(MupError::CommandLaunch {
                    source_name: self.name().to_string(),
                    command: "upgrade".to_string(),
                    message: "No such file or directory".to_string(),
                });
            }
            for line in &self.upgrade_lines {
                let _ = tx.send(line.clone());
            }
            Ok(StreamOutcome {
                success: true,
                exit_code: Some(0),
            })
        }
    }

    fn session(sources: Vec<FakeSource>) -> UpdateSession {
        UpdateSession::new(
            sources
                .into_iter()
                .map(|s| Arc::new(s) as Arc<dyn UpdateSource>)
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_check_up_to_date_when_both_sources_empty() {
        let session = session(vec![
            FakeSource::new(SourceKind::Mise),
            FakeSource::new(SourceKind::Brew),
        ]);

        assert_eq!(session.check_for_updates().await, AppState::UpToDate);
    }

    #[tokio::test]
    async fn test_check_concatenates_in_source_order() {
        let session = session(vec![
            FakeSource::new(SourceKind::Mise).with_outdated(&["node"]),
            FakeSource::new(SourceKind::Brew).with_outdated(&["git", "wget"]),
        ]);

        let AppState::Updates(updates) = session.check_for_updates().await else {
            panic!("应该返回 Updates 状态");
        };
        let names: Vec<&str> = updates.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["node", "git", "wget"]);
        assert_eq!(updates[0].source, SourceKind::Mise);
        assert_eq!(updates[1].source, SourceKind::Brew);
    }

    #[tokio::test]
    async fn test_check_skips_unavailable_source() {
        let mut brew = FakeSource::new(SourceKind::Brew).with_outdated(&["git"]);
        brew.available = false;
        let session = session(vec![
            FakeSource::new(SourceKind::Mise).with_outdated(&["node"]),
            brew,
        ]);

        let AppState::Updates(updates) = session.check_for_updates().await else {
            panic!("应该返回 Updates 状态");
        };
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].name, "node");
    }

    #[tokio::test]
    async fn test_install_emits_monotonic_progress_and_done() {
        let session = session(vec![
            FakeSource::new(SourceKind::Mise)
                .with_outdated(&["node"])
                .with_upgrade_lines(&["mise: upgrading node", "mise: done"]),
            FakeSource::new(SourceKind::Brew)
                .with_outdated(&["git"])
                .with_upgrade_lines(&["brew: upgrading git"]),
        ]);

        let AppState::Updates(updates) = session.check_for_updates().await else {
            panic!("应该返回 Updates 状态");
        };

        let mut states = Vec::new();
        session
            .install_updates(&updates, &mut |state| states.push(state))
            .await;

        let mut last_progress = 0.0_f64;
        for state in &states[..states.len() - 1] {
            let AppState::Installing { progress, log } = state else {
                panic!("中间状态都应该是 Installing");
            };
            assert!((0.0..=1.0).contains(progress));
            assert!(*progress >= last_progress, "进度不允许回退");
            assert!(log.len() <= MAX_LOG_LINES);
            last_progress = *progress;
        }

        let AppState::Done { log } = states.last().unwrap() else {
            panic!("最终状态应该是 Done");
        };
        assert_eq!(last_progress, 1.0);
        assert_eq!(log.last().unwrap(), "▸ ✅ 完成!");
        assert!(log.iter().any(|l| l.contains("mise: upgrading node")));
    }

    #[tokio::test]
    async fn test_install_launch_failure_folded_into_done_log() {
        let mut mise = FakeSource::new(SourceKind::Mise).with_outdated(&["node"]);
        mise.launch_error = true;
        let session = session(vec![mise]);

        let updates = vec![PackageUpdate {
            name: "node".to_string(),
            current_version: "1.0.0".to_string(),
            new_version: "2.0.0".to_string(),
            source: SourceKind::Mise,
        }];

        let mut states = Vec::new();
        session
            .install_updates(&updates, &mut |state| states.push(state))
            .await;

        let AppState::Done { log } = states.last().unwrap() else {
            panic!("最终状态应该是 Done");
        };
        assert!(log.iter().any(|l| l.contains("启动 mise 升级失败")));
    }

    #[tokio::test]
    async fn test_install_log_stays_bounded() {
        let lines: Vec<String> = (0..15).map(|i| format!("upgrading step {}", i)).collect();
        let line_refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
        let session = session(vec![FakeSource::new(SourceKind::Mise)
            .with_outdated(&["node"])
            .with_upgrade_lines(&line_refs)]);

        let updates = vec![PackageUpdate {
            name: "node".to_string(),
            current_version: "1.0.0".to_string(),
            new_version: "2.0.0".to_string(),
            source: SourceKind::Mise,
        }];

        let mut states = Vec::new();
        session
            .install_updates(&updates, &mut |state| states.push(state))
            .await;

        for state in &states {
            let log = match state {
                AppState::Installing { log, .. } => log,
                AppState::Done { log } => log,
                other => panic!("意外状态: {:?}", other),
            };
            assert!(log.len() <= MAX_LOG_LINES);
        }

        // 尾部两行是组的收尾和整体收尾，前面是最后的输出行
        let AppState::Done { log } = states.last().unwrap() else {
            panic!("最终状态应该是 Done");
        };
        assert_eq!(log.len(), MAX_LOG_LINES);
        assert_eq!(log[log.len() - 2], "▸ ✅ mise 更新完成");
        assert_eq!(log[log.len() - 1], "▸ ✅ 完成!");
        assert_eq!(log[log.len() - 3], "▸ upgrading step 14");
    }

    #[tokio::test]
    async fn test_install_runs_inside_spawned_task() {
        // 回调跨线程送状态，整个安装流程放进 tokio::spawn 的任务里执行
        let session = Arc::new(session(vec![FakeSource::new(SourceKind::Mise)
            .with_outdated(&["node"])
            .with_upgrade_lines(&["mise: upgrading node"])]));

        let updates = vec![PackageUpdate {
            name: "node".to_string(),
            current_version: "1.0.0".to_string(),
            new_version: "2.0.0".to_string(),
            source: SourceKind::Mise,
        }];

        let (tx, mut rx) = mpsc::unbounded_channel();
        let task_session = session.clone();
        let handle = tokio::spawn(async move {
            let mut on_state = move |state: AppState| {
                let _ = tx.send(state);
            };
            task_session.install_updates(&updates, &mut on_state).await;
        });

        let mut last = None;
        while let Some(state) = rx.recv().await {
            last = Some(state);
        }
        handle.await.unwrap();

        assert!(matches!(last, Some(AppState::Done { .. })));
    }
}
