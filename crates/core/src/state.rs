use crate::update::PackageUpdate;
use std::collections::VecDeque;

/// 滚动日志保留的最大行数
pub const MAX_LOG_LINES: usize = 10;

/// 每行日志的显示前缀
pub const LOG_MARKER: &str = "▸ ";

/// 应用的整体状态，同一时刻只有一个状态存活。
///
/// 状态转移是单向的：
/// Loading → UpToDate 或 Loading → Updates → Installing → Done
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Loading,
    UpToDate,
    Updates(Vec<PackageUpdate>),
    Installing { progress: f64, log: Vec<String> },
    Done { log: Vec<String> },
}

/// 固定容量的滚动日志，超出容量时从最旧一行开始丢弃
#[derive(Debug, Clone, Default)]
pub struct RollingLog {
    lines: VecDeque<String>,
}

impl RollingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一行并加上显示前缀
    pub fn push(&mut self, line: impl AsRef<str>) {
        self.lines
            .push_back(format!("{}{}", LOG_MARKER, line.as_ref()));
        while self.lines.len() > MAX_LOG_LINES {
            self.lines.pop_front();
        }
    }

    /// 把一段原始输出按行拆开后逐行追加
    pub fn push_chunk(&mut self, chunk: &str) {
        for line in chunk.lines() {
            self.push(line);
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 当前日志内容的快照，最旧的行在前
    pub fn snapshot(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }
}
