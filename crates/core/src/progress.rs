/// 按步数计算的安装进度。
///
/// 总步数等于有待更新包的更新源数量，每个源的升级命令结束后前进一步，
/// 因此进度是精确值而非估算。取值始终落在 [0, 1] 且单调不减。
#[derive(Debug, Clone)]
pub struct Progress {
    completed: usize,
    total: usize,
    value: f64,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        // 没有任何步骤时视为已完成
        let value = if total == 0 { 1.0 } else { 0.0 };
        Self {
            completed: 0,
            total,
            value,
        }
    }

    /// 完成一步；超出总步数时封顶在 1.0
    pub fn advance(&mut self) {
        self.completed = self.completed.saturating_add(1);
        let next = if self.total == 0 {
            1.0
        } else {
            (self.completed as f64 / self.total as f64).min(1.0)
        };
        self.value = self.value.max(next);
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}
