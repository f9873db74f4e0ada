use mup_brew::BrewSource;
use mup_core::config::SourcePaths;
use mup_core::runner::CommandRunner;
use mup_core::source::UpdateSource;
use mup_mise::MiseSource;
use std::sync::Arc;

/// 创建全部更新源，顺序即检查与安装的执行顺序
pub fn create_sources(
  paths: &SourcePaths,
  runner: Arc<dyn CommandRunner>,
) -> Vec<Arc<dyn UpdateSource>> {
  vec![
    Arc::new(MiseSource::new(paths.mise_bin.clone(), runner.clone())),
    Arc::new(BrewSource::new(paths.brew_bin.clone(), runner)),
  ]
}
