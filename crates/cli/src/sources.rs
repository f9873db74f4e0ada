use mup_brew::BrewSource;
use mup_core::config::SourcePaths;
use mup_core::runner::CommandRunner;
use mup_core::source::UpdateSource;
use mup_mise::MiseSource;
use std::sync::Arc;

pub const SOURCE_NAMES: [&str; 2] = ["mise", "brew"];

/// 创建单个更新源实例
pub fn create_source(
    name: &str,
    paths: &SourcePaths,
    runner: Arc<dyn CommandRunner>,
) -> Option<Arc<dyn UpdateSource>> {
    match name {
        "mise" => Some(Arc::new(MiseSource::new(paths.mise_bin.clone(), runner))),
        "brew" => Some(Arc::new(BrewSource::new(paths.brew_bin.clone(), runner))),
        _ => None,
    }
}

/// 创建全部更新源，返回顺序即检查与安装的执行顺序
pub fn create_sources(
    paths: &SourcePaths,
    runner: Arc<dyn CommandRunner>,
) -> Vec<Arc<dyn UpdateSource>> {
    SOURCE_NAMES
        .iter()
        .filter_map(|name| create_source(name, paths, runner.clone()))
        .collect()
}
