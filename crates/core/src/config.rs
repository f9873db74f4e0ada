use std::env;
use std::path::PathBuf;

/// 指定 mise 可执行文件路径的环境变量
pub const MISE_BIN_ENV: &str = "MISE_BIN";

/// 指定 brew 可执行文件路径的环境变量
pub const BREW_BIN_ENV: &str = "BREW_BIN";

const DEFAULT_BREW_BIN: &str = "/opt/homebrew/bin/brew";

/// 两个更新源的可执行文件路径
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub mise_bin: PathBuf,
    pub brew_bin: PathBuf,
}

impl SourcePaths {
    /// 从环境变量读取路径，未设置时回退到默认安装位置：
    /// mise 在用户目录下的 `~/.local/bin/mise`，brew 在系统固定路径。
    pub fn from_env() -> Self {
        let mise_bin = env::var_os(MISE_BIN_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_mise_bin);
        let brew_bin = env::var_os(BREW_BIN_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BREW_BIN));

        Self { mise_bin, brew_bin }
    }
}

fn default_mise_bin() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".local/bin/mise")
}
