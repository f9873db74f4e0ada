use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MupError {
    #[error("命令启动失败: {source_name} '{command}': {message}")]
    CommandLaunch {
        source_name: String,
        command: String,
        message: String,
    },

    #[error("命令超时: {source_name} '{command}'")]
    CommandTimeout {
        source_name: String,
        command: String,
    },

    #[error("IO错误")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, MupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MupError::CommandLaunch {
            source_name: "mise".to_string(),
            command: "upgrade".to_string(),
            message: "No such file or directory".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "命令启动失败: mise 'upgrade': No such file or directory"
        );

        let err = MupError::CommandTimeout {
            source_name: "brew".to_string(),
            command: "outdated --verbose".to_string(),
        };
        assert_eq!(err.to_string(), "命令超时: brew 'outdated --verbose'");
    }
}
