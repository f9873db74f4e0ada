use async_trait::async_trait;
use mup_error::{MupError, Result};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::debug;

/// 流式命令的退出结果
#[derive(Debug, Clone, Copy)]
pub struct StreamOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
}

/// 外部命令的执行抽象。
///
/// 更新源通过显式注入的 runner 调用外部命令，而不是直接访问进程 API，
/// 测试时可以用返回固定文本的假 runner 替换。
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// 运行命令并捕获合并后的 stdout/stderr，阻塞到进程退出。
    /// 无论退出码如何都返回捕获的文本，只有进程无法启动时才返回错误。
    async fn run(&self, program: &str, args: &[&str]) -> Result<String>;

    /// 流式运行命令，每产生一行输出就通过 `tx` 发送一行。
    /// 返回前必须读完全部输出并回收子进程。
    async fn stream(
        &self,
        program: &str,
        args: &[&str],
        tx: mpsc::UnboundedSender<String>,
    ) -> Result<StreamOutcome>;
}

/// 基于 tokio 子进程的生产实现
pub struct ShellRunner;

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        debug!("执行命令: {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| MupError::CommandLaunch {
                source_name: program.to_string(),
                command: args.join(" "),
                message: e.to_string(),
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&stderr);
        }

        Ok(text)
    }

    async fn stream(
        &self,
        program: &str,
        args: &[&str],
        tx: mpsc::UnboundedSender<String>,
    ) -> Result<StreamOutcome> {
        debug!("流式执行命令: {} {}", program, args.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| MupError::CommandLaunch {
                source_name: program.to_string(),
                command: args.join(" "),
                message: e.to_string(),
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (out_result, err_result) = tokio::join!(
            forward_lines(stdout, tx.clone()),
            forward_lines(stderr, tx),
        );
        out_result?;
        err_result?;

        // 输出读完之后回收子进程，避免留下僵尸进程
        let status = child.wait().await?;

        Ok(StreamOutcome {
            success: status.success(),
            exit_code: status.code(),
        })
    }
}

async fn forward_lines<R>(reader: Option<R>, tx: mpsc::UnboundedSender<String>) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return Ok(());
    };

    let mut lines = BufReader::new(reader).lines();
    let mut forward = true;
    while let Some(line) = lines.next_line().await? {
        // 接收端关闭后继续读空管道，让子进程可以正常退出
        if forward && tx.send(line).is_err() {
            forward = false;
        }
    }

    Ok(())
}
