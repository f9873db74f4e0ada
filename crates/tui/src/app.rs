use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mup_core::session::UpdateSession;
use mup_core::state::AppState;
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct App {
  pub state: AppState,
  pub should_quit: bool,
  pub should_redraw: bool,
  session: Arc<UpdateSession>,
  state_tx: mpsc::UnboundedSender<AppState>,
  state_rx: mpsc::UnboundedReceiver<AppState>,
}

impl App {
  pub fn new(session: Arc<UpdateSession>) -> Self {
    let (state_tx, state_rx) = mpsc::unbounded_channel();
    Self {
      state: AppState::Loading,
      should_quit: false,
      should_redraw: true,
      session,
      state_tx,
      state_rx,
    }
  }

  /// 启动后台检查任务，结果通过状态通道送回 UI 循环
  pub fn spawn_check(&self) {
    let session = self.session.clone();
    let tx = self.state_tx.clone();
    tokio::spawn(async move {
      let state = session.check_for_updates().await;
      let _ = tx.send(state);
    });
  }

  /// 启动后台安装任务；只在 Updates 状态下有效
  fn spawn_install(&mut self) {
    let AppState::Updates(updates) = &self.state else {
      return;
    };
    let updates = updates.clone();
    let session = self.session.clone();
    let tx = self.state_tx.clone();
    tokio::spawn(async move {
      let mut on_state = move |state: AppState| {
        let _ = tx.send(state);
      };
      session.install_updates(&updates, &mut on_state).await;
    });
  }

  /// 吸收后台任务送来的状态更新
  pub fn drain_states(&mut self) {
    let mut changed = false;
    while let Ok(state) = self.state_rx.try_recv() {
      self.state = state;
      changed = true;
    }
    if changed {
      self.should_redraw = true;
    }
  }

  fn installing(&self) -> bool {
    matches!(self.state, AppState::Installing { .. })
  }

  pub fn handle_key_event(&mut self, key: KeyEvent) {
    match key.code {
      // 安装过程中不支持取消，退出键全部变成空操作
      KeyCode::Char('q') | KeyCode::Esc => {
        if !self.installing() {
          self.should_quit = true;
        }
      }
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        if !self.installing() {
          self.should_quit = true;
        }
      }
      KeyCode::Enter => match self.state {
        AppState::Updates(_) => self.spawn_install(),
        AppState::UpToDate | AppState::Done { .. } => self.should_quit = true,
        _ => {}
      },
      _ => {}
    }
  }
}
