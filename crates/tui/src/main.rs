use crate::app::App;
use crate::sources::create_sources;
use anyhow::Result;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use mup_core::config::SourcePaths;
use mup_core::runner::{CommandRunner, ShellRunner};
use mup_core::session::UpdateSession;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;

mod app;
mod sources;
mod ui;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

struct TerminalGuard;

impl Drop for TerminalGuard {
  fn drop(&mut self) {
    let _ = disable_raw_mode();
    let mut stdout = stdout();
    let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
  }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
  enable_raw_mode()?;
  let mut stdout = stdout();
  execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
  let backend = CrosstermBackend::new(stdout);
  Ok(Terminal::new(backend)?)
}

#[tokio::main]
async fn main() -> Result<()> {
  let _guard = TerminalGuard;
  let mut terminal = setup_terminal()?;

  let paths = SourcePaths::from_env();
  let runner: Arc<dyn CommandRunner> = Arc::new(ShellRunner);
  let session = Arc::new(UpdateSession::new(create_sources(&paths, runner)));

  let mut app = App::new(session);
  app.spawn_check();

  loop {
    app.drain_states();
    if app.should_quit {
      break;
    }
    if app.should_redraw {
      terminal.draw(|f| ui::draw(f, &app))?;
      app.should_redraw = false;
    }

    if event::poll(INPUT_POLL_INTERVAL)? {
      if let Event::Key(key) = event::read()? {
        app.handle_key_event(key);
      }
    }
  }

  Ok(())
}
