use crate::app::App;
use mup_core::state::AppState;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

pub mod install;
pub mod updates;

pub fn draw(f: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Min(1), Constraint::Length(1)])
    .split(f.size());

  let content_area = chunks[0];
  let hint_area = chunks[1];

  match &app.state {
    AppState::Loading => draw_message(f, content_area, "⏳ 正在检查更新...", Color::Cyan),
    AppState::UpToDate => draw_message(f, content_area, "✅ 所有包都是最新版本", Color::Green),
    AppState::Updates(list) => updates::draw_updates(f, content_area, list),
    AppState::Installing { progress, log } => {
      install::draw_installing(f, content_area, *progress, log)
    }
    AppState::Done { log } => install::draw_done(f, content_area, log),
  }

  draw_hint(f, hint_area, &app.state);
}

fn draw_message(f: &mut Frame, area: Rect, message: &str, color: Color) {
  // 垂直居中放一行提示
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Percentage(45),
      Constraint::Length(1),
      Constraint::Min(0),
    ])
    .split(area);

  let paragraph = Paragraph::new(Line::from(message))
    .style(Style::default().fg(color))
    .alignment(Alignment::Center);
  f.render_widget(paragraph, rows[1]);
}

fn draw_hint(f: &mut Frame, area: Rect, state: &AppState) {
  let hint = match state {
    AppState::Loading => "请稍候...  [q] 退出",
    AppState::UpToDate => "[Enter/q] 退出",
    AppState::Updates(_) => "[Enter] 安装全部  [q/Esc] 稍后再说",
    AppState::Installing { .. } => "安装进行中，暂不可退出",
    AppState::Done { .. } => "[Enter/q] 退出",
  };

  let paragraph = Paragraph::new(Line::from(hint)).style(Style::default().fg(Color::DarkGray));
  f.render_widget(paragraph, area);
}
