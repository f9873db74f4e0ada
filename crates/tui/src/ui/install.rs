use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem};
use ratatui::Frame;

pub fn draw_installing(f: &mut Frame, area: Rect, progress: f64, log: &[String]) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(3), Constraint::Min(1)])
    .split(area);

  let gauge = Gauge::default()
    .block(Block::default().borders(Borders::ALL).title("⏳ 安装中"))
    .gauge_style(Style::default().fg(Color::Cyan))
    .ratio(progress.clamp(0.0, 1.0));
  f.render_widget(gauge, chunks[0]);

  draw_log(f, chunks[1], log, "日志");
}

pub fn draw_done(f: &mut Frame, area: Rect, log: &[String]) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(3), Constraint::Min(1)])
    .split(area);

  let gauge = Gauge::default()
    .block(Block::default().borders(Borders::ALL).title("✅ 完成"))
    .gauge_style(Style::default().fg(Color::Green))
    .ratio(1.0);
  f.render_widget(gauge, chunks[0]);

  draw_log(f, chunks[1], log, "日志");
}

fn draw_log(f: &mut Frame, area: Rect, log: &[String], title: &str) {
  let items: Vec<ListItem> = log
    .iter()
    .map(|line| {
      ListItem::new(Line::from(line.as_str())).style(Style::default().fg(Color::DarkGray))
    })
    .collect();

  let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
  f.render_widget(list, area);
}
