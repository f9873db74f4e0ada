use mup_core::update::PackageUpdate;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

pub fn draw_updates(f: &mut Frame, area: Rect, updates: &[PackageUpdate]) {
  let items: Vec<ListItem> = updates
    .iter()
    .map(|pkg| {
      ListItem::new(Line::from(vec![
        Span::raw(pkg.source.icon()),
        Span::raw(" "),
        Span::styled(
          pkg.name.as_str(),
          Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
          pkg.current_version.as_str(),
          Style::default().fg(Color::DarkGray),
        ),
        Span::styled(" → ", Style::default().fg(Color::DarkGray)),
        Span::styled(
          pkg.new_version.as_str(),
          Style::default().fg(Color::Green),
        ),
      ]))
    })
    .collect();

  let list = List::new(items).block(
    Block::default()
      .borders(Borders::ALL)
      .title(format!("🚀 可用更新 ({})", updates.len())),
  );
  f.render_widget(list, area);
}
