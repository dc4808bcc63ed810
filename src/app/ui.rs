//! UI rendering for the TUI

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
};

use super::state::{AppState, DetailState, Mode, View};
use crate::models::status_emoji;
use crate::theme::{Theme, ThemeColors};

const ICON: &str = "🧪";

/// Spinner animation frames
const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Main render function
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let colors = state.theme.colors();

    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(colors.bg)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_tabs(frame, state, &colors, chunks[0]);
    render_main(frame, state, &colors, chunks[1]);
    render_status_bar(frame, state, &colors, chunks[2]);

    match state.mode {
        Mode::Help => render_help_popup(frame, &colors),
        Mode::ThemePicker => render_theme_picker(frame, state, &colors),
        Mode::About => render_about_dialog(frame, &colors),
        Mode::Normal => {}
    }
}

fn render_tabs(frame: &mut Frame, state: &AppState, colors: &ThemeColors, area: Rect) {
    let titles: Vec<Line> = [View::Characters, View::Favorites]
        .into_iter()
        .map(|view| {
            let marker = if state.view == view { "●" } else { "○" };
            Line::from(format!("{marker}  {}", view.name()))
        })
        .collect();

    let selected = match state.view {
        View::Characters => 0,
        View::Favorites => 1,
    };

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(colors.block())
                .title(format!(" {ICON} rickdex "))
                .title_style(colors.logo_style_primary()),
        )
        .select(selected)
        .style(colors.tab())
        .highlight_style(colors.tab_active())
        .divider(Span::styled(" │ ", colors.text_muted()));

    frame.render_widget(tabs, area);
}

fn render_main(frame: &mut Frame, state: &mut AppState, colors: &ThemeColors, area: Rect) {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    // Borders take two rows
    state.list_height = horizontal[0].height.saturating_sub(2) as usize;

    match state.view {
        View::Characters => render_character_list(frame, state, colors, horizontal[0]),
        View::Favorites => render_favorite_list(frame, state, colors, horizontal[0]),
    }

    match &state.detail {
        Some(detail) => {
            render_detail(frame, detail, state.current_tick(), colors, horizontal[1]);
        }
        None => render_detail_placeholder(frame, colors, horizontal[1]),
    }
}

fn list_block<'a>(title: String, focused: bool, colors: &ThemeColors) -> Block<'a> {
    Block::default()
        .title(title)
        .title_style(colors.text_primary())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            colors.block_focus()
        } else {
            colors.block()
        })
}

fn hint_lines<'a>(
    icon: &'a str,
    message: &'a str,
    key: &'a str,
    action: &'a str,
    colors: &ThemeColors,
) -> Vec<ListItem<'a>> {
    vec![
        ListItem::new(Line::from("")),
        ListItem::new(Line::from(vec![
            Span::styled(format!("  {icon} "), colors.text_warning()),
            Span::styled(message, colors.text_muted()),
        ])),
        ListItem::new(Line::from("")),
        ListItem::new(Line::from(vec![
            Span::styled("  Press ", colors.text_dim()),
            Span::styled(key, colors.key_hint()),
            Span::styled(action, colors.text_dim()),
        ])),
    ]
}

fn render_character_list(
    frame: &mut Frame,
    state: &mut AppState,
    colors: &ThemeColors,
    area: Rect,
) {
    let title = format!(" 👥 Characters ({}) ", state.characters.len());
    let block = list_block(title, state.detail.is_none(), colors);

    let items: Vec<ListItem> = if state.characters.is_empty() {
        if let Some(error) = &state.characters_error {
            let mut items =
                hint_lines("⚠", "Could not load characters", "[r]", " to retry", colors);
            items.insert(
                2,
                ListItem::new(Line::styled(format!("  {error}"), colors.text_error())),
            );
            items
        } else {
            vec![ListItem::new(Line::from(vec![
                Span::styled("  ", Style::default()),
                Span::styled("⏳ Loading...", colors.text_muted()),
            ]))]
        }
    } else {
        let mut items: Vec<ListItem> = state
            .characters
            .iter()
            .map(|character| {
                ListItem::new(Line::from(vec![
                    Span::raw(format!(" {} ", status_emoji(&character.status))),
                    Span::styled(character.name.clone(), colors.text()),
                    Span::styled(format!("  {}", character.species), colors.text_muted()),
                ]))
            })
            .collect();

        if state.characters_loading {
            let spinner = SPINNER[(state.current_tick() / 2) as usize % SPINNER.len()];
            items.push(ListItem::new(Line::styled(
                format!(" {spinner} Loading more..."),
                colors.text_muted(),
            )));
        }
        items
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(colors.selected())
        .highlight_symbol("▸");

    frame.render_stateful_widget(list, area, &mut state.character_list);
}

fn render_favorite_list(
    frame: &mut Frame,
    state: &mut AppState,
    colors: &ThemeColors,
    area: Rect,
) {
    let title = format!(" ★ Favorites ({}) ", state.favorites.len());
    let block = list_block(title, state.detail.is_none(), colors);

    let items: Vec<ListItem> = if state.favorites_empty {
        hint_lines("☆", "No favorites yet", "[f]", " on a character to add one", colors)
    } else {
        state
            .favorites
            .iter()
            .map(|record| {
                ListItem::new(Line::from(vec![
                    Span::styled(" ★ ", colors.favorite()),
                    Span::styled(record.name.clone(), colors.text()),
                    Span::styled(
                        format!("  {}", record.updated_at.format("%Y-%m-%d")),
                        colors.text_muted(),
                    ),
                ]))
            })
            .collect()
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(colors.selected())
        .highlight_symbol("▸");

    frame.render_stateful_widget(list, area, &mut state.favorite_list);
}

fn field<'a>(label: &'a str, value: &'a str, colors: &ThemeColors) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {label:<10}"), colors.text_muted()),
        Span::styled(value, colors.text()),
    ])
}

fn render_detail(
    frame: &mut Frame,
    detail: &DetailState,
    tick: u64,
    colors: &ThemeColors,
    area: Rect,
) {
    let character = &detail.character;

    let favorite = match detail.is_favorite {
        Some(true) => Span::styled("★ favorite", colors.favorite()),
        Some(false) => Span::styled("☆ not a favorite", colors.text_muted()),
        None => Span::styled("…", colors.text_muted()),
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                character.name.clone(),
                colors.text_primary().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            favorite,
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {:<10}", "Status"), colors.text_muted()),
            Span::styled(
                format!("{} {}", character.status_emoji(), character.status),
                colors.status(&character.status),
            ),
        ]),
        field("Species", &character.species, colors),
        field("Gender", &character.gender, colors),
        field("Origin", &character.origin_name, colors),
        field("Location", &character.location_name, colors),
        Line::from(""),
        Line::from(Span::styled(
            format!("  Episodes ({})", character.episode.len()),
            colors.text_primary().add_modifier(Modifier::BOLD),
        )),
    ];

    if detail.episodes_loading {
        let spinner = SPINNER[(tick / 2) as usize % SPINNER.len()];
        lines.push(Line::styled(
            format!("  {spinner} Loading episodes..."),
            colors.text_muted(),
        ));
    } else if let Some(error) = &detail.episode_error {
        lines.push(Line::styled(format!("  ❌ {error}"), colors.text_error()));
    } else {
        let mut season = None;
        for episode in &detail.episodes {
            if episode.season() != season {
                season = episode.season();
                if let Some(number) = season {
                    lines.push(Line::styled(format!("  Season {number}"), colors.text_dim()));
                }
            }
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<8}", episode.episode), colors.key_hint()),
                Span::styled(episode.name.clone(), colors.text()),
                Span::styled(format!("  {}", episode.air_date), colors.text_muted()),
            ]));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(list_block(" 📋 Detail ".to_string(), true, colors))
        .wrap(Wrap { trim: false })
        .scroll((detail.scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_detail_placeholder(frame: &mut Frame, colors: &ThemeColors, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", colors.text_dim()),
            Span::styled("[Enter]", colors.key_hint()),
            Span::styled(" to open a character", colors.text_dim()),
        ]),
    ];

    let paragraph =
        Paragraph::new(lines).block(list_block(" 📋 Detail ".to_string(), false, colors));
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, state: &AppState, colors: &ThemeColors, area: Rect) {
    let loading_indicator = if state.is_loading() {
        let frame_idx = (state.current_tick() / 2) as usize % SPINNER.len();
        format!("{} ", SPINNER[frame_idx])
    } else {
        String::new()
    };

    let content = if state.status.is_empty() {
        vec![
            Span::raw(" "),
            Span::styled(loading_indicator, colors.text_primary()),
            Span::styled("Tab", colors.key_hint()),
            Span::styled(": views  ", colors.text_muted()),
            Span::styled("Enter", colors.key_hint()),
            Span::styled(": detail  ", colors.text_muted()),
            Span::styled("f", colors.key_hint()),
            Span::styled(": favorite  ", colors.text_muted()),
            Span::styled("?", colors.key_hint()),
            Span::styled(": help  ", colors.text_muted()),
            Span::styled("q", colors.key_hint()),
            Span::styled(": quit", colors.text_muted()),
        ]
    } else {
        vec![
            Span::raw(" "),
            Span::styled(loading_indicator, colors.text_primary()),
            Span::styled(state.status.as_str(), colors.text_primary()),
        ]
    };

    let status =
        Paragraph::new(Line::from(content)).style(Style::default().bg(colors.bg_secondary));
    frame.render_widget(status, area);
}

fn help_section<'a>(
    title: &'a str,
    keys: &[(&'a str, &'a str)],
    colors: &ThemeColors,
) -> Vec<Line<'a>> {
    let mut lines = vec![Line::from(Span::styled(
        format!("  {title}"),
        colors.text_primary().add_modifier(Modifier::BOLD),
    ))];
    lines.extend(keys.iter().map(|(key, action)| {
        Line::from(vec![
            Span::styled(format!("  {key:<17}"), colors.key_hint()),
            Span::styled(*action, colors.text()),
        ])
    }));
    lines.push(Line::from(""));
    lines
}

fn render_help_popup(frame: &mut Frame, colors: &ThemeColors) {
    let popup_area = centered_rect(50, 70, frame.area());

    frame.render_widget(Clear, popup_area);
    frame.render_widget(
        Block::default().style(Style::default().bg(colors.bg_secondary)),
        popup_area,
    );

    let mut lines = vec![Line::from("")];
    lines.extend(help_section(
        "Navigation",
        &[
            ("Tab / 1 / 2", "Switch between Characters and Favorites"),
            ("j/k or ↑/↓", "Move selection (loads more at the bottom)"),
            ("g/G", "Go to first/last character"),
            ("J/K or PgDn/PgUp", "Scroll the detail panel"),
        ],
        colors,
    ));
    lines.extend(help_section(
        "Characters",
        &[
            ("Enter", "Open detail and episodes"),
            ("Esc", "Close detail"),
            ("f", "Toggle favorite"),
            ("o", "Open image in browser"),
            ("r", "Retry / refresh favorites"),
        ],
        colors,
    ));
    lines.extend(help_section(
        "General",
        &[
            ("t / T", "Theme selector / next theme"),
            ("A", "About rickdex"),
            ("?", "Toggle this help"),
            ("q", "Quit application"),
        ],
        colors,
    ));
    lines.push(Line::from(vec![
        Span::styled("  Press ", colors.text_muted()),
        Span::styled("Esc", colors.key_hint()),
        Span::styled(" or ", colors.text_muted()),
        Span::styled("?", colors.key_hint()),
        Span::styled(" to close", colors.text_muted()),
    ]));

    let help = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(colors.block_focus())
                .style(Style::default().bg(colors.bg_secondary))
                .title(" ⌨ Keyboard Shortcuts ")
                .title_style(colors.text_primary()),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(help, popup_area);
}

fn render_theme_picker(frame: &mut Frame, state: &AppState, colors: &ThemeColors) {
    let popup_area = centered_rect(50, 70, frame.area());

    frame.render_widget(Clear, popup_area);
    frame.render_widget(Block::default().style(Style::default().bg(colors.bg)), popup_area);

    let themes = Theme::all();
    let items: Vec<ListItem> = themes
        .iter()
        .enumerate()
        .map(|(i, theme_name)| {
            let palette = theme_name.palette();
            let selected = i == state.theme_picker_index;

            let label = format!(
                "  {} {} ",
                if selected { "▸" } else { " " },
                theme_name.display_name()
            );

            let style = if selected {
                Style::default()
                    .fg(palette.accent)
                    .bg(palette.selection)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.fg).bg(colors.bg)
            };

            // Color preview squares
            ListItem::new(Line::from(vec![
                Span::styled(label, style),
                Span::styled("█", Style::default().fg(palette.accent).bg(colors.bg)),
                Span::styled("█", Style::default().fg(palette.secondary).bg(colors.bg)),
                Span::styled("█", Style::default().fg(palette.success).bg(colors.bg)),
                Span::styled("█", Style::default().fg(palette.warning).bg(colors.bg)),
            ]))
        })
        .collect();

    let theme_list = List::new(items).style(Style::default().bg(colors.bg)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.primary))
            .border_type(BorderType::Rounded)
            .style(Style::default().bg(colors.bg))
            .title(format!(
                " 🎨 Select Theme ({}/{}) ",
                state.theme_picker_index + 1,
                themes.len()
            ))
            .title_bottom(Line::from(" ↑↓ navigate │ ↵ apply │ Esc cancel ").centered()),
    );

    frame.render_widget(theme_list, popup_area);
}

fn render_about_dialog(frame: &mut Frame, colors: &ThemeColors) {
    let popup_area = centered_rect(70, 55, frame.area());

    frame.render_widget(Clear, popup_area);
    frame.render_widget(Block::default().style(Style::default().bg(colors.bg)), popup_area);

    let mut lines: Vec<Line> = crate::LOGO
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.primary))))
        .collect();

    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            "Terminal browser for the Rick and Morty character catalog",
            colors.text().add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Version: ", colors.text_muted()),
            Span::styled(crate::VERSION, colors.text_primary().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Data: ", colors.text_muted()),
            Span::styled("rickandmortyapi.com", colors.text_primary()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Built with Rust 🦀 + Ratatui",
            colors.text_muted().add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
        Line::from(vec![Span::styled(" [Esc] ", colors.text_muted()), Span::raw("Close")]),
    ]);

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(colors.primary))
            .style(Style::default().bg(colors.bg))
            .title(format!(" {ICON} About rickdex "))
            .title_style(colors.text_primary().add_modifier(Modifier::BOLD)),
    );

    frame.render_widget(paragraph, popup_area);
}

/// Helper to create a centered rect
const fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_width = r.width * percent_x / 100;
    let popup_height = r.height * percent_y / 100;
    Rect {
        x: r.x + (r.width.saturating_sub(popup_width)) / 2,
        y: r.y + (r.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{Character, Episode};
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(state: &mut AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, state)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_centered_rect() {
        let r = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(r, Rect::new(25, 10, 50, 20));
    }

    #[test]
    fn test_render_list_and_detail() {
        let mut state = AppState::new(Config::default());
        state.append_characters(&[Character::new(1, "Rick Sanchez")]);

        let mut detail = DetailState::new(Character::new(1, "Rick Sanchez"));
        detail.is_favorite = Some(true);
        detail.episodes = vec![Episode {
            id: 1,
            name: "Pilot".to_string(),
            air_date: "December 2, 2013".to_string(),
            episode: "S01E01".to_string(),
        }];
        state.detail = Some(detail);

        let screen = draw(&mut state);
        assert!(screen.contains("Rick Sanchez"));
        assert!(screen.contains("Pilot"));
        assert!(screen.contains("Season 1"));
        assert!(screen.contains("favorite"));
        assert_eq!(state.list_height, 24);
    }

    #[test]
    fn test_render_empty_favorites() {
        let mut state = AppState::new(Config::default());
        state.view = View::Favorites;
        state.set_favorites(Vec::new());

        let screen = draw(&mut state);
        assert!(screen.contains("No favorites yet"));
    }
}
