//! Cookie Clicker rendering: cookie panel, tab strip, tab contents and message log.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{ClickableList, TabBar};

use super::actions::*;
use super::logic::{eligible_modifiers, format_number};
use super::state::{GameState, Producer};
use super::{CookieGame, Tab};

pub fn render(game: &CookieGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let state = &game.state;

    // Log panel on the right when wide enough
    let (main_area, log_area) = if area.width >= 80 {
        let h_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);
        (h_chunks[0], Some(h_chunks[1]))
    } else {
        (area, None)
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // cookie
            Constraint::Length(1), // tabs
            Constraint::Min(5),    // content
        ])
        .split(main_area);

    let mut cs = click_state.borrow_mut();
    render_cookie(state, f, chunks[0], &mut cs);
    render_tab_bar(game, f, chunks[1], &mut cs);
    match game.tab {
        Tab::Producers => render_producers(state, f, chunks[2], &mut cs),
        Tab::Upgrades => render_upgrades(state, f, chunks[2], &mut cs),
        Tab::Milestones => render_milestones(state, f, chunks[2]),
        Tab::Stats => render_stats(state, f, chunks[2]),
    }
    drop(cs);

    if let Some(log_area) = log_area {
        render_log(state, f, log_area);
    }
}

/// The whole panel is one big click target.
fn render_cookie(state: &GameState, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let ledger = &state.ledger;
    let borders = if is_narrow_layout(area.width) {
        Borders::TOP | Borders::BOTTOM
    } else {
        Borders::ALL
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("(●) ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{} cookies", format_number(ledger.resource_total.floor())),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(
                format!("{}/s", format_number(state.total_cps())),
                Style::default().fg(Color::Green),
            ),
            Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} per click", format_number(ledger.click_yield())),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(Span::styled(
            "[C] Click the cookie!",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
    ];

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(borders)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Cookie Clicker "),
        );
    f.render_widget(widget, area);
    cs.add_click_target(area, CLICK_COOKIE);
}

fn render_tab_bar(game: &CookieGame, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let state = &game.state;
    let ready = eligible_modifiers(&state.modifiers, &state.ledger, &state.producers).len();
    let unlocked = state.unlocked_milestone_count();
    let total = state.milestones.len();

    let (producers, upgrades, milestones, stats) = if is_narrow_layout(area.width) {
        (
            "Prod".to_string(),
            format!("Upg {}", ready),
            format!("Ach {}/{}", unlocked, total),
            "Stats".to_string(),
        )
    } else {
        let upgrades = if ready > 0 {
            format!("Upgrades ({})", ready)
        } else {
            "Upgrades".to_string()
        };
        (
            "Producers".to_string(),
            upgrades,
            format!("Achievements {}/{}", unlocked, total),
            "Stats".to_string(),
        )
    };
    let upgrades_color = if ready > 0 { Color::Yellow } else { Color::Magenta };

    TabBar::new("│")
        .tab(producers, Color::Green, game.tab == Tab::Producers, TAB_PRODUCERS)
        .tab(upgrades, upgrades_color, game.tab == Tab::Upgrades, TAB_UPGRADES)
        .tab(milestones, Color::Cyan, game.tab == Tab::Milestones, TAB_MILESTONES)
        .tab(stats, Color::Blue, game.tab == Tab::Stats, TAB_STATS)
        .render(f, area, cs);
}

fn format_payback(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if s < 60.0 => format!("{}s", s.round() as u32),
        Some(s) if s < 3600.0 => format!("{}m", (s / 60.0).round() as u32),
        Some(s) => format!("{}h", (s / 3600.0).round() as u32),
        None => "---".to_string(),
    }
}

fn render_producers(state: &GameState, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let ledger = &state.ledger;
    let global = ledger.global_multiplier;

    // Lowest payback among what can be bought right now
    let best_payback = state
        .producers
        .iter()
        .filter(|p| ledger.can_afford(p.current_cost))
        .filter_map(Producer::payback_seconds)
        .fold(f64::INFINITY, f64::min);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(format!(" Producers [1-{}] buy  ★ best value ", state.producers.len()));
    let inner = block.inner(area);
    let with_descriptions = inner.height as usize >= state.producers.len() * 2;

    let mut cl = ClickableList::new();
    for (i, p) in state.producers.iter().enumerate() {
        let affordable = ledger.can_afford(p.current_cost);
        let payback = p.payback_seconds();
        let is_best = affordable && payback.map_or(false, |s| (s - best_payback).abs() < 0.01);

        let key_style = if is_best {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else if affordable {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let text_style = if affordable {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let rate_style = if p.owned > 0 {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let roi_style = if affordable {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let marker = if is_best { "★" } else { " " };
        let mut spans = vec![
            Span::styled(format!("{}[{}] ", marker, i + 1), key_style),
            Span::styled(format!("{:<8} {:>3} ", p.kind, p.owned), text_style),
            Span::styled(format!("{}/s ", format_number(p.cps() * global)), rate_style),
            Span::styled(format!("${} ", format_number(p.current_cost)), text_style),
            Span::styled(
                format!(
                    "+{}/s {}",
                    format_number(p.next_unit_cps() * global),
                    format_payback(payback)
                ),
                roi_style,
            ),
        ];
        if p.multiplier > 1.0 {
            spans.push(Span::styled(
                format!(" x{}", p.multiplier),
                Style::default().fg(Color::Magenta),
            ));
        }

        let action = BUY_PRODUCER_BASE + i as u16;
        let row = Line::from(spans);
        let detail = Line::from(Span::styled(
            format!("     {}", p.description),
            Style::default().fg(Color::DarkGray),
        ));
        match (affordable, with_descriptions) {
            (true, true) => {
                cl.push_clickable(row, action);
                cl.push_clickable(detail, action);
            }
            (true, false) => cl.push_clickable(row, action),
            (false, true) => {
                cl.push(row);
                cl.push(detail);
            }
            (false, false) => cl.push(row),
        }
    }

    cl.register_targets(inner, false, cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_upgrades(state: &GameState, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let ledger = &state.ledger;
    let eligible = eligible_modifiers(&state.modifiers, ledger, &state.producers);
    let bought = state.modifiers.iter().filter(|m| m.purchased).count();

    let mut cl = ClickableList::new();
    if eligible.is_empty() {
        cl.push(Line::from(Span::styled(
            " No upgrades available yet.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (j, m) in eligible.iter().enumerate() {
        let affordable = ledger.can_afford(m.cost);
        let (key_style, name_style) = if affordable {
            (
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )
        } else {
            (
                Style::default().fg(Color::DarkGray),
                Style::default().fg(Color::DarkGray),
            )
        };
        let header = Line::from(vec![
            Span::styled(format!(" [{}] ", j + 1), key_style),
            Span::styled(m.name.clone(), name_style),
            Span::styled(
                format!("  ${}", format_number(m.cost)),
                Style::default().fg(if affordable { Color::Green } else { Color::Red }),
            ),
        ]);
        let detail = Line::from(Span::styled(
            format!("     {}  {}", m.effect_text(), m.description),
            Style::default().fg(Color::Cyan),
        ));

        let action = BUY_MODIFIER_BASE + j as u16;
        if affordable {
            cl.push_clickable(header, action);
            cl.push_clickable(detail, action);
        } else {
            cl.push(header);
            cl.push(detail);
        }
    }

    let locked: Vec<String> = state
        .modifiers
        .iter()
        .filter(|m| !m.purchased && !m.requirements_met(ledger, &state.producers))
        .map(|m| match m.requirement_text() {
            Some(req) => format!("  {}  (requires {})", m.name, req),
            None => format!("  {}", m.name),
        })
        .collect();
    if !locked.is_empty() {
        cl.push(Line::from(""));
        cl.push(Line::from(Span::styled(
            " Locked",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
        )));
        for text in locked {
            cl.push(Line::from(Span::styled(text, Style::default().fg(Color::DarkGray))));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(format!(" Upgrades ({}/{} bought) ", bought, state.modifiers.len()));
    let inner = block.inner(area);
    cl.register_targets(inner, true, cs);
    let widget = Paragraph::new(cl.into_lines())
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_milestones(state: &GameState, f: &mut Frame, area: Rect) {
    let lines: Vec<Line> = state
        .milestones
        .iter()
        .map(|m| {
            let (mark, style) = if m.unlocked {
                ("✔", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            } else {
                ("·", Style::default().fg(Color::DarkGray))
            };
            let reward = m
                .reward
                .map(|r| format!(" ({})", r.describe()))
                .unwrap_or_default();
            Line::from(vec![
                Span::styled(format!(" {} {}", mark, m.name), style),
                Span::styled(
                    format!("  {}{}", m.description, reward),
                    Style::default().fg(Color::Gray),
                ),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(
                    " Achievements {}/{} ",
                    state.unlocked_milestone_count(),
                    state.milestones.len()
                )),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_stats(state: &GameState, f: &mut Frame, area: Rect) {
    let ledger = &state.ledger;
    let stats = &ledger.stats;
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    let row = |name: &str, v: String| {
        Line::from(vec![
            Span::styled(format!(" {:<20}", name), label),
            Span::styled(v, value),
        ])
    };

    let lines = vec![
        row("Cookies in bank", format_number(ledger.resource_total.floor())),
        row("Cookies baked", format_number(stats.lifetime_produced.floor())),
        row("Cookies per second", format_number(state.total_cps())),
        row("Cookies per click", format_number(ledger.click_yield())),
        row("Cookie clicks", stats.total_clicks.to_string()),
        row("Buildings bought", stats.producers_bought.to_string()),
        row("Upgrades bought", stats.modifiers_bought.to_string()),
        row(
            "Achievements",
            format!("{}/{}", state.unlocked_milestone_count(), state.milestones.len()),
        ),
        row("Click power", format!("x{:.2}", ledger.click_power)),
        row("Global multiplier", format!("x{:.2}", ledger.global_multiplier)),
    ];

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(" Stats "),
    );
    f.render_widget(widget, area);
}

fn render_log(state: &GameState, f: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = state.log.len().saturating_sub(visible);

    let lines: Vec<Line> = state.log[start..]
        .iter()
        .map(|entry| {
            let style = if entry.is_important {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(" Log "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}
