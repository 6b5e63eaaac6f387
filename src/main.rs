mod catalog;
mod cookie;
mod input;
mod session;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

use catalog::Catalog;
use input::{pixel_to_cell, ClickState, InputEvent};
use session::Session;

/// Milliseconds from the page's monotonic clock.
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Map a pointer position in page pixels to a terminal cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let document = web_sys::window()?.document()?;
    // DomBackend renders the grid into a <div> directly under <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    pixel_to_cell(
        mouse_x as f64 - rect.left(),
        mouse_y as f64 - rect.top(),
        rect.width(),
        rect.height(),
        cs.terminal_cols,
        cs.terminal_rows,
    )
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let catalog = Catalog::builtin().map_err(|e| {
        web_sys::console::error_1(&format!("Cookie Clicker: bad catalog: {e}").into());
        io::Error::new(io::ErrorKind::InvalidData, e.to_string())
    })?;
    web_sys::console::log_1(
        &format!(
            "Cookie Clicker: {} producers, {} upgrades, {} achievements",
            catalog.producers.len(),
            catalog.modifiers.len(),
            catalog.milestones.len()
        )
        .into(),
    );

    let session = Rc::new(RefCell::new(Session::mount(catalog)));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    terminal.on_mouse_event({
        let session = session.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let action = {
                let cs = click_state.borrow();
                if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                    return;
                }
                dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs)
                    .and_then(|(col, row)| cs.hit_test(col, row))
            };

            if let Some(action_id) = action {
                session
                    .borrow_mut()
                    .handle_input(&InputEvent::Click(action_id));
            }
        }
    });

    terminal.on_key_event({
        let session = session.clone();
        move |key_event| {
            let key = match key_event.code {
                KeyCode::Char(c) => c,
                KeyCode::Tab => '\t',
                _ => return,
            };
            session.borrow_mut().handle_input(&InputEvent::Key(key));
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let mut session = session.borrow_mut();
            session.frame(now_ms());

            let area = f.area();
            click_state.borrow_mut().reset(area.width, area.height);
            session.render(f, area, &click_state);
        }
    });

    Ok(())
}
