mod fetch;
mod render;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use latency_core::{Command, Dashboard, POLL_INTERVAL_MS};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;

type SharedDashboard = Rc<RefCell<Dashboard>>;

fn main() -> io::Result<()> {
    let dashboard: SharedDashboard = Rc::new(RefCell::new(Dashboard::new()));

    install_error_handler(dashboard.clone());
    start_polling(dashboard.clone());

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let dashboard = dashboard.clone();
        move |event| match event.code {
            ratzilla::event::KeyCode::Left | ratzilla::event::KeyCode::Up => {
                dashboard.borrow_mut().select_previous();
            }
            ratzilla::event::KeyCode::Right | ratzilla::event::KeyCode::Down => {
                dashboard.borrow_mut().select_next();
            }
            ratzilla::event::KeyCode::Char('s') => {
                dashboard.borrow_mut().toggle_sort();
            }
            ratzilla::event::KeyCode::Enter => {
                let command = dashboard
                    .borrow()
                    .selected_marker()
                    .map(|marker| marker.on_click.clone());
                if let Some(command) = command {
                    dispatch(&dashboard, command);
                }
            }
            _ => {}
        }
    });

    terminal.draw_web(move |f| render::draw(&dashboard.borrow(), f));

    Ok(())
}

/// First cycle right away, then one every interval regardless of earlier cycles.
fn start_polling(dashboard: SharedDashboard) {
    spawn_local(poll_cycle(dashboard.clone()));

    let Some(window) = web_sys::window() else {
        return;
    };

    let tick = Closure::<dyn FnMut()>::new(move || {
        spawn_local(poll_cycle(dashboard.clone()));
    });
    let period = i32::try_from(POLL_INTERVAL_MS).unwrap_or(i32::MAX);

    if let Err(error) = window
        .set_interval_with_callback_and_timeout_and_arguments_0(tick.as_ref().unchecked_ref(), period)
    {
        web_sys::console::error_2(&"Failed to start polling".into(), &error);
    }
    tick.forget();
}

async fn poll_cycle(dashboard: SharedDashboard) {
    dashboard.borrow_mut().begin_cycle();

    let result = fetch::fetch_snapshot().await;
    match &result {
        Ok(snapshot) => web_sys::console::log_1(
            &format!(
                "Fetched {} regions, {} latencies",
                snapshot.regions.len(),
                snapshot.latencies.len()
            )
            .into(),
        ),
        Err(error) => {
            web_sys::console::error_1(&format!("Error fetching data: {error}").into());
        }
    }

    dashboard.borrow_mut().apply_cycle(result);
}

fn dispatch(dashboard: &SharedDashboard, command: Command) {
    match command {
        Command::ShowTraceroute(code) => {
            dashboard.borrow_mut().show_traceroute(&code);
            spawn_local(load_traceroute(dashboard.clone(), code));
        }
    }
}

async fn load_traceroute(dashboard: SharedDashboard, code: String) {
    let result = fetch::fetch_traceroute(&code).await;
    if let Err(error) = &result {
        web_sys::console::error_1(&format!("Error fetching traceroute data: {error}").into());
    }
    dashboard.borrow_mut().apply_traceroute(&code, result);
}

/// Routes uncaught page errors into the dashboard's error line and suppresses the
/// browser's own reporting.
fn install_error_handler(dashboard: SharedDashboard) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let handler = Closure::<dyn FnMut(JsValue) -> bool>::new(move |message: JsValue| {
        let message = message
            .as_string()
            .unwrap_or_else(|| format!("{message:?}"));
        web_sys::console::error_1(&format!("Uncaught error: {message}").into());

        // The error may have been thrown while the dashboard was borrowed.
        if let Ok(mut dashboard) = dashboard.try_borrow_mut() {
            dashboard.report_uncaught(&message);
        }
        true
    });

    window.set_onerror(Some(handler.as_ref().unchecked_ref()));
    handler.forget();
}
