//! TUI application state
//!
//! Owns the device list presenter and the endpoint detail pane, maps key
//! actions onto them and runs the event loop.

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use model::{
    DetailChange, DetailPane, DeviceListPresenter, DeviceSource, SelectionEvent, selection_channel,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::events::{Action, Event, EventHandler};
use super::ui;

/// One visible line of the device tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeRow {
    /// Device group header
    Device(usize),
    /// Interface row under an expanded device
    Interface { group: usize, child: usize },
}

/// Current dialog/popup being displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    /// No dialog open
    None,
    /// Help dialog showing keybindings
    Help,
}

/// Application state
pub struct App<S> {
    presenter: DeviceListPresenter<S>,
    detail: DetailPane,
    selection_rx: mpsc::UnboundedReceiver<SelectionEvent>,
    /// Index into the visible rows
    cursor: usize,
    dialog: Dialog,
    should_quit: bool,
    last_refresh: Instant,
}

impl<S: DeviceSource> App<S> {
    /// Create the app and show the initial device list
    pub fn new(source: S) -> Self {
        let (coordinator, selection_rx) = selection_channel();
        let mut presenter = DeviceListPresenter::new(coordinator);
        presenter.start(source);

        let mut app = Self {
            presenter,
            detail: DetailPane::new(),
            selection_rx,
            cursor: 0,
            dialog: Dialog::None,
            should_quit: false,
            last_refresh: Instant::now(),
        };
        app.drain_selection_events();
        app
    }

    pub fn presenter(&self) -> &DeviceListPresenter<S> {
        &self.presenter
    }

    pub fn detail(&self) -> &DetailPane {
        &self.detail
    }

    pub fn dialog(&self) -> Dialog {
        self.dialog
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Time since the device list was last rebuilt
    pub fn since_refresh(&self) -> Duration {
        self.last_refresh.elapsed()
    }

    /// Rows currently shown in the tree, honoring group expansion
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        for (group, device) in self.presenter.snapshot().groups().iter().enumerate() {
            rows.push(TreeRow::Device(group));
            if self.presenter.is_expanded(group) {
                rows.extend(
                    (0..device.interfaces.len()).map(|child| TreeRow::Interface { group, child }),
                );
            }
        }
        rows
    }

    /// Row under the cursor
    pub fn cursor_row(&self) -> Option<TreeRow> {
        self.visible_rows().get(self.cursor).copied()
    }

    /// Handle user action
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                if self.dialog != Dialog::None {
                    self.dialog = Dialog::None;
                } else {
                    self.should_quit = true;
                }
            }
            Action::Deselect => {
                if self.dialog != Dialog::None {
                    self.dialog = Dialog::None;
                } else {
                    self.presenter.deselect();
                }
            }
            Action::Up => {
                if self.dialog == Dialog::None {
                    self.cursor = self.cursor.saturating_sub(1);
                }
            }
            Action::Down => {
                if self.dialog == Dialog::None {
                    let count = self.visible_rows().len();
                    if self.cursor + 1 < count {
                        self.cursor += 1;
                    }
                }
            }
            Action::Activate => {
                if self.dialog == Dialog::None {
                    self.activate();
                }
            }
            Action::ShowHelp => {
                self.dialog = Dialog::Help;
            }
            Action::Refresh => {
                self.refresh();
            }
            Action::None => {}
        }

        self.drain_selection_events();
    }

    fn activate(&mut self) {
        match self.cursor_row() {
            Some(TreeRow::Device(group)) => {
                self.presenter.toggle_group(group);
                debug!(
                    "Device group {} {}",
                    group,
                    if self.presenter.is_expanded(group) {
                        "expanded"
                    } else {
                        "collapsed"
                    }
                );
            }
            Some(TreeRow::Interface { group, child }) => {
                self.presenter.activate_child(group, child);
            }
            None => {}
        }
    }

    /// Re-enumerate devices and rebuild the tree
    pub fn refresh(&mut self) {
        if self.presenter.refresh() {
            self.last_refresh = Instant::now();
        }
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let count = self.visible_rows().len();
        if self.cursor >= count {
            self.cursor = count.saturating_sub(1);
        }
    }

    /// Apply pending selection events to the detail pane
    pub fn drain_selection_events(&mut self) {
        for change in self.detail.sync(&mut self.selection_rx) {
            if change != DetailChange::Unchanged {
                debug!("Detail pane: {:?}", change);
            }
        }
    }

    /// Detach the device source
    pub fn shutdown(&mut self) -> Option<S> {
        self.presenter.stop()
    }
}

/// Terminal wrapper for setup/teardown
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    /// Create and initialize the terminal
    pub fn new() -> Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    /// Enter TUI mode (raw mode, alternate screen)
    pub fn enter(&mut self) -> Result<()> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Exit TUI mode (restore terminal state)
    pub fn exit(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Draw the UI
    pub fn draw<S: DeviceSource>(&mut self, app: &App<S>) -> Result<()> {
        self.terminal.draw(|frame| {
            ui::render(frame, app);
        })?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Best effort cleanup
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Run the TUI application until the user quits
pub async fn run<S: DeviceSource>(source: S, tick_rate: Duration) -> Result<()> {
    let mut tui = Tui::new()?;
    tui.enter()?;

    let mut app = App::new(source);
    let mut events = EventHandler::new(tick_rate);
    info!("TUI started");

    loop {
        if let Err(e) = tui.draw(&app) {
            error!("Failed to draw UI: {:#}", e);
            break;
        }

        match events.next().await {
            Some(Event::Key(key)) => app.handle_action(Action::from(key)),
            // Layout is recomputed on the next draw
            Some(Event::Resize(width, height)) => {
                debug!("Terminal resized to {}x{}", width, height);
            }
            Some(Event::Tick) => app.drain_selection_events(),
            None => break,
        }

        if app.should_quit() {
            break;
        }
    }

    app.shutdown();
    tui.exit()?;
    info!("TUI stopped");

    Ok(())
}
