use std::{
    io,
    sync::mpsc::{Receiver, TryRecvError},
    time::Duration,
};

use crossterm::event::{self, KeyCode};
use ratatui::{prelude::*, widgets::*};

use crate::{gym::GridWorld, train::Control};

use super::{
    components::{help::render_help, Component, GridView, Logs, Plots},
    tui,
    util::event_keycode,
    Update,
};

const TABS: [&str; 3] = ["Grid", "Plots", "Logs"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum State {
    #[default]
    Train,
    /// The training side hung up; keep showing the final picture
    Done,
    Quit,
}

/// The root TUI component which holds the main app state and runs the render loop
pub struct App {
    state: State,
    control: Control,
    episode: u32,
    total_episodes: u32,
    selected_tab: usize,
    show_help: bool,
    grid: GridView,
    plots: Plots,
    logs: Logs,
}

impl App {
    pub fn new(world: &GridWorld, plots: &[&'static str], episodes: u32, control: Control) -> Self {
        Self {
            state: State::default(),
            control,
            episode: 0,
            total_episodes: episodes,
            selected_tab: 0,
            show_help: false,
            grid: GridView::new(world),
            plots: Plots::new(plots, episodes),
            logs: Logs::new(),
        }
    }

    fn drain(&mut self, rx: &Receiver<Update>) {
        loop {
            match rx.try_recv() {
                Ok(Update::Step {
                    episode,
                    agent,
                    stats,
                }) => {
                    self.episode = episode;
                    self.grid.update(episode, agent, stats);
                }
                Ok(Update::Episode { episode, data }) => {
                    self.episode = episode + 1;
                    self.plots.update(episode, &data);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::info!("training finished, press q to exit");
                    self.state = State::Done;
                    break;
                }
            }
        }
    }

    fn handle_event(&mut self, event: &event::Event) {
        let consumed = match self.selected_tab {
            1 => self.plots.handle_ui_event(event),
            2 => self.logs.handle_ui_event(event),
            _ => false,
        };
        if consumed {
            return;
        }

        match event_keycode(event) {
            Some(KeyCode::Char('q')) => {
                self.control.stop();
                self.state = State::Quit;
            }
            Some(KeyCode::Char(' ')) => {
                let paused = self.control.toggle_pause();
                self.grid.set_paused(paused);
                log::info!("training {}", if paused { "paused" } else { "resumed" });
            }
            Some(KeyCode::Char('h')) => self.show_help = !self.show_help,
            Some(KeyCode::Tab) => self.selected_tab = (self.selected_tab + 1) % TABS.len(),
            _ => {}
        }
    }

    /// Initialize the terminal and run the main loop until `q` is pressed
    ///
    /// Restores the terminal on exit
    pub fn run(&mut self, rx: Receiver<Update>) -> io::Result<()> {
        let mut terminal = tui::init()?;

        while self.state != State::Quit {
            if self.state == State::Train {
                self.drain(&rx);
            }

            terminal.draw(|frame| frame.render_widget(&*self, frame.size()))?;

            if event::poll(Duration::from_millis(16))? {
                let event = event::read()?;
                self.handle_event(&event);
            }
        }

        tui::restore()
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [menu_area, main_area, progress_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);

        Tabs::new(TABS)
            .block(Block::default().padding(Padding::uniform(1)))
            .white()
            .bold()
            .highlight_style(Style::default().light_green())
            .select(self.selected_tab)
            .render(menu_area, buf);

        match self.selected_tab {
            0 => self.grid.render_ref(main_area, buf),
            1 => self.plots.render_ref(main_area, buf),
            2 => self.logs.render_ref(main_area, buf),
            _ => {}
        }

        let title = match self.state {
            State::Done => "Progress (done)",
            _ if self.control.is_paused() => "Progress (paused)",
            _ => "Progress",
        };
        let ratio = if self.total_episodes == 0 {
            1.0
        } else {
            (f64::from(self.episode) / f64::from(self.total_episodes)).min(1.0)
        };
        Gauge::default()
            .block(Block::bordered().border_type(BorderType::Rounded).title(title))
            .gauge_style(Color::Cyan)
            .ratio(ratio)
            .render(progress_area, buf);

        if self.show_help {
            render_help(area, buf, self.selected_tab);
        }
    }
}
