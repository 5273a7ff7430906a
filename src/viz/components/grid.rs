use std::collections::BTreeSet;

use ratatui::{prelude::*, widgets::*};

use crate::{
    gym::{GridWorld, Position},
    train::TrainStats,
};

use crate::viz::util::{AGENT, BACKGROUND};

/// Live view of the grid next to the training statistics
pub struct GridView {
    size: usize,
    start: Position,
    goal: Position,
    danger: BTreeSet<Position>,
    agent: Option<Position>,
    episode: u32,
    stats: TrainStats,
    paused: bool,
}

impl GridView {
    pub fn new(world: &GridWorld) -> Self {
        Self {
            size: world.size(),
            start: world.start(),
            goal: world.goal(),
            danger: world.danger().clone(),
            agent: None,
            episode: 0,
            stats: TrainStats::default(),
            paused: false,
        }
    }

    pub fn update(&mut self, episode: u32, agent: Position, stats: TrainStats) {
        self.episode = episode;
        self.agent = Some(agent);
        self.stats = stats;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn cell_color(&self, pos: Position) -> Color {
        if Some(pos) == self.agent {
            AGENT
        } else if self.danger.contains(&pos) {
            Color::Red
        } else if pos == self.goal {
            Color::LightGreen
        } else if pos == self.start {
            Color::LightBlue
        } else {
            BACKGROUND
        }
    }

    fn grid_lines(&self) -> Vec<Line<'static>> {
        (0..self.size)
            .map(|y| {
                let cells = (0..self.size)
                    .map(|x| {
                        let color = self.cell_color(Position::new(x, y));
                        Span::styled("  ", Style::default().bg(color))
                    })
                    .collect::<Vec<_>>();
                Line::from(cells)
            })
            .collect()
    }

    fn stat_lines(&self) -> Vec<Line<'static>> {
        let min_steps = self
            .stats
            .min_steps
            .map_or_else(|| String::from("∞"), |m| m.to_string());
        let status = if self.paused { "paused" } else { "running" };
        let hazard = if self.stats.hazard_visited {
            "visited"
        } else {
            "avoided"
        };
        [
            ("Episode", (self.episode + 1).to_string()),
            ("Steps", self.stats.steps.to_string()),
            ("Min steps", min_steps),
            ("Epsilon", format!("{:.3}", self.stats.epsilon)),
            ("Hazard", String::from(hazard)),
            ("Status", String::from(status)),
        ]
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::from(format!("{label:>10}: ")).light_cyan().bold(),
                Span::raw(value),
            ])
        })
        .collect()
    }
}

impl WidgetRef for GridView {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        let [grid_area, stats_area] =
            Layout::horizontal([Constraint::Fill(2), Constraint::Fill(1)]).areas(area);

        let width = (self.size * 2 + 2) as u16;
        let height = (self.size + 2) as u16;
        let [_, grid_vert, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .areas(grid_area);
        let [_, grid_cell, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(width),
            Constraint::Fill(1),
        ])
        .areas(grid_vert);

        Paragraph::new(self.grid_lines())
            .block(Block::bordered().border_type(BorderType::Rounded))
            .render(grid_cell, buf);

        Paragraph::new(self.stat_lines())
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .padding(Padding::uniform(1))
                    .title("Stats"),
            )
            .render(stats_area, buf);
    }
}
