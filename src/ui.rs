use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Cell, Clear, Paragraph, Row, Table},
};

use crate::columns::ColumnId;
use crate::domain::UtvConfig;
use crate::model::{Model, UiData};
use crate::view::SortDirection;

pub const TABLE_HEADER_HEIGHT: u16 = 1;
pub const PAGELINE_HEIGHT: u16 = 1;
pub const SEARCHLINE_HEIGHT: u16 = 1;
pub const COLUMN_WIDTH_MARGIN: usize = 1;

pub struct TableUI {}

impl TableUI {
    pub fn new(_cfg: &UtvConfig) -> Self {
        Self {}
    }

    pub fn draw(&self, model: &Model, frame: &mut Frame<'_>) {
        let uidata = model.get_uidata();
        let [table_area, page_area, search_area] = Layout::vertical([
            Constraint::Min(TABLE_HEADER_HEIGHT),
            Constraint::Length(PAGELINE_HEIGHT),
            Constraint::Length(SEARCHLINE_HEIGHT),
        ])
        .areas(frame.area());

        self.draw_table(uidata, frame, table_area);
        self.draw_pageline(uidata, frame, page_area);
        self.draw_searchline(uidata, frame, search_area);

        if uidata.show_popup {
            self.draw_popup(uidata, frame);
        }
    }

    fn draw_table(&self, uidata: &UiData, frame: &mut Frame<'_>, area: Rect) {
        let header = Row::new(uidata.headers.iter().map(|h| {
            let indicator = match h.sort {
                Some(SortDirection::Ascending) => " ▲",
                Some(SortDirection::Descending) => " ▼",
                None => "",
            };
            let mut style = Style::new().bold();
            if h.selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Cell::from(format!("{}{}", h.label, indicator)).style(style)
        }))
        .height(TABLE_HEADER_HEIGHT);

        let link_column = uidata
            .headers
            .iter()
            .position(|h| h.id == ColumnId::Website);

        let rows = uidata.rows.iter().map(|row| {
            Row::new(row.iter().enumerate().map(|(cidx, value)| {
                let cell = Cell::from(value.as_str());
                // The website column renders as a link target.
                if Some(cidx) == link_column {
                    cell.style(Style::new().fg(Color::Blue).underlined())
                } else {
                    cell
                }
            }))
        });

        let widths: Vec<Constraint> = uidata
            .headers
            .iter()
            .enumerate()
            .map(|(cidx, h)| Constraint::Length(column_width(uidata, cidx, h.label) as u16))
            .collect();

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::bordered().title(Line::from(format!(" {} ", uidata.title)).centered()));
        frame.render_widget(table, area);
    }

    fn draw_pageline(&self, uidata: &UiData, frame: &mut Frame<'_>, area: Rect) {
        let prev = if uidata.can_go_previous {
            "[p]rev".into()
        } else {
            Span::from("[p]rev").dim()
        };
        let next = if uidata.can_go_next {
            "[n]ext".into()
        } else {
            Span::from("[n]ext").dim()
        };
        let line = Line::from(vec![
            prev,
            format!(
                " Page {}/{} ",
                uidata.current_page, uidata.page_count
            )
            .into(),
            next,
            format!(
                "  {} users, {} per page  ",
                uidata.total_rows, uidata.page_size
            )
            .dim(),
            uidata.status_message.clone().yellow(),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_searchline(&self, uidata: &UiData, frame: &mut Frame<'_>, area: Rect) {
        let line = if uidata.search_active {
            Line::from(vec![
                "/".bold(),
                uidata.search.input.clone().into(),
                Span::from("▏").slow_blink(),
            ])
        } else if !uidata.search.input.is_empty() {
            Line::from(vec!["/".dim(), Span::from(uidata.search.input.clone()).dim()])
        } else {
            Line::from("press / to search, ? for help".dim())
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_popup(&self, uidata: &UiData, frame: &mut Frame<'_>) {
        let area = centered_rect(frame.area(), 60, 16);
        frame.render_widget(Clear, area);
        let popup = Paragraph::new(uidata.popup_message.as_str())
            .block(Block::bordered().title(" Help (Esc to close) "));
        frame.render_widget(popup, area);
    }
}

/// Width of one column: the widest visible cell or the header, plus margin.
fn column_width(uidata: &UiData, cidx: usize, header: &str) -> usize {
    let cells = uidata
        .rows
        .iter()
        .filter_map(|row| row.get(cidx))
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0);
    cells.max(header.chars().count() + 2) + COLUMN_WIDTH_MARGIN
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
