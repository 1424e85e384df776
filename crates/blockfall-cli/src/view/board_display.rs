use blockfall_engine::{BOARD_HEIGHT, BOARD_WIDTH, Cell, PieceKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::style;

const CELL_WIDTH: u16 = 2;
#[expect(clippy::cast_possible_truncation)]
const COLUMNS: u16 = BOARD_WIDTH as u16;
#[expect(clippy::cast_possible_truncation)]
const ROWS: u16 = BOARD_HEIGHT as u16;

/// Locked cells with the falling piece drawn on top.
#[derive(Debug)]
pub(crate) struct BoardDisplay<'a> {
    grid: &'a [[bool; BOARD_WIDTH]; BOARD_HEIGHT],
    falling_piece: Option<(PieceKind, [Cell; 4])>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub(crate) fn new(grid: &'a [[bool; BOARD_WIDTH]; BOARD_HEIGHT]) -> Self {
        Self {
            grid,
            falling_piece: None,
            block: None,
        }
    }

    pub(crate) fn falling_piece(self, kind: PieceKind, cells: [Cell; 4]) -> Self {
        Self {
            falling_piece: Some((kind, cells)),
            ..self
        }
    }

    pub(crate) fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub(crate) fn width(&self) -> u16 {
        COLUMNS * CELL_WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub(crate) fn height(&self) -> u16 {
        ROWS + super::block_vertical_margin(self.block.as_ref())
    }

    fn cell_style(&self, x: usize, y: usize) -> Option<Style> {
        if let Some((kind, cells)) = self.falling_piece
            && cells.iter().any(|&(cx, cy)| {
                usize::try_from(cx) == Ok(x) && usize::try_from(cy) == Ok(y)
            })
        {
            return Some(style::piece(kind));
        }
        self.grid[y][x].then_some(style::LOCKED)
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        for (y, line_area) in (0..BOARD_HEIGHT).zip(area.rows()) {
            let spans = (0..BOARD_WIDTH).map(|x| match self.cell_style(x, y) {
                Some(style) => Span::styled("[]", style),
                None => Span::styled(" .", style::EMPTY_DOT),
            });
            Line::from_iter(spans).render(line_area, buf);
        }
    }
}
