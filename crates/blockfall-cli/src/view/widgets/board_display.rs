use std::iter;

use blockfall_engine::{Board, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::BlockDisplay;

/// Board grid, drawn with empty cells as dots and the falling piece marked
/// on top of the settled cells.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    falling: Option<&'a Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            falling: None,
            block: None,
        }
    }

    pub fn falling(self, falling: Option<&'a Piece>) -> Self {
        Self { falling, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        super::cells(self.board.width(), BlockDisplay::width())
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        super::cells(self.board.height(), BlockDisplay::height())
            + super::block_vertical_margin(self.block.as_ref())
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

        let col_constraints =
            (0..self.board.width()).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..self.board.height()).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal))
            .collect::<Vec<_>>();

        for (grid_row, row) in iter::zip(&grid_cells, self.board.rows()) {
            for (grid_cell, block) in iter::zip(grid_row, row.cells()) {
                BlockDisplay::from_block(*block).render(*grid_cell, buf);
            }
        }

        let Some(piece) = self.falling else {
            return;
        };
        let falling_block = BlockDisplay::falling(piece.kind());
        for (x, y) in piece.occupied_positions() {
            // cells above the top row stay hidden
            let (Ok(col), Ok(row)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            if let Some(grid_cell) = grid_cells.get(row).and_then(|cells| cells.get(col)) {
                Widget::render(&falling_block, *grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{PieceKind, PiecePosition};
    use ratatui::widgets::Borders;

    use super::*;
    use crate::view::widgets::style;

    #[test]
    fn test_size_follows_board() {
        let board = Board::new(10, 20);
        let display = BoardDisplay::new(&board);
        assert_eq!((display.width(), display.height()), (20, 20));

        let display = display.block(BlockWidget::new().borders(Borders::ALL));
        assert_eq!((display.width(), display.height()), (22, 22));
    }

    #[test]
    fn test_falling_piece_overlays_board() {
        let mut board = Board::new(6, 4);
        board.place(PieceKind::O, PieceKind::O.shape(0), PiecePosition::new(0, 2));
        let falling = Piece::new(PieceKind::I, PiecePosition::new(0, 0), 1);
        // only the bottom cell is inside the board
        let hidden = Piece::new(PieceKind::I, PiecePosition::new(2, -3), 1);
        let display = BoardDisplay::new(&board).falling(Some(&falling));
        let area = Rect::new(0, 0, display.width(), display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);

        let marked = buf.content().iter().filter(|cell| cell.symbol() == "[").count();
        assert_eq!(marked, 4);
        assert_eq!(buf[(0, 3)].symbol(), "[");
        assert_eq!(buf[(0, 3)].style().bg, style::I_BLOCK.bg);
        assert_eq!(board.occupied_count(), 4);

        let display = BoardDisplay::new(&board).falling(Some(&hidden));
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        let marked = buf.content().iter().filter(|cell| cell.symbol() == "[").count();
        assert_eq!(marked, 1);
        assert_eq!(buf[(4, 0)].symbol(), "[");
    }

    #[test]
    fn test_renders_cells() {
        let mut board = Board::new(6, 4);
        board.place(PieceKind::O, PieceKind::O.shape(0), PiecePosition::new(0, 2));
        let display = BoardDisplay::new(&board);
        let area = Rect::new(0, 0, display.width(), display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);

        assert_eq!(buf[(0, 2)].style().bg, style::O_BLOCK.bg);
        assert_eq!(buf[(3, 3)].style().bg, style::O_BLOCK.bg);
        assert_eq!(buf[(4, 3)].style().bg, style::EMPTY_DOT.bg);
        let top_row: String = (0..area.width).map(|x| buf[(x, 0)].symbol()).collect();
        assert_eq!(top_row.matches('.').count(), 6);
    }
}
