use blockfall_engine::PieceKind;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::BlockDisplay;

/// Preview of a piece in its spawn orientation.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            piece: None,
            block: None,
        }
    }

    pub fn piece(self, piece: Option<PieceKind>) -> Self {
        Self { piece, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(piece) = self.piece else {
            return;
        };
        let shape = piece.shape(0);
        let piece_area = area.centered(
            Constraint::Length(super::cells(shape.width(), BlockDisplay::width())),
            Constraint::Length(super::cells(shape.height(), BlockDisplay::height())),
        );

        let col_constraints = (0..shape.width()).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..shape.height()).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let empty_block = BlockDisplay::empty(false);
        let occupied_block = BlockDisplay::settled(piece);
        for (grid_row, cells) in grid_rows.zip(shape.rows()) {
            for (grid_cell, &occupied) in grid_row.into_iter().zip(cells) {
                let block = if occupied {
                    &occupied_block
                } else {
                    &empty_block
                };
                Widget::render(block, grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::widgets::style;

    fn render(piece: Option<PieceKind>) -> Buffer {
        let display = PieceDisplay::new().piece(piece);
        let area = Rect::new(0, 0, display.width(), display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        buf
    }

    #[test]
    fn test_i_piece_fills_one_row() {
        let buf = render(Some(PieceKind::I));
        let filled = buf
            .content()
            .iter()
            .filter(|cell| cell.style().bg == style::I_BLOCK.bg)
            .count();
        assert_eq!(filled, 8);
    }

    #[test]
    fn test_t_piece_layout() {
        let buf = render(Some(PieceKind::T));
        // T spawn shape is 3 cells wide, centered with one terminal column of padding
        assert_eq!(buf[(1, 0)].style().bg, style::EMPTY.bg);
        assert_eq!(buf[(3, 0)].style().bg, style::T_BLOCK.bg);
        assert_eq!(buf[(1, 1)].style().bg, style::T_BLOCK.bg);
        assert_eq!(buf[(6, 1)].style().bg, style::T_BLOCK.bg);
    }

    #[test]
    fn test_no_piece_renders_nothing() {
        let buf = render(None);
        assert!(buf.content().iter().all(|cell| cell.symbol() == " "));
    }
}
