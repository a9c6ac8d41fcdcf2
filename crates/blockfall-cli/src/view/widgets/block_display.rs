use blockfall_engine::{Block, PieceKind};
use ratatui::{
    prelude::{Buffer, Rect},
    style::{Modifier, Style},
    widgets::{Paragraph, Widget},
};

use crate::view::widgets::{color, style};

/// A single board cell, two terminal columns wide.
///
/// Settled cells are solid blocks of the piece color. Cells of the falling
/// piece carry a bracket mark so the piece under control stands out from the
/// stack it is about to land on.
#[derive(Debug)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

impl BlockDisplay {
    pub const fn width() -> u16 {
        2
    }

    pub const fn height() -> u16 {
        1
    }

    /// Empty cell, drawn as a dot on the board and blank in previews.
    pub const fn empty(dotted: bool) -> Self {
        if dotted {
            Self {
                style: style::EMPTY_DOT,
                symbol: ".",
            }
        } else {
            Self {
                style: style::EMPTY,
                symbol: "",
            }
        }
    }

    pub const fn settled(kind: PieceKind) -> Self {
        Self {
            style: kind_style(kind),
            symbol: "",
        }
    }

    pub const fn falling(kind: PieceKind) -> Self {
        Self {
            style: kind_style(kind)
                .fg(color::BLACK)
                .add_modifier(Modifier::BOLD),
            symbol: "[]",
        }
    }

    /// Board cell as stored in the settled grid.
    pub const fn from_block(block: Block) -> Self {
        match block {
            Block::Empty => Self::empty(true),
            Block::Piece(kind) => Self::settled(kind),
        }
    }
}

const fn kind_style(kind: PieceKind) -> Style {
    match kind {
        PieceKind::I => style::I_BLOCK,
        PieceKind::O => style::O_BLOCK,
        PieceKind::S => style::S_BLOCK,
        PieceKind::Z => style::Z_BLOCK,
        PieceKind::J => style::J_BLOCK,
        PieceKind::L => style::L_BLOCK,
        PieceKind::T => style::T_BLOCK,
    }
}

impl Widget for BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // fill the whole cell, not only the columns under the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(display: &BlockDisplay) -> Buffer {
        let area = Rect::new(0, 0, BlockDisplay::width(), BlockDisplay::height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        buf
    }

    #[test]
    fn test_settled_and_falling_share_color() {
        let settled = render(&BlockDisplay::from_block(Block::Piece(PieceKind::S)));
        let falling = render(&BlockDisplay::falling(PieceKind::S));
        for x in 0..2 {
            assert_eq!(settled[(x, 0)].style().bg, style::S_BLOCK.bg);
            assert_eq!(falling[(x, 0)].style().bg, style::S_BLOCK.bg);
        }
        assert_eq!(settled[(0, 0)].symbol(), " ");
        assert_eq!(falling[(0, 0)].symbol(), "[");
        assert_eq!(falling[(1, 0)].symbol(), "]");
        assert!(falling[(0, 0)].style().add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_empty_cell_dot() {
        assert_eq!(BlockDisplay::from_block(Block::Empty).symbol, ".");
        assert_eq!(BlockDisplay::empty(false).symbol, "");
        let buf = render(&BlockDisplay::empty(true));
        let dots: String = (0..2).map(|x| buf[(x, 0)].symbol()).collect();
        assert_eq!(dots.trim(), ".");
    }
}
