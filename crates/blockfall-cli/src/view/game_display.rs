use blockfall_engine::{GameState, GameStats, PieceKind, Snapshot};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

use crate::view::{BoardDisplay, color, style};

/// Keys and their descriptions, shown below the board.
pub(crate) type KeyBinding<'a> = (&'a [&'a str], &'a str);

const STATS_WIDTH: u16 = 18;

/// Full play screen: board, stats panel, key help and the game over banner.
#[derive(Debug)]
pub(crate) struct GameDisplay<'a> {
    snapshot: &'a Snapshot,
    stats: &'a GameStats,
    piece_kind: PieceKind,
    bindings: &'a [KeyBinding<'a>],
}

impl<'a> GameDisplay<'a> {
    pub(crate) fn new(snapshot: &'a Snapshot, stats: &'a GameStats, piece_kind: PieceKind) -> Self {
        Self {
            snapshot,
            stats,
            piece_kind,
            bindings: &[],
        }
    }

    pub(crate) fn bindings(self, bindings: &'a [KeyBinding<'a>]) -> Self {
        Self { bindings, ..self }
    }

    fn stats_lines(&self) -> Vec<Line<'static>> {
        let counter = self.stats.line_cleared_counter();
        let label_value = |label: &'static str, value: usize| {
            Line::from(vec![
                Span::styled(label, style::DEFAULT),
                Span::styled(format!("{value:>w$}", w = 16 - label.len()), style::DEFAULT),
            ])
        };
        vec![
            Line::from("SCORE:"),
            Line::from(self.snapshot.score.to_string()).right_aligned(),
            Line::default(),
            label_value("PIECES:", self.stats.completed_pieces()),
            label_value("SINGLES:", counter[1]),
            label_value("DOUBLES:", counter[2]),
            label_value("TRIPLES:", counter[3]),
            label_value("QUADS:", counter[4]),
        ]
    }

    fn bindings_line(&self) -> Line<'a> {
        let mut spans = vec![];
        for (i, (keys, desc)) in self.bindings.iter().copied().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", style::SEPARATOR));
            }
            for (i, key) in keys.iter().copied().enumerate() {
                if i > 0 {
                    spans.push(Span::styled("/", style::SEPARATOR));
                }
                spans.push(Span::styled(key, style::KEY));
            }
            spans.push(Span::styled(" ", style::DEFAULT));
            spans.push(Span::styled(desc, style::DEFAULT));
        }
        Line::from(spans).centered()
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = Style::new().fg(color::WHITE);

        let board = BoardDisplay::new(&self.snapshot.grid)
            .falling_piece(self.piece_kind, self.snapshot.current_piece_cells)
            .block(
                Block::bordered()
                    .title(Line::from("BLOCKFALL").centered())
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );
        let stats = Paragraph::new(self.stats_lines()).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .border_style(border_style)
                .style(style::DEFAULT),
        );

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(board.height()), Constraint::Length(1)])
                .flex(Flex::Center)
                .areas(area);
        let [board_area, stats_area] = Layout::horizontal([
            Constraint::Length(board.width()),
            Constraint::Length(STATS_WIDTH),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(main_area);
        let [stats_area, _] =
            Layout::vertical([Constraint::Length(10), Constraint::Fill(1)]).areas(stats_area);

        (&board).render(board_area, buf);
        stats.render(stats_area, buf);
        self.bindings_line().render(help_area, buf);

        if self.snapshot.state == GameState::GameOver {
            let banner_style = Style::new().fg(color::WHITE).bg(color::RED);
            let block = Block::new().style(banner_style);
            let text = Text::styled("GAME OVER", banner_style).centered();
            let area = board_area.centered(Constraint::Length(board.width()), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{Board, Game, ScriptedPieces};

    use super::*;

    fn render_to_string(display: &GameDisplay<'_>) -> String {
        let area = Rect::new(0, 0, 60, 24);
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_active_game_has_no_banner() {
        const BINDINGS: &[KeyBinding<'static>] = &[(&["q", "Esc"], "Quit")];

        let game = Game::new();
        let snapshot = game.snapshot();
        let display = GameDisplay::new(&snapshot, game.stats(), game.current_piece().kind())
            .bindings(BINDINGS);
        let screen = render_to_string(&display);
        assert!(screen.contains("SCORE:"));
        assert!(screen.contains("Quit"));
        assert!(!screen.contains("GAME OVER"));
    }

    #[test]
    fn test_game_over_shows_banner() {
        let art = ["##.#######"; Board::HEIGHT].join("\n");
        let board = Board::from_ascii(&art);
        let source = ScriptedPieces::new([PieceKind::O]).unwrap();
        let game = Game::from_parts(board, source);
        assert!(game.is_game_over());

        let snapshot = game.snapshot();
        let display = GameDisplay::new(&snapshot, game.stats(), game.current_piece().kind());
        assert!(render_to_string(&display).contains("GAME OVER"));
    }
}
