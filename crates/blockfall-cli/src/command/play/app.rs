use std::time::Duration;

use blockfall_engine::{Game, PieceSeed, TickOutcome};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use log::debug;
use ratatui::Frame;

use crate::{
    tui::{App, Tui},
    view::{GameDisplay, KeyBinding},
};

const BINDINGS: &[KeyBinding<'static>] = &[
    (&["←", "→"], "Move"),
    (&["↑", "Space"], "Rotate"),
    (&["↓"], "Down"),
    (&["q", "Esc"], "Quit"),
];

const GAME_OVER_BINDINGS: &[KeyBinding<'static>] = &[(&["any key"], "Exit")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    MoveLeft,
    MoveRight,
    Rotate,
    Step,
    Quit,
}

impl Action {
    fn from_key(key: &KeyEvent) -> Option<Self> {
        match key.code {
            KeyCode::Left => Some(Self::MoveLeft),
            KeyCode::Right => Some(Self::MoveRight),
            KeyCode::Up | KeyCode::Char(' ') => Some(Self::Rotate),
            KeyCode::Down => Some(Self::Step),
            KeyCode::Char('q') | KeyCode::Esc => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Interactive game driven by the keyboard and the tick clock.
#[derive(Debug)]
pub(crate) struct PlayApp {
    game: Game,
    tick_interval: Duration,
    is_exiting: bool,
}

impl PlayApp {
    pub(crate) fn new(seed: PieceSeed, tick_interval: Duration) -> Self {
        Self {
            game: Game::with_seed(seed),
            tick_interval,
            is_exiting: false,
        }
    }

    pub(crate) fn game(&self) -> &Game {
        &self.game
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // The final board stays up until the player dismisses it.
        if self.game.is_game_over() {
            self.is_exiting = true;
            return;
        }

        let Some(action) = Action::from_key(key) else {
            return;
        };
        match action {
            Action::MoveLeft => _ = self.game.move_left(),
            Action::MoveRight => _ = self.game.move_right(),
            Action::Rotate => _ = self.game.rotate_clockwise(),
            Action::Step => self.apply_tick(),
            Action::Quit => self.is_exiting = true,
        }
    }

    fn apply_tick(&mut self) {
        match self.game.tick() {
            TickOutcome::Locked { cleared_rows } if cleared_rows > 0 => {
                debug!("cleared {cleared_rows} rows, score {}", self.game.score());
            }
            TickOutcome::ToppedOut { .. } => {
                debug!("topped out with score {}", self.game.score());
            }
            _ => {}
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_interval(Some(self.tick_interval));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) {
        if let Some(key) = event.as_key_event() {
            self.handle_key(&key);
        }
        if self.game.is_game_over() {
            tui.set_tick_interval(None);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let snapshot = self.game.snapshot();
        let bindings = if self.game.is_game_over() {
            GAME_OVER_BINDINGS
        } else {
            BINDINGS
        };
        let display = GameDisplay::new(
            &snapshot,
            self.game.stats(),
            self.game.current_piece().kind(),
        )
        .bindings(bindings);
        frame.render_widget(display, frame.area());
    }

    fn update(&mut self, tui: &mut Tui) {
        if self.game.is_game_over() {
            tui.set_tick_interval(None);
            return;
        }
        self.apply_tick();
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventState, KeyModifiers};

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> PlayApp {
        PlayApp::new(PieceSeed::from_u128(42), Duration::from_millis(500))
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(Action::from_key(&press(KeyCode::Left)), Some(Action::MoveLeft));
        assert_eq!(Action::from_key(&press(KeyCode::Right)), Some(Action::MoveRight));
        assert_eq!(Action::from_key(&press(KeyCode::Up)), Some(Action::Rotate));
        assert_eq!(Action::from_key(&press(KeyCode::Char(' '))), Some(Action::Rotate));
        assert_eq!(Action::from_key(&press(KeyCode::Down)), Some(Action::Step));
        assert_eq!(Action::from_key(&press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(Action::from_key(&press(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(Action::from_key(&press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_left_moves_piece() {
        let mut app = app();
        let x = app.game().current_piece().x();
        app.handle_key(&press(KeyCode::Left));
        assert_eq!(app.game().current_piece().x(), x - 1);
    }

    #[test]
    fn test_down_ticks() {
        let mut app = app();
        let y = app.game().current_piece().y();
        app.handle_key(&press(KeyCode::Down));
        assert_eq!(app.game().current_piece().y(), y + 1);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut app = app();
        let x = app.game().current_piece().x();
        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Left,
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        app.handle_key(&release);
        assert_eq!(app.game().current_piece().x(), x);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        assert!(!app.should_exit());
        app.handle_key(&press(KeyCode::Char('q')));
        assert!(app.should_exit());
    }

    #[test]
    fn test_any_key_exits_after_game_over() {
        let mut app = app();
        while !app.game().is_game_over() {
            app.handle_key(&press(KeyCode::Down));
        }
        assert!(!app.should_exit());
        app.handle_key(&press(KeyCode::Char('x')));
        assert!(app.should_exit());
    }
}
