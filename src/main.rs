use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};

use term_flashcards::cli::Cli;
use term_flashcards::{
    draw_menu, draw_quit_confirmation, draw_study, handle_study_input, logger, open_deck,
    AppError, AppState, MenuAction, MenuState, StudyApp, StudyOptions, TermParser,
};

struct App {
    parser: TermParser,
    options: StudyOptions,
    menu: MenuState,
    study: Option<StudyApp>,
    state: AppState,
}

impl App {
    fn open(&mut self, path: &std::path::Path) {
        match open_deck(path, &self.parser, self.options) {
            Ok(study) => {
                log::info!(
                    "Studying {} ({} terms)",
                    study.deck_name,
                    study.session.len()
                );
                self.study = Some(study);
                self.menu.status = None;
                self.state = AppState::Study;
            }
            Err(err) => {
                log::error!("{}", err);
                self.menu.status = Some(format!("Invalid file. {}", err));
                self.state = AppState::Menu;
            }
        }
    }
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    logger::init(&cli.log_file, cli.log_level)?;

    let parser = TermParser::new(&cli.delimiter)?;
    let options = StudyOptions {
        shuffle: cli.shuffle,
        mode: cli.mode.into(),
        seed: cli.seed,
    };

    let mut app = App {
        parser,
        options,
        menu: MenuState::new(&cli.dir),
        study: None,
        state: AppState::Menu,
    };
    if let Some(path) = &cli.file {
        app.open(path);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<(), AppError> {
    loop {
        terminal.draw(|f| match app.state {
            AppState::Menu => draw_menu(
                f,
                &app.menu.term_files,
                app.menu.selected_file_index,
                &app.menu.dir,
                app.menu.status.as_deref(),
            ),
            AppState::Study => {
                if let Some(study) = &app.study {
                    draw_study(f, study);
                }
            }
            AppState::StudyQuitConfirm => draw_quit_confirmation(f),
        })?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(());
        }

        match app.state {
            AppState::Menu => match app.menu.handle_input(key) {
                MenuAction::Open(path) => app.open(&path),
                MenuAction::Quit => return Ok(()),
                MenuAction::None => {}
            },
            AppState::Study => {
                if let Some(study) = &mut app.study {
                    handle_study_input(study, key, &mut app.state);
                }
            }
            AppState::StudyQuitConfirm => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    app.study = None;
                    app.menu.refresh();
                    app.state = AppState::Menu;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Study;
                }
                _ => {}
            },
        }
    }
}
