mod app;
mod audio;
mod event;
mod ui;
mod view;

use std::fs;
use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use reibun::config::Config;
use reibun::corpus::ALL_SOURCES;
use reibun::engine::FilterState;
use reibun::session::{AnswerMode, Phase};

use app::App;
use audio::AudioPlayer;
use event::{AppEvent, EventHandler};
use ui::components::answer_panel::AnswerPanel;
use ui::components::context_sidebar::ContextSidebar;
use ui::components::filter_bar::FilterBar;
use ui::components::progress_bar::PoolProgress;
use ui::components::sentence_card::SentenceCard;
use ui::layout::{LayoutTier, QuizLayout, centered_rect, pack_hint_lines};
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "reibun", version, about = "Terminal flashcards for grammar in context")]
struct Cli {
    #[arg(short, long, help = "Path or URL of the sentence corpus (data.json)")]
    data: Option<String>,

    #[arg(short, long, help = "Answer mode (free-recall, multiple-choice)")]
    mode: Option<AnswerMode>,

    #[arg(short, long, help = "Minimum sentence level")]
    level: Option<i32>,

    #[arg(short, long, help = "Comma-separated contexts to study")]
    filter: Option<String>,

    #[arg(short, long, help = "Only sentences from this source")]
    source: Option<String>,

    #[arg(long, help = "Disable audio playback")]
    no_audio: bool,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Write the effective configuration to the config file and exit")]
    write_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!("config unreadable, using defaults: {e}");
        Config::default()
    });
    if let Some(data) = cli.data {
        config.data_source = data;
    }
    if let Some(mode) = cli.mode {
        config.answer_mode = mode;
    }
    if let Some(level) = cli.level {
        config.min_level = level;
    }
    if let Some(ref theme) = cli.theme {
        config.theme = theme.clone();
    }
    if cli.write_config {
        config.save()?;
        println!("wrote {}", config_display_path());
        return Ok(());
    }

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        log::warn!(
            "unknown theme {:?} (available: {}), using default",
            config.theme,
            Theme::available_themes().join(", ")
        );
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let audio = if cli.no_audio {
        AudioPlayer::disabled()
    } else {
        AudioPlayer::new(&config.audio_player, &config.audio_player_args, true)
    };
    let filter = FilterState {
        text: cli.filter.filter(|f| !f.trim().is_empty()),
        source: cli.source.unwrap_or_else(|| ALL_SOURCES.to_string()),
        min_level: config.min_level,
    };

    let mut app = App::new(config, theme, audio, filter);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));
    app.begin_loading();
    events.spawn_corpus_load(app.data_source().to_string());

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn config_display_path() -> String {
    dirs::config_dir()
        .map(|d| d.join("reibun").join("config.toml").display().to_string())
        .unwrap_or_else(|| "config.toml".to_string())
}

/// Log to a file; the terminal belongs to the UI.
fn init_logging() {
    let Some(dir) = dirs::data_dir().map(|d| d.join("reibun")) else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("reibun.log"))
    else {
        return;
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key, events),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize(_, _) => {}
            AppEvent::CorpusLoaded(result) => app.on_corpus_loaded(result),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, events: &EventHandler) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    if app.filter_input.is_some() {
        app.handle_filter_key(key);
        return;
    }

    match app.phase() {
        Phase::Loading => {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                app.quit();
            }
        }
        Phase::Failed => match key.code {
            KeyCode::Char('r') => {
                app.begin_loading();
                events.spawn_corpus_load(app.data_source().to_string());
            }
            KeyCode::Char('q') | KeyCode::Esc => app.quit(),
            _ => {}
        },
        Phase::Ready => match key.code {
            KeyCode::Enter => app.start(),
            _ => handle_common_key(app, key),
        },
        Phase::Presenting | Phase::Revealed | Phase::NoResults => handle_quiz_key(app, key),
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.confirm(),
        KeyCode::Char(' ') => app.replay_audio(),
        KeyCode::Tab => app.show_sentence(),
        KeyCode::Char(ch @ '1'..='9') => {
            let slot = ch as usize - '1' as usize;
            app.choose_option(slot);
        }
        _ => handle_common_key(app, key),
    }
}

/// Filter and exit keys shared by every loaded screen.
fn handle_common_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('/') => app.open_filter_input(),
        KeyCode::Char('s') => app.cycle_source(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_level(1),
        KeyCode::Char('-') => app.adjust_level(-1),
        KeyCode::Char('c') => app.clear_filters(),
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    if app.view.loading {
        render_status(
            frame,
            app,
            " Loading ",
            vec![format!("Loading sentences from {}...", app.data_source())],
            &["[q] Quit"],
        );
        return;
    }

    match app.phase() {
        Phase::Loading | Phase::Failed => {
            let message = app
                .view
                .failure
                .clone()
                .unwrap_or_else(|| "unknown error".to_string());
            render_status(
                frame,
                app,
                " Failed to load ",
                vec![
                    format!("Could not load {}", app.data_source()),
                    String::new(),
                    message,
                ],
                &["[r] Retry", "[q] Quit"],
            );
        }
        Phase::Ready => render_status(
            frame,
            app,
            " reibun ",
            vec![
                format!(
                    "{} sentences, {} contexts",
                    app.session.sentences().len(),
                    app.session.index().context_count()
                ),
                format!("{} in this round", app.session.pool().remaining()),
                String::new(),
                format!("Mode: {}", app.session.options().answer_mode.label()),
            ],
            &["[Enter] Start", "[/] Filter", "[s] Source", "[+/-] Level", "[q] Quit"],
        ),
        Phase::Presenting | Phase::Revealed | Phase::NoResults => render_quiz(frame, app),
    }
}

fn render_status(
    frame: &mut ratatui::Frame,
    app: &App,
    title: &str,
    body: Vec<String>,
    hints: &[&str],
) {
    let colors = &app.theme.colors;
    let popup = centered_rect(50, 40, frame.area());

    let mut lines: Vec<Line> = vec![Line::from("")];
    lines.extend(
        body.into_iter()
            .map(|text| Line::from(Span::styled(text, Style::default().fg(colors.fg())))),
    );
    lines.push(Line::from(""));
    for hint in pack_hint_lines(hints, popup.width.saturating_sub(2) as usize) {
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(colors.text_dim()),
        )));
    }

    let border = if app.phase() == Phase::Failed {
        colors.error()
    } else {
        colors.accent()
    };
    let block = Block::bordered()
        .title(title)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(colors.bg()));
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        popup,
    );
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let session = &app.session;

    let answer_rows = app.view.presentation.as_ref().map_or(1, AnswerPanel::rows);
    let layout = QuizLayout::new(area, answer_rows, session.options().filter_enabled);

    let header_info = if layout.tier == LayoutTier::Narrow {
        format!(" {} left ", session.pool().remaining())
    } else {
        format!(
            " {} | {} left | {} ",
            session.options().answer_mode.label(),
            session.pool().remaining(),
            session.filter().source,
        )
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " reibun ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            header_info,
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    match app.view.presentation {
        Some(ref presentation) if !app.view.no_results => {
            let state = session.state();
            let card = SentenceCard::new(presentation, state.sentence_shown, state.revealed, app.theme);
            frame.render_widget(card, layout.sentence);

            let panel = AnswerPanel::new(
                presentation,
                app.view.answer.as_deref(),
                app.view.outcome.as_ref(),
                app.theme,
            );
            frame.render_widget(panel, layout.answer);
        }
        _ => render_no_results(frame, app, layout.sentence),
    }

    if let Some(progress_area) = layout.progress {
        frame.render_widget(PoolProgress::new(session.pool(), app.theme), progress_area);
    }

    if let Some(filter_area) = layout.filter {
        let bar = FilterBar::new(
            session.filter(),
            app.filter_input.as_ref(),
            app.filter_pending(),
            app.theme,
        );
        frame.render_widget(bar, filter_area);
    }

    if let Some(sidebar_area) = layout.sidebar {
        let terms = session.filter().terms();
        let current = if session.state().revealed {
            app.view
                .presentation
                .as_ref()
                .and_then(|p| p.context.as_deref())
        } else {
            None
        };
        let sidebar = ContextSidebar::new(session.index(), &terms, current, app.theme);
        frame.render_widget(sidebar, sidebar_area);
    }

    let hints = footer_hints(app);
    let footer_text = pack_hint_lines(&hints, layout.footer.width as usize)
        .into_iter()
        .next()
        .unwrap_or_default();
    let footer = Paragraph::new(Line::from(Span::styled(
        footer_text,
        Style::default().fg(colors.text_dim()),
    )));
    frame.render_widget(footer, layout.footer);
}

fn render_no_results(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No sentences match the current filters.",
            Style::default().fg(colors.warning()),
        )),
    ];
    if app.view.can_clear_filter {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[c] Clear filters",
            Style::default().fg(colors.accent()),
        )));
    }
    let block = Block::bordered()
        .title(" No results ")
        .border_style(Style::default().fg(colors.border()));
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center),
        area,
    );
}

fn footer_hints(app: &App) -> Vec<&'static str> {
    if app.filter_input.is_some() {
        return vec!["[Enter] Apply", "[Tab] Complete", "[Esc] Cancel"];
    }
    let mut hints = Vec::new();
    match app.phase() {
        Phase::Presenting => match app.session.options().answer_mode {
            AnswerMode::FreeRecall => hints.push("[Enter] Reveal"),
            AnswerMode::MultipleChoice => hints.push("[1-9] Choose"),
        },
        Phase::Revealed => hints.push("[Enter] Next"),
        _ => {}
    }
    if app.view.presentation.is_some() {
        if !app.session.state().sentence_shown {
            hints.push("[Tab] Sentence");
        }
        if !app.view.replay_locked() {
            hints.push("[Space] Replay");
        }
    }
    hints.extend(["[/] Filter", "[s] Source", "[+/-] Level", "[c] Clear", "[q] Quit"]);
    hints
}
