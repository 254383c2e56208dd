//! Interactive form.
//!
//! Three text inputs, the file checkbox group and a submit button. A valid
//! submit opens a popup with the generated command, which can be copied,
//! accepted (printed on exit) or dismissed.

use crate::clipboard::{Clipboard, SystemClipboard};
use crate::config::Config;
use crate::display::{CommandDisplay, CopyState, MANUAL_COPY_MESSAGE};
use crate::form::{Field, FieldError, FormDraft, Selection, FORMATTING_LABEL};
use crate::options::OptionKey;
use crate::synth::{synthesize, GeneratedCommand, GenerationMode};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use tracing::{debug, info};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

/// Result of the TUI interaction.
#[derive(Debug, PartialEq)]
pub enum TuiResult {
    /// User accepted a generated command.
    Command(GeneratedCommand),
    /// User cancelled (Escape).
    Cancelled,
}

/// Focusable elements, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Field(Field),
    Option(OptionKey),
    Submit,
}

const FOCUS_ORDER: [Focus; 9] = [
    Focus::Field(Field::RootFolder),
    Focus::Field(Field::ProjectName),
    Focus::Field(Field::ViewFolder),
    Focus::Option(OptionKey::Index),
    Focus::Option(OptionKey::Constant),
    Focus::Option(OptionKey::Hooks),
    Focus::Option(OptionKey::Schema),
    Focus::Option(OptionKey::Type),
    Focus::Submit,
];

/// Form and popup state, independent of the terminal.
pub struct FormApp {
    mode: GenerationMode,
    inputs: [Input; 3],
    selection: Selection,
    focus: usize,
    errors: Vec<FieldError>,
    display: CommandDisplay,
}

impl FormApp {
    pub fn new(mode: GenerationMode, draft: FormDraft) -> Self {
        let inputs = Field::ALL.map(|field| Input::default().with_value(draft.field(field).to_string()));
        Self {
            mode,
            inputs,
            selection: draft.formatting,
            focus: 0,
            errors: Vec::new(),
            display: CommandDisplay::default(),
        }
    }

    fn input(&self, field: Field) -> &Input {
        &self.inputs[field_index(field)]
    }

    fn focused(&self) -> Focus {
        FOCUS_ORDER[self.focus]
    }

    /// Current field values as an unvalidated draft.
    pub fn draft(&self) -> FormDraft {
        let mut draft = FormDraft {
            root_folder: String::new(),
            project_name: String::new(),
            view_folder: String::new(),
            formatting: self.selection.clone(),
        };
        for field in Field::ALL {
            draft.set_field(field, self.input(field).value());
        }
        draft
    }

    fn error_for(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field() == field)
    }

    fn submit(&mut self) {
        match self.draft().submit() {
            Ok(state) => {
                self.errors.clear();
                let command = synthesize(self.mode, &state);
                info!("Generated {} command: {}", self.mode, command);
                self.display.open(command);
            }
            Err(errors) => {
                debug!("Form has {} invalid field(s)", errors.len());
                if let Some(first) = errors.first() {
                    let target = Focus::Field(first.field());
                    if let Some(pos) = FOCUS_ORDER.iter().position(|f| *f == target) {
                        self.focus = pos;
                    }
                }
                self.errors = errors;
            }
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let len = FOCUS_ORDER.len();
        self.focus = if forward {
            (self.focus + 1) % len
        } else {
            (self.focus + len - 1) % len
        };
    }

    /// Apply one key press. Returns a result once the session is over.
    pub fn handle_key(&mut self, key: KeyEvent, clipboard: &mut dyn Clipboard) -> Option<TuiResult> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(TuiResult::Cancelled);
        }

        if self.display.is_open() {
            match key.code {
                KeyCode::Enter => {
                    return self.display.command().cloned().map(TuiResult::Command);
                }
                KeyCode::Esc => self.display.close(),
                KeyCode::Char('c') => {
                    self.display.copy(clipboard);
                }
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Esc => return Some(TuiResult::Cancelled),
            KeyCode::Enter => self.submit(),
            KeyCode::Tab | KeyCode::Down => self.move_focus(true),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(false),
            _ => match self.focused() {
                Focus::Field(field) => {
                    self.inputs[field_index(field)].handle_event(&Event::Key(key));
                }
                Focus::Option(option) if key.code == KeyCode::Char(' ') => {
                    self.selection.toggle(option);
                }
                _ => {}
            },
        }
        None
    }
}

fn field_index(field: Field) -> usize {
    match field {
        Field::RootFolder => 0,
        Field::ProjectName => 1,
        Field::ViewFolder => 2,
    }
}

/// Run the TUI and return the accepted command.
pub fn run_tui(config: &Config) -> Result<TuiResult> {
    let mut app = FormApp::new(config.mode, FormDraft::from_defaults(&config.defaults));
    let mut clipboard = SystemClipboard;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app, &mut clipboard);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut FormApp,
    clipboard: &mut dyn Clipboard,
) -> Result<TuiResult> {
    loop {
        terminal.draw(|frame| draw_ui(frame, app))?;

        if let Event::Key(key) = event::read()? {
            // Only handle key press events (not release)
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(result) = app.handle_key(key, clipboard) {
                return Ok(result);
            }
        }
    }
}

fn draw_ui(frame: &mut Frame, app: &FormApp) {
    let size = frame.area();
    let width = size.width.saturating_sub(4).min(80);
    let area = centered_rect(width, size.height.min(28), size);

    let outer = Block::default()
        .title(" Create your components ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let mut constraints = Vec::new();
    for _ in Field::ALL {
        constraints.extend([Constraint::Length(1), Constraint::Length(3), Constraint::Length(1)]);
    }
    constraints.push(Constraint::Length(1));
    constraints.extend(OptionKey::ALL.map(|_| Constraint::Length(1)));
    constraints.extend([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in Field::ALL.into_iter().enumerate() {
        draw_field(frame, app, field, rows[i * 3], rows[i * 3 + 1], rows[i * 3 + 2]);
    }

    let mut row = Field::ALL.len() * 3;
    frame.render_widget(
        Paragraph::new(Span::styled(
            FORMATTING_LABEL,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        rows[row],
    );
    row += 1;

    for key in OptionKey::ALL {
        let checked = if app.selection.contains(key) { "[x]" } else { "[ ]" };
        let style = focus_style(app.focused() == Focus::Option(key));
        frame.render_widget(
            Paragraph::new(Span::styled(format!("{} {}", checked, key.option().label), style)),
            rows[row],
        );
        row += 1;
    }

    let button_style = if app.focused() == Focus::Submit {
        Style::default().fg(Color::Black).bg(Color::Blue).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Blue)
    };
    frame.render_widget(
        Paragraph::new(Span::styled(" Create Components ", button_style)),
        rows[row + 1],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            "tab: next  space: toggle  enter: create  esc: quit",
            Style::default().fg(Color::DarkGray),
        )),
        rows[row + 2],
    );

    if app.display.is_open() {
        draw_popup(frame, &app.display, size);
    }
}

fn draw_field(frame: &mut Frame, app: &FormApp, field: Field, label: Rect, input_area: Rect, error: Rect) {
    let focused = app.focused() == Focus::Field(field);
    let invalid = app.error_for(field).is_some();

    frame.render_widget(
        Paragraph::new(Span::styled(field.label(), Style::default().add_modifier(Modifier::BOLD))),
        label,
    );

    let border = if invalid {
        Color::Red
    } else if focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let text_area = block.inner(input_area);
    frame.render_widget(block, input_area);

    let input = app.input(field);
    let width = text_area.width as usize;
    let cursor_pos = input.visual_cursor();

    // Scroll the input if cursor is beyond visible area
    let scroll = if cursor_pos >= width {
        (cursor_pos + 1).saturating_sub(width)
    } else {
        0
    };
    let visible: String = input.value().chars().skip(scroll).take(width).collect();
    frame.render_widget(
        Paragraph::new(Span::styled(visible, Style::default().fg(Color::White))),
        text_area,
    );

    if focused && !app.display.is_open() && width > 0 {
        let offset = cursor_pos.saturating_sub(scroll) as u16;
        frame.set_cursor_position((text_area.x + offset, text_area.y));
    }

    if let Some(err) = app.error_for(field) {
        frame.render_widget(
            Paragraph::new(Span::styled(err.display_message(), Style::default().fg(Color::Red))),
            error,
        );
    }
}

fn draw_popup(frame: &mut Frame, display: &CommandDisplay, size: Rect) {
    let width = size.width.saturating_sub(8).min(72);
    let inner_width = width.saturating_sub(2);

    let command = display.command().map(|c| c.as_str()).unwrap_or_default();
    let (footer, footer_text) = match display.copy_state() {
        CopyState::Failed => (
            Line::from(Span::styled(MANUAL_COPY_MESSAGE, Style::default().fg(Color::Red))),
            MANUAL_COPY_MESSAGE,
        ),
        CopyState::Copied => (
            Line::from(vec![
                Span::styled("✓ copied", Style::default().fg(Color::Green)),
                Span::raw("  enter: accept  esc: back"),
            ]),
            "✓ copied  enter: accept  esc: back",
        ),
        CopyState::Ready => (
            Line::from(Span::raw("c: copy  enter: accept  esc: back")),
            "c: copy  enter: accept  esc: back",
        ),
    };

    let intro = "Run the following command in your terminal:";
    let intro_rows = wrapped_rows(intro, inner_width).saturating_add(1);
    let command_rows = wrapped_rows(command, inner_width);
    let footer_rows = wrapped_rows(footer_text, inner_width);

    // Borders, intro, command, a blank line, footer.
    let height = [intro_rows, command_rows, 1, footer_rows]
        .into_iter()
        .fold(2u16, u16::saturating_add)
        .min(size.height);
    let area = centered_rect(width, height, size);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Almost there... ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // The footer keeps its rows; the command area shrinks first.
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(intro_rows),
            Constraint::Min(0),
            Constraint::Length(footer_rows),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(intro).wrap(Wrap { trim: false }), rows[0]);
    frame.render_widget(
        Paragraph::new(Span::styled(
            command,
            Style::default().fg(Color::Yellow).bg(Color::Black),
        ))
        .wrap(Wrap { trim: false }),
        rows[1],
    );
    frame.render_widget(Paragraph::new(footer).wrap(Wrap { trim: false }), rows[2]);
}

/// Rows needed to word-wrap `text` into `width` columns.
///
/// Greedy over whitespace-separated words, one column short of `width` so the
/// estimate never comes out below what the renderer uses.
fn wrapped_rows(text: &str, width: u16) -> u16 {
    let width = usize::from(width.saturating_sub(1)).max(1);
    let mut rows = 0usize;
    let mut line = 0usize;

    for word in text.split_whitespace() {
        let len = word.chars().count();
        if line > 0 && line + 1 + len <= width {
            line += 1 + len;
            continue;
        }
        rows += len.max(1).div_ceil(width);
        line = match len % width {
            0 if len > 0 => width,
            rest => rest,
        };
    }

    u16::try_from(rows.max(1)).unwrap_or(u16::MAX)
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

/// Create a centered rectangle.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::testing::MemoryClipboard;
    use ratatui::backend::TestBackend;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> FormApp {
        FormApp::new(GenerationMode::FlagBased, FormDraft::default())
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(40, 10, area);
        assert_eq!(centered.width, 40);
        assert_eq!(centered.height, 10);
        assert_eq!(centered.x, 30); // (100 - 40) / 2
        assert_eq!(centered.y, 20); // (50 - 10) / 2
    }

    #[test]
    fn test_submit_opens_popup_and_enter_accepts() {
        let mut app = app();
        let mut clipboard = MemoryClipboard::default();

        assert_eq!(app.handle_key(press(KeyCode::Enter), &mut clipboard), None);
        assert!(app.display.is_open());

        let result = app.handle_key(press(KeyCode::Enter), &mut clipboard);
        match result {
            Some(TuiResult::Command(command)) => assert_eq!(
                command.as_str(),
                "new-component FeatureList -d features/my-feature/views -all -s"
            ),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_blank_field_shows_error() {
        let mut app = app();
        let mut clipboard = MemoryClipboard::default();

        // Focus the component name and clear it.
        app.handle_key(press(KeyCode::Tab), &mut clipboard);
        app.handle_key(press(KeyCode::Tab), &mut clipboard);
        for _ in 0.."FeatureList".len() {
            app.handle_key(press(KeyCode::Backspace), &mut clipboard);
        }
        app.handle_key(press(KeyCode::BackTab), &mut clipboard);

        app.handle_key(press(KeyCode::Enter), &mut clipboard);
        assert!(!app.display.is_open());
        assert_eq!(
            app.errors,
            vec![FieldError::RequiredFieldMissing {
                field: Field::ViewFolder
            }]
        );
        assert_eq!(app.focused(), Focus::Field(Field::ViewFolder));

        app.handle_key(press(KeyCode::Char('X')), &mut clipboard);
        app.handle_key(press(KeyCode::Enter), &mut clipboard);
        assert!(app.errors.is_empty());
        assert!(app.display.is_open());
    }

    #[test]
    fn test_space_toggles_focused_option() {
        let mut app = app();
        let mut clipboard = MemoryClipboard::default();

        // Root, Parent, Name, then Index, Constant, Hooks, Schema.
        for _ in 0..6 {
            app.handle_key(press(KeyCode::Down), &mut clipboard);
        }
        assert_eq!(app.focused(), Focus::Option(OptionKey::Schema));
        app.handle_key(press(KeyCode::Char(' ')), &mut clipboard);
        assert!(!app.selection.contains(OptionKey::Schema));

        app.handle_key(press(KeyCode::Enter), &mut clipboard);
        assert_eq!(
            app.display.command().unwrap().as_str(),
            "new-component FeatureList -d features/my-feature/views -all"
        );
    }

    #[test]
    fn test_typing_into_field() {
        let mut app = app();
        let mut clipboard = MemoryClipboard::default();
        app.handle_key(press(KeyCode::Char('/')), &mut clipboard);
        app.handle_key(press(KeyCode::Char('x')), &mut clipboard);
        assert_eq!(app.draft().root_folder, "features/x");
    }

    #[test]
    fn test_copy_in_popup() {
        let mut app = app();
        let mut clipboard = MemoryClipboard::default();
        app.handle_key(press(KeyCode::Enter), &mut clipboard);
        app.handle_key(press(KeyCode::Char('c')), &mut clipboard);

        assert_eq!(app.display.copy_state(), CopyState::Copied);
        assert_eq!(
            clipboard.contents.as_deref(),
            app.display.command().map(|c| c.as_str())
        );
    }

    #[test]
    fn test_copy_failure_in_popup() {
        let mut app = app();
        let mut clipboard = MemoryClipboard::failing();
        app.handle_key(press(KeyCode::Enter), &mut clipboard);
        app.handle_key(press(KeyCode::Char('c')), &mut clipboard);

        assert_eq!(app.display.copy_state(), CopyState::Failed);
        assert!(!app.display.shows_trigger());
    }

    #[test]
    fn test_escape_closes_popup_then_cancels() {
        let mut app = app();
        let mut clipboard = MemoryClipboard::default();
        app.handle_key(press(KeyCode::Enter), &mut clipboard);

        assert_eq!(app.handle_key(press(KeyCode::Esc), &mut clipboard), None);
        assert!(!app.display.is_open());
        assert_eq!(
            app.handle_key(press(KeyCode::Esc), &mut clipboard),
            Some(TuiResult::Cancelled)
        );
    }

    #[test]
    fn test_ctrl_c_cancels() {
        let mut app = app();
        let mut clipboard = MemoryClipboard::default();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(key, &mut clipboard), Some(TuiResult::Cancelled));
    }

    #[test]
    fn test_draw_popup_with_manual_copy_message() {
        let mut app = app();
        let mut clipboard = MemoryClipboard::failing();
        app.handle_key(press(KeyCode::Enter), &mut clipboard);
        app.handle_key(press(KeyCode::Char('c')), &mut clipboard);

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| draw_ui(frame, &app)).unwrap();

        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("Almost there..."));
        assert!(rendered.contains("Failed to copy to clipboard."));
    }

    fn buffer_rows(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    #[test]
    fn test_draw_long_scaffold_command_keeps_footer() {
        let mut app = FormApp::new(GenerationMode::FilesystemScaffold, FormDraft::default());
        let mut clipboard = MemoryClipboard::failing();
        app.handle_key(press(KeyCode::Enter), &mut clipboard);
        app.handle_key(press(KeyCode::Char('c')), &mut clipboard);
        let command = app.display.command().unwrap().to_string();
        assert!(command.ends_with(" my-feature"));

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| draw_popup(frame, &app.display, frame.area())).unwrap();

        let lines: Vec<String> = buffer_rows(&terminal)
            .iter()
            .map(|row| row.trim().trim_matches('│').trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        let rendered = lines.join(" ");

        assert!(rendered.contains(MANUAL_COPY_MESSAGE));
        for token in command.split_whitespace() {
            assert!(rendered.contains(token), "missing {}", token);
        }

        // The trailing project segment sits on the last command row, right
        // above the footer.
        let footer = lines
            .iter()
            .position(|line| line == MANUAL_COPY_MESSAGE)
            .unwrap();
        assert!(lines[footer - 1].ends_with("my-feature"));
    }

    #[test]
    fn test_draw_narrow_terminal() {
        let app = app();
        for width in [1, 5, 7, 8] {
            let mut terminal = Terminal::new(TestBackend::new(width, 30)).unwrap();
            terminal.draw(|frame| draw_ui(frame, &app)).unwrap();
        }

        let mut app = app;
        let mut clipboard = MemoryClipboard::default();
        app.handle_key(press(KeyCode::Enter), &mut clipboard);
        let mut terminal = Terminal::new(TestBackend::new(6, 4)).unwrap();
        terminal.draw(|frame| draw_ui(frame, &app)).unwrap();
    }

    #[test]
    fn test_only_c_copies() {
        let mut app = app();
        let mut clipboard = MemoryClipboard::default();
        app.handle_key(press(KeyCode::Enter), &mut clipboard);
        app.handle_key(press(KeyCode::Char('y')), &mut clipboard);
        assert_eq!(app.display.copy_state(), CopyState::Ready);
        assert!(clipboard.contents.is_none());
    }

    #[test]
    fn test_wrapped_rows() {
        assert_eq!(wrapped_rows("", 20), 1);
        assert_eq!(wrapped_rows("short line", 20), 1);
        assert_eq!(wrapped_rows("aaaa bbbb cccc dddd", 10), 2);
        assert_eq!(wrapped_rows("aaaa bbbb cccc dddd", 6), 4);
        assert_eq!(wrapped_rows(&"x".repeat(25), 11), 3);
        assert_eq!(wrapped_rows("word", 0), 4);
    }
}
