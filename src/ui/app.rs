use std::mem;

use anyhow::{anyhow, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap};
use ratatui::Frame;
use tracing::debug;
use uuid::Uuid;

use crate::library::Library;
use crate::models::{
    format_date, Actor, BookFilter, BookPatch, FineFilter, FinePatch, LoanFilter, LoanPatch,
    NewBook, NewFine, NewLoan, NewReview, NewUser, Profile, ReviewFilter, ReviewPatch, UserFilter,
    UserPatch,
};

use super::forms::{
    book_edit_form, create_form, filter_form, fine_edit_form, loan_edit_form, review_edit_form,
    user_edit_form, ConfirmDelete, Form,
};
use super::helpers::{centered_rect, ellipsize, surface_error};
use super::screens::{ListScreen, TableRow, Tab};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of the tab bar, borders included.
const TAB_BAR_HEIGHT: u16 = 3;
/// Rows skipped by PageUp / PageDown.
const PAGE_STEP: isize = 10;
/// Longest comment rendered in the review table before it is cut.
const COMMENT_WIDTH: usize = 60;

/// What a submitted form writes to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Target {
    Create(Tab),
    Edit(Tab, Uuid),
}

impl Target {
    fn tab(self) -> Tab {
        match self {
            Target::Create(tab) | Target::Edit(tab, _) => tab,
        }
    }

    fn title(self) -> String {
        match self {
            Target::Create(tab) => format!("New {}", tab.noun()),
            Target::Edit(tab, _) => format!("Edit {}", tab.noun()),
        }
    }
}

/// Modes scoped to the current tab.
enum Mode {
    Normal,
    /// Inline filter editor. `previous` holds the values restored on Esc.
    Filtering {
        form: Form,
        previous: Vec<String>,
    },
    Editing {
        target: Target,
        form: Form,
    },
    ConfirmDelete(ConfirmDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    library: Library,
    actor: Actor,
    tab: Tab,
    screens: Vec<ListScreen>,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Build the app and fetch every tab once so switching is instant.
    pub fn new(library: Library, actor: Actor) -> Result<Self> {
        let mut app = Self {
            library,
            actor,
            tab: Tab::Users,
            screens: Tab::ALL.into_iter().map(ListScreen::new).collect(),
            mode: Mode::Normal,
            status: None,
        };
        for tab in Tab::ALL {
            app.reload(tab, None)?;
        }
        Ok(app)
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Filtering { form, previous } => self.handle_filter(code, form, previous)?,
            Mode::Editing { target, form } => self.handle_edit(code, target, form)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    /// Ctrl+R: drop every filter on the current tab and fetch again.
    pub(crate) fn handle_ctrl_r(&mut self) -> Result<()> {
        match &mut self.mode {
            Mode::Normal => {}
            Mode::Filtering { form, .. } => form.clear_values(),
            _ => return Ok(()),
        }
        self.screen_mut().clear_filters();
        self.reload(self.tab, None)?;
        self.set_status("Filters cleared.", StatusKind::Info);
        Ok(())
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Tab => self.switch_tab(self.tab.next())?,
            KeyCode::BackTab => self.switch_tab(self.tab.previous())?,
            KeyCode::Char(ch @ '1'..='5') => {
                let index = ch as usize - '1' as usize;
                if let Some(tab) = Tab::from_index(index) {
                    self.switch_tab(tab)?;
                }
            }
            KeyCode::Up => self.screen_mut().move_selection(-1),
            KeyCode::Down => self.screen_mut().move_selection(1),
            KeyCode::PageUp => self.screen_mut().move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.screen_mut().move_selection(PAGE_STEP),
            KeyCode::Home => self.screen_mut().select_first(),
            KeyCode::End => self.screen_mut().select_last(),
            KeyCode::Char('r') => {
                let focus = self.screen().current().map(|row| row.id);
                self.reload(self.tab, focus)?;
                self.set_status("Refreshed.", StatusKind::Info);
            }
            KeyCode::Char('f') | KeyCode::Char('/') => {
                self.clear_status();
                let previous = self.screen().filters.clone();
                let form = filter_form(self.tab, &previous);
                return Ok(Mode::Filtering { form, previous });
            }
            KeyCode::Char('+') => {
                self.clear_status();
                let form = create_form(self.tab, &self.actor.nickname, self.library.loans.today());
                return Ok(Mode::Editing {
                    target: Target::Create(self.tab),
                    form,
                });
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                let Some(id) = self.screen().current().map(|row| row.id) else {
                    self.set_status(self.nothing_selected(), StatusKind::Error);
                    return Ok(Mode::Normal);
                };
                match self.edit_form(self.tab, id) {
                    Ok(form) => {
                        self.clear_status();
                        return Ok(Mode::Editing {
                            target: Target::Edit(self.tab, id),
                            form,
                        });
                    }
                    Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
                }
            }
            KeyCode::Char('-') | KeyCode::Delete => {
                let Some(id) = self.screen().current().map(|row| row.id) else {
                    self.set_status(self.nothing_selected(), StatusKind::Error);
                    return Ok(Mode::Normal);
                };
                match self.describe(self.tab, id) {
                    Ok(description) => {
                        self.clear_status();
                        return Ok(Mode::ConfirmDelete(ConfirmDelete {
                            tab: self.tab,
                            id,
                            description,
                        }));
                    }
                    Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_filter(&mut self, code: KeyCode, mut form: Form, previous: Vec<String>) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.apply_filters(previous);
                self.set_status("Filter cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => {
                let summary = self.screen().filter_summary();
                if summary.is_empty() {
                    self.set_status("Showing every record.", StatusKind::Info);
                } else {
                    self.set_status(format!("Filtered by {summary}."), StatusKind::Info);
                }
                return Ok(Mode::Normal);
            }
            KeyCode::Tab => form.toggle_field(),
            KeyCode::BackTab => form.previous_field(),
            KeyCode::Up => self.screen_mut().move_selection(-1),
            KeyCode::Down => self.screen_mut().move_selection(1),
            KeyCode::Backspace => {
                form.backspace();
                form.error = self.apply_filters(form.values());
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = self.apply_filters(form.values());
                }
            }
            _ => {}
        }
        Ok(Mode::Filtering { form, previous })
    }

    fn handle_edit(&mut self, code: KeyCode, target: Target, mut form: Form) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab => form.toggle_field(),
            KeyCode::BackTab => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.submit(target, &form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::Editing { target, form })
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Err(err) = self.perform_delete(&confirm) {
                    self.set_status(surface_error(&err), StatusKind::Error);
                }
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    fn switch_tab(&mut self, tab: Tab) -> Result<()> {
        self.tab = tab;
        let focus = self.screen().current().map(|row| row.id);
        self.reload(tab, focus)?;
        self.clear_status();
        Ok(())
    }

    /// Store new filter values on the current tab and fetch again. Returns
    /// the message to show in the filter bar when the fetch fails.
    fn apply_filters(&mut self, values: Vec<String>) -> Option<String> {
        self.screen_mut().filters = values;
        match self.reload(self.tab, None) {
            Ok(()) => None,
            Err(err) => {
                let message = surface_error(&err);
                self.set_status(message.clone(), StatusKind::Error);
                Some(message)
            }
        }
    }

    fn submit(&mut self, target: Target, form: &Form) -> Result<()> {
        let (focus, message) = match target {
            Target::Create(tab) => self.save_new(tab, form)?,
            Target::Edit(tab, id) => self.save_existing(tab, id, form)?,
        };
        self.reload(target.tab(), Some(focus))?;
        self.set_status(message, StatusKind::Info);
        Ok(())
    }

    fn save_new(&mut self, tab: Tab, form: &Form) -> Result<(Uuid, String)> {
        let saved = match tab {
            Tab::Users => {
                let user = self.library.users.create(NewUser {
                    name: form.required_text("Name")?,
                    nickname: form.required_text("Nickname")?,
                    phone: form.text("Phone"),
                    email: form.text("Email"),
                    profile: parse_profile(form)?,
                })?;
                (user.id, format!("Added user {}.", user.nickname))
            }
            Tab::Books => {
                let book = self.library.books.create(NewBook {
                    code: form.required_text("Code")?,
                    title: form.required_text("Title")?,
                    author: form.text("Author"),
                    year: parse_year(form)?,
                })?;
                (book.id, format!("Added book {}.", book.code))
            }
            Tab::Loans => {
                let loan = self.library.loans.create(NewLoan {
                    code: form.required_text("Code")?,
                    nickname: form.required_text("Nickname")?,
                    book_code: form.required_text("Book code")?,
                    loaned_on: form.date("Loan date")?,
                    due_on: form.required_date("Due date")?,
                })?;
                (loan.id, format!("Added loan {}.", loan.code))
            }
            Tab::Fines => {
                let fine = self.library.fines.create(NewFine {
                    code: form.required_text("Code")?,
                    nickname: form.required_text("Nickname")?,
                    loan_code: form.text("Loan code"),
                    amount_cents: form.required_amount("Amount")?,
                })?;
                (fine.id, format!("Added fine {}.", fine.code))
            }
            Tab::Reviews => {
                let review = self.library.reviews.create(NewReview {
                    nickname: form.required_text("Nickname")?,
                    book_code: form.required_text("Book code")?,
                    stars: form.required_integer("Stars")?,
                    comment: form.text("Comment"),
                })?;
                (review.id, format!("Added review of book {}.", review.book_code))
            }
        };
        Ok(saved)
    }

    fn save_existing(&mut self, tab: Tab, id: Uuid, form: &Form) -> Result<(Uuid, String)> {
        let message = match tab {
            Tab::Users => {
                let user = self.library.users.update(
                    id,
                    UserPatch {
                        name: Some(form.required_text("Name")?),
                        nickname: Some(form.required_text("Nickname")?),
                        phone: Some(form.text("Phone")),
                        email: Some(form.text("Email")),
                        profile: Some(parse_profile(form)?),
                    },
                )?;
                format!("Updated user {}.", user.nickname)
            }
            Tab::Books => {
                let book = self.library.books.update(
                    id,
                    BookPatch {
                        title: Some(form.required_text("Title")?),
                        author: Some(form.text("Author")),
                        year: Some(parse_year(form)?),
                    },
                )?;
                format!("Updated book {}.", book.code)
            }
            Tab::Loans => {
                let loan = self.library.loans.update(
                    id,
                    LoanPatch {
                        due_on: Some(form.required_date("Due date")?),
                        returned_on: Some(form.date("Returned on")?),
                    },
                )?;
                format!("Updated loan {}.", loan.code)
            }
            Tab::Fines => {
                let fine = self.library.fines.update(
                    id,
                    FinePatch {
                        amount_cents: Some(form.required_amount("Amount")?),
                        paid: form.flag("Paid"),
                    },
                )?;
                format!("Updated fine {}.", fine.code)
            }
            Tab::Reviews => {
                let patch = ReviewPatch::default()
                    .stars(form.required_integer("Stars")?)
                    .comment(form.text("Comment"));
                let review = self.library.reviews.update(id, patch)?;
                format!("Updated review of book {}.", review.book_code)
            }
        };
        Ok((id, message))
    }

    fn perform_delete(&mut self, confirm: &ConfirmDelete) -> Result<()> {
        match confirm.tab {
            Tab::Users => self.library.users.delete(confirm.id, &self.actor)?,
            Tab::Books => self.library.books.delete(confirm.id)?,
            Tab::Loans => self.library.loans.delete(confirm.id)?,
            Tab::Fines => self.library.fines.delete(confirm.id)?,
            Tab::Reviews => self.library.reviews.delete(confirm.id, &self.actor)?,
        }
        self.reload(confirm.tab, None)?;
        self.set_status(format!("Deleted {}.", confirm.description), StatusKind::Info);
        Ok(())
    }

    fn edit_form(&self, tab: Tab, id: Uuid) -> Result<Form> {
        let form = match tab {
            Tab::Users => user_edit_form(&self.library.users.get(id)?),
            Tab::Books => book_edit_form(&self.library.books.get(id)?),
            Tab::Loans => loan_edit_form(&self.library.loans.get(id)?),
            Tab::Fines => fine_edit_form(&self.library.fines.get(id)?),
            Tab::Reviews => review_edit_form(&self.library.reviews.get(id)?),
        };
        Ok(form)
    }

    /// Short phrase naming a record in the delete dialog and status line.
    fn describe(&self, tab: Tab, id: Uuid) -> Result<String> {
        let description = match tab {
            Tab::Users => {
                let user = self.library.users.get(id)?;
                format!("user {} ({})", user.nickname, user.name)
            }
            Tab::Books => {
                let book = self.library.books.get(id)?;
                format!("book {} ({})", book.code, book.display_title())
            }
            Tab::Loans => format!("loan {}", self.library.loans.get(id)?.code),
            Tab::Fines => format!("fine {}", self.library.fines.get(id)?.code),
            Tab::Reviews => {
                let review = self.library.reviews.get(id)?;
                format!("review of book {} by {}", review.book_code, review.nickname)
            }
        };
        Ok(description)
    }

    /// Fetch `tab` with its current filters and keep the cursor on `focus`.
    fn reload(&mut self, tab: Tab, focus: Option<Uuid>) -> Result<()> {
        let rows = self.fetch_rows(tab)?;
        debug!(tab = tab.title(), rows = rows.len(), "tab reloaded");
        self.screens[tab.index()].set_rows(rows, focus);
        Ok(())
    }

    fn fetch_rows(&self, tab: Tab) -> Result<Vec<TableRow>> {
        let screen = &self.screens[tab.index()];
        let filtered = screen.has_filters();
        let rows = match tab {
            Tab::Users => {
                let filter = UserFilter {
                    name: screen.filter(0),
                    nickname: screen.filter(1),
                };
                self.library
                    .users
                    .list(filtered.then_some(&filter))?
                    .into_iter()
                    .map(|user| TableRow {
                        id: user.id,
                        cells: vec![
                            user.short_id(),
                            user.name,
                            user.nickname,
                            user.phone,
                            user.email,
                            user.profile.label().to_string(),
                        ],
                    })
                    .collect()
            }
            Tab::Books => {
                let filter = BookFilter {
                    code: screen.filter(0),
                    title: screen.filter(1),
                    author: screen.filter(2),
                };
                self.library
                    .books
                    .list(filtered.then_some(&filter))?
                    .into_iter()
                    .map(|book| TableRow {
                        id: book.id,
                        cells: vec![
                            book.code,
                            book.title,
                            book.author,
                            book.year.map(|year| year.to_string()).unwrap_or_default(),
                        ],
                    })
                    .collect()
            }
            Tab::Loans => {
                let filter = LoanFilter {
                    code: screen.filter(0),
                    nickname: screen.filter(1),
                    book_code: screen.filter(2),
                    loaned_on: screen.filter(3),
                };
                self.library
                    .loans
                    .list(filtered.then_some(&filter))?
                    .into_iter()
                    .map(|loan| {
                        let status = self.library.loans.status(&loan).to_string();
                        TableRow {
                            id: loan.id,
                            cells: vec![
                                loan.code,
                                loan.nickname,
                                loan.book_code,
                                format_date(loan.loaned_on),
                                format_date(loan.due_on),
                                loan.returned_on.map(format_date).unwrap_or_else(|| "-".into()),
                                status,
                            ],
                        }
                    })
                    .collect()
            }
            Tab::Fines => {
                let filter = FineFilter {
                    nickname: screen.filter(0),
                    loan_code: screen.filter(1),
                    paid: match screen.filter(2).as_deref() {
                        Some("yes") => Some(true),
                        Some("no") => Some(false),
                        _ => None,
                    },
                };
                self.library
                    .fines
                    .list(filtered.then_some(&filter))?
                    .into_iter()
                    .map(|fine| TableRow {
                        id: fine.id,
                        cells: vec![
                            fine.code.clone(),
                            fine.nickname.clone(),
                            fine.loan_code.clone(),
                            fine.amount_display(),
                            format_date(fine.issued_on),
                            if fine.paid { "yes" } else { "no" }.to_string(),
                        ],
                    })
                    .collect()
            }
            Tab::Reviews => {
                let filter = ReviewFilter {
                    book_code: screen.filter(0),
                    nickname: screen.filter(1),
                    reviewed_on: screen.filter(2),
                };
                self.library
                    .reviews
                    .list(filtered.then_some(&filter))?
                    .into_iter()
                    .map(|review| TableRow {
                        id: review.id,
                        cells: vec![
                            review.book_code.clone(),
                            review.nickname.clone(),
                            review.stars_display(),
                            ellipsize(&review.comment, COMMENT_WIDTH),
                            review.reviewed_on_display(),
                        ],
                    })
                    .collect()
            }
        };
        Ok(rows)
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(TAB_BAR_HEIGHT), Constraint::Min(0)])
            .split(content_area);
        self.draw_tab_bar(frame, chunks[0]);
        self.draw_table(frame, chunks[1]);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Filtering { form, .. } => self.draw_filter_bar(frame, chunks[1], form),
            Mode::Editing { target, form } => self.draw_form(frame, area, &target.title(), form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .map(|tab| Line::from(format!("{} {}", tab.index() + 1, tab.title())))
            .collect();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Estante Virtual | {} ", self.actor));
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let screen = self.screen();
        let summary = screen.filter_summary();
        let title = if summary.is_empty() {
            format!(" {} ({}) ", self.tab.title(), screen.rows.len())
        } else {
            format!(" {} ({}) | {} ", self.tab.title(), screen.rows.len(), summary)
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        if screen.rows.is_empty() {
            let message = if screen.has_filters() {
                "Nothing matches the current filters. Press Ctrl+R to clear them."
            } else {
                "Nothing here yet. Press '+' to add a record."
            };
            let paragraph = Paragraph::new(message)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }

        let header = Row::new(self.tab.headers().iter().map(|title| Cell::from(*title))).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        let rows = screen
            .rows
            .iter()
            .map(|row| Row::new(row.cells.iter().map(|cell| Cell::from(cell.clone()))));
        let table = Table::new(rows, self.tab.widths())
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(Some(screen.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&str, &str)] = match &self.mode {
            Mode::Normal => &[
                ("[Tab/1-5]", " Screen   "),
                ("[↑↓]", " Navigate   "),
                ("[f]", " Filter   "),
                ("[+]", " New   "),
                ("[e]", " Edit   "),
                ("[-]", " Delete   "),
                ("[Ctrl+R]", " Clear filters   "),
                ("[q]", " Quit"),
            ],
            Mode::Filtering { .. } => &[
                ("[Tab]", " Next field   "),
                ("[Enter]", " Keep   "),
                ("[Ctrl+R]", " Clear   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::Editing { .. } => &[
                ("[Tab]", " Next field   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::ConfirmDelete(_) => &[("[y]", " Delete   "), ("[n/Esc]", " Keep")],
        };
        let spans: Vec<Span<'static>> = keys
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(label.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_filter_bar(&self, frame: &mut Frame, area: Rect, form: &Form) {
        let height = (form.fields.len() as u16 + 3).min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Filter {}", self.tab.title()));
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = (0..form.fields.len())
            .map(|index| form.build_line(index))
            .collect();
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }
        frame.render_widget(Paragraph::new(lines), inner);

        let (offset_x, offset_y) = form.cursor_offset();
        frame.set_cursor_position((inner.x + offset_x, inner.y + offset_y));
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &Form) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = (0..form.fields.len())
            .map(|index| form.build_line(index))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (offset_x, offset_y) = form.cursor_offset();
        frame.set_cursor_position((inner.x + offset_x, inner.y + offset_y));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Removal")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete {}?", confirm.description)),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn screen(&self) -> &ListScreen {
        &self.screens[self.tab.index()]
    }

    fn screen_mut(&mut self) -> &mut ListScreen {
        &mut self.screens[self.tab.index()]
    }

    fn nothing_selected(&self) -> String {
        format!("No {} selected.", self.tab.noun().to_lowercase())
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

fn parse_profile(form: &Form) -> Result<Profile> {
    let raw = form.required_text("Profile")?;
    Profile::parse(&raw)
        .ok_or_else(|| anyhow!("Profile must be Administrator, Librarian or Reader."))
}

fn parse_year(form: &Form) -> Result<Option<i32>> {
    form.integer("Year")?
        .map(|year| i32::try_from(year).map_err(|_| anyhow!("Year is out of range.")))
        .transpose()
}
