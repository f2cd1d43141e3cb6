use std::num::IntErrorKind;

use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveDate};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{format_date, parse_amount, parse_date, Book, Fine, Loan, Review, User};

use super::screens::Tab;

/// Days granted by default between the loan date and the due date.
const DEFAULT_LOAN_DAYS: i64 = 14;

/// Input rules for a single form field.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum FieldKind {
    Text,
    /// Digits with an optional leading minus, so out-of-range numbers still
    /// reach the service and come back with its message.
    Integer,
    /// `YYYY-MM-DD`.
    Date,
    /// Money typed as `12`, `12.5` or `12,50`.
    Amount,
    /// `yes` / `no`, blank allowed when the field is optional.
    Flag,
}

#[derive(Clone, Debug)]
pub(crate) struct FormField {
    pub(crate) label: &'static str,
    pub(crate) value: String,
    pub(crate) kind: FieldKind,
    pub(crate) required: bool,
}

impl FormField {
    fn new(label: &'static str, kind: FieldKind, required: bool) -> Self {
        Self {
            label,
            value: String::new(),
            kind,
            required,
        }
    }

    fn with_value<S: Into<String>>(mut self, value: S) -> Self {
        self.value = value.into();
        self
    }

    fn placeholder(&self) -> &'static str {
        match (self.kind, self.required) {
            (FieldKind::Date, _) => "<YYYY-MM-DD>",
            (FieldKind::Flag, _) => "<yes/no>",
            (_, true) => "<required>",
            (_, false) => "<optional>",
        }
    }

    fn accepts(&self, ch: char) -> bool {
        match self.kind {
            FieldKind::Text => !ch.is_control(),
            FieldKind::Integer => ch.is_ascii_digit() || (ch == '-' && self.value.is_empty()),
            FieldKind::Date => ch.is_ascii_digit() || ch == '-',
            FieldKind::Amount => ch.is_ascii_digit() || ch == '.' || ch == ',',
            FieldKind::Flag => false,
        }
    }

    /// Flags are not typed: `y`/`n` pick a value and Space cycles through the
    /// allowed ones (including blank for optional flags).
    fn set_flag(&mut self, ch: char) -> bool {
        let next = match ch {
            'y' | 'Y' => "yes",
            'n' | 'N' => "no",
            ' ' => match (self.value.as_str(), self.required) {
                ("yes", _) => "no",
                ("no", true) => "yes",
                ("no", false) => "",
                _ => "yes",
            },
            _ => return false,
        };
        self.value = next.to_string();
        true
    }
}

/// Generic modal form: a vertical list of labelled fields with one active.
#[derive(Clone, Debug, Default)]
pub(crate) struct Form {
    pub(crate) fields: Vec<FormField>,
    pub(crate) active: usize,
    pub(crate) error: Option<String>,
}

impl Form {
    fn new(fields: Vec<FormField>) -> Self {
        Self {
            fields,
            active: 0,
            error: None,
        }
    }

    /// Move focus to the next field, wrapping around.
    pub(crate) fn toggle_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + 1) % self.fields.len();
        }
    }

    pub(crate) fn previous_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Insert a character into the active field, validating allowed input.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        let Some(field) = self.fields.get_mut(self.active) else {
            return false;
        };
        if field.kind == FieldKind::Flag {
            return field.set_flag(ch);
        }
        if field.accepts(ch) {
            field.value.push(ch);
            true
        } else {
            false
        }
    }

    pub(crate) fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.active) {
            if field.kind == FieldKind::Flag {
                if !field.required {
                    field.value.clear();
                }
            } else {
                field.value.pop();
            }
        }
    }

    fn field(&self, label: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.label == label)
    }

    /// Trimmed value of a field, empty when the form has no such field.
    pub(crate) fn text(&self, label: &str) -> String {
        self.field(label)
            .map(|field| field.value.trim().to_string())
            .unwrap_or_default()
    }

    /// Trimmed value, or `None` when blank.
    pub(crate) fn optional_text(&self, label: &str) -> Option<String> {
        let value = self.text(label);
        (!value.is_empty()).then_some(value)
    }

    pub(crate) fn required_text(&self, label: &str) -> Result<String> {
        self.optional_text(label)
            .ok_or_else(|| anyhow!("{label} is required."))
    }

    /// Digit strings too long for `i64` saturate, so the service's own
    /// range check reports them.
    pub(crate) fn integer(&self, label: &str) -> Result<Option<i64>> {
        let Some(raw) = self.optional_text(label) else {
            return Ok(None);
        };
        match raw.parse::<i64>() {
            Ok(value) => Ok(Some(value)),
            Err(err) => match err.kind() {
                IntErrorKind::PosOverflow => Ok(Some(i64::MAX)),
                IntErrorKind::NegOverflow => Ok(Some(i64::MIN)),
                _ => Err(anyhow!("{label} must be a whole number.")),
            },
        }
    }

    pub(crate) fn required_integer(&self, label: &str) -> Result<i64> {
        self.integer(label)?
            .ok_or_else(|| anyhow!("{label} is required."))
    }

    pub(crate) fn date(&self, label: &str) -> Result<Option<NaiveDate>> {
        match self.optional_text(label) {
            None => Ok(None),
            Some(raw) => parse_date(&raw)
                .map(Some)
                .ok_or_else(|| anyhow!("{label} must be a date like 2025-11-30.")),
        }
    }

    pub(crate) fn required_date(&self, label: &str) -> Result<NaiveDate> {
        self.date(label)?
            .ok_or_else(|| anyhow!("{label} is required."))
    }

    pub(crate) fn required_amount(&self, label: &str) -> Result<i64> {
        let raw = self.required_text(label)?;
        parse_amount(&raw).ok_or_else(|| anyhow!("{label} must be an amount like 12.50."))
    }

    pub(crate) fn flag(&self, label: &str) -> Option<bool> {
        match self.text(label).as_str() {
            "yes" => Some(true),
            "no" => Some(false),
            _ => None,
        }
    }

    /// Filter values in field order, as stored on the list screen.
    pub(crate) fn values(&self) -> Vec<String> {
        self.fields.iter().map(|field| field.value.clone()).collect()
    }

    pub(crate) fn clear_values(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
        }
        self.error = None;
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, index: usize) -> Line<'static> {
        let Some(field) = self.fields.get(index) else {
            return Line::from("");
        };
        let is_active = index == self.active;
        let display = if field.value.is_empty() {
            field.placeholder().to_string()
        } else {
            field.value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if field.value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label)),
            Span::styled(display, style),
        ])
    }

    /// Cursor column offset for the active field, relative to the form body.
    pub(crate) fn cursor_offset(&self) -> (u16, u16) {
        match self.fields.get(self.active) {
            Some(field) => {
                let prefix = field.label.chars().count() + 2;
                (
                    (prefix + field.value.chars().count()) as u16,
                    self.active as u16,
                )
            }
            None => (0, 0),
        }
    }
}

/// Form for creating a record on `tab`. `nickname` pre-fills the author or
/// borrower fields with the acting user.
pub(crate) fn create_form(tab: Tab, nickname: &str, today: NaiveDate) -> Form {
    use FieldKind::*;
    let fields = match tab {
        Tab::Users => vec![
            FormField::new("Name", Text, true),
            FormField::new("Nickname", Text, true),
            FormField::new("Phone", Text, false),
            FormField::new("Email", Text, true),
            FormField::new("Profile", Text, true).with_value("Reader"),
        ],
        Tab::Books => vec![
            FormField::new("Code", Text, true),
            FormField::new("Title", Text, true),
            FormField::new("Author", Text, false),
            FormField::new("Year", Integer, false),
        ],
        Tab::Loans => vec![
            FormField::new("Code", Text, true),
            FormField::new("Nickname", Text, true),
            FormField::new("Book code", Text, true),
            FormField::new("Loan date", Date, true).with_value(format_date(today)),
            FormField::new("Due date", Date, true)
                .with_value(format_date(today + Duration::days(DEFAULT_LOAN_DAYS))),
        ],
        Tab::Fines => vec![
            FormField::new("Code", Text, true),
            FormField::new("Nickname", Text, true),
            FormField::new("Loan code", Text, false),
            FormField::new("Amount", Amount, true),
        ],
        Tab::Reviews => vec![
            FormField::new("Book code", Text, true),
            FormField::new("Nickname", Text, true).with_value(nickname),
            FormField::new("Stars", Integer, true),
            FormField::new("Comment", Text, false),
        ],
    };
    Form::new(fields)
}

pub(crate) fn user_edit_form(user: &User) -> Form {
    use FieldKind::*;
    Form::new(vec![
        FormField::new("Name", Text, true).with_value(user.name.clone()),
        FormField::new("Nickname", Text, true).with_value(user.nickname.clone()),
        FormField::new("Phone", Text, false).with_value(user.phone.clone()),
        FormField::new("Email", Text, true).with_value(user.email.clone()),
        FormField::new("Profile", Text, true).with_value(user.profile.label()),
    ])
}

/// The catalogue code is shown in the dialog title, not as a field.
pub(crate) fn book_edit_form(book: &Book) -> Form {
    use FieldKind::*;
    Form::new(vec![
        FormField::new("Title", Text, true).with_value(book.title.clone()),
        FormField::new("Author", Text, false).with_value(book.author.clone()),
        FormField::new("Year", Integer, false)
            .with_value(book.year.map(|year| year.to_string()).unwrap_or_default()),
    ])
}

pub(crate) fn loan_edit_form(loan: &Loan) -> Form {
    use FieldKind::*;
    Form::new(vec![
        FormField::new("Due date", Date, true).with_value(format_date(loan.due_on)),
        FormField::new("Returned on", Date, false)
            .with_value(loan.returned_on.map(format_date).unwrap_or_default()),
    ])
}

pub(crate) fn fine_edit_form(fine: &Fine) -> Form {
    use FieldKind::*;
    Form::new(vec![
        FormField::new("Amount", Amount, true).with_value(fine.amount_display()),
        FormField::new("Paid", Flag, true).with_value(if fine.paid { "yes" } else { "no" }),
    ])
}

/// Editing a review only exposes the two writable fields.
pub(crate) fn review_edit_form(review: &Review) -> Form {
    use FieldKind::*;
    Form::new(vec![
        FormField::new("Stars", Integer, true).with_value(review.stars.to_string()),
        FormField::new("Comment", Text, false).with_value(review.comment.clone()),
    ])
}

/// Inline filter editor seeded with the values currently applied on `tab`.
pub(crate) fn filter_form(tab: Tab, current: &[String]) -> Form {
    let fields = tab
        .filter_labels()
        .iter()
        .enumerate()
        .map(|(idx, &label)| {
            let kind = if tab == Tab::Fines && label == "Paid" {
                FieldKind::Flag
            } else {
                FieldKind::Text
            };
            FormField::new(label, kind, false)
                .with_value(current.get(idx).cloned().unwrap_or_default())
        })
        .collect();
    Form::new(fields)
}

/// State for confirming the removal of a record.
#[derive(Clone, Debug)]
pub(crate) struct ConfirmDelete {
    pub(crate) tab: Tab,
    pub(crate) id: uuid::Uuid,
    pub(crate) description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 20).unwrap()
    }

    #[test]
    fn integer_fields_only_take_digits_and_a_leading_minus() {
        let mut form = create_form(Tab::Reviews, "ana", today());
        form.active = 2;
        assert!(form.push_char('-'));
        assert!(form.push_char('3'));
        assert!(!form.push_char('-'));
        assert!(!form.push_char('x'));
        assert_eq!(form.required_integer("Stars").unwrap(), -3);
    }

    #[test]
    fn oversized_integers_saturate_instead_of_failing() {
        let mut form = create_form(Tab::Reviews, "ana", today());
        form.active = 2;
        for ch in "99999999999999999999".chars() {
            assert!(form.push_char(ch));
        }
        assert_eq!(form.required_integer("Stars").unwrap(), i64::MAX);

        form.fields[2].value = "-99999999999999999999".into();
        assert_eq!(form.required_integer("Stars").unwrap(), i64::MIN);

        form.fields[2].value = "-".into();
        let err = form.required_integer("Stars").unwrap_err();
        assert_eq!(err.to_string(), "Stars must be a whole number.");
    }

    #[test]
    fn review_create_form_prefills_acting_nickname() {
        let form = create_form(Tab::Reviews, "ana", today());
        assert_eq!(form.text("Nickname"), "ana");
        let err = form.required_text("Book code").unwrap_err();
        assert_eq!(err.to_string(), "Book code is required.");
    }

    #[test]
    fn loan_form_defaults_to_two_week_term() {
        let form = create_form(Tab::Loans, "ana", today());
        assert_eq!(form.required_date("Loan date").unwrap(), today());
        assert_eq!(
            form.required_date("Due date").unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 4).unwrap()
        );
    }

    #[test]
    fn optional_flags_cycle_through_blank() {
        let mut form = filter_form(Tab::Fines, &[]);
        form.active = 2;
        assert_eq!(form.flag("Paid"), None);
        form.push_char(' ');
        assert_eq!(form.flag("Paid"), Some(true));
        form.push_char(' ');
        assert_eq!(form.flag("Paid"), Some(false));
        form.push_char(' ');
        assert_eq!(form.flag("Paid"), None);
        form.push_char('n');
        form.backspace();
        assert_eq!(form.flag("Paid"), None);
    }

    #[test]
    fn tab_wraps_and_cursor_tracks_active_field() {
        let mut form = review_edit_form(&Review {
            id: uuid::Uuid::new_v4(),
            nickname: "ana".into(),
            book_code: "1001".into(),
            stars: 4,
            comment: "ok".into(),
            reviewed_on: today(),
        });
        assert_eq!(form.cursor_offset(), ("Stars: 4".len() as u16, 0));
        form.toggle_field();
        assert_eq!(form.cursor_offset(), ("Comment: ok".len() as u16, 1));
        form.toggle_field();
        assert_eq!(form.active, 0);
        form.previous_field();
        assert_eq!(form.active, 1);
    }
}
