use ratatui::layout::Constraint;
use uuid::Uuid;

/// The five management screens, in tab-bar order.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Tab {
    Users,
    Books,
    Loans,
    Fines,
    Reviews,
}

impl Tab {
    pub(crate) const ALL: [Tab; 5] = [Tab::Users, Tab::Books, Tab::Loans, Tab::Fines, Tab::Reviews];

    pub(crate) fn index(self) -> usize {
        match self {
            Tab::Users => 0,
            Tab::Books => 1,
            Tab::Loans => 2,
            Tab::Fines => 3,
            Tab::Reviews => 4,
        }
    }

    pub(crate) fn from_index(index: usize) -> Option<Tab> {
        Self::ALL.get(index).copied()
    }

    pub(crate) fn next(self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub(crate) fn previous(self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub(crate) fn title(self) -> &'static str {
        match self {
            Tab::Users => "Users",
            Tab::Books => "Books",
            Tab::Loans => "Loans",
            Tab::Fines => "Fines",
            Tab::Reviews => "Reviews",
        }
    }

    /// Singular noun used in dialogs and status messages.
    pub(crate) fn noun(self) -> &'static str {
        match self {
            Tab::Users => "User",
            Tab::Books => "Book",
            Tab::Loans => "Loan",
            Tab::Fines => "Fine",
            Tab::Reviews => "Review",
        }
    }

    pub(crate) fn headers(self) -> &'static [&'static str] {
        match self {
            Tab::Users => &["Code", "Name", "Nickname", "Phone", "Email", "Profile"],
            Tab::Books => &["Code", "Title", "Author", "Year"],
            Tab::Loans => &["Code", "User", "Book", "Loaned", "Due", "Returned", "Status"],
            Tab::Fines => &["Code", "User", "Loan", "Amount", "Issued", "Paid"],
            Tab::Reviews => &["Book", "Nickname", "Stars", "Comment", "Date"],
        }
    }

    pub(crate) fn widths(self) -> Vec<Constraint> {
        match self {
            Tab::Users => vec![
                Constraint::Length(6),
                Constraint::Percentage(25),
                Constraint::Percentage(15),
                Constraint::Length(16),
                Constraint::Percentage(25),
                Constraint::Length(14),
            ],
            Tab::Books => vec![
                Constraint::Length(8),
                Constraint::Percentage(45),
                Constraint::Percentage(35),
                Constraint::Length(6),
            ],
            Tab::Loans => vec![
                Constraint::Length(8),
                Constraint::Percentage(20),
                Constraint::Length(8),
                Constraint::Length(11),
                Constraint::Length(11),
                Constraint::Length(11),
                Constraint::Length(9),
            ],
            Tab::Fines => vec![
                Constraint::Length(8),
                Constraint::Percentage(25),
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(11),
                Constraint::Length(5),
            ],
            Tab::Reviews => vec![
                Constraint::Length(8),
                Constraint::Length(14),
                Constraint::Length(13),
                Constraint::Min(20),
                Constraint::Length(11),
            ],
        }
    }

    /// Labels of the inline filter fields, in the order the values are kept.
    pub(crate) fn filter_labels(self) -> &'static [&'static str] {
        match self {
            Tab::Users => &["Name", "Nickname"],
            Tab::Books => &["Code", "Title", "Author"],
            Tab::Loans => &["Code", "Nickname", "Book code", "Loan date"],
            Tab::Fines => &["Nickname", "Loan code", "Paid"],
            Tab::Reviews => &["Book code", "Nickname", "Review date"],
        }
    }
}

/// One rendered table row together with the id of the record behind it.
#[derive(Clone, Debug)]
pub(crate) struct TableRow {
    pub(crate) id: Uuid,
    pub(crate) cells: Vec<String>,
}

/// Rows, selection and filter values for one tab.
pub(crate) struct ListScreen {
    pub(crate) tab: Tab,
    pub(crate) rows: Vec<TableRow>,
    pub(crate) selected: usize,
    pub(crate) filters: Vec<String>,
}

impl ListScreen {
    pub(crate) fn new(tab: Tab) -> Self {
        Self {
            tab,
            rows: Vec::new(),
            selected: 0,
            filters: vec![String::new(); tab.filter_labels().len()],
        }
    }

    /// Replace the rows after a fetch, keeping the cursor on `focus` when it
    /// is still listed.
    pub(crate) fn set_rows(&mut self, rows: Vec<TableRow>, focus: Option<Uuid>) {
        self.rows = rows;
        if let Some(id) = focus {
            if let Some(idx) = self.rows.iter().position(|row| row.id == id) {
                self.selected = idx;
                return;
            }
        }
        self.ensure_in_bounds();
    }

    pub(crate) fn current(&self) -> Option<&TableRow> {
        self.rows.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.rows.is_empty() {
            return;
        }
        let len = self.rows.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    pub(crate) fn ensure_in_bounds(&mut self) {
        if self.rows.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.rows.len() {
            self.selected = self.rows.len() - 1;
        }
    }

    /// Filter value at `index`, or `None` when blank so the service treats
    /// it as absent.
    pub(crate) fn filter(&self, index: usize) -> Option<String> {
        self.filters
            .get(index)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    pub(crate) fn has_filters(&self) -> bool {
        self.filters.iter().any(|value| !value.trim().is_empty())
    }

    pub(crate) fn clear_filters(&mut self) {
        for value in &mut self.filters {
            value.clear();
        }
    }

    /// `Nickname: bi  Book code: 10`, shown above the table.
    pub(crate) fn filter_summary(&self) -> String {
        self.tab
            .filter_labels()
            .iter()
            .zip(&self.filters)
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(label, value)| format!("{label}: {}", value.trim()))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(count: usize) -> Vec<TableRow> {
        (0..count)
            .map(|i| TableRow {
                id: Uuid::new_v4(),
                cells: vec![i.to_string()],
            })
            .collect()
    }

    #[test]
    fn tabs_cycle_in_both_directions() {
        assert_eq!(Tab::Reviews.next(), Tab::Users);
        assert_eq!(Tab::Users.previous(), Tab::Reviews);
        assert_eq!(Tab::from_index(2), Some(Tab::Loans));
        assert_eq!(Tab::from_index(5), None);
        for tab in Tab::ALL {
            assert_eq!(tab.headers().len(), tab.widths().len());
        }
    }

    #[test]
    fn selection_is_clamped_and_follows_focus() {
        let mut screen = ListScreen::new(Tab::Books);
        let fresh = rows(4);
        let focus = fresh[2].id;
        screen.set_rows(fresh, Some(focus));
        assert_eq!(screen.selected, 2);

        screen.move_selection(10);
        assert_eq!(screen.selected, 3);
        screen.move_selection(-10);
        assert_eq!(screen.selected, 0);

        screen.select_last();
        screen.set_rows(rows(2), None);
        assert_eq!(screen.selected, 1);
    }

    #[test]
    fn blank_filters_are_absent() {
        let mut screen = ListScreen::new(Tab::Reviews);
        screen.filters[1] = "  ".into();
        screen.filters[0] = " 100 ".into();
        assert_eq!(screen.filter(0).as_deref(), Some("100"));
        assert_eq!(screen.filter(1), None);
        assert_eq!(screen.filter_summary(), "Book code: 100");
        screen.clear_filters();
        assert!(!screen.has_filters());
    }
}
