//! Persisted table schema.

use std::fmt::{Display, Formatter};

/// One of the four flat tables backing the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Boards,
    Lists,
    Tasks,
}

impl Table {
    /// Tables in load order: every table's parents come before it.
    pub const ALL: [Table; 4] = [Table::Users, Table::Boards, Table::Lists, Table::Tasks];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Users => "users.csv",
            Self::Boards => "boards.csv",
            Self::Lists => "lists.csv",
            Self::Tasks => "tasks.csv",
        }
    }

    /// Column names written as the first line.
    pub fn header(self) -> &'static [&'static str] {
        match self {
            Self::Users => &["Username", "Password"],
            Self::Boards => &["Board ID", "Board Name", "Username"],
            Self::Lists => &["List ID", "List Name", "Board ID"],
            Self::Tasks => &["Task ID", "Task Name", "Priority", "Date", "List ID"],
        }
    }

    /// Minimum field count of a usable data row.
    pub fn required_fields(self) -> usize {
        self.header().len()
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file_name())
    }
}
