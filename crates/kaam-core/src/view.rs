//! Filter-then-sort pipeline that derives the displayed task sequence.

use std::cmp::Ordering;
use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::task::Task;

/// Which tasks are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Every task.
    #[default]
    All,
    /// Tasks that are not completed.
    Active,
    /// Completed tasks.
    Completed,
}

impl Filter {
    /// Filters in selector order.
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Whether `task` is kept by this filter.
    #[must_use]
    pub const fn keeps(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }

    /// Label shown to users.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// Following filter in selector order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active => Self::Completed,
            Self::Completed => Self::All,
        }
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    /// Keep insertion order.
    #[default]
    Default,
    /// Alphabetical by text.
    TaskName,
    /// Highest priority first.
    Priority,
    /// Earliest due date first, undated last.
    DueDate,
}

impl SortOption {
    /// Sort options in selector order.
    pub const ALL: [Self; 4] = [Self::Default, Self::TaskName, Self::Priority, Self::DueDate];

    /// Label shown to users.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::TaskName => "Task Name",
            Self::Priority => "Priority",
            Self::DueDate => "Due Date",
        }
    }

    /// Following option in selector order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Default => Self::TaskName,
            Self::TaskName => Self::Priority,
            Self::Priority => Self::DueDate,
            Self::DueDate => Self::Default,
        }
    }

    fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::Default => Ordering::Equal,
            Self::TaskName => locale_cmp(&a.text, &b.text),
            Self::Priority => b.priority.weight().cmp(&a.priority.weight()),
            Self::DueDate => match (a.due_date, b.due_date) {
                (Some(left), Some(right)) => left.cmp(&right),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raised when a selector label is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewParseError {
    /// Unknown filter label.
    #[error("unknown filter: {0} (expected All, Active or Completed)")]
    Filter(String),
    /// Unknown sort label.
    #[error("unknown sort option: {0} (expected Default, Task Name, Priority or Due Date)")]
    Sort(String),
}

fn normalize_label(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace(['-', '_', ' '], "")
}

impl FromStr for Filter {
    type Err = ViewParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(ViewParseError::Filter(s.to_owned())),
        }
    }
}

impl FromStr for SortOption {
    type Err = ViewParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "default" | "none" => Ok(Self::Default),
            "taskname" | "name" | "text" => Ok(Self::TaskName),
            "priority" => Ok(Self::Priority),
            "duedate" | "due" => Ok(Self::DueDate),
            _ => Err(ViewParseError::Sort(s.to_owned())),
        }
    }
}

macro_rules! label_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                s.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(d: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(d)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

label_serde!(Filter);
label_serde!(SortOption);

/// Compare display texts ignoring case, with lowercase before uppercase
/// when texts differ only in case.
///
/// Only case is folded. Accented letters keep their code point order, so
/// "é" sorts after "z" rather than next to "e".
#[must_use]
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    // Uppercase code points are lower, so the raw tie-break is reversed.
    folded.then_with(|| b.cmp(a))
}

/// Derive the displayed sequence: keep tasks matching `filter`, then apply
/// a stable sort by `sort`. The input is never reordered.
#[must_use]
pub fn derive(tasks: &[Task], filter: Filter, sort: SortOption) -> Vec<&Task> {
    let mut visible: Vec<&Task> = tasks.iter().filter(|task| filter.keeps(task)).collect();
    if sort != SortOption::Default {
        visible.sort_by(|a, b| sort.compare(a, b));
    }
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priority::Priority;
    use time::macros::date;

    fn task(text: &str, priority: Priority, completed: bool) -> Task {
        let mut task = Task::new(text, priority, None);
        task.completed = completed;
        task
    }

    fn texts<'a>(tasks: &[&'a Task]) -> Vec<&'a str> {
        tasks.iter().map(|task| task.text.as_str()).collect()
    }

    #[test]
    fn filter_stage_selects_by_completion() {
        let tasks = vec![
            task("a", Priority::Low, false),
            task("b", Priority::Low, true),
            task("c", Priority::Low, false),
        ];
        assert_eq!(texts(&derive(&tasks, Filter::All, SortOption::Default)), ["a", "b", "c"]);
        assert_eq!(texts(&derive(&tasks, Filter::Active, SortOption::Default)), ["a", "c"]);
        assert_eq!(texts(&derive(&tasks, Filter::Completed, SortOption::Default)), ["b"]);
    }

    #[test]
    fn name_sort_ignores_case() {
        let tasks = vec![
            task("banana", Priority::Low, false),
            task("Apple", Priority::Low, false),
            task("cherry", Priority::Low, false),
        ];
        assert_eq!(
            texts(&derive(&tasks, Filter::All, SortOption::TaskName)),
            ["Apple", "banana", "cherry"]
        );
    }

    #[test]
    fn name_sort_puts_lowercase_first_on_case_ties() {
        assert_eq!(locale_cmp("a", "A"), Ordering::Less);
        assert_eq!(locale_cmp("Apple", "apple"), Ordering::Greater);
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);

        let tasks = vec![
            task("Milk", Priority::Low, false),
            task("milk", Priority::Low, false),
        ];
        assert_eq!(texts(&derive(&tasks, Filter::All, SortOption::TaskName)), ["milk", "Milk"]);
    }

    #[test]
    fn priority_sort_is_descending_and_stable() {
        let tasks = vec![
            task("low", Priority::Low, false),
            task("high-1", Priority::High, false),
            task("medium", Priority::Medium, false),
            task("high-2", Priority::High, false),
        ];
        assert_eq!(
            texts(&derive(&tasks, Filter::All, SortOption::Priority)),
            ["high-1", "high-2", "medium", "low"]
        );
    }

    #[test]
    fn due_date_sort_puts_undated_last() {
        let mut late = task("late", Priority::Low, false);
        late.due_date = Some(date!(2026 - 12 - 01));
        let mut early = task("early", Priority::Low, false);
        early.due_date = Some(date!(2026 - 10 - 20));
        let undated = task("undated", Priority::Low, false);
        let tasks = vec![undated, late, early];
        assert_eq!(
            texts(&derive(&tasks, Filter::All, SortOption::DueDate)),
            ["early", "late", "undated"]
        );
    }

    #[test]
    fn derive_leaves_input_untouched() {
        let tasks = vec![task("b", Priority::Low, false), task("a", Priority::High, false)];
        let before = tasks.clone();
        let _ = derive(&tasks, Filter::All, SortOption::TaskName);
        assert_eq!(tasks, before);
    }

    #[test]
    fn labels_parse_in_several_spellings() {
        assert_eq!("Task Name".parse(), Ok(SortOption::TaskName));
        assert_eq!("task-name".parse(), Ok(SortOption::TaskName));
        assert_eq!("due_date".parse(), Ok(SortOption::DueDate));
        assert_eq!("COMPLETED".parse(), Ok(Filter::Completed));
        assert!("newest".parse::<SortOption>().is_err());
        assert!("pending".parse::<Filter>().is_err());
    }

    #[test]
    fn labels_roundtrip_through_display() {
        for sort in SortOption::ALL {
            assert_eq!(sort.to_string().parse(), Ok(sort));
        }
        for filter in Filter::ALL {
            assert_eq!(filter.to_string().parse(), Ok(filter));
        }
    }

    #[test]
    fn next_cycles_through_every_option() {
        let mut sort = SortOption::Default;
        for expected in [SortOption::TaskName, SortOption::Priority, SortOption::DueDate, SortOption::Default] {
            sort = sort.next();
            assert_eq!(sort, expected);
        }
        assert_eq!(Filter::Completed.next(), Filter::All);
    }
}
