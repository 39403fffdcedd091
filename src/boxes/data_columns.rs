use super::InputEvent;
use crate::data::model::{ColumnSelection, Dataset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    X,
    Xerr,
    Y,
    Yerr,
}

impl ColumnRole {
    /// Also the positional default order: x, xerr, y, yerr.
    pub const ALL: [ColumnRole; 4] = [ColumnRole::X, ColumnRole::Xerr, ColumnRole::Y, ColumnRole::Yerr];

    pub fn label(self) -> &'static str {
        match self {
            ColumnRole::X => "x",
            ColumnRole::Xerr => "xerr",
            ColumnRole::Y => "y",
            ColumnRole::Yerr => "yerr",
        }
    }

    fn index(self) -> usize {
        match self {
            ColumnRole::X => 0,
            ColumnRole::Xerr => 1,
            ColumnRole::Y => 2,
            ColumnRole::Yerr => 3,
        }
    }
}

/// Which dataset column plays each role.
#[derive(Debug, Default)]
pub struct DataColumnsBox {
    columns: Vec<String>,
    selected: [Option<String>; 4],
}

impl DataColumnsBox {
    /// Load the column names of a new dataset and pick default roles: a
    /// column named after the role if there is one, else the positional one.
    pub fn update_data(&mut self, dataset: Option<&Dataset>) {
        self.columns = dataset.map(Dataset::column_names).unwrap_or_default();
        for role in ColumnRole::ALL {
            let by_name = self
                .columns
                .iter()
                .find(|c| c.eq_ignore_ascii_case(role.label()));
            let chosen = by_name.or_else(|| self.columns.get(role.index()));
            self.selected[role.index()] = chosen.cloned();
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn selected(&self, role: ColumnRole) -> Option<&str> {
        self.selected[role.index()].as_deref()
    }

    /// Assign `name` to `role`; an event is returned only on an actual change.
    pub fn set_column(&mut self, role: ColumnRole, name: impl Into<String>) -> Option<InputEvent> {
        let name = name.into();
        let slot = &mut self.selected[role.index()];
        if slot.as_deref() == Some(name.as_str()) {
            return None;
        }
        *slot = Some(name);
        Some(InputEvent::ColumnsChanged)
    }

    /// All four roles, once every one has a column.
    pub fn selection(&self) -> Option<ColumnSelection> {
        Some(ColumnSelection {
            x: self.selected(ColumnRole::X)?.to_string(),
            xerr: self.selected(ColumnRole::Xerr)?.to_string(),
            y: self.selected(ColumnRole::Y)?.to_string(),
            yerr: self.selected(ColumnRole::Yerr)?.to_string(),
        })
    }
}
