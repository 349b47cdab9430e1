//! Cell roles and cell values.
//!
//! A view asks a model for one aspect of a cell at a time: the text it shows,
//! the value an editor starts from, or the checkbox state. Rig cells are plain
//! names and weights, so the value type is a small closed enum.

/// The aspect of a cell being read or written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRole {
    /// Name, weight or usage tag as shown.
    Display,
    /// The value an editor starts from; rig cells show what they edit.
    Edit,
    /// The enabled checkbox of a control, or a falloff's subscription state.
    CheckState,
}

/// Tri-state checkbox value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckState {
    #[default]
    Unchecked,
    /// Some, but not all, of the selected sliders.
    PartiallyChecked,
    Checked,
}

impl From<bool> for CheckState {
    fn from(checked: bool) -> Self {
        if checked { CheckState::Checked } else { CheckState::Unchecked }
    }
}

/// A cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ItemData {
    #[default]
    None,
    /// Names and usage tags.
    String(String),
    /// Choice indexes (falloff split type and axis).
    Int(i64),
    /// Weights and handle values.
    Float(f64),
    Bool(bool),
    CheckState(CheckState),
}

impl ItemData {
    pub fn is_none(&self) -> bool {
        matches!(self, ItemData::None)
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            ItemData::String(s) => Some(s),
            _ => None,
        }
    }

    /// Reads a number. Integers widen and strings are parsed, so a text
    /// editor can commit `"0.5"` into a weight column.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ItemData::Float(n) => Some(*n),
            ItemData::Int(n) => Some(*n as f64),
            ItemData::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Reads a checkbox value; booleans map to checked/unchecked.
    pub fn as_check_state(&self) -> Option<CheckState> {
        match self {
            ItemData::CheckState(state) => Some(*state),
            ItemData::Bool(b) => Some(CheckState::from(*b)),
            _ => None,
        }
    }
}

impl From<String> for ItemData {
    fn from(s: String) -> Self {
        ItemData::String(s)
    }
}

impl From<&str> for ItemData {
    fn from(s: &str) -> Self {
        ItemData::String(s.to_owned())
    }
}

impl From<i64> for ItemData {
    fn from(n: i64) -> Self {
        ItemData::Int(n)
    }
}

impl From<f64> for ItemData {
    fn from(n: f64) -> Self {
        ItemData::Float(n)
    }
}

impl From<bool> for ItemData {
    fn from(b: bool) -> Self {
        ItemData::Bool(b)
    }
}

impl From<CheckState> for ItemData {
    fn from(state: CheckState) -> Self {
        ItemData::CheckState(state)
    }
}

/// Missing values become [`ItemData::None`].
impl<T: Into<ItemData>> From<Option<T>> for ItemData {
    fn from(value: Option<T>) -> Self {
        value.map_or(ItemData::None, Into::into)
    }
}
