/// Input boxes: the user-editable state the fit is built from.
///
/// Each box owns its values and reports user edits as an [`InputEvent`].
/// `AppState::apply` consumes the events and decides which derived values
/// become stale, so the boxes never know about each other.

pub mod data_columns;
pub mod fitting_function;
pub mod initial_guess;
pub mod input_file;
pub mod plot_configuration;

pub use data_columns::{ColumnRole, DataColumnsBox};
pub use fitting_function::FittingFunctionBox;
pub use initial_guess::InitialGuessBox;
pub use input_file::InputFileBox;
pub use plot_configuration::PlotConfigurationBox;

/// A change made through one of the input boxes or the records window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    InputFileChanged,
    ColumnsChanged,
    FitFunctionChanged,
    InitialGuessChanged,
    RecordsChosen(Vec<bool>),
}
