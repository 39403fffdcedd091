pub mod dialogs;
pub mod figure_window;
pub mod panels;
pub mod plot;
pub mod records_window;
