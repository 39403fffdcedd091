use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::boxes::{
    DataColumnsBox, FittingFunctionBox, InitialGuessBox, InputEvent, InputFileBox,
    PlotConfigurationBox,
};
use crate::data::model::FitData;
use crate::dialogs::{FileDialogs, Messages};
use crate::figure::{OutputConfiguration, plots};
use crate::fit::{FitFunction, FitResult, fit_to_data};
use crate::ui::figure_window::{FigureWindow, PlotMethod};
use crate::ui::records_window::RecordsChoiceWindow;

// ---------------------------------------------------------------------------
// Lazily derived values
// ---------------------------------------------------------------------------

/// A cached value computed on first read after an invalidation.
#[derive(Debug, Clone, PartialEq)]
pub enum Derived<T> {
    Unset,
    Computed(T),
}

impl<T> Default for Derived<T> {
    fn default() -> Self {
        Derived::Unset
    }
}

impl<T> Derived<T> {
    pub fn get(&self) -> Option<&T> {
        match self {
            Derived::Unset => None,
            Derived::Computed(value) => Some(value),
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Derived::Unset)
    }

    /// Drop the cached value. Never recomputes.
    pub fn invalidate(&mut self) {
        *self = Derived::Unset;
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    pub input_file: InputFileBox,
    pub data_columns: DataColumnsBox,
    pub fitting_function: FittingFunctionBox,
    pub initial_guess: InitialGuessBox,
    pub plot_configuration: PlotConfigurationBox,

    /// Text of the output directory field.
    pub output_directory: String,

    /// One flag per record of the dataset; unchosen records are left out of the fit.
    pub chosen_records: Vec<bool>,

    fit_data: Derived<FitData>,
    fit_result: Derived<FitResult>,

    /// Pending message dialogs.
    pub messages: Messages,

    pub figures: Vec<FigureWindow>,
    next_figure_id: u64,

    pub records_window: Option<RecordsChoiceWindow>,
}

impl AppState {
    /// Apply a box change: update dependent boxes and invalidate caches.
    pub fn apply(&mut self, event: InputEvent) {
        log::debug!("{event:?}");
        match event {
            InputEvent::InputFileChanged => {
                self.fit_data.invalidate();
                self.fit_result.invalidate();
                let records = self.input_file.data().map_or(0, |d| d.records());
                self.chosen_records = vec![true; records];
                self.records_window = None;
                self.data_columns.update_data(self.input_file.data());
                self.initial_guess.reset();
                self.plot_configuration.reset();
                self.reload_labels();
                self.reload_title();
            }
            InputEvent::ColumnsChanged => {
                self.fit_data.invalidate();
                self.fit_result.invalidate();
                self.reload_labels();
            }
            InputEvent::FitFunctionChanged => {
                self.fit_result.invalidate();
                let n = self.fitting_function.fit_function().map(|f| f.n());
                self.initial_guess.set_parameters_number(n);
                self.reload_title();
            }
            InputEvent::InitialGuessChanged => {
                self.fit_result.invalidate();
            }
            InputEvent::RecordsChosen(mask) => {
                self.chosen_records = mask;
                self.fit_data.invalidate();
                self.fit_result.invalidate();
            }
        }
    }

    fn reload_labels(&mut self) {
        use crate::boxes::ColumnRole;
        self.plot_configuration.load_columns(
            self.data_columns.selected(ColumnRole::X),
            self.data_columns.selected(ColumnRole::Y),
        );
    }

    fn reload_title(&mut self) {
        self.plot_configuration
            .load_fit_function(self.fitting_function.fit_function().as_ref());
    }

    // -----------------------------------------------------------------------
    // Derived values
    // -----------------------------------------------------------------------

    /// The chosen records of the selected columns, computed if needed.
    pub fn fit_data(&mut self) -> Option<&FitData> {
        if self.fit_data.is_unset() {
            if let Some(data) = self.compute_fit_data() {
                self.plot_configuration.set_xmin_xmax(&data.x);
                self.fit_data = Derived::Computed(data);
            }
        }
        self.fit_data.get()
    }

    fn compute_fit_data(&mut self) -> Option<FitData> {
        let dataset = self.input_file.data()?;
        let selection = self.data_columns.selection()?;
        match FitData::from_dataset(dataset, &self.chosen_records, &selection) {
            Ok(data) => {
                log::info!("Fit data ready: {} records", data.len());
                Some(data)
            }
            Err(e) => {
                self.messages.error("Fit data error", e.to_string());
                None
            }
        }
    }

    /// The fit of the current data, function and guess, computed if needed.
    pub fn fit_result(&mut self) -> Option<&FitResult> {
        if self.fit_result.is_unset() {
            let func = self.fitting_function.fit_function();
            let a0 = self.initial_guess.a0().map(<[f64]>::to_vec);
            self.fit_data();
            if let (Some(data), Some(func), Some(a0)) = (self.fit_data.get(), func, a0) {
                match fit_to_data(data, &func, &a0) {
                    Ok(result) => {
                        log::info!("Fitted {} : a = {:?}", func.name(), result.a);
                        self.fit_result = Derived::Computed(result);
                    }
                    Err(e) => self.messages.error("Fit result error", e.to_string()),
                }
            }
        }
        self.fit_result.get()
    }

    /// Current fit data without computing it.
    pub fn cached_fit_data(&self) -> Option<&FitData> {
        self.fit_data.get()
    }

    /// Current fit result without computing it.
    pub fn cached_fit_result(&self) -> Option<&FitResult> {
        self.fit_result.get()
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    pub fn load_input_file(&mut self, dialogs: &dyn FileDialogs) {
        let Some(path) = dialogs.pick_data_file() else {
            return;
        };
        match self.input_file.load(&path) {
            Ok(event) => self.apply(event),
            Err(e) => self.messages.error("Input file error", format!("{e:#}")),
        }
    }

    pub fn reload_input_file(&mut self) {
        match self.input_file.reload() {
            Some(Ok(event)) => self.apply(event),
            Some(Err(e)) => self.messages.error("Input file error", format!("{e:#}")),
            None => {}
        }
    }

    pub fn close_input_file(&mut self) {
        let event = self.input_file.clear();
        self.apply(event);
    }

    pub fn choose_records(&mut self) {
        match self.input_file.data() {
            Some(dataset) => {
                self.records_window = Some(RecordsChoiceWindow::new(dataset, &self.chosen_records));
            }
            None => self.messages.info("Choose Records", "No data been given yet"),
        }
    }

    pub fn fit(&mut self) {
        let func = self.fitting_function.fit_function();
        match (self.fit_result().map(ToString::to_string), func) {
            (Some(summary), Some(func)) => self.messages.info("Fit Result", format!("{func}\n\n{summary}")),
            _ => self.messages.info("Fit Result", "Nothing to fit yet"),
        }
    }

    pub fn plot_data(&mut self) {
        let Some(data) = self.fit_data().cloned() else {
            self.messages.info("Plot data", "Nothing to plot yet");
            return;
        };
        let config = self.plot_configuration.plot_configuration();
        self.open_figure(
            config.data_title.clone(),
            Box::new(move || plots::plot_data(&data, &config)),
        );
    }

    pub fn plot_fitting(&mut self) {
        let Some((func, data, a)) = self.fit_inputs() else {
            self.messages.info("Plot fitting", "Nothing to plot yet");
            return;
        };
        let config = self.plot_configuration.plot_configuration();
        let title = format!("{} - Fitting", func.title());
        self.open_figure(
            title,
            Box::new(move || plots::plot_fitting(&func, &data, &config, &a)),
        );
    }

    pub fn plot_residuals(&mut self) {
        let Some((func, data, a)) = self.fit_inputs() else {
            self.messages.info("Plot residuals", "Nothing to plot yet");
            return;
        };
        let config = self.plot_configuration.plot_configuration();
        self.open_figure(
            config.residuals_title.clone(),
            Box::new(move || plots::plot_residuals(&func, &data, &config, &a)),
        );
    }

    /// Function, data and fitted parameters, once a fit result exists.
    fn fit_inputs(&mut self) -> Option<(FitFunction, FitData, Vec<f64>)> {
        let a = self.fit_result()?.a.clone();
        let data = self.fit_data.get()?.clone();
        let func = self.fitting_function.fit_function()?;
        Some((func, data, a))
    }

    fn open_figure(&mut self, title: String, plot_method: PlotMethod) {
        self.next_figure_id += 1;
        match FigureWindow::new(self.next_figure_id, title, plot_method) {
            Ok(window) => self.figures.push(window),
            Err(e) => self.messages.error("Plot error", e.to_string()),
        }
    }

    pub fn choose_output_dir(&mut self, dialogs: &dyn FileDialogs) {
        if let Some(dir) = dialogs.pick_folder("Choose output directory") {
            self.output_directory = dir.display().to_string();
        }
    }

    /// Write every plot and the result summary into the output directory.
    pub fn save_to_output_dir(&mut self) {
        let Some(result) = self.fit_result().cloned() else {
            self.messages.info("Save output", "Nothing to plot yet");
            return;
        };
        let output_dir = self.output_directory.trim().to_string();
        if output_dir.is_empty() {
            self.messages.error("Save output", "Please choose an output directory first");
            return;
        }
        let (Some(data), Some(func)) =
            (self.fit_data.get().cloned(), self.fitting_function.fit_function())
        else {
            return;
        };

        let config = self.plot_configuration.plot_configuration();
        match write_outputs(&func, &data, &config, Path::new(&output_dir), &result) {
            Ok(written) => {
                log::info!("Saved {} output files to {output_dir}", written.len());
                self.messages.info("Save output", "All plots have been saved successfully!");
            }
            Err(e) => self.messages.error("Save output", format!("{e:#}")),
        }
    }
}

fn write_outputs(
    func: &FitFunction,
    data: &FitData,
    config: &crate::figure::PlotConfiguration,
    output_dir: &Path,
    result: &FitResult,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;
    let output = OutputConfiguration::build(func.name(), output_dir);
    plots::plot_all(func, data, config, &output, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::ColumnRole;
    use crate::data::model::{Column, Dataset};
    use crate::dialogs::testing::FakeDialogs;
    use crate::fit::FunctionKind;

    fn linear_dataset() -> Dataset {
        Dataset::new(vec![
            Column::new("x", vec![1.0, 2.0, 3.0]),
            Column::new("y", vec![2.0, 4.0, 6.0]),
            Column::new("xerr", vec![0.0, 0.0, 0.0]),
            Column::new("yerr", vec![0.0, 0.0, 0.0]),
            Column::new("z", vec![7.0, 8.0, 9.0]),
        ])
        .unwrap()
    }

    fn loaded() -> AppState {
        let mut state = AppState::default();
        let event = state.input_file.set_data(None, linear_dataset());
        state.apply(event);
        state
    }

    fn fitted_linear() -> AppState {
        let mut state = loaded();
        if let Some(event) = state.fitting_function.select(Some(FunctionKind::Linear)) {
            state.apply(event);
        }
        let event = state.initial_guess.set_text("0, 1");
        state.apply(event);
        state
    }

    fn set_column(state: &mut AppState, role: ColumnRole, name: &str) {
        if let Some(event) = state.data_columns.set_column(role, name) {
            state.apply(event);
        }
    }

    #[test]
    fn fit_data_follows_last_column_selection() {
        let mut state = loaded();
        assert_eq!(state.fit_data().unwrap().y, vec![2.0, 4.0, 6.0]);

        set_column(&mut state, ColumnRole::Y, "z");
        set_column(&mut state, ColumnRole::Y, "x");
        set_column(&mut state, ColumnRole::Y, "z");
        assert!(state.cached_fit_data().is_none());
        assert_eq!(state.fit_data().unwrap().y, vec![7.0, 8.0, 9.0]);
        assert_eq!(state.plot_configuration.y_label, "z");
    }

    #[test]
    fn function_change_drops_fit_result() {
        let mut state = fitted_linear();
        assert_eq!(state.fit_result().unwrap().a.len(), 2);

        let event = state.fitting_function.select(Some(FunctionKind::Parabolic)).unwrap();
        state.apply(event);
        assert!(state.cached_fit_result().is_none());
        assert_eq!(state.initial_guess.n(), Some(3));
        assert!(state.fit_result().is_none());
        assert!(state.cached_fit_data().is_some());
        assert!(state.messages.is_empty());
    }

    #[test]
    fn choose_records_without_data_opens_nothing() {
        let mut state = AppState::default();
        state.choose_records();
        assert!(state.records_window.is_none());
        let message = state.messages.pop().unwrap();
        assert_eq!(message.body, "No data been given yet");
    }

    #[test]
    fn save_without_result_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("out");
        let mut state = loaded();
        state.output_directory = out.display().to_string();

        state.save_to_output_dir();

        assert!(!out.exists());
        assert_eq!(state.messages.pop().unwrap().body, "Nothing to plot yet");
    }

    #[test]
    fn linear_fit_scenario() {
        let mut state = fitted_linear();
        state.fit();
        let result = state.cached_fit_result().expect("fit result");
        assert!((result.a[0] - 0.0).abs() < 1e-6);
        assert!((result.a[1] - 2.0).abs() < 1e-6);
        let message = state.messages.pop().unwrap();
        assert_eq!(message.title, "Fit Result");
        assert!(message.body.starts_with("linear"));
    }

    #[test]
    fn unchosen_record_is_left_out() {
        let mut state = loaded();
        state.choose_records();
        let window = state.records_window.as_mut().expect("records window");
        window.toggle(1);
        let event = window.confirm();
        state.apply(event);

        let data = state.fit_data().unwrap();
        assert_eq!(data.x, vec![1.0, 3.0]);
        assert_eq!(data.y, vec![2.0, 6.0]);
        assert_eq!(data.xerr, vec![0.0, 0.0]);
        assert_eq!(data.yerr, vec![0.0, 0.0]);
    }

    #[test]
    fn missing_column_shows_error() {
        let mut state = loaded();
        set_column(&mut state, ColumnRole::X, "nope");
        assert!(state.fit_data().is_none());
        assert_eq!(state.messages.pop().unwrap().title, "Fit data error");
    }

    #[test]
    fn new_file_resets_inputs() {
        let mut state = fitted_linear();
        state.apply(InputEvent::RecordsChosen(vec![true, false, true]));
        state.plot_configuration.grid = true;

        let event = state.input_file.set_data(None, linear_dataset());
        state.apply(event);

        assert_eq!(state.chosen_records, vec![true; 3]);
        assert_eq!(state.initial_guess.a0(), None);
        assert!(!state.plot_configuration.grid);
        assert_eq!(state.plot_configuration.title, "Linear");
        assert!(state.cached_fit_data().is_none());
    }

    #[test]
    fn closing_file_clears_everything() {
        let mut state = fitted_linear();
        assert!(state.fit_result().is_some());
        state.choose_records();
        state.close_input_file();
        assert!(state.records_window.is_none());
        assert!(state.cached_fit_result().is_none());
        assert!(state.fit_data().is_none());
        assert!(state.chosen_records.is_empty());
        assert!(state.data_columns.columns().is_empty());
    }

    #[test]
    fn fit_data_sets_x_range() {
        let mut state = loaded();
        state.fit_data();
        assert_eq!(state.plot_configuration.x_min, "0.8");
        assert_eq!(state.plot_configuration.x_max, "3.2");
    }

    #[test]
    fn cancelled_dialogs_change_nothing() {
        let mut state = loaded();
        state.output_directory = "previous".into();
        let dialogs = FakeDialogs::default();
        state.choose_output_dir(&dialogs);
        state.load_input_file(&dialogs);
        assert_eq!(state.output_directory, "previous");
        assert_eq!(state.input_file.data().unwrap().records(), 3);
        assert!(state.messages.is_empty());
    }

    #[test]
    fn load_error_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dialogs = FakeDialogs {
            data_file: Some(dir.path().join("data.xlsx")),
            ..Default::default()
        };
        let mut state = AppState::default();
        state.load_input_file(&dialogs);
        assert_eq!(state.messages.pop().unwrap().title, "Input file error");
        assert!(state.input_file.data().is_none());
    }

    #[test]
    fn save_writes_every_output_into_new_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("results").join("run");
        let mut state = fitted_linear();
        state.output_directory = out.display().to_string();

        state.save_to_output_dir();

        let message = state.messages.pop().expect("save message");
        assert_eq!(message.body, "All plots have been saved successfully!");
        for name in [
            "linear_fitting.png",
            "linear_fitting_residuals.png",
            "linear_result.txt",
            "linear_result.json",
        ] {
            assert!(out.join(name).is_file(), "{name} missing");
        }
        let json = std::fs::read_to_string(out.join("linear_result.json")).unwrap();
        assert!(json.contains("\"p_probability\""));
    }

    #[test]
    fn save_without_directory_is_an_error() {
        let mut state = fitted_linear();
        state.output_directory = "  ".into();
        state.save_to_output_dir();
        let message = state.messages.pop().unwrap();
        assert_eq!(message.body, "Please choose an output directory first");
        assert_eq!(message.level, crate::dialogs::MessageLevel::Error);
    }

    #[test]
    fn plots_need_their_inputs() {
        let mut state = AppState::default();
        state.plot_data();
        state.plot_fitting();
        state.plot_residuals();
        let titles: Vec<String> = std::iter::from_fn(|| state.messages.pop())
            .map(|m| {
                assert_eq!(m.body, "Nothing to plot yet");
                m.title
            })
            .collect();
        assert_eq!(titles, vec!["Plot data", "Plot fitting", "Plot residuals"]);
        assert!(state.figures.is_empty());

        // Data alone is enough to plot the data, not the fit.
        let mut state = loaded();
        state.plot_fitting();
        assert_eq!(state.messages.pop().unwrap().body, "Nothing to plot yet");
        assert!(state.figures.is_empty());
    }

    #[test]
    fn plots_open_figure_windows() {
        let mut state = fitted_linear();
        state.plot_data();
        state.plot_fitting();
        state.plot_residuals();
        assert!(state.messages.is_empty());
        assert_eq!(state.figures.len(), 3);
        assert!(state.figures.iter().all(|w| w.open));
    }

    #[test]
    fn new_file_closes_records_window() {
        let mut state = loaded();
        state.choose_records();
        assert!(state.records_window.is_some());

        let bigger = Dataset::new(vec![
            Column::new("x", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            Column::new("y", vec![2.0, 4.0, 6.0, 8.0, 10.0]),
            Column::new("xerr", vec![0.0; 5]),
            Column::new("yerr", vec![0.0; 5]),
        ])
        .unwrap();
        let event = state.input_file.set_data(None, bigger);
        state.apply(event);

        assert!(state.records_window.is_none());
        assert_eq!(state.chosen_records, vec![true; 5]);
        assert_eq!(state.fit_data().unwrap().len(), 5);
    }
}
