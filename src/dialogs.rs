use std::collections::VecDeque;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Message dialogs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub body: String,
    pub level: MessageLevel,
}

/// Pending message dialogs, shown one at a time, oldest first.
#[derive(Debug, Default)]
pub struct Messages {
    queue: VecDeque<Message>,
}

impl Messages {
    pub fn info(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.push(title.into(), body.into(), MessageLevel::Info);
    }

    pub fn error(&mut self, title: impl Into<String>, body: impl Into<String>) {
        let (title, body) = (title.into(), body.into());
        log::error!("{title}: {body}");
        self.push(title, body, MessageLevel::Error);
    }

    fn push(&mut self, title: String, body: String, level: MessageLevel) {
        self.queue.push_back(Message { title, body, level });
    }

    pub fn front(&self) -> Option<&Message> {
        self.queue.front()
    }

    pub fn pop(&mut self) -> Option<Message> {
        self.queue.pop_front()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Native file dialogs
// ---------------------------------------------------------------------------

/// File pickers. Every method returns `None` when the user cancels.
pub trait FileDialogs {
    fn pick_data_file(&self) -> Option<PathBuf>;

    fn pick_folder(&self, title: &str) -> Option<PathBuf>;

    fn save_file(&self, title: &str, suggested_name: &str, extensions: &[&str]) -> Option<PathBuf>;
}

/// `rfd` backed dialogs.
pub struct NativeDialogs;

impl FileDialogs for NativeDialogs {
    fn pick_data_file(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Choose input file")
            .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
            .add_filter("CSV", &["csv"])
            .add_filter("JSON", &["json"])
            .add_filter("Parquet", &["parquet", "pq"])
            .pick_file()
    }

    fn pick_folder(&self, title: &str) -> Option<PathBuf> {
        rfd::FileDialog::new().set_title(title).pick_folder()
    }

    fn save_file(&self, title: &str, suggested_name: &str, extensions: &[&str]) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title(title)
            .set_file_name(suggested_name)
            .add_filter("Figure", extensions)
            .save_file()
    }
}

#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;
    use std::path::PathBuf;

    use super::FileDialogs;

    /// Dialogs answering with canned paths; `None` plays a cancel.
    #[derive(Default)]
    pub struct FakeDialogs {
        pub data_file: Option<PathBuf>,
        pub folder: Option<PathBuf>,
        pub save_path: Option<PathBuf>,
        pub save_requests: RefCell<Vec<(String, Vec<String>)>>,
    }

    impl FileDialogs for FakeDialogs {
        fn pick_data_file(&self) -> Option<PathBuf> {
            self.data_file.clone()
        }

        fn pick_folder(&self, _title: &str) -> Option<PathBuf> {
            self.folder.clone()
        }

        fn save_file(&self, _title: &str, suggested_name: &str, extensions: &[&str]) -> Option<PathBuf> {
            self.save_requests.borrow_mut().push((
                suggested_name.to_string(),
                extensions.iter().map(|e| e.to_string()).collect(),
            ));
            self.save_path.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_fifo() {
        let mut messages = Messages::default();
        messages.info("A", "first");
        messages.error("B", "second");
        assert_eq!(messages.front().map(|m| m.title.as_str()), Some("A"));
        assert_eq!(messages.pop().unwrap().level, MessageLevel::Info);
        assert_eq!(messages.pop().unwrap().level, MessageLevel::Error);
        assert!(messages.is_empty());
    }
}
