pub mod browser_page;
pub mod export;
pub mod page_scripts;
pub mod question_store;
pub mod settings_store;

pub use browser_page::BrowserTab;
pub use question_store::{JsonFileStore, MemoryStore, QuestionStore};
pub use settings_store::SettingsStore;
