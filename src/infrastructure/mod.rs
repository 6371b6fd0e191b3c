pub mod js_executor;
pub mod page_ready;

pub use js_executor::JsExecutor;
pub use page_ready::{first_event, PageReady, ReadyError};
