pub mod logger;
pub mod telegram;

pub use logger::AnalysisLogger;
pub use telegram::TelegramNotifier;
