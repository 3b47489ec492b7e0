// Terminal front end: event rendering, banners and batch summary

pub mod console;
pub mod report;

pub use console::{preview, ConsoleMode, ConsoleProgress};
pub use report::{batch_banner, idea_header, interactive_banner, synthesis_block, BatchSummary};
