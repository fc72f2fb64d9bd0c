//! TSLite History - Session History Store
//!
//! This crate keeps the bounded log of successful classifications:
//! - Entry: history entries and the newest-first log
//! - Store: load/record/clear with FIFO eviction and whole-log persistence
//! - Storage: key-value persistence capability (file, in-memory)
//! - Export: JSON/CSV encodings of single entries and the full log
//! - Clipboard: write-text capability used by "copy result"

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clipboard;
pub mod entry;
pub mod error;
pub mod export;
pub mod storage;
pub mod store;

pub use clipboard::{Clipboard, CopyOutcome, SystemClipboard};
pub use entry::{HistoryEntry, HistoryLog};
pub use error::{ClipboardError, StorageError};
pub use export::{ExportFormat, CSV_COLUMNS};
pub use storage::{default_data_dir, FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{HistoryConfig, HistoryStore, DEFAULT_CAPACITY, DEFAULT_STORAGE_KEY};
