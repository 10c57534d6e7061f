//! em - minimal line-oriented text editor
//!
//! 行バッファ、アドレス言語、コマンド実行からなる ed 系ラインエディタ

// コアモジュール
pub mod config;
pub mod error;
pub mod logging;

// データ層
pub mod buffer;
pub mod file;

// ロジック層
pub mod command;
pub mod input;

// 編集層
pub mod editor;

// 公開API
pub use buffer::LineBuffer;
pub use config::EditorOptions;
pub use editor::{Session, SessionOutcome};
pub use error::{EmError, Result};
