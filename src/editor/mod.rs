//! エディタモジュール
//!
//! コマンド実行とテキストブロック入力

pub mod session;
pub mod text_block;

// 公開API
pub use session::{CommandFlow, Session, SessionOutcome, ERROR_MARKER};
pub use text_block::{collect_text_block, BLOCK_TERMINATOR};
