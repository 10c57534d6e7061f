//! バッファ管理モジュール
//!
//! 行データの保持と範囲読み出し・削除・挿入を提供

pub mod line_buffer;

// 公開API
pub use line_buffer::LineBuffer;
