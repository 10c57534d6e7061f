//! 入力モジュール
//!
//! 対話端末・スクリプトからの行入力

pub mod line_source;

// 公開API
pub use line_source::{LineSource, ReaderLineSource, ScriptedLineSource, StdinLineSource};
