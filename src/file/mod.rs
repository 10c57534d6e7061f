//! ファイル操作モジュール

pub mod io;
pub mod raw_text;

// 公開API
pub use io::{load_lines, save_lines, DefaultFileOperations, FileOperations, LoadedFile};
pub use raw_text::{decode_bytes, encode_text};

use std::path::PathBuf;

/// `~` を展開してパスに変換
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}
