//! ファイルI/O操作
//!
//! 行単位の読み込みと保存。どちらも処理したバイト数を返す

use super::raw_text::{decode_bytes, encode_text};
use crate::error::{EmError, Result};
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// 読み込み結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    /// 改行を除いた行
    pub lines: Vec<String>,
    /// 読み込んだバイト数
    pub bytes: u64,
}

/// ファイル操作のトレイト
pub trait FileOperations {
    /// ファイルを行の並びとして読み込む
    fn load_lines(&self, path: &Path) -> Result<LoadedFile>;

    /// 各行の後ろに改行を付けて書き込み、書き込んだバイト数を返す
    fn save_lines(&self, path: &Path, lines: &[String]) -> Result<u64>;
}

/// ローカルファイルシステムへの実装
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFileOperations;

impl FileOperations for DefaultFileOperations {
    fn load_lines(&self, path: &Path) -> Result<LoadedFile> {
        if path.is_dir() {
            return Err(EmError::file_open(path));
        }

        let raw = fs::read(path).map_err(|e| {
            log::debug!("read {} failed: {}", path.display(), e);
            EmError::file_open(path)
        })?;

        let bytes = raw.len() as u64;
        let content = decode_bytes(&raw);
        if let Cow::Owned(_) = content {
            log::warn!("{} is not plain UTF-8, keeping raw bytes", path.display());
        }

        if !content.is_empty() && !content.ends_with('\n') {
            log::warn!("{}: newline appended to last line", path.display());
        }

        let lines = split_lines(&content);
        log::info!("loaded {} lines ({} bytes) from {}", lines.len(), bytes, path.display());

        Ok(LoadedFile { lines, bytes })
    }

    fn save_lines(&self, path: &Path, lines: &[String]) -> Result<u64> {
        let file = File::create(path).map_err(|e| {
            log::debug!("create {} failed: {}", path.display(), e);
            EmError::file_open(path)
        })?;

        let mut writer = BufWriter::new(file);
        let mut bytes = 0u64;
        for line in lines {
            let encoded = encode_text(line);
            writer.write_all(&encoded)?;
            writer.write_all(b"\n")?;
            bytes += encoded.len() as u64 + 1;
        }
        writer.flush()?;

        log::info!("wrote {} lines ({} bytes) to {}", lines.len(), bytes, path.display());
        Ok(bytes)
    }
}

/// `\n` で分割する。末尾の改行は空行を生まない
pub fn split_lines(content: &str) -> Vec<String> {
    content.split_terminator('\n').map(str::to_string).collect()
}

/// ファイル読み込みの便利関数
pub fn load_lines<P: AsRef<Path>>(path: P) -> Result<LoadedFile> {
    DefaultFileOperations.load_lines(path.as_ref())
}

/// ファイル書き込みの便利関数
pub fn save_lines<P: AsRef<Path>>(path: P, lines: &[String]) -> Result<u64> {
    DefaultFileOperations.save_lines(path.as_ref(), lines)
}
