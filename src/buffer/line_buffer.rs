//! 行バッファ
//!
//! 行単位の可変シーケンスと現在行カーソル、変更フラグを保持する

use crate::error::{EmError, Result};

/// 行の並びと現在行を管理するバッファ
///
/// 行番号は 1 始まり。`current_line` は空バッファのとき 0、
/// それ以外では常に `1..=len()` の範囲に収まる。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    /// 行データ（改行を含まない）
    lines: Vec<String>,
    /// 現在行
    current_line: usize,
    /// 最後の読み込み・保存以降に変更されたか
    modified: bool,
}

impl LineBuffer {
    /// 空のバッファを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 行の並びからバッファを作成（読み込み直後と同じ状態）
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut buffer = Self::new();
        buffer.load(lines);
        buffer
    }

    /// 内容を丸ごと置き換える。カーソルは最終行へ、変更フラグは解除
    pub fn load<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines = lines.into_iter().map(Into::into).collect();
        self.current_line = self.lines.len();
        self.modified = false;
    }

    /// 行数
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 現在行
    pub fn current_line(&self) -> usize {
        self.current_line
    }

    /// 現在行を設定
    pub fn set_current_line(&mut self, line: usize) -> Result<()> {
        let valid = if self.is_empty() {
            line == 0
        } else {
            (1..=self.len()).contains(&line)
        };

        if !valid {
            return Err(EmError::Address);
        }
        self.current_line = line;
        Ok(())
    }

    /// 変更フラグ
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// 保存完了を記録
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// 指定行を取得
    pub fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|index| self.lines.get(index))
            .map(String::as_str)
    }

    /// `start..=end` の行を `(行番号, 内容)` で順に返す。状態は変更しない
    pub fn get_range(
        &self,
        start: usize,
        end: usize,
    ) -> Result<impl Iterator<Item = (usize, &str)> + '_> {
        if self.is_empty() || start == 0 || start > end || end > self.len() {
            return Err(EmError::Address);
        }

        Ok(self.lines[start - 1..end]
            .iter()
            .enumerate()
            .map(move |(offset, text)| (start + offset, text.as_str())))
    }

    /// `start..=end` を削除し、削除した行数を返す
    ///
    /// `start > end` は呼び出し側で検証済みの前提で、0 行の削除として扱う。
    pub fn delete_range(&mut self, start: usize, end: usize) -> Result<usize> {
        if self.is_empty() || start == 0 || end > self.len() {
            return Err(EmError::Address);
        }
        if start > end {
            return Ok(0);
        }

        let removed = self.lines.drain(start - 1..end).count();
        self.current_line = self.current_line.min(self.len());
        self.modified = true;

        log::debug!("deleted lines {}..={} ({} left)", start, end, self.len());
        Ok(removed)
    }

    /// `after` 行目の直後に `block` を挿入し、挿入した行数を返す
    ///
    /// `after == 0` は先頭への挿入。空のブロックは何もしない。
    /// カーソルは動かさない（挿入系コマンド側で設定する）。
    pub fn insert_block(&mut self, after: usize, block: Vec<String>) -> Result<usize> {
        if after > self.len() {
            return Err(EmError::Address);
        }
        if block.is_empty() {
            return Ok(0);
        }

        let count = block.len();
        self.lines.splice(after..after, block);
        if self.current_line == 0 {
            self.current_line = 1;
        }
        self.modified = true;

        log::debug!("inserted {} lines after line {}", count, after);
        Ok(count)
    }

    /// 保存用に全行を返す
    pub fn write_all(&self) -> &[String] {
        &self.lines
    }
}
