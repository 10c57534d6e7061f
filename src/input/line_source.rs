//! 行入力ソース
//!
//! コマンドとテキストブロックの両方を1行ずつ供給する

use crate::error::Result;
use crate::file::decode_bytes;
use std::borrow::Cow;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// 1行ずつ入力を返すソース
pub trait LineSource {
    /// プロンプトを表示して1行読む。入力終端なら `None`
    ///
    /// 返す文字列に行末の改行は含まない。
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// 任意の `BufRead` から読み、プロンプトを `Write` へ出すソース
pub struct ReaderLineSource<R, W> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> ReaderLineSource<R, W> {
    pub fn new(reader: R, prompt_out: W) -> Self {
        Self { reader, prompt_out }
    }
}

/// 標準入力ソース
pub type StdinLineSource = ReaderLineSource<io::StdinLock<'static>, io::Stdout>;

impl StdinLineSource {
    pub fn stdin() -> Self {
        ReaderLineSource::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LineSource for ReaderLineSource<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        if !prompt.is_empty() {
            write!(self.prompt_out, "{}", prompt)?;
            self.prompt_out.flush()?;
        }

        // UTF-8 でない行も読み捨てずに受け取る
        let mut raw = Vec::new();
        if self.reader.read_until(b'\n', &mut raw)? == 0 {
            return Ok(None);
        }

        if raw.ends_with(b"\n") {
            raw.pop();
            if raw.ends_with(b"\r") {
                raw.pop();
            }
        }

        let line = match decode_bytes(&raw) {
            Cow::Borrowed(text) => text.to_string(),
            Cow::Owned(text) => {
                log::warn!("input line is not plain UTF-8, keeping raw bytes");
                text
            }
        };
        Ok(Some(line))
    }
}

/// 決められた行を順に返すソース（テスト・スクリプト実行用）
#[derive(Debug, Clone, Default)]
pub struct ScriptedLineSource {
    lines: VecDeque<String>,
}

impl ScriptedLineSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// 未消費の行数
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedLineSource {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}
