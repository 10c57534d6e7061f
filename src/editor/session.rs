//! 編集セッション
//!
//! バッファとセッション状態を保持し、解析済みコマンドを実行する。
//! エラーはすべてここで回復し、`?` を出力して `h` 用に記録する。

use super::text_block::collect_text_block;
use crate::buffer::LineBuffer;
use crate::command::{parse_command, AddressContext, CommandKind, ParsedCommand};
use crate::config::{EditorOptions, DEFAULT_PROMPT};
use crate::error::{EmError, Result};
use crate::file::{encode_text, expand_path, DefaultFileOperations, FileOperations};
use crate::input::LineSource;
use std::io::Write;
use std::path::{Path, PathBuf};

/// エラー発生時に出力するマーカー
pub const ERROR_MARKER: &str = "?";

/// 1コマンド実行後の継続判定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandFlow {
    Continue,
    Exit,
}

/// セッションの終了理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// `q` / `Q` による終了
    Quit,
    /// 入力終端
    EndOfInput,
}

/// 編集セッション
pub struct Session<S, W> {
    buffer: LineBuffer,
    filename: Option<PathBuf>,
    last_error: Option<EmError>,
    pending_quit_confirmation: bool,
    prompt: String,
    source: S,
    out: W,
    files: Box<dyn FileOperations>,
}

impl<S: LineSource, W: Write> Session<S, W> {
    /// 空バッファでセッションを作成
    pub fn new(source: S, out: W) -> Self {
        Self {
            buffer: LineBuffer::new(),
            filename: None,
            last_error: None,
            pending_quit_confirmation: false,
            prompt: DEFAULT_PROMPT.to_string(),
            source,
            out,
            files: Box::new(DefaultFileOperations),
        }
    }

    /// 起動オプションを反映して作成
    pub fn with_options(options: &EditorOptions, source: S, out: W) -> Self {
        let mut session = Self::new(source, out);
        session.prompt = options.prompt().to_string();
        session
    }

    /// ファイル操作の実装を差し替える
    pub fn with_file_operations(mut self, files: Box<dyn FileOperations>) -> Self {
        self.files = files;
        self
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// 記録済みのエラーメッセージ
    pub fn last_error(&self) -> Option<&'static str> {
        self.last_error.as_ref().map(EmError::message)
    }

    /// 終了確認待ちか
    pub fn is_quit_pending(&self) -> bool {
        self.pending_quit_confirmation
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// 起動時ファイルを読み込む
    ///
    /// 読み込めなくてもファイル名は記憶し、`w` で作成できるようにする。
    pub fn open_initial(&mut self, path: PathBuf) -> Result<()> {
        if let Err(err) = self.edit_file(path.clone()) {
            self.filename = Some(path);
            self.report(err)?;
        }
        Ok(())
    }

    /// 入力終端または終了コマンドまでコマンドを処理
    pub fn run(&mut self) -> Result<SessionOutcome> {
        loop {
            let line = match self.source.read_line(&self.prompt) {
                Ok(Some(line)) => line,
                Ok(None) => return Ok(SessionOutcome::EndOfInput),
                Err(err) => {
                    log::error!("cannot read further input: {}", err);
                    return Ok(SessionOutcome::EndOfInput);
                }
            };

            if self.execute_line(&line)? == CommandFlow::Exit {
                return Ok(SessionOutcome::Quit);
            }
        }
    }

    /// コマンド行を1つ実行
    ///
    /// コマンドのエラーは `?` として出力済みで、`Err` になるのは出力自体の失敗のみ。
    pub fn execute_line(&mut self, line: &str) -> Result<CommandFlow> {
        let parsed = parse_command(line, AddressContext::from(&self.buffer));

        let keeps_confirmation = matches!(
            &parsed,
            Ok(ParsedCommand {
                kind: CommandKind::Quit | CommandKind::Help,
                ..
            })
        );
        if !keeps_confirmation {
            self.pending_quit_confirmation = false;
        }

        match parsed.and_then(|command| self.dispatch(&command)) {
            Ok(flow) => Ok(flow),
            Err(err) => {
                self.report(err)?;
                Ok(CommandFlow::Continue)
            }
        }
    }

    fn report(&mut self, err: EmError) -> Result<()> {
        log::debug!("command failed: {}", err);
        writeln!(self.out, "{}", ERROR_MARKER)?;
        self.last_error = Some(err);
        Ok(())
    }

    fn dispatch(&mut self, command: &ParsedCommand) -> Result<CommandFlow> {
        log::debug!("executing {:?}", command);
        let (start, end) = command.range(self.buffer.current_line());

        match command.kind {
            CommandKind::Print => self.print_range(start, end, false)?,
            CommandKind::Number => self.print_range(start, end, true)?,
            CommandKind::Delete => self.delete(start, end)?,
            CommandKind::Append => self.append(end)?,
            CommandKind::Insert => self.insert(start)?,
            CommandKind::Change => self.change(start, end)?,
            CommandKind::Edit => {
                let path = self.target_path(command.argument.as_deref())?;
                self.edit_file(path)?;
            }
            CommandKind::Write => {
                let path = self.target_path(command.argument.as_deref())?;
                self.write_file(path)?;
            }
            CommandKind::Quit => {
                if self.buffer.is_modified() && !self.pending_quit_confirmation {
                    self.pending_quit_confirmation = true;
                    return Err(EmError::ModifiedWarning);
                }
                return Ok(CommandFlow::Exit);
            }
            CommandKind::ForceQuit => return Ok(CommandFlow::Exit),
            CommandKind::Help => {
                if let Some(message) = self.last_error() {
                    writeln!(self.out, "{}", message)?;
                }
            }
        }

        Ok(CommandFlow::Continue)
    }

    fn print_range(&mut self, start: usize, end: usize, numbered: bool) -> Result<()> {
        for (number, text) in self.buffer.get_range(start, end)? {
            if numbered {
                write!(self.out, "{}\t", number)?;
            }
            self.out.write_all(&encode_text(text))?;
            self.out.write_all(b"\n")?;
        }
        self.buffer.set_current_line(end)
    }

    fn delete(&mut self, start: usize, end: usize) -> Result<()> {
        if start > end {
            return Err(EmError::Address);
        }
        self.buffer.delete_range(start, end)?;
        Ok(())
    }

    fn append(&mut self, after: usize) -> Result<()> {
        let block = collect_text_block(&mut self.source)?;
        let inserted = self.buffer.insert_block(after, block)?;
        if inserted > 0 {
            self.buffer.set_current_line(after + inserted)?;
        }
        Ok(())
    }

    fn insert(&mut self, before: usize) -> Result<()> {
        self.append(before.saturating_sub(1))
    }

    fn change(&mut self, start: usize, end: usize) -> Result<()> {
        if self.buffer.is_empty() || start == 0 || start > end || end > self.buffer.len() {
            return Err(EmError::Address);
        }

        let block = collect_text_block(&mut self.source)?;
        self.buffer.delete_range(start, end)?;
        let inserted = self.buffer.insert_block(start - 1, block)?;

        let cursor = if inserted > 0 {
            start - 1 + inserted
        } else {
            // 削除した範囲の直後の行（末尾を消した場合は最終行）
            start.min(self.buffer.len())
        };
        self.buffer.set_current_line(cursor)
    }

    fn target_path(&self, argument: Option<&str>) -> Result<PathBuf> {
        argument
            .map(expand_path)
            .or_else(|| self.filename.clone())
            .ok_or(EmError::NoFilename)
    }

    fn edit_file(&mut self, path: PathBuf) -> Result<()> {
        let loaded = self.files.load_lines(&path)?;
        self.buffer.load(loaded.lines);
        self.filename = Some(path);
        writeln!(self.out, "{}", loaded.bytes)?;
        Ok(())
    }

    fn write_file(&mut self, path: PathBuf) -> Result<()> {
        let bytes = self.files.save_lines(&path, self.buffer.write_all())?;
        self.buffer.mark_saved();
        self.filename = Some(path);
        writeln!(self.out, "{}", bytes)?;
        Ok(())
    }
}
