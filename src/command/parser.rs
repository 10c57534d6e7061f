//! コマンド解析
//!
//! 入力1行を「コマンド種別 + 0〜2個のアドレス + 引数」に分類する。
//! 判定順は 数字で始まる形式 → 記号アドレス → コマンド文字のみ。

use super::address::{AddressContext, AddressToken};
use crate::error::{EmError, Result};
use std::iter::Peekable;
use std::str::Chars;

/// コマンド種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// `p`
    Print,
    /// `n`
    Number,
    /// `d`
    Delete,
    /// `a`
    Append,
    /// `i`
    Insert,
    /// `c`
    Change,
    /// `e`
    Edit,
    /// `w`
    Write,
    /// `q`
    Quit,
    /// `Q`
    ForceQuit,
    /// `h`
    Help,
}

impl CommandKind {
    /// コマンド文字から種別を得る
    pub fn from_letter(ch: char) -> Option<Self> {
        let kind = match ch {
            'p' => CommandKind::Print,
            'n' => CommandKind::Number,
            'd' => CommandKind::Delete,
            'a' => CommandKind::Append,
            'i' => CommandKind::Insert,
            'c' => CommandKind::Change,
            'e' => CommandKind::Edit,
            'w' => CommandKind::Write,
            'q' => CommandKind::Quit,
            'Q' => CommandKind::ForceQuit,
            'h' => CommandKind::Help,
            _ => return None,
        };
        Some(kind)
    }

    /// ファイル名引数を取るか
    fn takes_argument(self) -> bool {
        matches!(self, CommandKind::Edit | CommandKind::Write)
    }

    /// アドレス指定を受け付けるか
    fn accepts_address(self) -> bool {
        !matches!(
            self,
            CommandKind::Edit
                | CommandKind::Write
                | CommandKind::Quit
                | CommandKind::ForceQuit
                | CommandKind::Help
        )
    }
}

/// 解析済みコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub kind: CommandKind,
    /// 開始アドレス（未指定なら現在行）
    pub start: Option<usize>,
    /// 終了アドレス（未指定なら開始アドレス）
    pub end: Option<usize>,
    /// `e` / `w` のファイル名
    pub argument: Option<String>,
}

impl ParsedCommand {
    /// 既定値を補った `(start, end)`
    pub fn range(&self, current_line: usize) -> (usize, usize) {
        let start = self.start.unwrap_or(current_line);
        let end = self.end.unwrap_or(start);
        (start, end)
    }

    /// アドレスが明示されたか
    pub fn has_address(&self) -> bool {
        self.start.is_some()
    }
}

/// コマンド行を解析
///
/// アドレスの形式・範囲が不正なら `EmError::Address`、
/// アドレスは正しいがコマンド文字や末尾が解釈できなければ `EmError::Command`。
pub fn parse_command(line: &str, context: AddressContext) -> Result<ParsedCommand> {
    let mut chars = line.chars().peekable();

    let (start, end) = parse_addresses(&mut chars, context)?;
    if let Some(start) = start {
        validate_range(start, end, context)?;
    }

    let kind = match chars.next() {
        Some(letter) => CommandKind::from_letter(letter).ok_or(EmError::Command)?,
        None if start.is_some() => CommandKind::Print,
        None => return Err(EmError::Command),
    };

    if start.is_some() && !kind.accepts_address() {
        return Err(EmError::Address);
    }

    let rest: String = chars.collect();
    let argument = parse_argument(kind, &rest)?;

    Ok(ParsedCommand {
        kind,
        start,
        end,
        argument,
    })
}

fn parse_addresses(
    chars: &mut Peekable<Chars<'_>>,
    context: AddressContext,
) -> Result<(Option<usize>, Option<usize>)> {
    match chars.peek().copied() {
        Some(ch) if ch.is_ascii_digit() => {
            let first = scan_number(chars)?;
            if chars.peek() != Some(&',') {
                return Ok((Some(first), None));
            }
            chars.next();

            let second = match chars.next() {
                Some(ch) if ch.is_ascii_digit() => AddressToken::Number(scan_number_from(ch, chars)?),
                Some(ch) => match AddressToken::from_symbol(ch) {
                    Some(AddressToken::WholeBuffer) | None => return Err(EmError::Address),
                    Some(token) => token,
                },
                None => return Err(EmError::Address),
            };

            Ok((Some(first), Some(second.resolve(context).start)))
        }
        Some(ch) => match AddressToken::from_symbol(ch) {
            Some(token) => {
                chars.next();
                let resolved = token.resolve(context);
                Ok((Some(resolved.start), resolved.end))
            }
            None => Ok((None, None)),
        },
        None => Ok((None, None)),
    }
}

fn scan_number(chars: &mut Peekable<Chars<'_>>) -> Result<usize> {
    let first = chars.next().ok_or(EmError::Address)?;
    scan_number_from(first, chars)
}

fn scan_number_from(first: char, chars: &mut Peekable<Chars<'_>>) -> Result<usize> {
    let mut digits = String::from(first);
    while let Some(ch) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(ch);
        chars.next();
    }
    // 桁あふれは範囲外アドレスとして扱う
    digits.parse().map_err(|_| EmError::Address)
}

fn validate_range(start: usize, end: Option<usize>, context: AddressContext) -> Result<()> {
    let ordered = end.map_or(true, |end| start <= end);
    if start == 0 || start > context.length || !ordered {
        return Err(EmError::Address);
    }
    Ok(())
}

fn parse_argument(kind: CommandKind, rest: &str) -> Result<Option<String>> {
    // 空白だけの残りはどのコマンドでも無視
    if rest.trim().is_empty() {
        return Ok(None);
    }
    if !kind.takes_argument() || !rest.starts_with(char::is_whitespace) {
        return Err(EmError::Command);
    }
    Ok(Some(rest.trim().to_string()))
}
