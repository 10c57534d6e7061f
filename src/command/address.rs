//! アドレス解決
//!
//! アドレストークンを、解析時点のバッファ状態に基づいて行番号へ変換する

use crate::buffer::LineBuffer;

/// 解析時点のバッファ状態のスナップショット
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressContext {
    /// 現在行
    pub current_line: usize,
    /// 行数
    pub length: usize,
}

impl AddressContext {
    pub fn new(current_line: usize, length: usize) -> Self {
        Self {
            current_line,
            length,
        }
    }
}

impl From<&LineBuffer> for AddressContext {
    fn from(buffer: &LineBuffer) -> Self {
        Self::new(buffer.current_line(), buffer.len())
    }
}

/// アドレストークン
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressToken {
    /// 数字列
    Number(usize),
    /// `.`
    Current,
    /// `$`
    Last,
    /// `+`
    Next,
    /// `-`
    Previous,
    /// `,`（`1,$` の省略形）
    WholeBuffer,
}

/// 解決済みアドレス。`end` は範囲指定があった場合のみ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub start: usize,
    pub end: Option<usize>,
}

impl AddressToken {
    /// 記号1文字からトークンを得る
    pub fn from_symbol(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(AddressToken::Current),
            '$' => Some(AddressToken::Last),
            '+' => Some(AddressToken::Next),
            '-' => Some(AddressToken::Previous),
            ',' => Some(AddressToken::WholeBuffer),
            _ => None,
        }
    }

    /// 行番号へ解決
    ///
    /// 上下限の検証は行わない。`-` が 0 行目を下回る場合は 0 を返し、
    /// 呼び出し側の範囲検証で弾かれる。
    pub fn resolve(self, context: AddressContext) -> ResolvedAddress {
        let start = match self {
            AddressToken::Number(n) => n,
            AddressToken::Current => context.current_line,
            AddressToken::Last => context.length,
            AddressToken::Next => context.current_line.saturating_add(1),
            AddressToken::Previous => context.current_line.saturating_sub(1),
            AddressToken::WholeBuffer => {
                return ResolvedAddress {
                    start: 1,
                    end: Some(context.length),
                }
            }
        };

        ResolvedAddress { start, end: None }
    }
}
