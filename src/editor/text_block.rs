//! テキストブロック入力
//!
//! `a` / `i` / `c` が使う、`.` 単独行で終わる自由入力の収集

use crate::error::Result;
use crate::input::LineSource;

/// ブロック終端を表す行
pub const BLOCK_TERMINATOR: &str = ".";

/// 終端行まで読み、集めた行を返す
///
/// 終端行そのものは含まない。入力終端に達した場合はそこまでの行を返す。
pub fn collect_text_block<S>(source: &mut S) -> Result<Vec<String>>
where
    S: LineSource + ?Sized,
{
    let mut block = Vec::new();

    while let Some(line) = source.read_line("")? {
        if line == BLOCK_TERMINATOR {
            return Ok(block);
        }
        block.push(line);
    }

    log::debug!("end of input inside text block after {} lines", block.len());
    Ok(block)
}
