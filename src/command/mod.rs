//! コマンド解析モジュール
//!
//! アドレス言語の解決とコマンド行の分類

pub mod address;
pub mod parser;

// 公開API
pub use address::{AddressContext, AddressToken, ResolvedAddress};
pub use parser::{parse_command, CommandKind, ParsedCommand};
