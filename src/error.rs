//! エラーハンドリングシステム
//!
//! em 全体で使用されるエラー型とユーティリティを定義
//! セッション内のエラーはすべて局所的に回復し、`?` の表示と `h` 用メッセージの記録のみ行う

use thiserror::Error;

/// アプリケーション全体のエラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmError {
    /// アドレス不正（範囲外、逆順、空バッファへのアドレス指定）
    #[error("Invalid address")]
    Address,

    /// 未知のコマンド、または解釈できない末尾
    #[error("Unknown command")]
    Command,

    /// 読み込み・書き込み対象を開けない
    #[error("Cannot open input file: {path}")]
    FileOpen { path: String },

    /// 保存先ファイル名が未設定
    #[error("No current filename")]
    NoFilename,

    /// 変更を破棄する終了要求
    #[error("Warning: buffer modified")]
    ModifiedWarning,

    /// 入出力エラー（開けないもの以外）
    #[error("IO error: {message}")]
    Io { message: String },
}

impl EmError {
    /// `h` コマンドで再表示する固定メッセージ
    pub fn message(&self) -> &'static str {
        match self {
            EmError::Address => "Invalid address",
            EmError::Command => "Unknown command",
            EmError::FileOpen { .. } => "Cannot open input file",
            EmError::NoFilename => "No current filename",
            EmError::ModifiedWarning => "Warning: buffer modified",
            EmError::Io { .. } => "I/O error",
        }
    }

    /// ファイルを開けなかったことを表すエラーを作成
    pub fn file_open(path: impl AsRef<std::path::Path>) -> Self {
        EmError::FileOpen {
            path: path.as_ref().display().to_string(),
        }
    }
}

/// 起動時設定のエラー（セッション開始前にのみ発生）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration file {path}: {message}")]
    InvalidFile { path: String, message: String },

    #[error("Missing value for option: {flag}")]
    MissingValue { flag: String },

    #[error("Unknown option: {flag}")]
    UnknownFlag { flag: String },

    #[error("Too many file arguments: {arg}")]
    UnexpectedArgument { arg: String },
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, EmError>;

// std::io::Error から EmError への変換
impl From<std::io::Error> for EmError {
    fn from(error: std::io::Error) -> Self {
        EmError::Io {
            message: error.to_string(),
        }
    }
}

/// パニックハンドラの設定
pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s
        } else {
            "Unknown panic payload"
        };

        eprintln!("PANIC at {}: {}", location, message);
        eprintln!("Stack trace: {}", std::backtrace::Backtrace::capture());

        std::process::exit(1);
    }));
}
