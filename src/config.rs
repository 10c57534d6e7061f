//! 起動設定
//!
//! 既定値 → 設定ファイル → 環境変数 → コマンドライン の順に重ね合わせる

use crate::error::ConfigError;
use crate::file::expand_path;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 既定のプロンプト
pub const DEFAULT_PROMPT: &str = ":";

/// 使い方の表示
pub const USAGE: &str = "usage: em [-p PROMPT] [-s] [-v] [--debug-log PATH] [FILE]";

/// エディタ起動オプション
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorOptions {
    /// コマンド入力時のプロンプト（未指定時は `:`）
    pub prompt: Option<String>,
    /// 起動時に読み込むファイル
    pub initial_file: Option<PathBuf>,
    /// デバッグログ出力先
    pub debug_log_path: Option<PathBuf>,
    /// 詳細ログを有効化
    pub verbose: bool,
}

/// 設定ファイルの内容（すべて省略可能）
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    prompt: Option<String>,
    debug_log: Option<String>,
    verbose: Option<bool>,
}

impl EditorOptions {
    /// 実際に使用するプロンプト
    pub fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or(DEFAULT_PROMPT)
    }

    /// `overrides` 側に値があればそちらを優先して結合
    pub fn merged_with(&self, overrides: &EditorOptions) -> EditorOptions {
        EditorOptions {
            prompt: overrides.prompt.clone().or_else(|| self.prompt.clone()),
            initial_file: overrides
                .initial_file
                .clone()
                .or_else(|| self.initial_file.clone()),
            debug_log_path: overrides
                .debug_log_path
                .clone()
                .or_else(|| self.debug_log_path.clone()),
            verbose: self.verbose || overrides.verbose,
        }
    }

    /// 設定ファイルを読み込む。ファイルが無ければ `None`
    pub fn from_config_file(path: &Path) -> Result<Option<EditorOptions>, ConfigError> {
        if !path.is_file() {
            return Ok(None);
        }

        let invalid = |message: String| ConfigError::InvalidFile {
            path: path.display().to_string(),
            message,
        };

        let text = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let parsed: ConfigFile = serde_json::from_str(&text).map_err(|e| invalid(e.to_string()))?;

        log::debug!("loaded config file {}", path.display());

        Ok(Some(EditorOptions {
            prompt: parsed.prompt,
            initial_file: None,
            debug_log_path: parsed.debug_log.as_deref().map(expand_path),
            verbose: parsed.verbose.unwrap_or(false),
        }))
    }

    /// 環境変数から読み込む（`EM_PROMPT`, `EM_DEBUG`, `EM_DEBUG_LOG`）
    pub fn from_env<F>(lookup: F) -> EditorOptions
    where
        F: Fn(&str) -> Option<String>,
    {
        EditorOptions {
            prompt: lookup("EM_PROMPT"),
            initial_file: None,
            debug_log_path: lookup("EM_DEBUG_LOG").as_deref().map(expand_path),
            verbose: lookup("EM_DEBUG").is_some(),
        }
    }

    /// コマンドライン引数（プログラム名を除く）を解析
    pub fn from_args(args: &[String]) -> Result<EditorOptions, ConfigError> {
        let mut options = EditorOptions::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-p" => {
                    let value = iter.next().ok_or_else(|| ConfigError::MissingValue {
                        flag: arg.clone(),
                    })?;
                    options.prompt = Some(value.clone());
                }
                "-s" => options.prompt = Some(String::new()),
                "-v" | "--verbose" => options.verbose = true,
                "--debug-log" => {
                    let value = iter.next().ok_or_else(|| ConfigError::MissingValue {
                        flag: arg.clone(),
                    })?;
                    options.debug_log_path = Some(expand_path(value));
                }
                flag if flag.starts_with('-') && flag != "-" => {
                    return Err(ConfigError::UnknownFlag {
                        flag: flag.to_string(),
                    });
                }
                file => {
                    if options.initial_file.is_some() {
                        return Err(ConfigError::UnexpectedArgument {
                            arg: file.to_string(),
                        });
                    }
                    options.initial_file = Some(expand_path(file));
                }
            }
        }

        Ok(options)
    }

    /// すべての層を解決
    pub fn resolve(args: &[String]) -> Result<EditorOptions, ConfigError> {
        let mut options = EditorOptions::default();

        if let Some(path) = default_config_path() {
            if let Some(from_file) = Self::from_config_file(&path)? {
                options = options.merged_with(&from_file);
            }
        }

        let from_env = Self::from_env(|key| std::env::var(key).ok());
        options = options.merged_with(&from_env);

        let from_args = Self::from_args(args)?;
        Ok(options.merged_with(&from_args))
    }
}

/// 設定ファイルの既定パス（`<config_dir>/em/config.json`）
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("em").join("config.json"))
}
