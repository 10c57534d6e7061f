//! 生バイト保持テキスト
//!
//! UTF-8 として不正なバイトを私用領域 U+EF80..=U+EFFF の1文字に退避し、
//! 書き出し時に元のバイトへ戻す。`encode_text(&decode_bytes(b)) == b` が常に成り立つ。
//! 元から U+EF80..=U+EFFF を含む正しい UTF-8 は、その3バイトをそれぞれ退避して区別する。

use std::borrow::Cow;

const ESCAPE_BASE: u32 = 0xEF00;
const ESCAPE_FIRST: u32 = ESCAPE_BASE + 0x80;
const ESCAPE_LAST: u32 = ESCAPE_BASE + 0xFF;

fn is_escape(ch: char) -> bool {
    (ESCAPE_FIRST..=ESCAPE_LAST).contains(&(ch as u32))
}

fn escape_byte(byte: u8) -> char {
    char::from_u32(ESCAPE_BASE + u32::from(byte)).unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn push_valid(out: &mut String, valid: &str) {
    for ch in valid.chars() {
        if is_escape(ch) {
            let mut utf8 = [0u8; 4];
            for byte in ch.encode_utf8(&mut utf8).bytes() {
                out.push(escape_byte(byte));
            }
        } else {
            out.push(ch);
        }
    }
}

/// バイト列を文字列へ変換する。正しい UTF-8 で退避も不要なら借用のまま返す
pub fn decode_bytes(bytes: &[u8]) -> Cow<'_, str> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        if !text.chars().any(is_escape) {
            return Cow::Borrowed(text);
        }
    }

    let mut out = String::with_capacity(bytes.len());
    let mut rest = bytes;
    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                push_valid(&mut out, valid);
                break;
            }
            Err(err) => {
                let (valid, after) = rest.split_at(err.valid_up_to());
                if let Ok(valid) = std::str::from_utf8(valid) {
                    push_valid(&mut out, valid);
                }
                let invalid_len = err.error_len().unwrap_or(after.len());
                for &byte in &after[..invalid_len] {
                    out.push(escape_byte(byte));
                }
                rest = &after[invalid_len..];
            }
        }
    }

    Cow::Owned(out)
}

/// `decode_bytes` の逆変換
pub fn encode_text(text: &str) -> Cow<'_, [u8]> {
    if !text.chars().any(is_escape) {
        return Cow::Borrowed(text.as_bytes());
    }

    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        if is_escape(ch) {
            out.push((ch as u32 - ESCAPE_BASE) as u8);
        } else {
            let mut utf8 = [0u8; 4];
            out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
        }
    }
    Cow::Owned(out)
}
