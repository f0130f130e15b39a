//! WhatsApp deep-link construction.
//!
//! Desktop links target the web composer and percent-encode every character
//! outside the URL unreserved set. Mobile links target `wa.me`, which accepts
//! raw UTF-8; pictographs and a short punctuation whitelist stay unescaped.

use crate::domain::{CanonicalPhone, DeviceMode};

pub const DESKTOP_LINK_BASE: &str = "https://web.whatsapp.com/send";
pub const MOBILE_LINK_BASE: &str = "https://wa.me/";

const MOBILE_SAFE_PUNCTUATION: [char; 6] = [' ', '-', '.', ',', ':', '/'];

pub fn encode(text: &str, mode: DeviceMode) -> String {
    let mut out = String::with_capacity(text.len() * 3);
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        if keeps_raw(ch, mode) {
            out.push(ch);
        } else {
            out.push_str(&urlencoding::encode(ch.encode_utf8(&mut buf)));
        }
    }
    out
}

fn keeps_raw(ch: char, mode: DeviceMode) -> bool {
    match mode {
        DeviceMode::Desktop => false,
        DeviceMode::Mobile => MOBILE_SAFE_PUNCTUATION.contains(&ch) || is_pictographic(ch),
    }
}

/// Extended_Pictographic code points plus the joiners and modifiers that
/// build emoji sequences.
fn is_pictographic(ch: char) -> bool {
    matches!(
        ch as u32,
        0x1F000..=0x1FAFF
            | 0x2300..=0x23FF
            | 0x2600..=0x27BF
            | 0x2B00..=0x2BFF
            | 0xE0020..=0xE007F
            | 0x00A9
            | 0x00AE
            | 0x203C
            | 0x2049
            | 0x2122
            | 0x2139
            | 0x2194..=0x2199
            | 0x21A9..=0x21AA
            | 0x24C2
            | 0x25AA..=0x25AB
            | 0x25B6
            | 0x25C0
            | 0x25FB..=0x25FE
            | 0x2934..=0x2935
            | 0x3030
            | 0x303D
            | 0x3297
            | 0x3299
            | 0x200D
            | 0x20E3
            | 0xFE0F
    )
}

/// A message encoded once for a run and reused for every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMessage {
    mode: DeviceMode,
    encoded: String,
}

impl EncodedMessage {
    pub fn new(text: &str, mode: DeviceMode) -> Self {
        Self {
            mode,
            encoded: encode(text, mode),
        }
    }

    pub fn mode(&self) -> DeviceMode {
        self.mode
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    pub fn link_for(&self, phone: &CanonicalPhone) -> String {
        match self.mode {
            DeviceMode::Desktop => format!(
                "{DESKTOP_LINK_BASE}?phone={}&text={}",
                phone.as_str(),
                self.encoded
            ),
            DeviceMode::Mobile => {
                format!("{MOBILE_LINK_BASE}{}?text={}", phone.as_str(), self.encoded)
            }
        }
    }
}
