//! WinAnsiEncoding for the standard text fonts

/// Byte written for characters the encoding cannot represent
pub const SUBSTITUTE_BYTE: u8 = b'?';

/// Characters in the 0x80..=0x9F block, indexed by `byte - 0x80`
const HIGH_BLOCK: [Option<char>; 32] = [
    Some('\u{20AC}'), // euro
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'), // bullet
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

/// Map one character to its WinAnsi byte, if it has one
pub fn win_ansi_byte(ch: char) -> Option<u8> {
    let code = ch as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        // Tabs render as spaces
        0x09 => Some(b' '),
        _ => HIGH_BLOCK
            .iter()
            .position(|c| *c == Some(ch))
            .map(|i| 0x80 + i as u8),
    }
}

/// Encode text for a standard font; unmappable characters become `?`
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| win_ansi_byte(ch).unwrap_or(SUBSTITUTE_BYTE))
        .collect()
}

/// Whether every character of `text` survives encoding unchanged
pub fn is_win_ansi(text: &str) -> bool {
    text.chars().all(|ch| win_ansi_byte(ch).is_some())
}
