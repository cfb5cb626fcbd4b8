use encoding_rs::SHIFT_JIS;

/// Outcome of repairing one string field.
#[derive(Debug, Clone, PartialEq)]
pub struct Repaired {
    pub text: String,
    /// The field was garbled and has been re-decoded.
    pub changed: bool,
    /// The field looked garbled but could not be re-decoded; passed through.
    pub failed: bool,
}

impl Repaired {
    fn clean(text: &str) -> Self {
        Repaired {
            text: text.to_string(),
            changed: false,
            failed: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Repair strategies — enum dispatch instead of trait objects
// ---------------------------------------------------------------------------

/// The legacy exporter writes Shift-JIS bytes which upstream tooling decodes
/// as Latin-1, so Japanese text arrives as one mangled char per byte. The
/// Mojibake strategy reverses that: re-encode the chars as their original
/// bytes and decode as Shift-JIS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RepairStrategy {
    Mojibake,
    None,
}

impl RepairStrategy {
    pub fn apply(&self, raw: &str) -> Repaired {
        match self {
            Self::None => Repaired::clean(raw),
            Self::Mojibake => repair_mojibake(raw),
        }
    }
}

fn repair_mojibake(raw: &str) -> Repaired {
    // ASCII is valid under both encodings; nothing to do.
    if raw.is_ascii() {
        return Repaired::clean(raw);
    }
    // Chars above U+00FF cannot have come from a Latin-1 decode, so the
    // field is already proper text.
    if raw.chars().any(|c| c as u32 > 0xFF) {
        return Repaired::clean(raw);
    }
    let bytes: Vec<u8> = raw.chars().map(|c| c as u32 as u8).collect();
    let (decoded, _, had_errors) = SHIFT_JIS.decode(&bytes);
    if had_errors {
        return Repaired {
            text: raw.to_string(),
            changed: false,
            failed: true,
        };
    }
    let text = decoded.into_owned();
    let changed = text != raw;
    Repaired {
        text,
        changed,
        failed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Garble a string the way the legacy exporter does: Shift-JIS bytes
    /// read back as Latin-1, one char per byte.
    fn garble(s: &str) -> String {
        let (bytes, _, _) = SHIFT_JIS.encode(s);
        bytes.iter().map(|&b| b as char).collect()
    }

    #[test]
    fn test_ascii_passes_through() {
        let r = RepairStrategy::Mojibake.apply("F-1024");
        assert_eq!(r.text, "F-1024");
        assert!(!r.changed);
        assert!(!r.failed);
    }

    #[test]
    fn test_repairs_garbled_japanese() {
        let garbled = garble("分類名称");
        let r = RepairStrategy::Mojibake.apply(&garbled);
        assert_eq!(r.text, "分類名称");
        assert!(r.changed);
        assert!(!r.failed);
    }

    #[test]
    fn test_repairs_halfwidth_katakana() {
        let garbled = garble("ﾌｧｲﾙNO");
        let r = RepairStrategy::Mojibake.apply(&garbled);
        assert_eq!(r.text, "ﾌｧｲﾙNO");
        assert!(r.changed);
    }

    #[test]
    fn test_proper_japanese_left_alone() {
        let r = RepairStrategy::Mojibake.apply("品目");
        assert_eq!(r.text, "品目");
        assert!(!r.changed);
        assert!(!r.failed);
    }

    #[test]
    fn test_undecodable_field_flags_and_passes_through() {
        // Trailing lone lead byte cannot be valid Shift-JIS.
        let garbled = format!("{}\u{00e9}", garble("部品"));
        let r = RepairStrategy::Mojibake.apply(&garbled);
        assert_eq!(r.text, garbled);
        assert!(r.failed);
        assert!(!r.changed);
    }

    #[test]
    fn test_none_strategy_is_noop() {
        let garbled = garble("分類");
        let r = RepairStrategy::None.apply(&garbled);
        assert_eq!(r.text, garbled);
        assert!(!r.changed);
        assert!(!r.failed);
    }
}
