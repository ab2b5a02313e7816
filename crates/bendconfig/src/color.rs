use crate::ConfigError;

/// Hard cap on the number of color bands the field evaluates.
pub const MAX_COLORS: usize = 8;

/// Linear RGB triple with every component in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn from_bytes(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
        }
    }

    /// Re-encodes the color as 8-bit channels, rounding to nearest.
    pub fn to_bytes(self) -> [u8; 3] {
        let encode = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        [encode(self.r), encode(self.g), encode(self.b)]
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Parses `#RGB` / `#RRGGBB` (case-insensitive, `#` optional).
///
/// Anything else is rejected; malformed digits never turn into a color.
pub fn parse_color(input: &str) -> Result<Color, ConfigError> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed).trim();

    let invalid = |reason: &str| ConfigError::InvalidColor {
        value: input.to_string(),
        reason: reason.to_string(),
    };

    if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(invalid("expected hexadecimal digits"));
    }

    let nibble = |index: usize| -> u8 {
        // digits are validated ASCII hex above
        (digits.as_bytes()[index] as char).to_digit(16).unwrap_or(0) as u8
    };

    match digits.len() {
        3 => {
            let expand = |index: usize| nibble(index) * 17;
            Ok(Color::from_bytes(expand(0), expand(1), expand(2)))
        }
        6 => {
            let byte = |index: usize| nibble(index) * 16 + nibble(index + 1);
            Ok(Color::from_bytes(byte(0), byte(2), byte(4)))
        }
        len => Err(invalid(&format!("expected 3 or 6 hex digits, found {len}"))),
    }
}

/// Fixed-capacity list of up to [`MAX_COLORS`] colors.
///
/// Unused slots are always zeroed so the whole array can be uploaded as-is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorList {
    slots: [Color; MAX_COLORS],
    len: usize,
}

impl ColorList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from raw hex entries.
    ///
    /// Blank entries are dropped, then the list is truncated to
    /// [`MAX_COLORS`], then every retained entry must parse.
    pub fn parse<I, S>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for entry in entries
            .into_iter()
            .filter(|entry| !entry.as_ref().trim().is_empty())
            .take(MAX_COLORS)
        {
            list.push(parse_color(entry.as_ref())?);
        }
        Ok(list)
    }

    /// Appends a color; returns `false` once the list is full.
    pub fn push(&mut self, color: Color) -> bool {
        if self.len >= MAX_COLORS {
            return false;
        }
        self.slots[self.len] = color;
        self.len += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.slots[..self.len]
    }

    /// All slots including the zeroed tail.
    pub fn slots(&self) -> &[Color; MAX_COLORS] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_long_forms_decode_to_same_color() {
        let short = parse_color("#f80").unwrap();
        let long = parse_color("FF8800").unwrap();
        assert_eq!(short, long);
        assert_eq!(long.to_bytes(), [0xff, 0x88, 0x00]);
    }

    #[test]
    fn bytes_survive_decode_encode() {
        for value in [0u8, 1, 17, 127, 128, 200, 254, 255] {
            let hex = format!("{value:02x}{:02X}{:02x}", 255 - value, value / 2);
            let color = parse_color(&hex).unwrap();
            let [r, g, b] = color.to_bytes();
            assert!(r.abs_diff(value) <= 1);
            assert!(g.abs_diff(255 - value) <= 1);
            assert!(b.abs_diff(value / 2) <= 1);
        }
        for digits in ["000", "abc", "FfF", "07e"] {
            let color = parse_color(digits).unwrap();
            let expected: Vec<u8> = digits
                .chars()
                .map(|ch| ch.to_digit(16).unwrap() as u8 * 17)
                .collect();
            assert_eq!(color.to_bytes().to_vec(), expected);
        }
    }

    #[test]
    fn whitespace_and_hash_are_tolerated() {
        let color = parse_color("  #00ff00 ").unwrap();
        assert_eq!(color.to_bytes(), [0, 255, 0]);
    }

    #[test]
    fn malformed_strings_are_rejected() {
        for bad in ["", "#", "#12", "#1234", "#12345g", "zzz", "#ff00ff00", "#-12"] {
            let err = parse_color(bad).unwrap_err();
            assert_eq!(err.kind(), "invalid-color", "input {bad:?}");
        }
    }

    #[test]
    fn list_filters_blank_entries_and_truncates() {
        let entries = [
            "#100", "", "#200", "  ", "#300", "#400", "#500", "#600", "#700", "#800", "#900",
        ];
        let list = ColorList::parse(entries).unwrap();
        assert_eq!(list.len(), MAX_COLORS);
        assert_eq!(list.as_slice()[0].to_bytes(), [0x11, 0, 0]);
        assert_eq!(list.as_slice()[7].to_bytes(), [0x88, 0, 0]);
    }

    #[test]
    fn entries_past_capacity_are_not_validated() {
        let mut entries = vec!["#fff"; MAX_COLORS];
        entries.push("not-a-color");
        let list = ColorList::parse(entries).unwrap();
        assert_eq!(list.len(), MAX_COLORS);
    }

    #[test]
    fn unused_slots_stay_zeroed() {
        let list = ColorList::parse(["#ff0000", "#00ff00"]).unwrap();
        assert_eq!(list.len(), 2);
        for slot in &list.slots()[2..] {
            assert_eq!(*slot, Color::BLACK);
        }
    }

    #[test]
    fn push_refuses_ninth_color() {
        let mut list = ColorList::new();
        for _ in 0..MAX_COLORS {
            assert!(list.push(Color::BLACK));
        }
        assert!(!list.push(Color::BLACK));
        assert_eq!(list.len(), MAX_COLORS);
    }
}
