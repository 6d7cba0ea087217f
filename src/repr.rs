//! Letter notation for sharing boards as text.
//!
//! Tubes are separated by whitespace, or by `|` when the text contains one
//! (which also allows an empty tube to be written as nothing at all). Each tube
//! lists its units bottom to top: `A`..`Z`, then `AA`, `AB`, ... for further
//! colors, and `.` for an empty slot above the liquid. A tube whose labels are
//! longer than one letter separates them with commas, e.g. `AA,B,.`. A trailing
//! comma closes the tube without adding a slot, so a one-slot tube reads `AA,`.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigurationError;
use crate::model::{ColorId, Configuration, Tube};

/// Reads a label such as `A`, `Z`, `AA` as a color id, counting in bijective
/// base 26 (`A` is 0, `Z` is 25, `AA` is 26). Case is ignored.
pub fn parse_color_label(label: &str) -> Option<ColorId> {
    if label.is_empty() {
        return None;
    }
    let value = label.chars().try_fold(0usize, |value, ch| {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        value.checked_mul(26)?.checked_add(digit)
    })?;
    Some(value - 1)
}

pub fn color_label(color: ColorId) -> String {
    let mut chars = Vec::new();
    let mut id = color + 1;
    while id > 0 {
        let rem = (id - 1) % 26;
        chars.push((b'A' + rem as u8) as char);
        id = (id - 1) / 26;
    }
    chars.iter().rev().collect()
}

/// Parses one tube token into its units and its written slot count.
fn parse_tube(index: usize, token: &str) -> Result<(Vec<ColorId>, usize), ConfigurationError> {
    let slots: Vec<&str> = if token.contains(',') {
        let token = token.strip_suffix(',').unwrap_or(token);
        token.split(',').map(str::trim).collect()
    } else {
        token
            .char_indices()
            .map(|(i, ch)| &token[i..i + ch.len_utf8()])
            .collect()
    };
    let mut units = Vec::with_capacity(slots.len());
    let mut saw_gap = false;
    for slot in &slots {
        if slot.is_empty() || *slot == "." {
            saw_gap = true;
            continue;
        }
        if saw_gap {
            return Err(ConfigurationError::Gap { tube: index });
        }
        let color = parse_color_label(slot).ok_or_else(|| ConfigurationError::InvalidToken {
            token: (*slot).to_string(),
        })?;
        units.push(color);
    }
    Ok((units, slots.len()))
}

impl Configuration {
    /// Parses the letter notation. Without an explicit `capacity`, the longest
    /// written tube (counting `.` slots) sets it.
    ///
    /// # Errors
    /// Returns `ConfigurationError` for unknown labels, gaps below liquid, or any
    /// board [`Configuration::new`] would reject.
    pub fn parse(text: &str, capacity: Option<usize>) -> Result<Self, ConfigurationError> {
        let tokens: Vec<&str> = if text.contains('|') {
            text.trim().split('|').map(str::trim).collect()
        } else {
            text.split_whitespace().collect()
        };
        let mut tubes = Vec::with_capacity(tokens.len());
        let mut widest = 0;
        for (index, token) in tokens.iter().enumerate() {
            let (units, slots) = parse_tube(index, token)?;
            widest = widest.max(slots);
            tubes.push(units);
        }
        Self::new(tubes, capacity.unwrap_or(widest))
    }

    pub fn get_text_representation(&self) -> String {
        let capacity = self.get_capacity();
        let multi_char = self
            .get_tubes()
            .iter()
            .flat_map(Tube::get_units)
            .any(|&color| color >= 26);
        let separator = if multi_char { "," } else { "" };
        self.get_tubes()
            .iter()
            .map(|tube| {
                let mut slots: Vec<String> =
                    tube.get_units().iter().map(|&c| color_label(c)).collect();
                slots.resize(capacity, ".".to_string());
                let mut token = slots.join(separator);
                if multi_char && capacity == 1 {
                    token.push(',');
                }
                token
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromStr for Configuration {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, None)
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get_text_representation())
    }
}
