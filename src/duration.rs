use std::time::Duration;

use log::debug;

use crate::constants::*;
use crate::error::SlideshowError;

/// Parses the seconds field. Only a positive whole number of seconds is valid.
pub fn parse_display_duration(text: &str) -> Result<Duration, SlideshowError> {
    match text.trim().parse::<u64>() {
        Ok(seconds) if seconds > 0 => Ok(Duration::from_secs(seconds)),
        _ => Err(SlideshowError::InvalidDurationInput(text.to_string())),
    }
}

/// How long an image stays on screen given the current field text.
pub fn display_duration(text: &str) -> Duration {
    parse_display_duration(text).unwrap_or_else(|e| {
        debug!("{}, using {}s", e, DEFAULT_DISPLAY_SECONDS);
        Duration::from_secs(DEFAULT_DISPLAY_SECONDS)
    })
}

/// Numeric text field holding the per-image display duration.
#[derive(Debug, Default)]
pub struct DurationField {
    text: String,
    pub focused: bool,
}

impl DurationField {
    pub fn new(initial: &str) -> Self {
        let mut field = Self::default();
        for c in initial.chars() {
            field.push_char(c);
        }
        field
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Accepts digits only, up to the field's width.
    pub fn push_char(&mut self, c: char) -> bool {
        if !c.is_ascii_digit() || self.text.len() >= MAX_DURATION_DIGITS {
            return false;
        }
        self.text.push(c);
        true
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_text_is_used_as_seconds() {
        assert_eq!(display_duration("12"), Duration::from_secs(12));
        assert_eq!(display_duration(" 3 "), Duration::from_secs(3));
    }

    #[test]
    fn empty_or_garbage_falls_back_to_default() {
        let default = Duration::from_secs(DEFAULT_DISPLAY_SECONDS);
        assert_eq!(display_duration(""), default);
        assert_eq!(display_duration("abc"), default);
        assert_eq!(display_duration("-4"), default);
        assert_eq!(display_duration("0"), default);
        assert_eq!(display_duration("99999999999999999999999"), default);
    }

    #[test]
    fn parse_reports_invalid_input() {
        match parse_display_duration("abc") {
            Err(SlideshowError::InvalidDurationInput(text)) => assert_eq!(text, "abc"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn field_keeps_digits_only() {
        let mut field = DurationField::new("1a2");
        assert_eq!(field.text(), "12");
        assert!(!field.push_char('x'));
        assert!(field.push_char('0'));
        field.backspace();
        assert_eq!(field.text(), "12");
    }

    #[test]
    fn field_is_bounded() {
        let mut field = DurationField::new("");
        for _ in 0..MAX_DURATION_DIGITS + 3 {
            field.push_char('9');
        }
        assert_eq!(field.text().len(), MAX_DURATION_DIGITS);
    }
}
