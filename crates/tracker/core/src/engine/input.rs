//! Conversion of raw user text into event arguments.

use super::EngineError;

/// Parses a non-negative HP amount (damage, healing, temp HP).
pub fn parse_amount(field: &'static str, raw: &str) -> Result<i32, EngineError> {
    let value: i32 = raw
        .trim()
        .parse()
        .map_err(|_| EngineError::invalid_input(field, format!("'{raw}' is not a whole number")))?;
    if value < 0 {
        return Err(EngineError::invalid_input(
            field,
            format!("{value} must not be negative"),
        ));
    }
    Ok(value)
}

/// Parses an initiative value. Negative initiatives are legal.
pub fn parse_initiative(raw: &str) -> Result<i32, EngineError> {
    raw.trim().parse().map_err(|_| {
        EngineError::invalid_input("initiative", format!("'{raw}' is not a whole number"))
    })
}

pub(crate) fn ensure_non_negative(field: &'static str, value: i32) -> Result<(), EngineError> {
    if value < 0 {
        return Err(EngineError::invalid_input(
            field,
            format!("{value} must not be negative"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ErrorKind;

    #[test]
    fn amounts_must_be_non_negative_integers() {
        assert_eq!(parse_amount("damage", " 12 "), Ok(12));
        assert_eq!(
            parse_amount("damage", "-3").map_err(|e| e.kind()),
            Err(ErrorKind::InvalidInput)
        );
        assert_eq!(
            parse_amount("damage", "a lot").map_err(|e| e.kind()),
            Err(ErrorKind::InvalidInput)
        );
    }

    #[test]
    fn initiative_accepts_negative_values() {
        assert_eq!(parse_initiative("-2"), Ok(-2));
        assert!(parse_initiative("12.5").is_err());
    }
}
