//! Dice damage expressions of the shape `NdM[+-B] [damage type]`.

use core::fmt;
use core::str::FromStr;

/// Error returned when a damage expression cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("malformed damage expression '{input}': {reason}")]
pub struct DamageRollError {
    pub input: String,
    pub reason: &'static str,
}

/// Parsed damage expression.
///
/// Rendering omits a zero bonus, so `2d6+0 fire` round-trips as `2d6 fire`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct DamageRoll {
    pub dice: u32,
    pub sides: u32,
    pub bonus: i32,
    pub damage_type: Option<String>,
}

impl DamageRoll {
    pub fn new(dice: u32, sides: u32, bonus: i32) -> Self {
        Self {
            dice,
            sides,
            bonus,
            damage_type: None,
        }
    }

    #[must_use]
    pub fn with_type(mut self, damage_type: impl Into<String>) -> Self {
        self.damage_type = Some(damage_type.into());
        self
    }

    /// Shifts the flat bonus by `delta`, never leaving it below zero.
    pub fn shift_bonus_floored(&mut self, delta: i32) {
        self.bonus = (self.bonus + delta).max(0);
    }

    /// Shifts the flat bonus by `delta` without a floor.
    pub fn shift_bonus(&mut self, delta: i32) {
        self.bonus += delta;
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(end)
}

impl FromStr for DamageRoll {
    type Err = DamageRollError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let malformed = |reason| DamageRollError {
            input: input.to_string(),
            reason,
        };

        let rest = input.trim();
        if rest.is_empty() {
            return Err(malformed("empty expression"));
        }

        let (dice, rest) = split_digits(rest);
        let dice = if dice.is_empty() {
            1
        } else {
            dice.parse().map_err(|_| malformed("dice count out of range"))?
        };

        let rest = rest
            .strip_prefix(['d', 'D'])
            .ok_or_else(|| malformed("expected 'd' after dice count"))?;

        let (sides, rest) = split_digits(rest);
        if sides.is_empty() {
            return Err(malformed("missing die size"));
        }
        let sides = sides
            .parse()
            .map_err(|_| malformed("die size out of range"))?;

        let mut rest = rest.trim_start();
        let mut bonus = 0;
        if let Some(sign) = rest.chars().next().filter(|c| *c == '+' || *c == '-') {
            let (digits, tail) = split_digits(rest[1..].trim_start());
            if digits.is_empty() {
                return Err(malformed("missing bonus after sign"));
            }
            let magnitude: i32 = digits.parse().map_err(|_| malformed("bonus out of range"))?;
            bonus = if sign == '-' { -magnitude } else { magnitude };
            rest = tail.trim_start();
        }

        let damage_type = match rest.trim() {
            "" => None,
            kind => Some(kind.to_string()),
        };

        Ok(Self {
            dice,
            sides,
            bonus,
            damage_type,
        })
    }
}

impl fmt::Display for DamageRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.dice, self.sides)?;
        match self.bonus {
            0 => {}
            b if b > 0 => write!(f, "+{b}")?,
            b => write!(f, "{b}")?,
        }
        if let Some(kind) = &self.damage_type {
            write!(f, " {kind}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for DamageRoll {
    type Error = DamageRollError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DamageRoll> for String {
    fn from(roll: DamageRoll) -> Self {
        roll.to_string()
    }
}
