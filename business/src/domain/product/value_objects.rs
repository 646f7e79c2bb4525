use serde::{Deserialize, Serialize};

/// Raised when an external token does not name a member of a closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind} value: '{value}'")]
pub struct InvalidEnumValue {
    pub kind: &'static str,
    pub value: String,
}

impl InvalidEnumValue {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Season::Spring => write!(f, "SPRING"),
            Season::Summer => write!(f, "SUMMER"),
            Season::Fall => write!(f, "FALL"),
            Season::Winter => write!(f, "WINTER"),
        }
    }
}

impl std::str::FromStr for Season {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SPRING" => Ok(Season::Spring),
            "SUMMER" => Ok(Season::Summer),
            "FALL" => Ok(Season::Fall),
            "WINTER" => Ok(Season::Winter),
            _ => Err(InvalidEnumValue::new("season", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Size {
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Size::Xs => write!(f, "XS"),
            Size::S => write!(f, "S"),
            Size::M => write!(f, "M"),
            Size::L => write!(f, "L"),
            Size::Xl => write!(f, "XL"),
            Size::Xxl => write!(f, "XXL"),
        }
    }
}

impl std::str::FromStr for Size {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "XS" => Ok(Size::Xs),
            "S" => Ok(Size::S),
            "M" => Ok(Size::M),
            "L" => Ok(Size::L),
            "XL" => Ok(Size::Xl),
            "XXL" => Ok(Size::Xxl),
            _ => Err(InvalidEnumValue::new("size", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SEASON_TOKENS: [&str; 4] = ["SPRING", "SUMMER", "FALL", "WINTER"];
    const SIZE_TOKENS: [&str; 6] = ["XS", "S", "M", "L", "XL", "XXL"];

    #[test]
    fn should_parse_every_season_token_back_to_its_display_form() {
        for token in SEASON_TOKENS {
            let season: Season = token.parse().unwrap();
            assert_eq!(season.to_string(), token);
        }
    }

    #[test]
    fn should_parse_every_size_token_back_to_its_display_form() {
        for token in SIZE_TOKENS {
            let size: Size = token.parse().unwrap();
            assert_eq!(size.to_string(), token);
        }
    }

    #[test]
    fn should_reject_lowercase_tokens() {
        let error = "winter".parse::<Season>().unwrap_err();
        assert_eq!(error.kind, "season");
        assert_eq!(error.value, "winter");

        let error = "m".parse::<Size>().unwrap_err();
        assert_eq!(error.kind, "size");
    }

    #[test]
    fn should_name_kind_and_value_in_message() {
        let error = "XXXL".parse::<Size>().unwrap_err();
        assert_eq!(error.to_string(), "Invalid size value: 'XXXL'");
    }

    proptest! {
        #[test]
        fn should_reject_any_token_outside_the_season_table(token in "\\PC*") {
            prop_assume!(!SEASON_TOKENS.contains(&token.as_str()));
            prop_assert!(token.parse::<Season>().is_err());
        }

        #[test]
        fn should_reject_any_token_outside_the_size_table(token in "\\PC*") {
            prop_assume!(!SIZE_TOKENS.contains(&token.as_str()));
            prop_assert!(token.parse::<Size>().is_err());
        }
    }
}
