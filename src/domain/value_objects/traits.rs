//! Gender and emotion enumerations

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Undisclosed,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Undisclosed => "undisclosed gender",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "undisclosed" | "undisclosed gender" => Ok(Gender::Undisclosed),
            other => Err(other.to_string()),
        }
    }
}

/// Something a creature can feel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Emotion {
    Happy,
    Sad,
    Anger,
    Love,
    Hate,
    Frustration,
    Bitterness,
    Peace,
    Wonder,
    Amazed,
    Confused,
    Thrilled,
    Devastated,
    Jubilant,
    Stunned,
    Frightened,
    Brave,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Anger => "anger",
            Emotion::Love => "love",
            Emotion::Hate => "hate",
            Emotion::Frustration => "frustration",
            Emotion::Bitterness => "bitterness",
            Emotion::Peace => "peace",
            Emotion::Wonder => "wonder",
            Emotion::Amazed => "amazed",
            Emotion::Confused => "confused",
            Emotion::Thrilled => "thrilled",
            Emotion::Devastated => "devastated",
            Emotion::Jubilant => "jubilant",
            Emotion::Stunned => "stunned",
            Emotion::Frightened => "frightened",
            Emotion::Brave => "brave",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parse_and_display() {
        assert_eq!("Female".parse::<Gender>(), Ok(Gender::Female));
        assert_eq!("undisclosed".parse::<Gender>(), Ok(Gender::Undisclosed));
        assert!("other".parse::<Gender>().is_err());
        assert_eq!(Gender::default().to_string(), "undisclosed gender");
    }
}
