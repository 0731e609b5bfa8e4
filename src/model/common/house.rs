use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// The houses a member can be sorted into.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum House {
    Gryffindor,
    Hufflepuff,
    Ravenclaw,
    Slytherin,
}

impl House {
    /// Every house, in canonical order. Scores are tallied and ties are broken by walking
    /// this list, never by the order answers come out of the database.
    pub const ALL: [House; 4] = [
        House::Gryffindor,
        House::Hufflepuff,
        House::Ravenclaw,
        House::Slytherin,
    ];

    /// The house's label, as shown to members and stored in the database.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gryffindor => "Gryffindor",
            Self::Hufflepuff => "Hufflepuff",
            Self::Ravenclaw => "Ravenclaw",
            Self::Slytherin => "Slytherin",
        }
    }
}

impl AsRef<str> for House {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl Display for House {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no house.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown house {0:?}")]
pub struct UnknownHouse(pub String);

impl FromStr for House {
    type Err = UnknownHouse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        House::ALL
            .into_iter()
            .find(|house| house.name() == s)
            .ok_or_else(|| UnknownHouse(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_is_alphabetical() {
        let names: Vec<_> = House::ALL.iter().map(House::name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn names_parse_back() {
        for house in House::ALL {
            assert_eq!(house.to_string().parse::<House>(), Ok(house));
        }
        assert!("gryffindor".parse::<House>().is_err());
    }

    #[test]
    fn serialises_as_name() {
        let json = rocket::serde::json::to_string(&House::Ravenclaw).unwrap();
        assert_eq!(json, "\"Ravenclaw\"");
    }
}
