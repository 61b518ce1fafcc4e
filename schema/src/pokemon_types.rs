use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// The canonical elemental kinds. Stored kind names are the lowercase form.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PokemonType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl PokemonType {
    /// Lowercase names of every kind, in declaration order.
    pub fn all_names() -> Vec<String> {
        Self::iter().map(|kind| kind.to_string()).collect()
    }

    pub fn is_known(name: &str) -> bool {
        name.trim().parse::<PokemonType>().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_lowercase() {
        let names = PokemonType::all_names();
        assert_eq!(names.len(), 18);
        assert_eq!(names[0], "normal");
        assert!(names.iter().all(|n| n.chars().all(|c| c.is_ascii_lowercase())));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Fire".parse::<PokemonType>(), Ok(PokemonType::Fire));
        assert_eq!("ELECTRIC".parse::<PokemonType>(), Ok(PokemonType::Electric));
        assert!(PokemonType::is_known(" fairy "));
        assert!(!PokemonType::is_known("shadow"));
    }
}
