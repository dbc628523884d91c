//! Server-side ordering of character listings

use std::cmp::Ordering;

use clap::ValueEnum;

use crate::entities::Character;

/// Field to sort characters by
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortField {
    Name,
    HeightCm,
    #[default]
    MassKg,
}

/// Sort direction
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Sort `characters` in place
///
/// Records missing the field compare greater than any present value, so
/// they come last in ascending order and first in descending order. Names
/// compare case-insensitively. The sort is stable.
pub fn sort_characters(characters: &mut [Character], field: SortField, order: SortOrder) {
    characters.sort_by(|a, b| {
        let ordering = compare(a, b, field);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn compare(a: &Character, b: &Character, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::HeightCm => compare_optional(a.height_cm, b.height_cm),
        SortField::MassKg => compare_optional(a.mass_kg, b.mass_kg),
    }
}

fn compare_optional(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_mass(name: &str, mass: Option<f64>) -> Character {
        Character {
            name: name.to_string(),
            mass_kg: mass,
            ..Default::default()
        }
    }

    fn names(characters: &[Character]) -> Vec<&str> {
        characters.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_mass_desc_puts_heavier_first() {
        let mut list = vec![
            with_mass("Light", Some(60.0)),
            with_mass("Heavy", Some(120.0)),
        ];
        sort_characters(&mut list, SortField::MassKg, SortOrder::Desc);
        assert_eq!(names(&list), vec!["Heavy", "Light"]);
    }

    #[test]
    fn test_missing_values_placement() {
        let mut list = vec![
            with_mass("Unknown", None),
            with_mass("Heavy", Some(120.0)),
            with_mass("Light", Some(60.0)),
        ];

        sort_characters(&mut list, SortField::MassKg, SortOrder::Asc);
        assert_eq!(names(&list), vec!["Light", "Heavy", "Unknown"]);

        sort_characters(&mut list, SortField::MassKg, SortOrder::Desc);
        assert_eq!(names(&list), vec!["Unknown", "Heavy", "Light"]);
    }

    #[test]
    fn test_name_sort_is_case_insensitive() {
        let mut list = vec![
            with_mass("yoda", None),
            with_mass("Ackbar", None),
            with_mass("Boba Fett", None),
        ];
        sort_characters(&mut list, SortField::Name, SortOrder::Asc);
        assert_eq!(names(&list), vec!["Ackbar", "Boba Fett", "yoda"]);
    }
}
