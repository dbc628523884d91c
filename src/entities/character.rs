//! Character entity type - a normalized, enrichable SWAPI person

use serde::{Deserialize, Serialize};

/// The kind of resource a reference field points at
///
/// Each role pairs one reference field (URL or URLs) with one display field
/// (resolved name or names) on [`Character`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceRole {
    /// Home planet (single reference)
    Homeworld,
    /// Films the character appears in
    Films,
    /// Species of the character
    Species,
    /// Starships piloted
    Starships,
    /// Vehicles piloted
    Vehicles,
}

impl ReferenceRole {
    /// Every role, in display order
    pub const ALL: [ReferenceRole; 5] = [
        ReferenceRole::Homeworld,
        ReferenceRole::Films,
        ReferenceRole::Species,
        ReferenceRole::Starships,
        ReferenceRole::Vehicles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceRole::Homeworld => "homeworld",
            ReferenceRole::Films => "films",
            ReferenceRole::Species => "species",
            ReferenceRole::Starships => "starships",
            ReferenceRole::Vehicles => "vehicles",
        }
    }

    /// Name of the paired display field
    pub fn display_field(&self) -> &'static str {
        match self {
            ReferenceRole::Homeworld => "homeworld_name",
            ReferenceRole::Films => "film_titles",
            ReferenceRole::Species => "species_names",
            ReferenceRole::Starships => "starship_names",
            ReferenceRole::Vehicles => "vehicle_names",
        }
    }

    /// True if the reference field holds at most one URL
    pub fn is_single(&self) -> bool {
        matches!(self, ReferenceRole::Homeworld)
    }
}

impl std::fmt::Display for ReferenceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReferenceRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "homeworld" => Ok(ReferenceRole::Homeworld),
            "films" | "film" => Ok(ReferenceRole::Films),
            "species" => Ok(ReferenceRole::Species),
            "starships" | "starship" => Ok(ReferenceRole::Starships),
            "vehicles" | "vehicle" => Ok(ReferenceRole::Vehicles),
            _ => Err(format!(
                "Invalid reference role: {}. Use homeworld, films, species, starships, or vehicles",
                s
            )),
        }
    }
}

/// A normalized character record with its reference and display fields
///
/// Display fields start empty and are filled by enrichment. Every display
/// field is `#[serde(default)]` so rows cached before a field existed still
/// load, and are then repaired by the freshness audit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Identity within a batch (not a stable upstream ID)
    pub name: String,

    #[serde(default)]
    pub height_cm: Option<f64>,

    #[serde(default)]
    pub height_in: Option<f64>,

    #[serde(default)]
    pub mass_kg: Option<f64>,

    #[serde(default)]
    pub birth_year: Option<String>,

    #[serde(default)]
    pub gender: Option<String>,

    #[serde(default)]
    pub hair_color: Option<String>,

    #[serde(default)]
    pub skin_color: Option<String>,

    #[serde(default)]
    pub eye_color: Option<String>,

    /// The character's own resource URL
    #[serde(default)]
    pub url: Option<String>,

    // Reference fields
    #[serde(default)]
    pub homeworld: Option<String>,

    #[serde(default)]
    pub films: Vec<String>,

    #[serde(default)]
    pub species: Vec<String>,

    #[serde(default)]
    pub starships: Vec<String>,

    #[serde(default)]
    pub vehicles: Vec<String>,

    // Display fields
    #[serde(default)]
    pub homeworld_name: Option<String>,

    #[serde(default)]
    pub film_titles: Vec<String>,

    #[serde(default)]
    pub species_names: Vec<String>,

    #[serde(default)]
    pub starship_names: Vec<String>,

    #[serde(default)]
    pub vehicle_names: Vec<String>,
}

impl Character {
    /// Reference URLs held by the given role, in order
    pub fn references(&self, role: ReferenceRole) -> Vec<&str> {
        match role {
            ReferenceRole::Homeworld => self.homeworld.iter().map(String::as_str).collect(),
            ReferenceRole::Films => self.films.iter().map(String::as_str).collect(),
            ReferenceRole::Species => self.species.iter().map(String::as_str).collect(),
            ReferenceRole::Starships => self.starships.iter().map(String::as_str).collect(),
            ReferenceRole::Vehicles => self.vehicles.iter().map(String::as_str).collect(),
        }
    }

    /// Resolved display names currently held by the given role
    pub fn display_names(&self, role: ReferenceRole) -> Vec<&str> {
        match role {
            ReferenceRole::Homeworld => self.homeworld_name.iter().map(String::as_str).collect(),
            ReferenceRole::Films => self.film_titles.iter().map(String::as_str).collect(),
            ReferenceRole::Species => self.species_names.iter().map(String::as_str).collect(),
            ReferenceRole::Starships => self.starship_names.iter().map(String::as_str).collect(),
            ReferenceRole::Vehicles => self.vehicle_names.iter().map(String::as_str).collect(),
        }
    }

    /// Overwrite the display field for a role
    ///
    /// For the single-valued homeworld role only the first name is kept.
    pub fn set_display_names(&mut self, role: ReferenceRole, names: Vec<String>) {
        match role {
            ReferenceRole::Homeworld => self.homeworld_name = names.into_iter().next(),
            ReferenceRole::Films => self.film_titles = names,
            ReferenceRole::Species => self.species_names = names,
            ReferenceRole::Starships => self.starship_names = names,
            ReferenceRole::Vehicles => self.vehicle_names = names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip_from_str() {
        for role in ReferenceRole::ALL {
            assert_eq!(role.as_str().parse::<ReferenceRole>().unwrap(), role);
        }
        assert_eq!("Film".parse::<ReferenceRole>().unwrap(), ReferenceRole::Films);
        assert!("planets".parse::<ReferenceRole>().is_err());
    }

    #[test]
    fn test_only_homeworld_is_single() {
        let singles: Vec<_> = ReferenceRole::ALL
            .iter()
            .filter(|r| r.is_single())
            .collect();
        assert_eq!(singles, vec![&ReferenceRole::Homeworld]);
    }

    #[test]
    fn test_set_display_names_homeworld_keeps_first() {
        let mut character = Character {
            name: "Luke Skywalker".to_string(),
            homeworld: Some("u1".to_string()),
            ..Default::default()
        };
        character.set_display_names(
            ReferenceRole::Homeworld,
            vec!["Tatooine".to_string(), "Extra".to_string()],
        );
        assert_eq!(character.homeworld_name.as_deref(), Some("Tatooine"));

        character.set_display_names(ReferenceRole::Homeworld, vec![]);
        assert_eq!(character.homeworld_name, None);
    }

    #[test]
    fn test_legacy_row_without_display_fields_deserializes() {
        let legacy = r#"{
            "name": "Leia Organa",
            "height_cm": 150.0,
            "mass_kg": 49.0,
            "homeworld": "https://swapi.dev/api/planets/2/",
            "films": ["https://swapi.dev/api/films/1/"]
        }"#;
        let character: Character = serde_json::from_str(legacy).unwrap();
        assert_eq!(character.name, "Leia Organa");
        assert_eq!(character.homeworld_name, None);
        assert!(character.film_titles.is_empty());
        assert!(character.vehicles.is_empty());
        assert_eq!(character.references(ReferenceRole::Films).len(), 1);
    }
}
