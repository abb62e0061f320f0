use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product line a figure belongs to. Stored and serialized upper-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Model {
    Marvel,
    Disney,
    Anime,
    Other,
}

impl Model {
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Marvel => "MARVEL",
            Model::Disney => "DISNEY",
            Model::Anime => "ANIME",
            Model::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = FigureInvalid;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MARVEL" => Ok(Model::Marvel),
            "DISNEY" => Ok(Model::Disney),
            "ANIME" => Ok(Model::Anime),
            "OTHER" => Ok(Model::Other),
            other => Err(FigureInvalid::UnknownModel(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub id: Uuid,
    pub serial: i64,
    pub name: String,
    pub model: Model,
    pub price: f64,
    pub release_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied fields of a figure; everything else is assigned on write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureDraft {
    pub name: String,
    pub model: Model,
    pub price: f64,
    pub release_date: NaiveDate,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FigureInvalid {
    #[error("name must not be empty")]
    EmptyName,
    #[error("price must not be negative")]
    NegativePrice,
    #[error("unknown model: {0}")]
    UnknownModel(String),
}

impl FigureDraft {
    pub fn validate(&self) -> Result<(), FigureInvalid> {
        if self.name.trim().is_empty() {
            return Err(FigureInvalid::EmptyName);
        }
        if self.price < 0.0 {
            return Err(FigureInvalid::NegativePrice);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FigureEventKind {
    Created,
    Updated,
    Deleted,
}

/// Catalog change broadcast to event-stream subscribers.
#[derive(Debug, Clone, Serialize)]
pub struct FigureEvent {
    pub kind: FigureEventKind,
    pub figure: Figure,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, price: f64) -> FigureDraft {
        FigureDraft {
            name: name.to_string(),
            model: Model::Other,
            price,
            release_date: NaiveDate::from_ymd_opt(2023, 4, 12).unwrap(),
        }
    }

    #[test]
    fn accepts_a_well_formed_draft() {
        assert_eq!(draft("Doctor Who Tardis", 26.99).validate(), Ok(()));
    }

    #[test]
    fn rejects_empty_and_blank_names() {
        assert_eq!(draft("", 1.0).validate(), Err(FigureInvalid::EmptyName));
        assert_eq!(draft("   ", 1.0).validate(), Err(FigureInvalid::EmptyName));
    }

    #[test]
    fn rejects_negative_prices() {
        assert_eq!(
            draft("MadiFigure", -42.0).validate(),
            Err(FigureInvalid::NegativePrice)
        );
        // zero is a valid price, only negatives are rejected
        assert_eq!(draft("Freebie", 0.0).validate(), Ok(()));
    }

    #[test]
    fn model_parses_case_insensitively_and_round_trips() {
        for model in [Model::Marvel, Model::Disney, Model::Anime, Model::Other] {
            assert_eq!(model.as_str().parse::<Model>().unwrap(), model);
            assert_eq!(
                model.as_str().to_lowercase().parse::<Model>().unwrap(),
                model
            );
        }
        assert!(matches!(
            "DC".parse::<Model>(),
            Err(FigureInvalid::UnknownModel(_))
        ));
    }

    #[test]
    fn model_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Model::Marvel).unwrap(), "\"MARVEL\"");
        let parsed: Model = serde_json::from_str("\"ANIME\"").unwrap();
        assert_eq!(parsed, Model::Anime);
    }
}
