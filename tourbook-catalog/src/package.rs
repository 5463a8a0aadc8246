use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use tourbook_core::{Requester, StorageError};

pub const DEFAULT_IMAGE_URL: &str = "https://placehold.co/600x400.png";

/// A curated trip offered by a tour guide
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TourPackage {
    pub id: Uuid,
    pub title: String,
    pub place: String,
    pub hotel: String,
    pub transport: String,
    pub duration: String,
    pub description: String,
    /// Per-person price in whole USD
    pub price: i32,
    pub image_url: String,
    pub guide_id: String,
    pub guide_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Package creation input submitted by a guide
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPackage {
    pub title: String,
    pub place: String,
    pub hotel: String,
    pub transport: String,
    pub duration: String,
    pub description: String,
    pub price: i32,
    #[serde(default = "default_image_url")]
    pub image_url: String,
}

fn default_image_url() -> String {
    DEFAULT_IMAGE_URL.to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl NewPackage {
    /// Field rules a guide's submission must satisfy before it is stored
    pub fn validate(&self) -> Result<(), CatalogError> {
        min_chars("title", &self.title, 5, "Title must be at least 5 characters.")?;
        min_chars("place", &self.place, 3, "Place is required.")?;
        min_chars("hotel", &self.hotel, 3, "Hotel name is required.")?;
        min_chars("transport", &self.transport, 3, "Transport details are required.")?;
        min_chars("duration", &self.duration, 3, "Duration is required.")?;
        min_chars("description", &self.description, 20, "Description must be at least 20 characters.")?;

        if self.price < 0 {
            return Err(invalid("price", "Price must be a positive number."));
        }

        match url::Url::parse(self.image_url.trim()) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
            _ => Err(invalid("image_url", "Please enter a valid image URL.")),
        }
    }

    /// Materialize the stored package. Guide attribution comes from the
    /// session, never from the submitted body.
    pub fn into_package(self, id: Uuid, guide: &Requester, created_at: DateTime<Utc>) -> TourPackage {
        TourPackage {
            id,
            title: self.title.trim().to_string(),
            place: self.place.trim().to_string(),
            hotel: self.hotel.trim().to_string(),
            transport: self.transport.trim().to_string(),
            duration: self.duration.trim().to_string(),
            description: self.description.trim().to_string(),
            price: self.price,
            image_url: self.image_url.trim().to_string(),
            guide_id: guide.id.clone(),
            guide_name: guide.display_name.clone(),
            created_at,
        }
    }
}

fn min_chars(field: &'static str, value: &str, min: usize, reason: &str) -> Result<(), CatalogError> {
    if value.trim().chars().count() < min {
        return Err(invalid(field, reason));
    }
    Ok(())
}

fn invalid(field: &'static str, reason: &str) -> CatalogError {
    CatalogError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
