//! Donation drives.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{DateRange, RecordId};
use super::enums::DriveStatus;
use crate::import::validators::{is_valid_latitude, is_valid_longitude};

/// Map coordinates of a drive, kept as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GeoLocation {
    /// Decimal latitude.
    pub latitude: String,
    /// Decimal longitude.
    pub longitude: String,
}

impl GeoLocation {
    /// `true` when both coordinates are decimals within their ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_valid_latitude(&self.latitude) && is_valid_longitude(&self.longitude)
    }
}

/// A scheduled donation-collection event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Drive {
    /// Primary key.
    pub id: RecordId,
    /// Drive title.
    pub title: String,
    /// Venue.
    pub location: String,
    /// Long description.
    pub description: String,
    /// Free-set lifecycle tag.
    pub status: DriveStatus,
    /// Donation category (free text).
    pub dtype: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day, never before `start_date`.
    #[serde(rename = "EndDate")]
    pub end_date: NaiveDate,
    /// Daily hours, e.g. `10:00 AM - 5:00 PM`.
    pub time_interval: String,
    /// Optional coordinates.
    pub geo_location: Option<GeoLocation>,
    /// Optional map link.
    pub place_link: Option<String>,
    /// Ordered photo paths.
    pub photos: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A drive ready to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewDrive {
    /// Drive title.
    pub title: String,
    /// Venue.
    pub location: String,
    /// Long description.
    pub description: String,
    /// Lifecycle tag.
    pub status: DriveStatus,
    /// Donation category.
    pub dtype: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    #[serde(rename = "EndDate")]
    pub end_date: NaiveDate,
    /// Daily hours.
    pub time_interval: String,
    /// Optional coordinates.
    pub geo_location: Option<GeoLocation>,
    /// Optional map link.
    pub place_link: Option<String>,
    /// Ordered photo paths.
    pub photos: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl NewDrive {
    /// Attaches a primary key.
    #[must_use]
    pub fn into_record(self, id: RecordId) -> Drive {
        Drive {
            id,
            title: self.title,
            location: self.location,
            description: self.description,
            status: self.status,
            dtype: self.dtype,
            start_date: self.start_date,
            end_date: self.end_date,
            time_interval: self.time_interval,
            geo_location: self.geo_location,
            place_link: self.place_link,
            photos: self.photos,
            created_at: self.created_at,
        }
    }
}

/// Partial update from the drive edit form.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriveUpdate {
    /// New title.
    pub title: Option<String>,
    /// New venue.
    pub location: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New status tag; any value is accepted.
    pub status: Option<DriveStatus>,
    /// New category.
    pub dtype: Option<String>,
    /// New first day.
    pub start_date: Option<NaiveDate>,
    /// New last day.
    #[serde(rename = "EndDate")]
    pub end_date: Option<NaiveDate>,
    /// New hours.
    pub time_interval: Option<String>,
    /// New coordinates.
    pub geo_location: Option<GeoLocation>,
    /// New map link.
    pub place_link: Option<String>,
    /// Replacement photo list, in display order.
    pub photos: Option<Vec<String>>,
}

impl Drive {
    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns a message if the resulting end date precedes the start date
    /// or the new coordinates are out of range; the drive is left unchanged
    /// in that case.
    pub fn apply_update(&mut self, update: DriveUpdate) -> Result<(), String> {
        let start = update.start_date.unwrap_or(self.start_date);
        let end = update.end_date.unwrap_or(self.end_date);
        if end < start {
            return Err("End date cannot be before start date".to_string());
        }
        if update.geo_location.as_ref().is_some_and(|geo| !geo.is_valid()) {
            return Err("Invalid geolocation format".to_string());
        }
        self.start_date = start;
        self.end_date = end;

        for (slot, value) in [
            (&mut self.title, update.title),
            (&mut self.location, update.location),
            (&mut self.description, update.description),
            (&mut self.dtype, update.dtype),
            (&mut self.time_interval, update.time_interval),
        ] {
            if let Some(v) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
                *slot = v;
            }
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if update.geo_location.is_some() {
            self.geo_location = update.geo_location;
        }
        if let Some(link) = update.place_link {
            let link = link.trim();
            self.place_link = (!link.is_empty()).then(|| link.to_string());
        }
        if let Some(photos) = update.photos {
            self.photos = photos;
        }
        Ok(())
    }
}

/// Search criteria for drive listings and exports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriveFilter {
    /// Case-insensitive substring of title, location or dtype.
    pub search: Option<String>,
    /// Exact status.
    pub status: Option<DriveStatus>,
    /// Exact category.
    pub dtype: Option<String>,
    /// Exact location.
    pub location: Option<String>,
    /// Inclusive creation-date range.
    pub created_between: DateRange,
}

impl DriveFilter {
    /// Returns `true` if the drive satisfies every criterion.
    #[must_use]
    pub fn matches(&self, drive: &Drive) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = [&drive.title, &drive.location, &drive.dtype]
                .iter()
                .any(|f| f.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != drive.status) {
            return false;
        }
        if self.dtype.as_ref().is_some_and(|d| *d != drive.dtype) {
            return false;
        }
        if self.location.as_ref().is_some_and(|l| *l != drive.location) {
            return false;
        }
        self.created_between.contains(drive.created_at.date_naive())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample() -> Drive {
        let (Some(start), Some(end)) = (
            NaiveDate::from_ymd_opt(2025, 1, 15),
            NaiveDate::from_ymd_opt(2025, 1, 16),
        ) else {
            panic!("valid dates");
        };
        Drive {
            id: RecordId::new(),
            title: "Winter Clothes Drive".to_string(),
            location: "Pune".to_string(),
            description: "Blankets and sweaters".to_string(),
            status: DriveStatus::Pending,
            dtype: "Clothes".to_string(),
            start_date: start,
            end_date: end,
            time_interval: "10:00 AM - 5:00 PM".to_string(),
            geo_location: None,
            place_link: None,
            photos: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn update_rejects_inverted_range() {
        let mut drive = sample();
        let Some(early) = NaiveDate::from_ymd_opt(2025, 1, 1) else {
            panic!("valid date");
        };
        let update = DriveUpdate {
            end_date: Some(early),
            title: Some("Renamed".to_string()),
            ..DriveUpdate::default()
        };
        assert!(drive.apply_update(update).is_err());
        assert_eq!(drive.title, "Winter Clothes Drive");
    }

    #[test]
    fn update_rejects_out_of_range_coordinates() {
        let mut drive = sample();
        let update = DriveUpdate {
            geo_location: Some(GeoLocation {
                latitude: "95.0".to_string(),
                longitude: "73.85".to_string(),
            }),
            title: Some("Renamed".to_string()),
            ..DriveUpdate::default()
        };
        assert_eq!(
            drive.apply_update(update),
            Err("Invalid geolocation format".to_string())
        );
        assert_eq!(drive.geo_location, None);
        assert_eq!(drive.title, "Winter Clothes Drive");

        let update = DriveUpdate {
            geo_location: Some(GeoLocation {
                latitude: "18.52".to_string(),
                longitude: "180".to_string(),
            }),
            ..DriveUpdate::default()
        };
        assert!(drive.apply_update(update).is_ok());
        assert!(drive.geo_location.is_some());
    }

    #[test]
    fn update_replaces_photos_in_order() {
        let mut drive = sample();
        let update = DriveUpdate {
            photos: Some(vec!["/drives/b.jpg".to_string(), "/drives/a.jpg".to_string()]),
            status: Some(DriveStatus::Completed),
            ..DriveUpdate::default()
        };
        assert!(drive.apply_update(update).is_ok());
        assert_eq!(drive.photos, vec!["/drives/b.jpg", "/drives/a.jpg"]);
        assert_eq!(drive.status, DriveStatus::Completed);
    }

    #[test]
    fn filter_is_case_insensitive_on_search() {
        let drive = sample();
        let filter = DriveFilter {
            search: Some("winter".to_string()),
            ..DriveFilter::default()
        };
        assert!(filter.matches(&drive));
        let other = DriveFilter {
            dtype: Some("Food".to_string()),
            ..DriveFilter::default()
        };
        assert!(!other.matches(&drive));
    }

    #[test]
    fn end_date_serializes_with_legacy_key() {
        let Ok(json) = serde_json::to_value(sample()) else {
            panic!("serialization failed");
        };
        assert!(json.get("EndDate").is_some());
        assert!(json.get("startDate").is_some());
    }
}
