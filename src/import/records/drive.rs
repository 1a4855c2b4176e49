use std::sync::LazyLock;

use crate::domain::{DriveStatus, GeoLocation, NewDrive};
use crate::import::raw_row::RawRow;
use crate::import::schema::{EnumRule, FieldRule, FieldSpec, ImportSchema};
use crate::import::transform::{ImportRecord, TransformContext, Transformed};

use super::RowReader;

static SCHEMA: LazyLock<ImportSchema> = LazyLock::new(|| {
    ImportSchema::new(vec![
        FieldSpec::required("title", "Title", FieldRule::Text).example("Sample Drive"),
        FieldSpec::required("location", "Location", FieldRule::Text).example("Mumbai"),
        FieldSpec::required("description", "Description", FieldRule::Text)
            .example("Drive description here"),
        FieldSpec::required("dtype", "Drive type", FieldRule::Text).example("Food"),
        FieldSpec::required("startDate", "Start date", FieldRule::Date)
            .format("DD-MM-YYYY")
            .example("15-01-2025"),
        FieldSpec::required("EndDate", "End date", FieldRule::Date)
            .format("DD-MM-YYYY")
            .aliases(&["endDate", "endDate*", "endDate (DD-MM-YYYY)*"])
            .example("16-01-2025"),
        FieldSpec::required("timeInterval", "Time interval", FieldRule::Text)
            .example("10:00 AM - 5:00 PM"),
        FieldSpec::optional(
            "status",
            "Status",
            FieldRule::Enum(EnumRule::strict::<DriveStatus>()),
        )
        .format("pending/active/completed")
        .example("pending"),
        FieldSpec::optional("placeLink", "Place link", FieldRule::Text)
            .format("optional")
            .example("https://maps.google.com"),
        FieldSpec::optional("geolocation.latitude", "Latitude", FieldRule::Latitude)
            .format("optional")
            .aliases(&["latitude", "geoLocation.latitude"])
            .example("12.1678"),
        FieldSpec::optional("geolocation.longitude", "Longitude", FieldRule::Longitude)
            .format("optional")
            .aliases(&["longitude", "geoLocation.longitude"])
            .example("31.5432"),
    ])
});

impl ImportRecord for NewDrive {
    const ENTITY: &'static str = "drive";
    const SUCCESS_MESSAGE: &'static str = "Drives imported successfully";

    fn schema() -> &'static ImportSchema {
        &SCHEMA
    }

    fn cross_check(row: &RawRow) -> Vec<String> {
        let reader = RowReader::new(&SCHEMA, row);
        match (reader.date("startDate"), reader.date("EndDate")) {
            (Some(start), Some(end)) if end < start => {
                vec!["End date cannot be before start date".to_string()]
            }
            _ => Vec::new(),
        }
    }

    fn transform(row: &RawRow, ctx: &TransformContext) -> Transformed<Self> {
        let reader = RowReader::new(&SCHEMA, row);
        let latitude = reader.opt("geolocation.latitude");
        let longitude = reader.opt("geolocation.longitude");
        let geo_location = (latitude.is_some() || longitude.is_some()).then(|| GeoLocation {
            latitude: latitude.unwrap_or_default(),
            longitude: longitude.unwrap_or_default(),
        });
        Transformed::clean(Self {
            title: reader.text("title"),
            location: reader.text("location"),
            description: reader.text("description"),
            status: reader.strict("status", DriveStatus::Pending),
            dtype: reader.text("dtype"),
            start_date: reader.date_or("startDate", ctx.now),
            end_date: reader.date_or("EndDate", ctx.now),
            time_interval: reader.text("timeInterval"),
            geo_location,
            place_link: reader.opt("placeLink"),
            photos: Vec::new(),
            created_at: ctx.now,
        })
    }
}
