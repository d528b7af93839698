use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use mongodb::bson::{self, Bson, DateTime as BsonDateTime, Document};
use serde::{de::DeserializeOwned, Serialize};

pub fn chrono_to_bson(dt: DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(dt.timestamp_millis())
}

pub fn bson_to_chrono(dt: BsonDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(dt.timestamp_millis())
}

/// Serializes a record for MongoDB: `id` becomes `_id` and the listed
/// timestamp fields are stored as native BSON dates so they sort correctly.
pub fn to_stored_document<T: Serialize>(value: &T, date_fields: &[&str]) -> Result<Document> {
    let mut doc = bson::to_document(value).context("Failed to encode record")?;

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }

    for field in date_fields {
        let raw = doc.get_str(field).ok().map(str::to_owned);
        if let Some(raw) = raw {
            let parsed = DateTime::parse_from_rfc3339(&raw)
                .with_context(|| format!("Field {} is not an RFC 3339 timestamp", field))?
                .with_timezone(&Utc);
            doc.insert(*field, chrono_to_bson(parsed));
        }
    }

    Ok(doc)
}

/// Inverse of [`to_stored_document`].
pub fn from_stored_document<T: DeserializeOwned>(
    mut doc: Document,
    date_fields: &[&str],
) -> Result<T> {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }

    for field in date_fields {
        let stored = match doc.get(field) {
            Some(Bson::DateTime(dt)) => Some(*dt),
            _ => None,
        };
        if let Some(dt) = stored {
            let converted = bson_to_chrono(dt)
                .ok_or_else(|| anyhow!("Field {} holds an out-of-range date", field))?;
            doc.insert(*field, converted.to_rfc3339());
        }
    }

    bson::from_document(doc).context("Failed to decode record")
}
