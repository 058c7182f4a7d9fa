//! Front-matter parsing and validation

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Validated front-matter for a post.
///
/// Required fields are checked at parse time: a post with a missing field or
/// an unparsable `publishedAt` fails the build instead of propagating broken
/// metadata into feeds and listings.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FrontMatter {
    pub title: String,
    #[serde(rename = "publishedAt", serialize_with = "serialize_published_at")]
    pub published_at: NaiveDate,
    pub summary: String,
    /// Cover image path, relative to the static asset root (leading `/`).
    pub image: String,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from a raw post file.
    /// Returns (front_matter, body).
    pub fn parse(raw: &str) -> Result<(Self, &str)> {
        let content = raw.trim_start_matches('\u{feff}');

        let rest = content.strip_prefix("---").ok_or_else(|| {
            Error::MalformedFrontMatter("missing opening '---' delimiter".to_string())
        })?;
        let rest = rest.trim_start_matches(['\r', '\n']);

        let end = rest.find("\n---").ok_or_else(|| {
            Error::MalformedFrontMatter("missing closing '---' delimiter".to_string())
        })?;
        let yaml = &rest[..end];
        let body = rest[end + 4..].trim_start_matches(['\r', '\n']);

        let raw_fm: RawFrontMatter = serde_yaml::from_str(yaml)
            .map_err(|e| Error::MalformedFrontMatter(e.to_string()))?;
        // The date is validated outside of serde so a bad value reports as
        // an InvalidDate rather than a generic deserialization failure.
        let fm = FrontMatter {
            title: raw_fm.title,
            published_at: parse_published_at(&raw_fm.published_at)?,
            summary: raw_fm.summary,
            image: raw_fm.image,
            extra: raw_fm.extra,
        };
        fm.validate()?;

        Ok((fm, body))
    }

    /// Serialize back to a YAML front-matter block (round-trip support).
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::MalformedFrontMatter(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("title", &self.title),
            ("summary", &self.summary),
            ("image", &self.image),
        ] {
            if value.trim().is_empty() {
                return Err(Error::MalformedFrontMatter(format!(
                    "required field '{}' is empty",
                    field
                )));
            }
        }
        Ok(())
    }
}

/// Parse a `publishedAt` value: an ISO-8601 date, with full timestamps
/// accepted and truncated to the date part.
pub fn parse_published_at(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt.date());
    }

    Err(Error::InvalidDate {
        value: s.to_string(),
        reason: "expected an ISO-8601 date (YYYY-MM-DD)".to_string(),
    })
}

/// Wire shape of the YAML block, with `publishedAt` still unparsed.
#[derive(Deserialize)]
struct RawFrontMatter {
    title: String,
    #[serde(rename = "publishedAt")]
    published_at: String,
    summary: String,
    image: String,
    #[serde(flatten)]
    extra: HashMap<String, serde_yaml::Value>,
}

fn serialize_published_at<S>(
    date: &NaiveDate,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
}
