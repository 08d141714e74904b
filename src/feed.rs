//! Support for creating an Atom feed from the article archive.

use crate::article::{central_time, ArticleRecord, DATE_FORMAT};
use crate::config::Author;
use atom_syndication::{Entry, Error as AtomError, Feed, Link, Person};
use chrono::{NaiveDateTime, ParseError, TimeZone, Utc};
use std::fmt;
use std::io::Write;

/// Bundled configuration for creating a feed.
pub struct FeedConfig {
    pub title: String,
    pub id: String,
    pub author: Option<Author>,

    /// Absolute base URL of the deployed site; entry links are
    /// `{site_url}/articles/{slug}`.
    pub site_url: String,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and the archived
/// [`ArticleRecord`]s and writes the result to a [`std::io::Write`]. This
/// function takes ownership of the provided [`FeedConfig`].
pub fn write_feed<W: Write>(config: FeedConfig, records: &[ArticleRecord], w: W) -> Result<()> {
    feed(config, records)?.write_to(w)?;
    Ok(())
}

fn feed(config: FeedConfig, records: &[ArticleRecord]) -> Result<Feed> {
    Ok(Feed {
        entries: feed_entries(&config, records)?,
        title: config.title.into(),
        id: config.id,
        updated: central_time().from_utc_datetime(&Utc::now().naive_utc()),
        authors: author_to_people(config.author),
        categories: Vec::new(),
        contributors: Vec::new(),
        generator: None,
        icon: None,
        logo: None,
        rights: None,
        subtitle: None,
        extensions: Default::default(),
        namespaces: Default::default(),
        base: None,
        lang: None,
        links: vec![Link {
            href: config.site_url,
            rel: "alternate".to_string(),
            title: None,
            hreflang: None,
            mime_type: None,
            length: None,
        }],
    })
}

fn feed_entries(config: &FeedConfig, records: &[ArticleRecord]) -> Result<Vec<Entry>> {
    let mut entries: Vec<Entry> = Vec::with_capacity(records.len());

    for record in records {
        // The archive stores the human-readable display string as wall
        // time in the site's fixed offset, which has no zone chrono will
        // parse on its own, so the offset is reattached by hand.
        let naive = NaiveDateTime::parse_from_str(&record.date, DATE_FORMAT)?;
        let date = central_time()
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| Error::LocalTime(record.date.clone()))?;
        let url = format!(
            "{}/articles/{}",
            config.site_url.trim_end_matches('/'),
            record.slug
        );

        entries.push(Entry {
            id: url.clone(),
            title: record.title.clone().into(),
            updated: date,
            authors: author_to_people(config.author.clone()),
            links: vec![Link {
                href: url,
                rel: "alternate".to_owned(),
                title: None,
                mime_type: None,
                hreflang: None,
                length: None,
            }],
            rights: None,
            summary: Some(record.title.clone().into()),
            categories: Vec::new(),
            contributors: Vec::new(),
            published: Some(date),
            source: None,
            content: None,
            extensions: Default::default(),
        })
    }
    Ok(entries)
}

fn author_to_people(author: Option<Author>) -> Vec<Person> {
    match author {
        Some(author) => vec![Person {
            name: author.name,
            email: author.email,
            uri: None,
        }],
        None => Vec::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants include I/O, Atom, and
/// date-time parsing issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),

    /// Returned when there is an issue parsing a record's date.
    DateTimeParse(ParseError),

    /// Returned when a parsed record date has no unique mapping into the
    /// site's fixed offset.
    LocalTime(String),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
            Error::DateTimeParse(err) => err.fmt(f),
            Error::LocalTime(date) => {
                write!(f, "Mapping archived date `{}` into the site offset", date)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
            Error::DateTimeParse(err) => Some(err),
            Error::LocalTime(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: ParseError) -> Error {
        Error::DateTimeParse(err)
    }
}
