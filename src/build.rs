//! Exports the [`build_site`] function which stitches together the
//! high-level steps of one generator run: acquiring headlines
//! ([`crate::headlines`]), rendering articles ([`crate::article`]), merging
//! and persisting the archive ([`crate::archive`]), and assembling the
//! output pages and feed ([`crate::write`], [`crate::feed`]).
//!
//! A run is strictly sequential and run-to-completion. If it crashes
//! partway, some article files may exist without being referenced by the
//! archive or homepage yet; the next successful run regenerates both from
//! scratch, so the stale files are harmless orphans. Overlapping runs are
//! not guarded against: the last writer wins on the archive.

use crate::archive::{self, Archive, Error as ArchiveError};
use crate::article::{self, central_time, ArticleRecord, DATE_FORMAT};
use crate::config::Config;
use crate::feed::{write_feed, Error as FeedError, FeedConfig};
use crate::headlines::HeadlineSource;
use crate::slug::{slugify, unique_slug};
use crate::write::{self, parse_template, Error as WriteError, Writer};
use chrono::Utc;
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use tracing::info;

/// Fallback about-page body when the operator has not provided
/// `about_custom.txt`.
const DEFAULT_ABOUT: &str =
    "<p>Welcome, where truth meets satire!</p>\n<p>This is an AI-powered satirical news \
     site. Nothing here is real news. It's all satire and generated silliness.</p>";

/// Builds the site from a [`Config`] object: fetch, render, merge, write.
/// Headline-fetch failures never surface here (the source falls back
/// internally); everything this function returns an error for is fatal.
pub fn build_site(config: &Config) -> Result<()> {
    let articles_directory = config.articles_directory();
    std::fs::create_dir_all(&articles_directory)?;

    let source = HeadlineSource::new(config.news_api_key.clone(), config.articles_per_run);
    let headlines = source.fetch();

    let archive = Archive::new(config.archive_path());
    let existing = archive.load()?;

    // Parse the bundled template files.
    let article_template = parse_template(write::ARTICLE_TEMPLATE)?;
    let index_template = parse_template(write::INDEX_TEMPLATE)?;
    let about_template = parse_template(write::ABOUT_TEMPLATE)?;
    let contact_template = parse_template(write::CONTACT_TEMPLATE)?;
    let admin_template = parse_template(write::ADMIN_TEMPLATE)?;

    let writer = Writer {
        article_template: &article_template,
        index_template: &index_template,
        about_template: &about_template,
        contact_template: &contact_template,
        admin_template: &admin_template,
        site_title: &config.title,
        tagline: &config.tagline,
        site_url: &config.site_url,
        output_directory: &config.output_directory,
        articles_directory: &articles_directory,
    };

    // Slugs already claimed by the archive or earlier in this batch.
    let mut taken: HashSet<String> = existing.iter().map(|record| record.slug.clone()).collect();
    let mut rng = rand::thread_rng();
    let date = Utc::now()
        .with_timezone(&central_time())
        .format(DATE_FORMAT)
        .to_string();

    let mut fresh = Vec::with_capacity(headlines.len());
    for headline in &headlines {
        let draft = article::draft(headline, &mut rng);
        let slug = unique_slug(&slugify(&headline.title), &taken);
        taken.insert(slug.clone());
        let record = ArticleRecord {
            title: draft.title.clone(),
            slug,
            date: date.clone(),
            image: draft.image.clone(),
        };
        writer.write_article(&record, &draft, &headline.title)?;
        info!(slug = %record.slug, "wrote article page");
        fresh.push(record);
    }

    let new_count = fresh.len();
    let merged = archive::merge(fresh, existing);
    archive.save(&merged)?;

    writer.write_homepage(&merged, &date)?;
    writer.write_about(&about_content(config)?)?;
    writer.write_contact()?;
    writer.write_admin()?;
    writer.write_admin_config(&config.admin_username, &config.admin_password)?;

    write_feed(
        FeedConfig {
            title: config.title.clone(),
            id: config.site_url.clone(),
            author: config.author.clone(),
            site_url: config.site_url.clone(),
        },
        &merged,
        File::create(config.output_directory.join("feed.atom"))?,
    )?;

    info!(new = new_count, total = merged.len(), "site generated");
    Ok(())
}

fn about_content(config: &Config) -> Result<String> {
    match &config.about_override {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => Ok(DEFAULT_ABOUT.to_owned()),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building the site. Errors can be during archive
/// load/save, page writing, feed generation, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors loading or saving the archive.
    Archive(ArchiveError),

    /// Returned for errors templating or writing pages to disk.
    Write(WriteError),

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Archive(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Archive(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<ArchiveError> for Error {
    /// Converts [`ArchiveError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: ArchiveError) -> Error {
        Error::Archive(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
