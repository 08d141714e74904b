//! Templating and page assembly. The templates are Go-style `gtmpl`
//! templates bundled into the binary; the [`Writer`] fills them in from the
//! archive and writes the output files. The homepage is replaced
//! atomically (rendered to a buffer, written through a temp file, renamed)
//! because it, like the archive, is regenerated on every run and a
//! truncated homepage would take the whole site down with it.

use crate::article::{ArticleRecord, Draft};
use gtmpl::{Template, Value};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io;
use std::io::Write as _;
use std::path::Path;
use tempfile::NamedTempFile;

pub const ARTICLE_TEMPLATE: &str = include_str!("../templates/article.html");
pub const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
pub const ABOUT_TEMPLATE: &str = include_str!("../templates/about.html");
pub const CONTACT_TEMPLATE: &str = include_str!("../templates/contact.html");
pub const ADMIN_TEMPLATE: &str = include_str!("../templates/admin.html");

/// Parses one bundled template.
pub fn parse_template(source: &str) -> Result<Template> {
    let mut template = Template::default();
    template.parse(source).map_err(Error::Template)?;
    Ok(template)
}

/// Responsible for templating and writing the site's HTML pages and the
/// `admin-config.js` artifact.
pub struct Writer<'a> {
    pub article_template: &'a Template,
    pub index_template: &'a Template,
    pub about_template: &'a Template,
    pub contact_template: &'a Template,
    pub admin_template: &'a Template,

    /// Site name shown in every nav bar and page header.
    pub site_title: &'a str,

    /// Tagline under the homepage masthead.
    pub tagline: &'a str,

    /// Absolute base URL of the deployed site, used for share links.
    pub site_url: &'a str,

    /// Where `index.html` and the static pages go.
    pub output_directory: &'a Path,

    /// Where per-article pages go, named by slug.
    pub articles_directory: &'a Path,
}

impl Writer<'_> {
    /// Writes one article page to `articles/<slug>`.
    pub fn write_article(
        &self,
        record: &ArticleRecord,
        draft: &Draft,
        headline: &str,
    ) -> Result<()> {
        let share_url = format!(
            "{}/articles/{}",
            self.site_url.trim_end_matches('/'),
            record.slug
        );
        let mut object = self.base_object();
        object.insert("title".to_owned(), Value::String(record.title.clone()));
        object.insert("date".to_owned(), Value::String(record.date.clone()));
        object.insert("image".to_owned(), Value::String(record.image.clone()));
        object.insert("body".to_owned(), Value::String(draft.body.clone()));
        object.insert(
            "source_url".to_owned(),
            match &draft.source_url {
                Some(url) => Value::String(url.clone()),
                None => Value::Nil,
            },
        );
        object.insert("share_url".to_owned(), Value::String(share_url));
        object.insert(
            "share_title".to_owned(),
            Value::String(headline.replace('&', "%26").replace(' ', "%20")),
        );

        let mut file = File::create(self.articles_directory.join(&record.slug))?;
        execute(self.article_template, Value::Object(object), &mut file)
    }

    /// Regenerates `index.html` from the full archive, newest first, with a
    /// freshly computed last-updated stamp. Written atomically.
    pub fn write_homepage(&self, records: &[ArticleRecord], updated: &str) -> Result<()> {
        let mut object = self.base_object();
        object.insert("updated".to_owned(), Value::String(updated.to_owned()));
        object.insert(
            "articles".to_owned(),
            Value::Array(records.iter().map(record_value).collect()),
        );

        let mut rendered = Vec::new();
        execute(self.index_template, Value::Object(object), &mut rendered)?;
        write_atomic(&self.output_directory.join("index.html"), &rendered)
    }

    /// Writes `about.html` with the given body (default or operator
    /// override).
    pub fn write_about(&self, content: &str) -> Result<()> {
        let mut object = self.base_object();
        object.insert("content".to_owned(), Value::String(content.to_owned()));
        let mut file = File::create(self.output_directory.join("about.html"))?;
        execute(self.about_template, Value::Object(object), &mut file)
    }

    /// Writes the static `contact.html`. The form is client-side only and
    /// stores messages in the reader's own browser storage.
    pub fn write_contact(&self) -> Result<()> {
        let mut file = File::create(self.output_directory.join("contact.html"))?;
        execute(
            self.contact_template,
            Value::Object(self.base_object()),
            &mut file,
        )
    }

    /// Writes the static `admin.html` login gate. The gate compares hashes
    /// in the reader's browser; it is not authentication, only a curtain,
    /// and any client can read the hashes or skip the check entirely.
    pub fn write_admin(&self) -> Result<()> {
        let mut file = File::create(self.output_directory.join("admin.html"))?;
        execute(
            self.admin_template,
            Value::Object(self.base_object()),
            &mut file,
        )
    }

    /// Writes `admin-config.js` with the SHA-256 digests of the configured
    /// admin credentials. Only the hashes reach the output tree.
    pub fn write_admin_config(&self, username: &str, password: &str) -> Result<()> {
        std::fs::write(
            self.output_directory.join("admin-config.js"),
            admin_config_js(username, password),
        )?;
        Ok(())
    }

    fn base_object(&self) -> HashMap<String, Value> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "site_title".to_owned(),
            Value::String(self.site_title.to_owned()),
        );
        m.insert("tagline".to_owned(), Value::String(self.tagline.to_owned()));
        m
    }
}

/// Renders the two credential-hash constants the admin gate compares
/// against.
pub fn admin_config_js(username: &str, password: &str) -> String {
    format!(
        "const ADMIN_USERNAME_HASH='{}';\nconst ADMIN_PASSWORD_HASH='{}';\n",
        sha256_hex(username),
        sha256_hex(password)
    )
}

fn sha256_hex(input: &str) -> String {
    let hash = Sha256::digest(input.as_bytes());
    format!("{hash:x}")
}

fn execute<W: io::Write>(template: &Template, value: Value, w: &mut W) -> Result<()> {
    template.execute(w, &gtmpl::Context::from(value).unwrap())?;
    Ok(())
}

fn record_value(record: &ArticleRecord) -> Value {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("title".to_owned(), Value::String(record.title.clone()));
    m.insert("slug".to_owned(), Value::String(record.slug.clone()));
    m.insert("date".to_owned(), Value::String(record.date.clone()));
    m.insert("image".to_owned(), Value::String(record.image.clone()));
    Value::Object(m)
}

// Temp file in the destination directory, then rename, so readers never see
// a partially written page.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.persist(path).map_err(|err| Error::Io(err.error))?;
    Ok(())
}

/// The result of a fallible page-writing operation.
type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`].
    /// This allows us to use the `?` operator for fallible template
    /// operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use gtmpl::Template;

    fn templates() -> (Template, Template, Template, Template, Template) {
        (
            parse_template(ARTICLE_TEMPLATE).unwrap(),
            parse_template(INDEX_TEMPLATE).unwrap(),
            parse_template(ABOUT_TEMPLATE).unwrap(),
            parse_template(CONTACT_TEMPLATE).unwrap(),
            parse_template(ADMIN_TEMPLATE).unwrap(),
        )
    }

    fn writer<'a>(
        templates: &'a (Template, Template, Template, Template, Template),
        output: &'a Path,
        articles: &'a Path,
    ) -> Writer<'a> {
        Writer {
            article_template: &templates.0,
            index_template: &templates.1,
            about_template: &templates.2,
            contact_template: &templates.3,
            admin_template: &templates.4,
            site_title: "The Tabloid Times",
            tagline: "SHOCKING NEWS - EXCLUSIVE STORIES",
            site_url: "https://example.org/site/",
            output_directory: output,
            articles_directory: articles,
        }
    }

    fn record(slug: &str) -> ArticleRecord {
        ArticleRecord {
            title: "CAT ELECTED MAYOR - EXCLUSIVE".to_owned(),
            slug: slug.to_owned(),
            date: "August 28, 2026 at 09:15 AM CST".to_owned(),
            image: "https://via.placeholder.com/1200x600/FF6B6B/FFFFFF?text=Breaking+News"
                .to_owned(),
        }
    }

    #[test]
    fn test_bundled_templates_parse() {
        templates();
    }

    #[test]
    fn test_article_page_contents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("articles")).unwrap();
        let templates = templates();
        let articles = dir.path().join("articles");
        let writer = writer(&templates, dir.path(), &articles);
        let draft = Draft {
            title: "CAT ELECTED MAYOR - EXCLUSIVE".to_owned(),
            body: "<p>Body paragraph.</p>".to_owned(),
            image: record("x").image,
            source_url: Some("https://example.org/story".to_owned()),
        };
        writer
            .write_article(&record("cat-elected-mayor.html"), &draft, "Cat Elected Mayor")
            .unwrap();

        let page =
            std::fs::read_to_string(articles.join("cat-elected-mayor.html")).unwrap();
        assert!(page.contains("CAT ELECTED MAYOR - EXCLUSIVE"));
        assert!(page.contains("<p>Body paragraph.</p>"));
        assert!(page.contains("https://example.org/story"));
        assert!(page.contains("https://example.org/site/articles/cat-elected-mayor.html"));
        assert!(page.contains("Cat%20Elected%20Mayor"));
    }

    #[test]
    fn test_article_page_omits_missing_source_link() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("articles")).unwrap();
        let templates = templates();
        let articles = dir.path().join("articles");
        let writer = writer(&templates, dir.path(), &articles);
        let draft = Draft {
            title: "T".to_owned(),
            body: "<p>b</p>".to_owned(),
            image: "https://example.org/img.jpg".to_owned(),
            source_url: None,
        };
        writer.write_article(&record("t.html"), &draft, "T").unwrap();

        let page = std::fs::read_to_string(articles.join("t.html")).unwrap();
        assert!(!page.contains("Original Story"));
    }

    #[test]
    fn test_homepage_lists_every_record() {
        let dir = tempfile::tempdir().unwrap();
        let templates = templates();
        let writer = writer(&templates, dir.path(), dir.path());
        let records = vec![record("first.html"), record("second.html")];
        writer
            .write_homepage(&records, "August 28, 2026 at 09:15 AM CST")
            .unwrap();

        let page = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(page.contains("articles/first.html"));
        assert!(page.contains("articles/second.html"));
        assert!(page.contains("Last Updated: August 28, 2026 at 09:15 AM CST"));
        assert!(page.contains("The Tabloid Times"));
    }

    #[test]
    fn test_about_page_override_content() {
        let dir = tempfile::tempdir().unwrap();
        let templates = templates();
        let writer = writer(&templates, dir.path(), dir.path());
        writer.write_about("<p>Custom about body.</p>").unwrap();
        let page = std::fs::read_to_string(dir.path().join("about.html")).unwrap();
        assert!(page.contains("<p>Custom about body.</p>"));
    }

    #[test]
    fn test_admin_config_hashes_not_plaintext() {
        // sha256("admin") as a fixed vector.
        let js = admin_config_js("admin", "tabloid2026");
        assert!(js.contains("8c6976e5b5410415bde908bd4dee15dfb167a9c873fc4bb8a81f6f2ab448a918"));
        assert!(!js.contains("tabloid2026"));
    }

    #[test]
    fn test_sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
