use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Optional project file; every field in it has a default, so a project
/// without one still generates.
pub const PROJECT_FILE: &str = "tabloid.yaml";

/// Optional override for the about-page body, looked for next to the
/// project file.
const ABOUT_OVERRIDE_FILE: &str = "about_custom.txt";

#[derive(Deserialize)]
struct BatchSize(usize);
impl Default for BatchSize {
    fn default() -> Self {
        BatchSize(2)
    }
}

#[derive(Clone, Deserialize)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Deserialize)]
struct Project {
    #[serde(default = "default_title")]
    title: String,

    #[serde(default = "default_tagline")]
    tagline: String,

    #[serde(default = "default_site_url")]
    site_url: String,

    #[serde(default)]
    author: Option<Author>,

    #[serde(default)]
    articles_per_run: BatchSize,
}

impl Default for Project {
    fn default() -> Project {
        Project {
            title: default_title(),
            tagline: default_tagline(),
            site_url: default_site_url(),
            author: None,
            articles_per_run: BatchSize::default(),
        }
    }
}

fn default_title() -> String {
    "The Tabloid Times".to_owned()
}

fn default_tagline() -> String {
    "SHOCKING NEWS - EXCLUSIVE STORIES - UNBELIEVABLE FACTS".to_owned()
}

fn default_site_url() -> String {
    "https://thedailytab.github.io/The-Daily-Tabloid".to_owned()
}

pub struct Config {
    pub title: String,
    pub tagline: String,
    pub site_url: String,
    pub author: Option<Author>,

    /// How many headlines each run turns into articles, clamped to 1..=10.
    pub articles_per_run: usize,

    /// `NEWS_API_KEY`; `None` (or empty) means offline mode with the
    /// fallback headlines.
    pub news_api_key: Option<String>,

    /// `ADMIN_USERNAME` / `ADMIN_PASSWORD`. Only their hashes ever reach
    /// an output file.
    pub admin_username: String,
    pub admin_password: String,

    pub about_override: Option<PathBuf>,
    pub output_directory: PathBuf,
}

impl Config {
    /// Searches `dir` and its parents for a `tabloid.yaml` project file.
    /// Unlike a missing field, a present-but-malformed project file is an
    /// error; a project with no file at all gets the defaults.
    pub fn from_directory(dir: &Path, output_directory: &Path) -> Result<Config> {
        let mut current = Some(dir);
        while let Some(candidate) = current {
            let path = candidate.join(PROJECT_FILE);
            if path.exists() {
                return Config::from_project_file(&path, output_directory);
            }
            current = candidate.parent();
        }
        Ok(Config::assemble(Project::default(), dir, output_directory))
    }

    pub fn from_project_file(path: &Path, output_directory: &Path) -> Result<Config> {
        let file = File::open(path)
            .map_err(|e| anyhow!("Opening project file `{}`: {}", path.display(), e))?;
        let project: Project = serde_yaml::from_reader(file)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => Ok(Config::assemble(project, project_root, output_directory)),
        }
    }

    fn assemble(project: Project, project_root: &Path, output_directory: &Path) -> Config {
        let about_override = project_root.join(ABOUT_OVERRIDE_FILE);
        Config {
            title: project.title,
            tagline: project.tagline,
            site_url: project.site_url,
            author: project.author,
            articles_per_run: project.articles_per_run.0.clamp(1, 10),
            news_api_key: env_nonempty("NEWS_API_KEY"),
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_owned()),
            admin_password: std::env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| "tabloid2026".to_owned()),
            about_override: if about_override.exists() {
                Some(about_override)
            } else {
                None
            },
            output_directory: output_directory.to_owned(),
        }
    }

    pub fn archive_path(&self) -> PathBuf {
        self.output_directory.join("archive.json")
    }

    pub fn articles_directory(&self) -> PathBuf {
        self.output_directory.join("articles")
    }
}

// Unset and empty both mean "not configured"; CI secrets are frequently
// defined but blank.
fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_when_no_project_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_directory(dir.path(), dir.path()).unwrap();
        assert_eq!(config.title, "The Tabloid Times");
        assert_eq!(config.articles_per_run, 2);
        assert!(config.about_override.is_none());
        assert_eq!(config.archive_path(), dir.path().join("archive.json"));
        assert_eq!(config.articles_directory(), dir.path().join("articles"));
    }

    #[test]
    fn test_project_file_discovered_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PROJECT_FILE),
            "title: Midnight Gazette\narticles_per_run: 3\n",
        )
        .unwrap();
        let nested = dir.path().join("deep").join("er");
        std::fs::create_dir_all(&nested).unwrap();

        let config = Config::from_directory(&nested, dir.path()).unwrap();
        assert_eq!(config.title, "Midnight Gazette");
        assert_eq!(config.articles_per_run, 3);
        // Unspecified fields keep their defaults.
        assert_eq!(config.site_url, default_site_url());
    }

    #[test]
    fn test_articles_per_run_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PROJECT_FILE), "articles_per_run: 99\n").unwrap();
        let config = Config::from_directory(dir.path(), dir.path()).unwrap();
        assert_eq!(config.articles_per_run, 10);
    }

    #[test]
    fn test_about_override_detected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PROJECT_FILE), "title: The Local Rag\n").unwrap();
        std::fs::write(dir.path().join(ABOUT_OVERRIDE_FILE), "<p>custom</p>").unwrap();
        let config = Config::from_directory(dir.path(), dir.path()).unwrap();
        assert_eq!(
            config.about_override,
            Some(dir.path().join(ABOUT_OVERRIDE_FILE))
        );
    }

    #[test]
    fn test_malformed_project_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PROJECT_FILE), "title: [unclosed\n").unwrap();
        assert!(Config::from_directory(dir.path(), dir.path()).is_err());
    }
}
