//! The library code for the `tabloid` static site generator. A run is one
//! straight-line batch pass, executed top to bottom:
//!
//! 1. Acquiring headlines ([`crate::headlines`]): one bounded HTTP call to
//!    the NewsAPI top-headlines endpoint, or a fixed fallback list when no
//!    API key is configured or anything about the call fails.
//! 2. Rendering articles ([`crate::article`]): each headline becomes a
//!    satirical page in one of several fixed "voices", with a slug derived
//!    from the headline ([`crate::slug`]).
//! 3. Merging the archive ([`crate::archive`]): new records are prepended
//!    to the persisted JSON array and the full snapshot is rewritten
//!    atomically.
//! 4. Assembling pages ([`crate::write`]): one HTML file per article, a
//!    homepage listing the whole archive, the static about/contact/admin
//!    pages, the `admin-config.js` hash artifact, and an Atom feed
//!    ([`crate::feed`]).
//!
//! [`crate::build`] stitches the steps together and [`crate::config`]
//! supplies the knobs (an optional project YAML plus environment
//! variables).
//!
//! Known limitation: nothing guards against overlapping runs. Two
//! concurrent invocations race on the archive file, the last writer wins,
//! and the earlier run's new entries are lost. Schedule runs so they
//! don't overlap.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod archive;
pub mod article;
pub mod build;
pub mod config;
pub mod feed;
pub mod headlines;
pub mod slug;
pub mod write;
