//! Extraction-and-filtering pipeline for job board searches.
//!
//! A [`campaign::Campaign`] runs each configured search through a
//! [`search::SearchRunner`], which pages the result list to a stable height
//! ([`scroll`]), visits every result entry once per run ([`seen`]), pulls the
//! description and metadata out of the detail panel ([`extract`]) and keeps
//! only postings accepted by the keyword policy ([`matcher`]). Accepted
//! records go to a [`sink::RecordSink`] in one batch at the end of the run.
//!
//! The browser is only reached through the `sift-drivers` traits, so every
//! stage can be exercised against an in-memory page.
pub mod campaign;
pub mod extract;
pub mod matcher;
pub mod scroll;
pub mod search;
pub mod seen;
pub mod sink;

pub use campaign::{Campaign, CampaignReport};
pub use matcher::{matches, Verdict};
pub use search::{search_url, SearchRunner};
pub use seen::SeenSet;
pub use sink::{CsvSink, RecordSink, SinkError};
