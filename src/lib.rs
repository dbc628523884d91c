//! SWX: Star Wars Data Explorer
//!
//! A caching client for the SWAPI character listing. Characters are fetched
//! page by page, normalized for display, and enriched with the names of the
//! planets, films, species, starships and vehicles they reference. Both the
//! enriched characters and every resolved name are kept in a local SQLite
//! cache so repeat requests cost no upstream calls.

pub mod cli;
pub mod core;
pub mod entities;
pub mod yaml;
