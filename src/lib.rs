//! # docgraph
//!
//! Extracts the front-matter of a document tree into node and edge tables
//! and loads them into a graph store.
//!
//! docgraph scans a directory of delimited-text documents (`.qmd`, `.md`)
//! and notebooks (`.ipynb`), parses each document's YAML front-matter,
//! normalizes it into documents, categories, authors and linked sources, and
//! writes one CSV file per node or edge table. The tables can then be
//! bulk-loaded into an SQLite graph store with enforced foreign keys.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌────────────┐   ┌──────────┐
//! │  Discovery  │──▶│ Front-matter │──▶│ Normalizer │──▶│  Tables  │
//! │  walkdir    │   │ YAML / nbjson│   │ key, URL,  │   │ + dedup  │
//! └─────────────┘   └──────────────┘   │ links      │   └────┬─────┘
//!                                      └────────────┘        │
//!                                        ┌───────────────────┤
//!                                        ▼                   ▼
//!                                   ┌──────────┐       ┌──────────┐
//!                                   │   CSV    │──────▶│  SQLite  │
//!                                   │  files   │ load  │  graph   │
//!                                   └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! docgraph extract docs data          # write the CSV tables
//! docgraph load data                  # rebuild data/graph.sqlite
//! docgraph build docs data            # both of the above
//! docgraph stats --db data/graph.sqlite
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`connector_fs`] | Document discovery |
//! | [`frontmatter`] | Front-matter extraction |
//! | [`normalize`] | Field normalization |
//! | [`dedup`] | Corpus-wide entity sets |
//! | [`tables`] | Node/edge table assembly |
//! | [`writer`] | Atomic CSV publishing |
//! | [`pipeline`] | Extract run orchestration |
//! | [`db`] | Graph store connection |
//! | [`migrate`] | Graph schema |
//! | [`load`] | Bulk load into the graph store |
//! | [`stats`] | Graph store summary |

pub mod config;
pub mod connector_fs;
pub mod db;
pub mod dedup;
pub mod error;
pub mod frontmatter;
pub mod load;
pub mod migrate;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod stats;
pub mod tables;
pub mod writer;
