//! Load near-Earth objects and their close approaches to Earth, link them
//! into one in-memory dataset and query it.
//!
//! ```no_run
//! use std::path::Path;
//! use neo_explorer::data::{database::NeoDatabase, filter::FilterOptions, loader};
//!
//! let neos = loader::load_neos(Path::new("data/neos.csv"))?;
//! let approaches = loader::load_approaches(Path::new("data/cad.json"))?;
//! let db = NeoDatabase::new(neos, approaches);
//!
//! let filters = FilterOptions { hazardous: Some(true), ..Default::default() }.create_filters();
//! for approach in db.query(&filters).take(5) {
//!     println!("{approach}");
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod data;
pub mod error;
pub mod helpers;
pub mod output;

pub use error::NeoError;
