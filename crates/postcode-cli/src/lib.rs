//! postcode-cli
//! ============
//!
//! Command-line interface for the `postcode-core` fuzzy postcode search
//! engine.
//!
//! This crate primarily provides a binary (`postcode`). The library target
//! exists so that the crate gets a rendered documentation page.
//!
//! Basic usage:
//!
//! ```text
//! postcode --input postcodes.csv stats
//! postcode --input postcodes.csv search "e14 9w" --top 3
//! postcode --input postcodes.csv best e149wb
//! postcode validate "SW1A 1AA"
//! postcode --input postcodes.csv build --out postcodes.idx.bin.gz
//! ```
//!
//! Set `POSTCODE_LOG` (e.g. `POSTCODE_LOG=postcode_core=debug`) to see build
//! and query logs on stderr.
#![cfg_attr(docsrs, feature(doc_cfg))]
