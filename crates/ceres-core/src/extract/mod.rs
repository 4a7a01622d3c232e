//! Hidden-block extraction.
//!
//! Instructor-only code is embedded in notebook cells between delimiter
//! lines. This module removes those regions from the student-visible source
//! and collects their content, in order, into a buffer that the compilation
//! stage turns into a loadable test module.

mod hidden;

pub use hidden::{
    CellScan, Extraction, HiddenBlockBuffer, HiddenBlockExtractor, DEFAULT_BEGIN_DELIMITER,
    DEFAULT_END_DELIMITER,
};
