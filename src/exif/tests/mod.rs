//! Tests for the exif module

pub mod test_utils;
