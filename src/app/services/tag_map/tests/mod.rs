//! Shared fixtures for tag map tests

use std::io::Write;
use tempfile::NamedTempFile;

pub mod loader_tests;

/// Mapping with three devices, deliberately not in device order
pub fn create_test_mapping() -> &'static str {
    "TT101,PUMP-2,Inlet Temp,degC\n\
     FT201,PUMP-1,Flow,m3/h\n\
     PT301,PUMP-2,Outlet Pressure,bar\n\
     TT102,PUMP-1,Bearing Temp,degC\n\
     CT401,DOSER,Conductivity,uS/cm\n"
}

/// Helper to create a temporary file with given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file
}
