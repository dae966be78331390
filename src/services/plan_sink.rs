use crate::models::travel_plan::TravelPlan;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io;
use std::path::Path;

pub const DEFAULT_OUTPUT_FILE: &str = "travel_plan.json";

/// UTF-8 JSON, four-space indent, non-ASCII left unescaped.
pub fn to_pretty_json(plan: &TravelPlan) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    plan.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn write_plan_file(plan: &TravelPlan, path: &Path) -> io::Result<()> {
    let json = to_pretty_json(plan).map_err(io::Error::other)?;
    fs::write(path, json)
}
