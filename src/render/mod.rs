//! Rendering of normalized units and extraction request bodies.

mod json;
mod jsonl;
mod request;

pub use json::{to_json, JsonFormat};
pub use jsonl::{json_line, parse_jsonl, to_jsonl, unit_line, write_jsonl, FALLBACK_LINE};
pub use request::{build_request, build_text_request};
