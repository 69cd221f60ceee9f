//! Filter-file texts used across test suites.

/// `blacklist.filter` as the client writes it after a reset: no ignore rules.
pub const RESET_BLACKLIST: &str = "[Common]\n\
black_name=\"@eaDir\", \"#recycle\"\n\
max_upload=0\n\
\n\
[Directory]\n\
black_name=\"@eaDir\"\n\
\n\
[File]\n\
black_ext=\"tmp\"\n\
\n";

/// `filter-v4150` without a `Directory` section.
pub const NO_DIRECTORY_FILTER: &str = "[Version]\n\
major=4\n\
minor=15\n\
\n\
[File]\n\
black_ext=\"lnk\"\n\
\n";

/// Render a `Directory` section listing `tokens` quoted.
pub fn directory_with(tokens: &[&str]) -> String {
    let quoted: Vec<String> = tokens.iter().map(|t| format!("\"{t}\"")).collect();
    format!("[Directory]\nblack_name={}\n\n", quoted.join(", "))
}
