//! Runtime build-info module rendering.
//!
//! The rendered Lua chunk returns a zero-argument function yielding:
//!
//! ```text
//! { build_time = <epoch seconds>, manifest = { [logical_path] = { path = ..., source = ... } } }
//! ```

use std::fmt::Write;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::ports::clock::epoch_seconds;

/// File name of the generated module, placed at the root of the namespaced tree.
pub const BUILD_INFO_FILE: &str = "build_info_provider.lua";

/// One module as the runtime will see it.
#[derive(Debug, Clone, Copy)]
pub struct BuildInfoEntry<'a> {
    /// Logical path, used as the table key.
    pub logical_path: &'a str,
    /// Where the link for this module lives on disk.
    pub link_path: &'a Path,
    /// Original source path, if any.
    pub source: Option<&'a Path>,
}

/// Escapes a value for a double-quoted Lua string literal.
///
/// Control characters use Lua's three-digit decimal escape, so the literal
/// never spans lines and a following digit is not absorbed.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\{:03}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Renders the build-info module for `entries`, keeping their order.
#[must_use]
pub fn render(entries: &[BuildInfoEntry<'_>], build_time: DateTime<Utc>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        out,
        "\n\nlocal build_info = {{\n  [\"build_time\"] = {:?},\n  [\"manifest\"] = {{",
        epoch_seconds(build_time)
    );

    for entry in entries {
        let source = entry
            .source
            .map_or_else(|| "nil".to_string(), |p| quote(&p.to_string_lossy()));
        let _ = write!(
            out,
            "\n    [{}] = {{\n      [\"path\"] = {},\n      [\"source\"] = {},\n    }},",
            quote(entry.logical_path),
            quote(&entry.link_path.to_string_lossy()),
            source
        );
    }

    out.push_str("\n  },\n}\n\nreturn function()\n  return build_info\nend\n");
    out
}
