//! Response lines and naming rules.

use bytes::{BufMut, Bytes, BytesMut};

/// Terminates multi-line responses.
pub const END: &str = ".";

/// Answer to `config`/`fetch` for a graph that does not exist.
pub const UNKNOWN_SERVICE: &str = "# unknown service";

/// Answer to an unrecognized command.
pub const UNKNOWN_COMMAND: &str = "# Unknown command. Try list, nodes, config, fetch, version or quit";

/// Answer when a command failed while producing its response.
pub const BAD_EXIT: &str = "# Bad exit";

/// Separates the data source name from the property identifier in a field name.
pub const FIELD_SEPARATOR: &str = "__";

/// Greeting sent when a poller connects.
pub fn greeting(hostname: &str) -> String {
    format!("# munin node at {hostname}")
}

/// The `version` response line.
pub fn version_line(hostname: &str) -> String {
    format!("metrics-munin-reporter munin node on {hostname}")
}

/// Lower-case `name` and replace everything outside `[a-z0-9_]` with `_`.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Protocol field name for a data source name and a property identifier.
///
/// `field_name("gr.t1.c1", "count") == "gr_t1_c1__count"`
pub fn field_name(name: &str, property_id: &str) -> String {
    let mut field = sanitize(name);
    if field.starts_with(|c: char| c.is_ascii_digit()) {
        field.insert(0, '_');
    }
    field.push_str(FIELD_SEPARATOR);
    field.push_str(&sanitize(property_id));
    field
}

/// Graph names: letters, digits and underscore, not starting with a digit.
pub fn is_valid_graph_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Encode response lines as one newline-terminated buffer.
pub fn encode_lines<S: AsRef<str>>(lines: &[S]) -> Bytes {
    let len = lines.iter().map(|l| l.as_ref().len() + 1).sum();
    let mut buf = BytesMut::with_capacity(len);
    for line in lines {
        buf.put_slice(line.as_ref().as_bytes());
        buf.put_u8(b'\n');
    }
    buf.freeze()
}
