//! Line-oriented chat wire protocol.
//!
//! Messages are plain UTF-8 text, one per line, terminated by `\n`. There is
//! no length prefix, no version negotiation and no escaping. The server relays
//! each line verbatim (minus its terminator) to every other participant.

/// TCP port both the server and the client use unless configured otherwise.
pub const DEFAULT_PORT: u16 = 12345;

/// Longest line a peer may send, terminator included. A longer line ends the
/// sender's session instead of being buffered without bound.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Client-local command that ends the chat session. Never sent to the server.
pub const EXIT_COMMAND: &str = "/quit";

/// Returns `true` when `line` is the exit command, ignoring ASCII case.
pub fn is_exit_command(line: &str) -> bool {
    line.eq_ignore_ascii_case(EXIT_COMMAND)
}

/// Build the text a client sends for one line of user input: `<name>: <text>`.
///
/// The line terminator is added by the transport, not here.
pub fn format_chat_line(display_name: &str, text: &str) -> String {
    format!("{display_name}: {text}")
}

/// Remove one trailing `\n` (and a `\r` right before it) from a raw line.
pub fn strip_line_terminator(raw: &[u8]) -> &[u8] {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    raw.strip_suffix(b"\r").unwrap_or(raw)
}

/// Decode one raw line read from the wire into text.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD instead of failing the
/// read, so a peer sending stray bytes is not disconnected for it.
pub fn decode_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(strip_line_terminator(raw)).into_owned()
}
