use regex::Regex;
use std::sync::OnceLock;

const MAX_LABEL_CHARS: usize = 200;

fn ansi_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    // CSI sequences (ESC [ ... final byte) plus bare OSC titles (ESC ] ... BEL)
    RE.get_or_init(|| Regex::new(r"\x1B\[[0-9;?]*[ -/]*[@-~]|\x1B\][^\x07]*\x07").ok())
        .as_ref()
}

fn strip_ansi(s: &str) -> String {
    match ansi_re() {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

/// One-line label for menus: escapes and control chars removed, whitespace
/// collapsed, truncated.
pub fn sanitize_for_terminal(s: &str) -> String {
    let no_ansi = strip_ansi(s);
    let collapsed: String = no_ansi
        .chars()
        .map(|ch| if matches!(ch, '\n' | '\r' | '\t') { ' ' } else { ch })
        .filter(|ch| !ch.is_control())
        .collect();
    collapsed.trim().chars().take(MAX_LABEL_CHARS).collect()
}

/// Multi-line text such as a model reply. Keeps newlines, drops every
/// other control character.
pub fn sanitize_block(s: &str) -> String {
    strip_ansi(s)
        .chars()
        .filter(|ch| *ch == '\n' || *ch == '\t' || !ch.is_control())
        .collect()
}
