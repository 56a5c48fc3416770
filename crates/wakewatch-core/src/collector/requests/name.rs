//! Bare-name extraction from request header paths.

use crate::storage::model::UNKNOWN_PROCESS;

/// Reduces a header's path-or-name to a bare executable or service name.
///
/// Keeps the part after the last `/` or `\`, strips a case-insensitive
/// `.exe` suffix and trims whitespace, quotes and brackets. A token wholly
/// enclosed in brackets (`[PROCESS]`) is a request kind, not a name, and
/// yields nothing. Returns [`UNKNOWN_PROCESS`] when nothing is left.
///
/// Stripping and trimming repeat until stable, so
/// `extract_name(&extract_name(x)) == extract_name(x)`.
pub fn extract_name(input: &str) -> String {
    if input.is_empty() {
        return UNKNOWN_PROCESS.to_string();
    }

    let mut name = match input.rfind(['/', '\\']) {
        Some(pos) => &input[pos + 1..],
        None => input,
    };

    loop {
        let next = trim_decorations(strip_exe(name));
        if next == name {
            break;
        }
        name = next;
    }

    if name.is_empty() {
        UNKNOWN_PROCESS.to_string()
    } else {
        name.to_string()
    }
}

fn strip_exe(s: &str) -> &str {
    const EXT: &str = ".exe";
    let Some(split) = s.len().checked_sub(EXT.len()) else {
        return s;
    };
    if s.is_char_boundary(split) && s[split..].eq_ignore_ascii_case(EXT) {
        &s[..split]
    } else {
        s
    }
}

fn trim_decorations(s: &str) -> &str {
    let s = s.trim_matches(|c: char| c.is_whitespace() || c == '"' || c == '\'');
    if is_bracket_token(s) {
        return "";
    }
    s.trim_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '[' | ']'))
}

/// `[...]` with no other closing bracket inside.
fn is_bracket_token(s: &str) -> bool {
    s.len() >= 2
        && s.starts_with('[')
        && s.ends_with(']')
        && s[1..].find(']') == Some(s.len() - 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_path() {
        assert_eq!(extract_name("C:\\Program Files\\App\\app.exe"), "app");
    }

    #[test]
    fn test_unix_path() {
        assert_eq!(extract_name("/usr/bin/foo"), "foo");
    }

    #[test]
    fn test_empty_is_unknown() {
        assert_eq!(extract_name(""), UNKNOWN_PROCESS);
    }

    #[test]
    fn test_bracket_token_is_unknown() {
        assert_eq!(extract_name("[x]"), UNKNOWN_PROCESS);
        assert_eq!(extract_name("  [PROCESS]  "), UNKNOWN_PROCESS);
    }

    #[test]
    fn test_extension_case_insensitive() {
        assert_eq!(extract_name("C:\\Apps\\Video.EXE"), "Video");
        assert_eq!(extract_name("setup.Exe"), "setup");
    }

    #[test]
    fn test_later_separator_wins() {
        assert_eq!(extract_name("C:/mixed\\dir/tool.exe"), "tool");
        assert_eq!(extract_name("/opt/app\\bin\\svc.exe"), "svc");
    }

    #[test]
    fn test_device_path() {
        assert_eq!(
            extract_name("\\Device\\HarddiskVolume3\\Program Files\\Mozilla Firefox\\firefox.exe"),
            "firefox"
        );
    }

    #[test]
    fn test_quotes_trimmed_before_extension() {
        assert_eq!(extract_name("\"C:\\Program Files\\VLC\\vlc.exe\""), "vlc");
        assert_eq!(extract_name("'player.exe'"), "player");
    }

    #[test]
    fn test_bare_service_name_kept() {
        assert_eq!(extract_name("Audiosrv"), "Audiosrv");
        assert_eq!(extract_name("Legacy Kernel Caller"), "Legacy Kernel Caller");
    }

    #[test]
    fn test_trailing_separator_is_unknown() {
        assert_eq!(extract_name("C:\\Apps\\"), UNKNOWN_PROCESS);
        assert_eq!(extract_name(".exe"), UNKNOWN_PROCESS);
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "",
            "[x]",
            "C:\\Program Files\\App\\app.exe",
            "/usr/bin/foo",
            "foo.exe.exe",
            "\"C:\\a b\\x.exe\"",
            "[weird]name.exe",
            "  spaced.EXE  ",
            "Unknown Process",
            "driver (HDAUDIO)",
        ];
        for input in inputs {
            let once = extract_name(input);
            let twice = extract_name(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
            assert!(!once.is_empty());
        }
    }
}
