//! Command line tokenizing and logical program name resolution
//!
//! Process inspection tools hand back a single flattened string per process.
//! These helpers split it back into arguments and decide which program the
//! line really belongs to, looking through `node script.js` style launches.

use crate::config::{NODE_INTERPRETER, SCRIPT_EXTENSIONS};
use once_cell::sync::Lazy;
use regex::Regex;

// A token is one or more adjacent bare runs or quoted runs. The closing quote
// is optional so an unterminated quote swallows the rest of the line.
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?:[^\s"]+|"[^"]*"?)+"#).unwrap());

// PowerShell's CSV output doubles embedded quotes.
static QUOTE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r#""{2,}"#).unwrap());

/// Split a raw command line into argument tokens.
///
/// Quotes group whitespace into a single token and are then dropped, so
/// `"C:\Program Files\node.exe" cli.js` yields `C:\Program Files\node.exe` and
/// `cli.js`. There is no escaping inside quotes.
pub fn tokenize(command_line: &str) -> Vec<String> {
    let normalized = QUOTE_RUN.replace_all(command_line, "\"");
    let normalized = normalized.trim();
    if normalized.is_empty() {
        return Vec::new();
    }

    TOKEN
        .find_iter(normalized)
        .map(|token| token.as_str().replace('"', ""))
        .collect()
}

/// Final path segment of `target` with a known executable or script suffix removed.
///
/// Both `/` and `\` are separators regardless of the host platform.
pub fn basename(target: &str) -> &str {
    let trimmed = target.trim_end_matches(['/', '\\']);
    let segment = match trimmed.rfind(['/', '\\']) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    };
    strip_script_extension(segment)
}

fn strip_script_extension(segment: &str) -> &str {
    for ext in SCRIPT_EXTENSIONS {
        let Some(cut) = segment.len().checked_sub(ext.len() + 1) else {
            continue;
        };
        let Some(suffix) = segment.get(cut..) else {
            continue;
        };
        if suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(ext) {
            return &segment[..cut];
        }
    }
    segment
}

/// Logical program name for an already tokenized command line.
///
/// Returns an empty string for an empty token list. When the first token is
/// the `node` runtime and a script follows, the script's name wins.
pub fn extract_binary_name(tokens: &[String]) -> String {
    let Some(first) = tokens.first() else {
        return String::new();
    };

    let target = match tokens.get(1) {
        Some(script) if !script.is_empty() && basename(first) == NODE_INTERPRETER => script,
        _ => first,
    };

    basename(target).to_string()
}

/// Tokenize and resolve in one step.
pub fn binary_name_of(command_line: &str) -> String {
    extract_binary_name(&tokenize(command_line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use test_case::test_case;

    fn owned(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_words_split_on_whitespace() {
        assert_eq!(tokenize("foo bar baz"), owned(&["foo", "bar", "baz"]));
        assert_eq!(tokenize("  foo\tbar \n baz  "), owned(&["foo", "bar", "baz"]));
    }

    #[test]
    fn quoted_path_with_spaces_stays_one_token() {
        assert_eq!(
            tokenize(r#""C:\Program Files\node.exe" script.js"#),
            owned(&[r"C:\Program Files\node.exe", "script.js"])
        );
    }

    #[test]
    fn adjacent_quoted_and_bare_runs_join() {
        assert_eq!(
            tokenize(r#""C:\Program Files\x.exe"suffix next"#),
            owned(&[r"C:\Program Files\x.exesuffix", "next"])
        );
        assert_eq!(tokenize(r#"--dir="a b"/c"#), owned(&["--dir=a b/c"]));
    }

    #[test]
    fn doubled_quotes_collapse() {
        assert_eq!(tokenize(r#"""foo"""#), tokenize(r#""foo""#));
        assert_eq!(
            tokenize(r#"""C:\Program Files\nodejs\node.exe"" ""C:\a b\pnpm.cjs"" install"#),
            owned(&[r"C:\Program Files\nodejs\node.exe", r"C:\a b\pnpm.cjs", "install"])
        );
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "spaces")]
    #[test_case("\t\n" ; "tabs and newlines")]
    fn blank_input_has_no_tokens(input: &str) {
        assert!(tokenize(input).is_empty());
    }

    #[test]
    fn unterminated_quote_absorbs_rest_of_line() {
        assert_eq!(
            tokenize(r#"sfw "pnpm install --frozen"#),
            owned(&["sfw", "pnpm install --frozen"])
        );
    }

    #[test]
    fn tokens_never_contain_quotes() {
        for token in tokenize(r#"a"b" "c d"e "" f""g "#) {
            assert!(!token.contains('"'), "token {token:?} kept a quote");
        }
    }

    #[test_case("/usr/local/bin/aikido-pnpm", "aikido-pnpm" ; "posix path")]
    #[test_case(r"C:\Program Files\nodejs\node.exe", "node" ; "windows exe")]
    #[test_case("C:/tools/sfw.CMD", "sfw" ; "uppercase cmd")]
    #[test_case("build.mjs", "build" ; "mjs")]
    #[test_case("lib/index.cjs", "index" ; "cjs")]
    #[test_case("archive.tar.gz", "archive.tar.gz" ; "unknown suffix")]
    #[test_case("/opt/sfw/", "sfw" ; "trailing separator")]
    #[test_case("script.JS", "script" ; "uppercase js")]
    #[test_case(".js", "" ; "bare suffix")]
    #[test_case("", "" ; "empty")]
    fn basename_strips_directories_and_suffixes(input: &str, expected: &str) {
        assert_eq!(basename(input), expected);
    }

    #[test]
    fn basename_removes_only_one_suffix() {
        assert_eq!(basename("tool.exe.js"), "tool.exe");
    }

    #[test]
    fn node_script_resolves_to_script_name() {
        assert_eq!(extract_binary_name(&owned(&["node", "build.js"])), "build");
        assert_eq!(
            extract_binary_name(&owned(&[
                r"C:\Program Files\nodejs\node.exe",
                r"C:\Users\me\AppData\Roaming\npm\node_modules\sfw\bin\sfw.mjs",
                "pnpm",
            ])),
            "sfw"
        );
    }

    #[test]
    fn plain_binary_resolves_to_basename() {
        assert_eq!(
            extract_binary_name(&owned(&["/usr/local/bin/aikido-pnpm", "install"])),
            "aikido-pnpm"
        );
    }

    #[test]
    fn empty_tokens_resolve_to_empty_name() {
        assert_eq!(extract_binary_name(&[]), "");
    }

    #[test]
    fn lone_node_is_node() {
        assert_eq!(extract_binary_name(&owned(&["/usr/bin/node"])), "node");
        assert_eq!(extract_binary_name(&owned(&["node", ""])), "node");
    }

    #[test]
    fn only_exact_node_unwraps() {
        assert_eq!(extract_binary_name(&owned(&["nodemon", "app.js"])), "nodemon");
        assert_eq!(extract_binary_name(&owned(&["bash", "sfw.js"])), "bash");
    }

    #[test]
    fn binary_name_of_goes_through_tokenizer() {
        assert_eq!(binary_name_of("sfw pnpm install"), "sfw");
        assert_eq!(binary_name_of("node /app/cli.js"), "cli");
        assert_eq!(binary_name_of(r#""C:\Program Files\nodejs\node.exe" "C:\x y\aikido-pnpm.js""#), "aikido-pnpm");
        assert_eq!(binary_name_of(""), "");
    }

    proptest! {
        #[test]
        fn bare_word_lines_match_whitespace_split(
            words in prop::collection::vec("[A-Za-z0-9_./:=-]{1,12}", 0..8),
            gaps in prop::collection::vec("[ \t]{1,3}", 8),
        ) {
            let mut line = String::new();
            for (word, gap) in words.iter().zip(gaps.iter()) {
                line.push_str(word);
                line.push_str(gap);
            }
            let expected: Vec<String> = line.split_whitespace().map(str::to_string).collect();
            prop_assert_eq!(tokenize(&line), expected);
        }
    }
}
