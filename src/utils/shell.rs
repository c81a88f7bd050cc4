//! Shell quoting for values interpolated into release commands.

/// Escape a value for use inside single quotes.
/// Replaces `'` with `'\''` (end quote, escaped quote, start quote).
pub fn escape_single_quote_content(value: &str) -> String {
    value.replace('\'', "'\\''")
}

/// Quote a single argument for shell execution.
/// - Empty strings become `''`
/// - Strings with shell metacharacters are wrapped in single quotes
/// - Anything else is returned unchanged, so plain paths and URLs read as typed
pub fn quote_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }

    const SHELL_META: &[char] = &[
        ' ', '\t', '\n', '\'', '"', '\\', '$', '`', '!', '*', '?', '[', ']', '(', ')', '{', '}',
        '<', '>', '|', '&', ';', '#', '~',
    ];

    if !arg.contains(SHELL_META) {
        return arg.to_string();
    }

    format!("'{}'", escape_single_quote_content(arg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_values_pass_through() {
        assert_eq!(quote_arg("../aws-s3-public"), "../aws-s3-public");
        assert_eq!(
            quote_arg("s3://io.flow.aws-s3-public/util"),
            "s3://io.flow.aws-s3-public/util"
        );
        assert_eq!(
            quote_arg("read=uri=http://acs.amazonaws.com/groups/global/AllUsers"),
            "read=uri=http://acs.amazonaws.com/groups/global/AllUsers"
        );
    }

    #[test]
    fn commit_message_is_quoted() {
        assert_eq!(
            quote_arg("Add new version of api-lint"),
            "'Add new version of api-lint'"
        );
    }

    #[test]
    fn glob_characters_are_quoted() {
        assert_eq!(quote_arg("util/*"), "'util/*'");
    }

    #[test]
    fn embedded_single_quote_is_escaped() {
        assert_eq!(quote_arg("it's"), "'it'\\''s'");
    }

    #[test]
    fn empty_becomes_empty_quotes() {
        assert_eq!(quote_arg(""), "''");
    }
}
