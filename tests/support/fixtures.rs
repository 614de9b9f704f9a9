//! Test fixtures and constants.

/// Fake AWS CLI.
///
/// Logs each argument on its own line, followed by `stdin=<data>` when the
/// plaintext is read from stdin, then `---`. Prints `enc[<plaintext>]`.
/// Plaintexts containing FAIL exit 254; plaintexts containing SLOW hang.
/// Like the real CLI, a `--plaintext` argument starting with `-` is a usage
/// error and a `file://` argument is loaded as a paramfile, both exit 2.
pub const FAKE_AWS: &str = r#"#!/bin/sh
log="{log}"
plaintext=""
prev=""
for arg in "$@"; do
  printf '%s\n' "$arg" >> "$log"
  if [ "$prev" = "--plaintext" ]; then
    case "$arg" in
      -*)
        echo "aws: error: argument --plaintext: expected one argument" >&2
        exit 2
        ;;
      file://*)
        echo "Error parsing parameter '--plaintext': Unable to load paramfile $arg" >&2
        exit 2
        ;;
    esac
    plaintext="$arg"
  fi
  prev="$arg"
done
if [ "$plaintext" = "fileb:///dev/stdin" ]; then
  plaintext="$(cat)"
  printf 'stdin=%s\n' "$plaintext" >> "$log"
fi
echo '---' >> "$log"
case "$plaintext" in
  *FAIL*)
    echo "An error occurred (AccessDeniedException) when calling the Encrypt operation" >&2
    exit 254
    ;;
  *SLOW*)
    sleep 5
    ;;
esac
printf 'enc[%s]\n' "$plaintext"
"#;

/// A realistic secrets file.
pub const SAMPLE_SECRETS: &str = "\
// database
DB_HOST=localhost
DB_PASSWORD=s3cr3t=with=equals

// services
API_URL=https://api.example.com/v1
EMPTY_VAR=
lowercase=ignored
";

/// Expected output for `SAMPLE_SECRETS`.
pub const SAMPLE_SEALED: &str = "\
DB_HOST=enc[localhost]
DB_PASSWORD=enc[s3cr3t=with=equals]
API_URL=enc[https://api.example.com/v1]
";

/// Expected argument vector for a literal plaintext, without optional flags.
pub fn literal_call(key: &str, plaintext: &str) -> Vec<String> {
    [
        "kms",
        "encrypt",
        "--key-id",
        key,
        "--plaintext",
        plaintext,
        "--output",
        "text",
        "--query",
        "CiphertextBlob",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
