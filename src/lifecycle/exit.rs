//! Fatal error reporting.

use std::io::Write;

/// Print `Fatal: <message>` to stderr, and to stdout as well unless both are the same file.
pub fn report_fatal(message: &str) {
    let line = format!("Fatal: {}\n", message);

    if !stdout_is_stderr() {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(line.as_bytes());
        let _ = out.flush();
    }

    let mut err = std::io::stderr().lock();
    let _ = err.write_all(line.as_bytes());
    let _ = err.flush();
}

#[cfg(unix)]
fn stdout_is_stderr() -> bool {
    use std::os::unix::fs::MetadataExt;

    match (
        std::fs::metadata("/dev/stdout"),
        std::fs::metadata("/dev/stderr"),
    ) {
        (Ok(out), Ok(err)) => out.dev() == err.dev() && out.ino() == err.ino(),
        _ => false,
    }
}

// No reliable same-file check elsewhere; stdout is rarely redirected there.
#[cfg(not(unix))]
fn stdout_is_stderr() -> bool {
    false
}
