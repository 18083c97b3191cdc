//! Root / extension splitting.

/// Split `name` into `(root, extension)`.
///
/// The root is any leading dots followed by the first run of non-dot
/// characters. Everything after it is the extension, so multi-part
/// extensions stay together (`name.tar.gz` gives `("name", ".tar.gz")`).
/// Hidden files without a further dot have an empty extension.
///
/// A lone trailing `.` is not an extension; it stays on the root so that
/// `root + extension == name` always holds.
pub fn split_extension(name: &str) -> (&str, &str) {
    let dots = name.len() - name.trim_start_matches('.').len();
    let body = &name[dots..];
    let run = body.find('.').unwrap_or(body.len());
    if run == 0 {
        return (name, "");
    }

    let split = dots + run;
    let rest = &name[split..];
    if rest.len() > 1 {
        (&name[..split], rest)
    } else {
        (name, "")
    }
}
