/// Substitute the base name of a path with a replacement string.
///
/// Keeps everything up to and including the last separator; a path with no
/// separator yields the replacement alone.
pub fn replace_basename(path: &str, replacement: &str) -> String {
    let cut = match path.rfind(is_separator) {
        None => 0,
        Some(index) => index + 1,
    };

    let mut output = String::with_capacity(cut + replacement.len());
    output.push_str(&path[..cut]);
    output.push_str(replacement);
    output
}

#[cfg(windows)]
fn is_separator(value: char) -> bool {
    value == '/' || value == '\\'
}

#[cfg(not(windows))]
fn is_separator(value: char) -> bool {
    value == '/'
}
