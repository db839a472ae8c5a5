/// Turns a path into the alphanumeric identifier its literal is bound to.
///
/// Every character outside `[0-9a-zA-Z]` is dropped and the rest is kept in
/// order, so distinct paths such as `a.b` and `ab` can map to the same name.
/// The pipeline rejects such collisions and empty results.
#[must_use]
pub fn mangle(path: &str) -> String {
    path.chars().filter(char::is_ascii_alphanumeric).collect()
}
