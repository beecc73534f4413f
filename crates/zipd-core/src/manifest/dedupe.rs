//! Collision-free entry name allocation.

use std::collections::HashSet;

/// Hands out entry names that are unique within one archive.
///
/// The first request for a name keeps it unchanged; later requests for the
/// same name get `_2`, `_3`, ... inserted before the extension (appended if
/// there is none). Comparison is case-sensitive exact equality.
#[derive(Debug, Default)]
pub struct NameAllocator {
    used: HashSet<String>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `base` if unused, otherwise the first free suffixed variant.
    pub fn allocate(&mut self, base: &str) -> String {
        if self.used.insert(base.to_string()) {
            return base.to_string();
        }

        let (stem, ext) = split_extension(base);
        let mut n = 2u32;
        loop {
            let candidate = match ext {
                Some(ext) => format!("{stem}_{n}.{ext}"),
                None => format!("{stem}_{n}"),
            };
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Splits `"a.tar.gz"` into `("a.tar", Some("gz"))`. A leading dot does not
/// count as an extension separator.
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}
