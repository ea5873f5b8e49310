use anyhow::{bail, Result};

/// Rhythm categories scraped by default. Short names are CLI aliases
/// for the site's listing paths.
pub const CATEGORY_PATHS: &[(&str, &str)] = &[
    ("ballad", "/rhythm/v/ballad"),
    ("blues", "/rhythm/v/blues"),
    ("disco", "/rhythm/v/disco"),
    ("slow", "/rhythm/v/slow"),
    ("slow-rock", "/rhythm/v/slow-rock"),
    ("bollero", "/rhythm/v/bollero"),
    ("valse", "/rhythm/v/valse"),
    ("fox", "/rhythm/v/fox"),
    ("pop", "/rhythm/v/pop"),
    ("boston", "/rhythm/v/boston"),
    ("bossa-nova", "/rhythm/v/bossa-nova"),
    ("rock", "/rhythm/v/rock"),
    ("chachacha", "/rhythm/v/chachacha"),
    ("rhumba", "/rhythm/v/rhumba"),
    ("tango", "/rhythm/v/tango"),
];

/// Resolve CLI category selections to listing paths.
///
/// An empty selection means every known category. Items starting with
/// `/` pass through as raw listing paths; anything else must be a known
/// short name.
pub fn resolve(selected: &[String]) -> Result<Vec<String>> {
    if selected.is_empty() {
        return Ok(CATEGORY_PATHS.iter().map(|(_, p)| (*p).to_string()).collect());
    }

    let mut resolved = Vec::with_capacity(selected.len());
    for item in selected {
        let key = item.to_lowercase();
        if let Some((_, path)) = CATEGORY_PATHS.iter().find(|(name, _)| *name == key) {
            resolved.push((*path).to_string());
        } else if item.starts_with('/') {
            resolved.push(item.clone());
        } else {
            bail!("Unknown category: {}", item);
        }
    }
    Ok(resolved)
}
