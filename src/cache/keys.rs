//! Cache key builders.
//!
//! Equal requests must produce byte-identical keys so that concurrent callers
//! meet on the same entry and the same population lock. Absent parameters map
//! to a fixed sentinel instead of being left out.

/// Sentinel for a missing language filter.
pub const ALL_LANGUAGES: &str = "all";

/// Page used when none (or page 0) is requested.
pub const FIRST_PAGE: u32 = 1;

/// Prefix of every population lock key.
pub const LOCK_PREFIX: &str = "lock:";

fn language_or_all(language: Option<&str>) -> &str {
    match language {
        Some(lang) if !lang.is_empty() => lang,
        _ => ALL_LANGUAGES,
    }
}

/// `trending:{language|all}`
pub fn trending(language: Option<&str>) -> String {
    format!("trending:{}", language_or_all(language))
}

/// `discover:{language|all}:{page|1}`
pub fn discover(language: Option<&str>, page: Option<u32>) -> String {
    let page = match page {
        Some(p) if p > 0 => p,
        _ => FIRST_PAGE,
    };
    format!("discover:{}:{}", language_or_all(language), page)
}

/// `chef:{username}`
pub fn chef_profile(username: &str) -> String {
    format!("chef:{username}")
}

/// `recipe:stats:{id}`
pub fn recipe_stats(recipe_id: &str) -> String {
    format!("recipe:stats:{recipe_id}")
}

/// `recipe:votes:{id}`
pub fn recipe_votes(recipe_id: &str) -> String {
    format!("recipe:votes:{recipe_id}")
}

pub fn categories() -> String {
    "categories:all".to_string()
}

/// Population lock guarding `key`.
pub fn lock(key: &str) -> String {
    format!("{LOCK_PREFIX}{key}")
}

/// Glob patterns covering a whole class of keys, for bulk invalidation.
pub mod patterns {
    /// Every trending feed, all languages.
    pub fn trending() -> String {
        "trending:*".to_string()
    }

    /// Every discover page, all languages.
    pub fn discover() -> String {
        "discover:*".to_string()
    }

    pub fn chef_profiles() -> String {
        "chef:*".to_string()
    }

    /// Every aggregate cached for one recipe (stats, votes).
    pub fn recipe(recipe_id: &str) -> String {
        format!("recipe:*:{recipe_id}")
    }
}
