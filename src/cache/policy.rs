//! TTL Policy Module
//!
//! Named cache classes and their time-to-live. Callers of
//! [`Cache::get_or_set`](crate::cache::Cache::get_or_set) pick a tier, never a
//! raw number of seconds.

use std::fmt;

use crate::cache::MIN_LOCK_TTL_SECS;

/// A cache class with a fixed time-to-live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTier {
    /// Trending feed, changes frequently
    Trending,
    /// Discovery feed
    Discover,
    /// Chef profile and stats
    ChefProfile,
    /// Vote and comment counts for a recipe
    RecipeStats,
    /// Category listings, rarely change
    Categories,
    /// Cuisines, tags and other reference data
    StaticData,
}

impl CacheTier {
    pub const ALL: [CacheTier; 6] = [
        CacheTier::Trending,
        CacheTier::Discover,
        CacheTier::ChefProfile,
        CacheTier::RecipeStats,
        CacheTier::Categories,
        CacheTier::StaticData,
    ];

    /// Time-to-live for entries of this class, in seconds.
    pub const fn ttl_secs(self) -> u64 {
        match self {
            CacheTier::Trending => 60,
            CacheTier::Discover => 120,
            CacheTier::ChefProfile => 300,
            CacheTier::RecipeStats => 300,
            CacheTier::Categories => 3600,
            CacheTier::StaticData => 86400,
        }
    }

    /// Expiry for the population lock guarding this class.
    ///
    /// Never shorter than the entry TTL, with a floor of [`MIN_LOCK_TTL_SECS`].
    /// Expiry is the only way a lock left by a crashed holder is cleared.
    pub const fn lock_ttl_secs(self) -> u64 {
        lock_ttl_secs(self.ttl_secs())
    }

    pub const fn name(self) -> &'static str {
        match self {
            CacheTier::Trending => "trending",
            CacheTier::Discover => "discover",
            CacheTier::ChefProfile => "chefProfile",
            CacheTier::RecipeStats => "recipeStats",
            CacheTier::Categories => "categories",
            CacheTier::StaticData => "staticData",
        }
    }
}

/// Lock expiry protecting an entry that lives `ttl_secs` seconds.
pub const fn lock_ttl_secs(ttl_secs: u64) -> u64 {
    if ttl_secs > MIN_LOCK_TTL_SECS {
        ttl_secs
    } else {
        MIN_LOCK_TTL_SECS
    }
}

impl fmt::Display for CacheTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ttls() {
        assert_eq!(CacheTier::Trending.ttl_secs(), 60);
        assert_eq!(CacheTier::Discover.ttl_secs(), 120);
        assert_eq!(CacheTier::ChefProfile.ttl_secs(), 300);
        assert_eq!(CacheTier::RecipeStats.ttl_secs(), 300);
        assert_eq!(CacheTier::Categories.ttl_secs(), 3600);
        assert_eq!(CacheTier::StaticData.ttl_secs(), 86400);
    }

    #[test]
    fn test_lock_ttl_covers_entry_ttl() {
        for tier in CacheTier::ALL {
            assert!(tier.lock_ttl_secs() >= tier.ttl_secs());
            assert!(tier.lock_ttl_secs() >= MIN_LOCK_TTL_SECS);
        }
        assert_eq!(CacheTier::Trending.lock_ttl_secs(), 60);
        assert_eq!(CacheTier::Categories.lock_ttl_secs(), 3600);
    }

    #[test]
    fn test_lock_ttl_floor() {
        assert_eq!(lock_ttl_secs(0), 30);
        assert_eq!(lock_ttl_secs(5), 30);
        assert_eq!(lock_ttl_secs(30), 30);
        assert_eq!(lock_ttl_secs(31), 31);
    }

    #[test]
    fn test_tier_names() {
        assert_eq!(CacheTier::ChefProfile.to_string(), "chefProfile");
        assert_eq!(CacheTier::StaticData.name(), "staticData");
    }
}
