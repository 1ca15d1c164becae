//! Share Links
//!
//! A puzzle is shareable as a URL carrying its seed and size as query
//! parameters. Decoding recovers them exactly; together with the seeded
//! RNG that regenerates an identical grid on the other end.

use url::Url;

use crate::puzzle::grid::{SIZE_MAX, SIZE_MIN};

/// Seed used when a link carries none.
pub const DEFAULT_SEED: &str = "amigos2025";

/// Size used when a link carries none or an unparsable value.
pub const DEFAULT_SIZE: u32 = 14;

/// Seed and size recovered from (or destined for) a share link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareParams {
    /// Puzzle seed string.
    pub seed: String,
    /// Grid size, within bounds.
    pub size: u32,
}

impl Default for ShareParams {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED.to_string(),
            size: DEFAULT_SIZE,
        }
    }
}

/// Build a share link on top of `base`, replacing any previous seed and
/// size parameters while keeping unrelated ones.
pub fn share_link(base: &str, seed: &str, size: u32) -> Result<String, url::ParseError> {
    let mut url = Url::parse(base)?;
    let others: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "seed" && k != "size")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let size = size.clamp(SIZE_MIN, SIZE_MAX);
    {
        let mut query = url.query_pairs_mut();
        query.clear();
        for (k, v) in &others {
            query.append_pair(k, v);
        }
        query.append_pair("seed", seed);
        query.append_pair("size", &size.to_string());
    }
    Ok(url.to_string())
}

/// Recover seed and size from a link.
///
/// Absent or malformed parameters fall back to the defaults, and size is
/// clamped into bounds; a link that does not parse at all yields the
/// defaults wholesale. Never errors.
pub fn parse_share_link(link: &str) -> ShareParams {
    let url = match Url::parse(link) {
        Ok(url) => url,
        Err(_) => return ShareParams::default(),
    };

    let mut params = ShareParams::default();
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "seed" => params.seed = value.into_owned(),
            "size" => {
                if let Ok(size) = value.parse::<u32>() {
                    params.size = size.clamp(SIZE_MIN, SIZE_MAX);
                }
            }
            _ => {}
        }
    }
    params
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_round_trip() {
        let link = share_link("https://example.com/sopa", "amigos2025", 14).unwrap();
        let params = parse_share_link(&link);
        assert_eq!(params.seed, "amigos2025");
        assert_eq!(params.size, 14);
    }

    #[test]
    fn test_share_link_replaces_previous_params() {
        let link = share_link(
            "https://example.com/sopa?seed=viejo&size=8&lang=es",
            "nuevo",
            20,
        )
        .unwrap();
        let params = parse_share_link(&link);
        assert_eq!(params.seed, "nuevo");
        assert_eq!(params.size, 20);
        // Unrelated parameters survive
        assert!(link.contains("lang=es"));
        assert!(!link.contains("viejo"));
    }

    #[test]
    fn test_seed_survives_url_encoding() {
        let seed = "año nuevo & más";
        let link = share_link("https://example.com/", seed, 12).unwrap();
        assert_eq!(parse_share_link(&link).seed, seed);
    }

    #[test]
    fn test_parse_clamps_size() {
        assert_eq!(
            parse_share_link("https://example.com/?size=99").size,
            SIZE_MAX
        );
        assert_eq!(parse_share_link("https://example.com/?size=2").size, SIZE_MIN);
    }

    #[test]
    fn test_parse_falls_back_on_garbage() {
        let params = parse_share_link("https://example.com/?size=grande");
        assert_eq!(params.size, DEFAULT_SIZE);
        assert_eq!(params.seed, DEFAULT_SEED);

        assert_eq!(parse_share_link("not a url"), ShareParams::default());
    }

    #[test]
    fn test_share_clamps_size() {
        let link = share_link("https://example.com/", "s", 99).unwrap();
        assert_eq!(parse_share_link(&link).size, SIZE_MAX);
    }
}
