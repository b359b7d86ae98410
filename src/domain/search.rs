use unicode_normalization::UnicodeNormalization;

use crate::entities::song;

/// Queries shorter than this are ignored so typing a single letter never
/// triggers a scan.
pub const MIN_QUERY_CHARS: usize = 2;
/// How many songs (ordered by title) a text search looks at.
pub const SEARCH_WINDOW: u64 = 100;
pub const PAGE_SIZE: u64 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPlan {
    /// No query: show the paginated catalog.
    Browse,
    /// Too short to search; keep whatever the caller already shows.
    Ignore,
    /// Filter the search window by this normalized needle.
    Filter(String),
}

/// Surrounding whitespace does not count toward the query length.
pub fn plan(query: Option<&str>) -> SearchPlan {
    let query = query.map(str::trim).unwrap_or_default();
    match query.chars().count() {
        0 => SearchPlan::Browse,
        n if n < MIN_QUERY_CHARS => SearchPlan::Ignore,
        _ => SearchPlan::Filter(normalize(query)),
    }
}

/// Case and accent folding: decompose, drop combining marks, lowercase.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect::<String>()
        .to_lowercase()
}

pub fn search_key(title: &str, artist: Option<&str>) -> String {
    match artist {
        Some(artist) => normalize(&format!("{title} {artist}")),
        None => normalize(title),
    }
}

pub fn matches(needle: &str, song: &song::Model) -> bool {
    normalize(&song.title).contains(needle)
        || song
            .artist
            .as_deref()
            .is_some_and(|artist| normalize(artist).contains(needle))
}

/// Keeps the songs matching `needle`, in their original order.
pub fn filter(songs: Vec<song::Model>, needle: &str) -> Vec<song::Model> {
    songs.into_iter().filter(|s| matches(needle, s)).collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn song(title: &str, artist: Option<&str>) -> song::Model {
        song::Model {
            id: Uuid::new_v4(),
            title: title.into(),
            artist: artist.map(String::from),
            key: None,
            lyrics: None,
            youtube_url: None,
            spotify_url: None,
            pdf_url: None,
            mp3_url: None,
            search_key: search_key(title, artist),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn catalog() -> Vec<song::Model> {
        vec![
            song("Al Que Está Sentado", Some("Marco Barrientos")),
            song("Cuán Grande Es Él", None),
            song("Dios Está Aquí", Some("José Luis Reyes")),
            song("Way Maker", Some("Sinach")),
        ]
    }

    fn titles(songs: &[song::Model]) -> Vec<&str> {
        songs.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn normalize_folds_accents_and_case() {
        assert_eq!(normalize("José"), "jose");
        assert_eq!(normalize("CUÁN"), "cuan");
        assert_eq!(normalize("Ñandú"), "nandu");
        assert_eq!(normalize("plain"), "plain");
    }

    #[test]
    fn plan_by_length() {
        assert_eq!(plan(None), SearchPlan::Browse);
        assert_eq!(plan(Some("   ")), SearchPlan::Browse);
        assert_eq!(plan(Some("é")), SearchPlan::Ignore);
        assert_eq!(plan(Some(" a ")), SearchPlan::Ignore);
        assert_eq!(plan(Some(" ab")), SearchPlan::Filter("ab".into()));
        assert_eq!(plan(Some("Él")), SearchPlan::Filter("el".into()));
    }

    #[test]
    fn accented_and_plain_queries_agree() {
        let SearchPlan::Filter(accented) = plan(Some("José")) else {
            panic!("expected a filter plan");
        };
        let SearchPlan::Filter(plain) = plan(Some("jose")) else {
            panic!("expected a filter plan");
        };
        let a = filter(catalog(), &accented);
        let b = filter(catalog(), &plain);
        assert_eq!(titles(&a), titles(&b));
        assert_eq!(titles(&a), vec!["Dios Está Aquí"]);
    }

    #[test]
    fn matches_title_or_artist_and_keeps_order() {
        let found = filter(catalog(), &normalize("esta"));
        assert_eq!(titles(&found), vec!["Al Que Está Sentado", "Dios Está Aquí"]);

        let found = filter(catalog(), &normalize("sinach"));
        assert_eq!(titles(&found), vec!["Way Maker"]);
    }

    #[test]
    fn search_is_idempotent() {
        let needle = normalize("grande");
        let once = filter(catalog(), &needle);
        let twice = filter(once.clone(), &needle);
        assert_eq!(once, twice);
    }
}
