//! Filter query construction for song listings.
//!
//! A [`SongFilter`] is turned into a list of predicates, each carrying its
//! own bind value, which are then rendered into a [`QueryBuilder`] as an
//! `AND` conjunction. User input only ever reaches the database as a bound
//! parameter.

use crate::models::{Song, SongFilter};
use crate::repositories::PageRequest;
use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite};

const SELECT_SONGS: &str =
    "SELECT id, group_name, song_title, release_date, lyrics, link FROM songs";
const COUNT_SONGS: &str = "SELECT COUNT(*) FROM songs";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    /// `column LIKE %value% ESCAPE '\'` over a pre-normalized column
    Contains {
        column: &'static str,
        pattern: String,
    },
    /// `column = value`
    DateEquals {
        column: &'static str,
        value: NaiveDate,
    },
}

/// Song listing query derived from a [`SongFilter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongQuery {
    predicates: Vec<Predicate>,
}

impl SongQuery {
    /// Build the predicate list for a filter. Blank text fields are ignored.
    pub fn from_filter(filter: &SongFilter) -> Self {
        let mut predicates = Vec::new();

        if let Some(group_name) = non_blank(&filter.group_name) {
            predicates.push(Predicate::Contains {
                column: "normalized_group_name",
                pattern: contains_pattern(group_name),
            });
        }

        if let Some(song_name) = non_blank(&filter.song_name) {
            predicates.push(Predicate::Contains {
                column: "normalized_song_title",
                pattern: contains_pattern(song_name),
            });
        }

        if let Some(release_date) = filter.release_date {
            predicates.push(Predicate::DateEquals {
                column: "release_date",
                value: release_date,
            });
        }

        Self { predicates }
    }

    /// True when no predicate constrains the listing.
    pub(crate) fn is_unfiltered(&self) -> bool {
        self.predicates.is_empty()
    }

    /// `SELECT ... WHERE ... ORDER BY id DESC LIMIT ? OFFSET ?`
    pub fn select(&self, page_request: PageRequest) -> QueryBuilder<'static, Sqlite> {
        let mut builder = QueryBuilder::new(SELECT_SONGS);
        self.push_where(&mut builder);

        builder.push(" ORDER BY id DESC LIMIT ");
        builder.push_bind(i64::from(page_request.limit()));
        builder.push(" OFFSET ");
        builder.push_bind(i64::from(page_request.offset()));

        builder
    }

    /// `SELECT COUNT(*) ... WHERE ...` over the same predicates.
    pub fn count(&self) -> QueryBuilder<'static, Sqlite> {
        let mut builder = QueryBuilder::new(COUNT_SONGS);
        self.push_where(&mut builder);
        builder
    }

    fn push_where(&self, builder: &mut QueryBuilder<'static, Sqlite>) {
        for (index, predicate) in self.predicates.iter().enumerate() {
            builder.push(if index == 0 { " WHERE " } else { " AND " });

            match predicate {
                Predicate::Contains { column, pattern } => {
                    builder.push(*column);
                    builder.push(" LIKE ");
                    builder.push_bind(pattern.clone());
                    builder.push(" ESCAPE '\\'");
                }
                Predicate::DateEquals { column, value } => {
                    builder.push(*column);
                    builder.push(" = ");
                    builder.push_bind(*value);
                }
            }
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// `%value%` over the normalized value, with LIKE wildcards in the user input
/// escaped so they match literally.
fn contains_pattern(value: &str) -> String {
    let normalized = Song::normalize(value);
    let mut pattern = String::with_capacity(normalized.len() + 2);

    pattern.push('%');
    for c in normalized.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');

    pattern
}
