//! Row structs bridging Diesel and the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::UserPersistenceError;
use crate::domain::review::{Rating, Review, ReviewDraft, ReviewId, RATING_CHOICES};
use crate::domain::user::{Nickname, User, UserId};

use super::schema::{reviews, users};

/// A review as read from the database.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReviewRow {
    pub id: Uuid,
    pub title: String,
    pub restaurant_name: String,
    pub restaurant_link: String,
    pub rating: i16,
    pub image1: Option<String>,
    pub image2: Option<String>,
    pub image3: Option<String>,
    pub content: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Convert a database row to a domain review.
///
/// A rating outside the choice set can only appear through out-of-band
/// writes; it is clamped to the nearest choice and logged rather than
/// failing the whole listing.
pub fn row_to_review(row: ReviewRow) -> Review {
    let rating = u8::try_from(row.rating)
        .ok()
        .and_then(|value| Rating::new(value).ok())
        .unwrap_or_else(|| {
            tracing::warn!(review_id = %row.id, rating = row.rating, "unrecognised rating value");
            let fallback = if row.rating > i16::from(RATING_CHOICES[RATING_CHOICES.len() - 1]) {
                RATING_CHOICES[RATING_CHOICES.len() - 1]
            } else {
                RATING_CHOICES[0]
            };
            Rating::new(fallback).unwrap_or_else(|_| unreachable!("choice set is non-empty"))
        });

    Review {
        id: ReviewId::from_uuid(row.id),
        title: row.title,
        restaurant_name: row.restaurant_name,
        restaurant_link: row.restaurant_link,
        rating,
        images: [row.image1, row.image2, row.image3],
        content: row.content,
        author_id: UserId::from_uuid(row.author_id),
        created_at: row.created_at,
    }
}

/// Insertable review row.
#[derive(Debug, Insertable)]
#[diesel(table_name = reviews)]
pub struct NewReviewRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub restaurant_name: &'a str,
    pub restaurant_link: &'a str,
    pub rating: i16,
    pub image1: Option<&'a str>,
    pub image2: Option<&'a str>,
    pub image3: Option<&'a str>,
    pub content: &'a str,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewReviewRow<'a> {
    /// Flatten a domain review into its insertable row.
    #[must_use]
    pub fn from_review(review: &'a Review) -> Self {
        Self {
            id: review.id.as_uuid(),
            title: &review.title,
            restaurant_name: &review.restaurant_name,
            restaurant_link: &review.restaurant_link,
            rating: i16::from(review.rating.value()),
            image1: review.images[0].as_deref(),
            image2: review.images[1].as_deref(),
            image3: review.images[2].as_deref(),
            content: &review.content,
            author_id: review.author_id.as_uuid(),
            created_at: review.created_at,
        }
    }
}

/// Changeset covering exactly the user-editable review fields.
///
/// `author_id` and `created_at` are deliberately absent so an update can
/// never touch them. Cleared image slots must write NULL, hence
/// `treat_none_as_null`.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = reviews)]
#[diesel(treat_none_as_null = true)]
pub struct ReviewChangeset<'a> {
    pub title: &'a str,
    pub restaurant_name: &'a str,
    pub restaurant_link: &'a str,
    pub rating: i16,
    pub image1: Option<&'a str>,
    pub image2: Option<&'a str>,
    pub image3: Option<&'a str>,
    pub content: &'a str,
}

impl<'a> ReviewChangeset<'a> {
    /// Build the changeset from a validated draft.
    #[must_use]
    pub fn from_draft(draft: &'a ReviewDraft) -> Self {
        let images = draft.images();
        Self {
            title: draft.title(),
            restaurant_name: draft.restaurant_name(),
            restaurant_link: draft.restaurant_link(),
            rating: i16::from(draft.rating().value()),
            image1: images[0].as_deref(),
            image2: images[1].as_deref(),
            image3: images[2].as_deref(),
            content: draft.content(),
        }
    }
}

/// A user as read from the database.
///
/// `password_digest` never leaves the persistence layer; the identity
/// adapter queries it directly.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
}

/// Convert a database row to a domain user.
///
/// A nickname that fails domain validation means the row was written
/// outside this service; surface it as a query error instead of inventing
/// a display name.
pub fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let nickname = Nickname::new(&row.nickname).map_err(|err| {
        tracing::warn!(user_id = %row.id, error = %err, "stored nickname fails validation");
        UserPersistenceError::query("stored nickname fails validation")
    })?;
    Ok(User {
        id: UserId::from_uuid(row.id),
        nickname,
        created_at: row.created_at,
    })
}
