//! Review entity, rating choices, and draft validation.
//!
//! A [`ReviewDraft`] holds the user-editable fields of a review after field
//! validation. The author and creation timestamp are never part of a draft:
//! the author is stamped server-side at creation and immutable afterwards.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::user::UserId;

/// The fixed rating choice set presented to reviewers.
pub const RATING_CHOICES: [u8; 5] = [1, 2, 3, 4, 5];

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;
/// Maximum restaurant name length in characters.
pub const RESTAURANT_NAME_MAX_CHARS: usize = 100;
/// Maximum stored length of an image storage key.
pub const IMAGE_KEY_MAX_CHARS: usize = 255;
/// Number of optional image slots on a review.
pub const IMAGE_SLOTS: usize = 3;

/// Stable review identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(Uuid);

impl ReviewId {
    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Mint a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A rating drawn from [`RATING_CHOICES`].
///
/// Serialises as its numeric value; construction always validates, so no
/// deserialisation path exists that could bypass the choice set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Accept a rating only if it belongs to the fixed choice set.
    pub fn new(value: u8) -> Result<Self, ReviewFieldError> {
        if RATING_CHOICES.contains(&value) {
            Ok(Self(value))
        } else {
            Err(ReviewFieldError::RatingOutOfRange)
        }
    }

    /// The numeric rating value.
    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Image slot position, 1-based to match the stored column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    First,
    Second,
    Third,
}

impl ImageSlot {
    /// Field name used in validation error payloads.
    #[must_use]
    pub fn field_name(self) -> &'static str {
        match self {
            Self::First => "image1",
            Self::Second => "image2",
            Self::Third => "image3",
        }
    }
}

/// A single-field validation failure on a submitted review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewFieldError {
    EmptyTitle,
    TitleTooLong,
    EmptyRestaurantName,
    RestaurantNameTooLong,
    /// The restaurant link is not a parseable absolute URL.
    InvalidRestaurantLink,
    /// The rating is outside the fixed choice set.
    RatingOutOfRange,
    /// An image slot was supplied but blank.
    BlankImage(ImageSlot),
    /// An image storage key exceeds the stored column width.
    ImageKeyTooLong(ImageSlot),
    EmptyContent,
}

impl ReviewFieldError {
    /// The submitted field this error refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong => "title",
            Self::EmptyRestaurantName | Self::RestaurantNameTooLong => "restaurantName",
            Self::InvalidRestaurantLink => "restaurantLink",
            Self::RatingOutOfRange => "rating",
            Self::BlankImage(slot) | Self::ImageKeyTooLong(slot) => slot.field_name(),
            Self::EmptyContent => "content",
        }
    }

    /// Stable machine-readable failure code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::EmptyRestaurantName | Self::EmptyContent => "empty",
            Self::TitleTooLong | Self::RestaurantNameTooLong | Self::ImageKeyTooLong(_) => {
                "too_long"
            }
            Self::InvalidRestaurantLink => "invalid_link",
            Self::RatingOutOfRange => "out_of_range",
            Self::BlankImage(_) => "blank",
        }
    }
}

impl fmt::Display for ReviewFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field(), self.code())
    }
}

impl std::error::Error for ReviewFieldError {}

/// All field failures found while validating one submitted review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewValidationError(Vec<ReviewFieldError>);

impl ReviewValidationError {
    /// The individual field failures, in submission field order.
    #[must_use]
    pub fn fields(&self) -> &[ReviewFieldError] {
        &self.0
    }
}

impl fmt::Display for ReviewValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "review has {} invalid field(s)", self.0.len())
    }
}

impl std::error::Error for ReviewValidationError {}

/// Raw user-submitted review fields prior to validation.
#[derive(Debug, Clone, Default)]
pub struct ReviewDraftInput {
    pub title: String,
    pub restaurant_name: String,
    pub restaurant_link: String,
    pub rating: u8,
    pub image1: Option<String>,
    pub image2: Option<String>,
    pub image3: Option<String>,
    pub content: String,
}

/// The validated, user-editable fields of a review.
///
/// ## Invariants
/// - `title` and `restaurant_name` are trimmed, non-empty, and bounded.
/// - `restaurant_link` parses as an absolute URL.
/// - `rating` belongs to [`RATING_CHOICES`].
/// - Image keys, when present, are trimmed, non-empty, and bounded.
/// - `content` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    title: String,
    restaurant_name: String,
    restaurant_link: String,
    rating: Rating,
    images: [Option<String>; IMAGE_SLOTS],
    content: String,
}

impl ReviewDraft {
    /// Validate raw input into a draft, collecting every field failure.
    pub fn validate(input: ReviewDraftInput) -> Result<Self, ReviewValidationError> {
        let mut errors = Vec::new();

        let title = bounded_text(
            &input.title,
            TITLE_MAX_CHARS,
            ReviewFieldError::EmptyTitle,
            ReviewFieldError::TitleTooLong,
            &mut errors,
        );
        let restaurant_name = bounded_text(
            &input.restaurant_name,
            RESTAURANT_NAME_MAX_CHARS,
            ReviewFieldError::EmptyRestaurantName,
            ReviewFieldError::RestaurantNameTooLong,
            &mut errors,
        );

        let restaurant_link = input.restaurant_link.trim().to_owned();
        if Url::parse(&restaurant_link).is_err() {
            errors.push(ReviewFieldError::InvalidRestaurantLink);
        }

        let rating = match Rating::new(input.rating) {
            Ok(rating) => Some(rating),
            Err(err) => {
                errors.push(err);
                None
            }
        };

        let images = [
            (ImageSlot::First, input.image1),
            (ImageSlot::Second, input.image2),
            (ImageSlot::Third, input.image3),
        ]
        .map(|(slot, key)| image_key(slot, key, &mut errors));

        if input.content.trim().is_empty() {
            errors.push(ReviewFieldError::EmptyContent);
        }

        if !errors.is_empty() {
            return Err(ReviewValidationError(errors));
        }

        Ok(Self {
            title,
            restaurant_name,
            restaurant_link,
            // Validation pushed an error for every None above.
            rating: rating.unwrap_or(Rating(RATING_CHOICES[0])),
            images,
            content: input.content,
        })
    }

    /// Review title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Name of the reviewed restaurant.
    #[must_use]
    pub fn restaurant_name(&self) -> &str {
        &self.restaurant_name
    }

    /// External link to the restaurant.
    #[must_use]
    pub fn restaurant_link(&self) -> &str {
        &self.restaurant_link
    }

    /// Chosen rating.
    #[must_use]
    pub fn rating(&self) -> Rating {
        self.rating
    }

    /// Image storage keys by slot.
    #[must_use]
    pub fn images(&self) -> &[Option<String>; IMAGE_SLOTS] {
        &self.images
    }

    /// Free-text review body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

fn bounded_text(
    raw: &str,
    max_chars: usize,
    empty: ReviewFieldError,
    too_long: ReviewFieldError,
    errors: &mut Vec<ReviewFieldError>,
) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.push(empty);
    } else if trimmed.chars().count() > max_chars {
        errors.push(too_long);
    }
    trimmed.to_owned()
}

fn image_key(
    slot: ImageSlot,
    key: Option<String>,
    errors: &mut Vec<ReviewFieldError>,
) -> Option<String> {
    let key = key?;
    let trimmed = key.trim();
    if trimmed.is_empty() {
        errors.push(ReviewFieldError::BlankImage(slot));
    } else if trimmed.chars().count() > IMAGE_KEY_MAX_CHARS {
        errors.push(ReviewFieldError::ImageKeyTooLong(slot));
    }
    Some(trimmed.to_owned())
}

/// A persisted restaurant review.
///
/// ## Invariants
/// - `author_id` is assigned once at creation from the authenticated
///   requester and never reassigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: ReviewId,
    pub title: String,
    pub restaurant_name: String,
    pub restaurant_link: String,
    pub rating: Rating,
    pub images: [Option<String>; IMAGE_SLOTS],
    pub content: String,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Materialise a new review from a validated draft.
    ///
    /// The author and timestamp come from the server, never the submission.
    #[must_use]
    pub fn from_draft(draft: ReviewDraft, author_id: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            id: ReviewId::generate(),
            title: draft.title,
            restaurant_name: draft.restaurant_name,
            restaurant_link: draft.restaurant_link,
            rating: draft.rating,
            images: draft.images,
            content: draft.content,
            author_id,
            created_at,
        }
    }

    /// Apply a validated draft to this review, leaving authorship untouched.
    #[must_use]
    pub fn with_draft(mut self, draft: ReviewDraft) -> Self {
        self.title = draft.title;
        self.restaurant_name = draft.restaurant_name;
        self.restaurant_link = draft.restaurant_link;
        self.rating = draft.rating;
        self.images = draft.images;
        self.content = draft.content;
        self
    }
}
