//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them for
//! compile-time query validation and type-safe SQL generation. Regenerate
//! with `diesel print-schema` after changing migrations.

diesel::table! {
    /// User accounts.
    ///
    /// Rows are created by the identity collaborator at signup; the review
    /// service only updates `nickname` (signup completion) while the
    /// identity adapter owns `password_digest`.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name shown alongside reviews (max 32 characters).
        #[max_length = 32]
        nickname -> Varchar,
        /// Hex-encoded SHA-256 digest of the account password.
        #[max_length = 64]
        password_digest -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Email addresses tracked by the identity collaborator.
    ///
    /// The review service only reads the `verified` flag; address
    /// management and confirmation mail belong to the collaborator.
    email_addresses (id) {
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        #[max_length = 254]
        email -> Varchar,
        /// Whether a confirmation round-trip has completed.
        verified -> Bool,
        /// Whether this is the account's primary address.
        primary_address -> Bool,
    }
}

diesel::table! {
    /// Restaurant reviews.
    reviews (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        #[max_length = 100]
        title -> Varchar,
        #[max_length = 100]
        restaurant_name -> Varchar,
        restaurant_link -> Text,
        /// Rating drawn from the fixed 1–5 choice set.
        rating -> Int2,
        #[max_length = 255]
        image1 -> Nullable<Varchar>,
        #[max_length = 255]
        image2 -> Nullable<Varchar>,
        #[max_length = 255]
        image3 -> Nullable<Varchar>,
        content -> Text,
        /// Creating user; immutable after insert.
        author_id -> Uuid,
        /// Creation timestamp; listings order by this, descending.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(reviews -> users (author_id));
diesel::joinable!(email_addresses -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(email_addresses, reviews, users);
