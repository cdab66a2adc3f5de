//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation. When migrations change the schema, update this file to match.

diesel::table! {
    /// Code inventory table.
    ///
    /// The `id` column is a monotonically increasing bigint; allocation order
    /// is ascending id, so insertion order is issue order. A partial index on
    /// `(category, id) WHERE consumed_at IS NULL` keeps the FIFO pop cheap.
    codes (id) {
        /// Primary key and FIFO position.
        id -> Int8,
        /// Reward category the code belongs to.
        category -> Text,
        /// The opaque redemption string handed to players.
        value -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Consumption timestamp; NULL while the code is available.
        consumed_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Redemption ledger table.
    ///
    /// One row per issued code. `code_id` is UNIQUE so a code can never be
    /// handed out twice, and `(player_id, category)` is UNIQUE so a player
    /// holds at most one code per category; both constraints back the
    /// exactly-once guarantee independently of application logic.
    redemptions (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// The consumed code. UNIQUE.
        code_id -> Int8,
        /// The redeeming player. UNIQUE together with `category`.
        player_id -> Int8,
        /// Category denormalised from the code for the idempotency lookup.
        category -> Text,
        /// Caller-supplied correlation token, bounded to 128 characters.
        correlation_id -> Nullable<Varchar>,
        /// When the code was consumed.
        redeemed_at -> Timestamptz,
    }
}

diesel::joinable!(redemptions -> codes (code_id));

diesel::allow_tables_to_appear_in_same_query!(codes, redemptions);
